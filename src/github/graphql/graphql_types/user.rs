use serde::{Deserialize, Serialize};

use crate::types::User;

/// A user reference. Selections ask for `login` and sometimes `avatarUrl` / `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub login: String,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
}

impl From<&UserNode> for User {
    fn from(node: &UserNode) -> Self {
        User::new(node.login.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequestNode {
    pub requested_reviewer: Option<RequestedReviewerNode>,
}

/// Either a `User` or a `Team`; team fields are aliased in the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedReviewerNode {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub team_login: Option<String>,
    pub team_name: Option<String>,
    pub team_avatar_url: Option<String>,
}

impl RequestedReviewerNode {
    pub fn reviewer_login(&self) -> Option<&str> {
        self.login
            .as_deref()
            .filter(|l| !l.is_empty())
            .or(self.team_login.as_deref())
    }
}
