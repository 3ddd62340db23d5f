use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EdgesConnection, LabelNode, MilestoneNode, RepositoryNode, TotalCount, UserNode};
use crate::types::{IssueKind, IssueState, IssueSummary, Label, Milestone, RepositoryId, User};

/// `data` of the search query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchData {
    pub search: EdgesConnection<SearchNode>,
}

/// One search hit.
///
/// Fields come from `... on Issue` / `... on PullRequest` fragments, so a hit of
/// any other type arrives as an empty object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNode {
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub assignees: Option<EdgesConnection<UserNode>>,
    pub author: Option<UserNode>,
    pub body: Option<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments: Option<TotalCount>,
    pub created_at: Option<DateTime<Utc>>,
    pub database_id: Option<i64>,
    pub labels: Option<EdgesConnection<LabelNode>>,
    pub milestone: Option<MilestoneNode>,
    pub number: Option<u64>,
    pub repository: Option<RepositoryNode>,
    pub title: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub issue_state: Option<String>,
    pub pr_state: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub is_draft: Option<bool>,
}

impl TryFrom<SearchNode> for IssueSummary {
    type Error = anyhow::Error;

    fn try_from(node: SearchNode) -> Result<Self, Self::Error> {
        let typename = node.typename.unwrap_or_default();
        let kind = IssueKind::from_typename(&typename)
            .ok_or_else(|| anyhow::anyhow!("Unsupported search result type: '{}'", typename))?;

        let missing = |field: &str| anyhow::anyhow!("{} search result without {}", kind, field);

        let repository = node.repository.ok_or_else(|| missing("repository"))?;
        let state = match kind {
            IssueKind::Issue => node.issue_state,
            IssueKind::PullRequest => node.pr_state,
        }
        .ok_or_else(|| missing("state"))?;

        Ok(IssueSummary {
            kind,
            number: node.number.ok_or_else(|| missing("number"))?,
            title: node.title.unwrap_or_default(),
            url: node.url.ok_or_else(|| missing("url"))?,
            body: node.body,
            state: IssueState::from_graphql(&state),
            repository: RepositoryId::from(&repository),
            is_private: repository.is_private,
            database_id: node.database_id,
            author: node.author.as_ref().map(User::from),
            assignees: node
                .assignees
                .map(|a| a.into_nodes().map(|u| User::from(&u)).collect())
                .unwrap_or_default(),
            labels: node
                .labels
                .map(|l| l.into_nodes().map(Label::from).collect())
                .unwrap_or_default(),
            milestone: node.milestone.map(|m| Milestone {
                title: m.title,
                due_on: m.due_on,
                url: m.url,
            }),
            comments_count: node.comments.map(|c| c.total_count).unwrap_or_default(),
            created_at: node.created_at.ok_or_else(|| missing("createdAt"))?,
            updated_at: node.updated_at.ok_or_else(|| missing("updatedAt"))?,
            closed_at: node.closed_at,
            merged_at: node.merged_at,
            draft: node.is_draft,
        })
    }
}
