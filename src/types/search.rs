//! Search types
//!
//! A search returns one page (the last 100 matches) of issues and pull requests
//! matching GitHub's search syntax.

use serde::{Deserialize, Serialize};

use super::{IssueKind, IssueSummary};

/// A GitHub search string such as `repo:owner/name is:open label:bug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery(pub String);

impl SearchQuery {
    pub fn new<T: Into<String>>(query: T) -> Self {
        Self(query.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: SearchQuery,
    pub items: Vec<IssueSummary>,
}

impl SearchResult {
    pub fn issues(&self) -> impl Iterator<Item = &IssueSummary> {
        self.items.iter().filter(|i| i.kind == IssueKind::Issue)
    }

    pub fn pull_requests(&self) -> impl Iterator<Item = &IssueSummary> {
        self.items.iter().filter(|i| i.kind == IssueKind::PullRequest)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
