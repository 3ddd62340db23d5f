//! Issue and pull request domain types
//!
//! Two shapes are produced: [`IssueSummary`] from search results and
//! [`IssueDetail`] from node-id refreshes, which adds review and timeline
//! information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Label, RepositoryId, User};
use crate::github::graphql::graphql_types::GraphQLError;

pub const TYPENAME_ISSUE: &str = "Issue";
pub const TYPENAME_PULL_REQUEST: &str = "PullRequest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    Issue,
    PullRequest,
}

impl IssueKind {
    pub fn from_typename(typename: &str) -> Option<Self> {
        match typename {
            TYPENAME_ISSUE => Some(Self::Issue),
            TYPENAME_PULL_REQUEST => Some(Self::PullRequest),
            _ => None,
        }
    }

    pub fn typename(&self) -> &'static str {
        match self {
            Self::Issue => TYPENAME_ISSUE,
            Self::PullRequest => TYPENAME_PULL_REQUEST,
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.typename())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueState {
    Open,
    Closed,
    Merged,
}

impl IssueState {
    /// Maps GitHub's `state` enum value. Unknown values count as closed.
    pub fn from_graphql(state: &str) -> Self {
        match state {
            "OPEN" => Self::Open,
            "MERGED" => Self::Merged,
            _ => Self::Closed,
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
            IssueState::Merged => write!(f, "merged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub due_on: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// An issue or pull request as returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSummary {
    pub kind: IssueKind,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub body: Option<String>,
    pub state: IssueState,
    pub repository: RepositoryId,
    pub is_private: bool,
    pub database_id: Option<i64>,
    pub author: Option<User>,
    pub assignees: Vec<User>,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub comments_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Pull requests only
    pub merged_at: Option<DateTime<Utc>>,
    /// Pull requests only; `None` when the server cannot report drafts.
    pub draft: Option<bool>,
}

/// A node id to refresh, with the URL used when reporting it as missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialIssue {
    pub node_id: String,
    pub html_url: String,
}

impl PartialIssue {
    pub fn new(node_id: impl Into<String>, html_url: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            html_url: html_url.into(),
        }
    }
}

/// The most recent activity on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastTimeline {
    pub user: Option<User>,
    pub at: DateTime<Utc>,
    /// Timeline item type name, `New<Typename>` when nothing happened since creation,
    /// or `ReviewThreadComment`.
    pub event_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Other,
}

impl ReviewState {
    /// Whether this review expresses a verdict rather than only comments.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Self::Approved | Self::ChangesRequested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user: User,
    pub avatar_url: Option<String>,
    pub state: ReviewState,
    pub updated_at: DateTime<Utc>,
}

/// An issue or pull request refreshed by node id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDetail {
    pub node_id: String,
    pub kind: IssueKind,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub repository: RepositoryId,
    pub is_private: bool,
    pub author: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Author, assignees, participants, requested reviewers and mentions, without duplicates.
    pub involves: Vec<User>,
    /// Users and teams `@`-mentioned in the body or in issue comments.
    #[serde(default)]
    pub mentions: Vec<User>,
    pub last_timeline: LastTimeline,
    pub draft: Option<bool>,
    pub mergeable: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub requested_reviewers: Vec<User>,
    /// Latest review per reviewer
    pub reviews: Vec<Review>,
}

/// Outcome of a node-id refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueNodesResult {
    pub issues: Vec<IssueDetail>,
    /// Requests whose node id the API did not return, e.g. moved or deleted issues.
    pub not_found: Vec<PartialIssue>,
    pub partial_errors: Vec<GraphQLError>,
}
