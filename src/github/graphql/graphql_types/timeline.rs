use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NodesConnection;

pub const TYPENAME_PULL_REQUEST_COMMIT: &str = "PullRequestCommit";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginNode {
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthorNode {
    pub user: Option<LoginNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub pushed_date: Option<DateTime<Utc>>,
    pub authored_date: Option<DateTime<Utc>>,
    pub committed_date: Option<DateTime<Utc>>,
    pub author: Option<CommitAuthorNode>,
}

impl CommitNode {
    fn author_login(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.user.as_ref())
            .map(|u| u.login.as_str())
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.pushed_date
            .or(self.authored_date)
            .or(self.committed_date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineCommentNode {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<LoginNode>,
    pub editor: Option<LoginNode>,
}

/// One entry of `timelineItems`.
///
/// Every item type selects a different subset of these fields, so all of them
/// are optional except the type name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub actor: Option<LoginNode>,
    pub author: Option<LoginNode>,
    pub editor: Option<LoginNode>,
    /// Markdown body of comments and reviews.
    pub body: Option<String>,
    pub commit: Option<CommitNode>,
    pub comments: Option<NodesConnection<TimelineCommentNode>>,
    pub last_seen_commit: Option<CommitNode>,
}

fn login(node: &Option<LoginNode>) -> Option<&str> {
    node.as_ref().map(|n| n.login.as_str())
}

impl TimelineItem {
    fn first_comment(&self) -> Option<&TimelineCommentNode> {
        self.comments.as_ref().and_then(|c| c.iter().next())
    }

    /// Login of whoever caused this item.
    pub fn activity_user(&self) -> Option<&str> {
        login(&self.actor)
            .or_else(|| login(&self.editor))
            .or_else(|| login(&self.author))
            .or_else(|| self.commit.as_ref().and_then(CommitNode::author_login))
            .or_else(|| self.first_comment().and_then(|c| login(&c.editor)))
            .or_else(|| self.first_comment().and_then(|c| login(&c.author)))
            .or_else(|| {
                self.last_seen_commit
                    .as_ref()
                    .and_then(CommitNode::author_login)
            })
            .filter(|l| !l.is_empty())
    }

    /// When this item happened, if the item carries any timestamp.
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
            .or(self.created_at)
            .or_else(|| self.commit.as_ref().and_then(CommitNode::timestamp))
            .or_else(|| {
                self.first_comment()
                    .and_then(|c| c.updated_at.or(c.created_at))
            })
            .or_else(|| {
                self.last_seen_commit
                    .as_ref()
                    .and_then(CommitNode::timestamp)
            })
    }

    pub fn is_pull_request_commit(&self) -> bool {
        self.typename == TYPENAME_PULL_REQUEST_COMMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_event() {
        let item: TimelineItem = serde_json::from_str(
            r#"{"__typename":"LabeledEvent","createdAt":"2024-05-01T10:00:00Z","actor":{"login":"alice"}}"#,
        )
        .unwrap();
        assert_eq!(item.activity_user(), Some("alice"));
        assert_eq!(
            item.activity_at().unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_comment_prefers_updated_at_and_editor() {
        let item: TimelineItem = serde_json::from_str(
            r#"{"__typename":"IssueComment","createdAt":"2024-05-01T10:00:00Z","updatedAt":"2024-05-02T10:00:00Z","author":{"login":"alice"},"editor":{"login":"bob"}}"#,
        )
        .unwrap();
        assert_eq!(item.activity_user(), Some("bob"));
        assert_eq!(
            item.activity_at().unwrap().to_rfc3339(),
            "2024-05-02T10:00:00+00:00"
        );
    }

    #[test]
    fn test_commit_falls_back_to_authored_date() {
        let item: TimelineItem = serde_json::from_str(
            r#"{"__typename":"PullRequestCommit","commit":{"pushedDate":null,"authoredDate":"2024-05-03T08:00:00Z","committedDate":"2024-05-03T09:00:00Z","author":{"user":{"login":"carol"}}}}"#,
        )
        .unwrap();
        assert!(item.is_pull_request_commit());
        assert_eq!(item.activity_user(), Some("carol"));
        assert_eq!(
            item.activity_at().unwrap().to_rfc3339(),
            "2024-05-03T08:00:00+00:00"
        );
    }

    #[test]
    fn test_review_thread_uses_first_comment() {
        let item: TimelineItem = serde_json::from_str(
            r#"{"__typename":"PullRequestReviewThread","comments":{"nodes":[{"createdAt":"2024-05-04T08:00:00Z","updatedAt":null,"author":{"login":"dave"},"editor":null}]}}"#,
        )
        .unwrap();
        assert_eq!(item.activity_user(), Some("dave"));
        assert_eq!(
            item.activity_at().unwrap().to_rfc3339(),
            "2024-05-04T08:00:00+00:00"
        );
    }

    #[test]
    fn test_unselected_item_has_no_activity() {
        let item: TimelineItem = serde_json::from_str(r#"{"__typename":"SomethingNew"}"#).unwrap();
        assert_eq!(item.activity_user(), None);
        assert_eq!(item.activity_at(), None);
    }
}
