use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{NodesConnection, RepositoryRefNode, ReviewRequestNode, TimelineItem, UserNode};
use crate::types::{IssueDetail, IssueKind, LastTimeline, RepositoryId, Review, ReviewState, User};

const REVIEW_THREAD_COMMENT_TYPE: &str = "ReviewThreadComment";

/// `@login` or `@org/team`, not preceded by a word character (email addresses).
static MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w@/`])@([A-Za-z0-9](?:-?[A-Za-z0-9])*(?:/[A-Za-z0-9][A-Za-z0-9_-]*)?)")
        .expect("Failed to compile mention regex")
});

/// Fenced blocks and inline code spans. GitHub does not link mentions inside them.
static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```.*?```|`[^`\n]*`").expect("Failed to compile code span regex")
});

fn mentioned_logins(markdown: &str) -> Vec<String> {
    let prose = CODE_PATTERN.replace_all(markdown, " ");
    MENTION_PATTERN
        .captures_iter(&prose)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// `data` of the node-id query. Unknown or invisible ids come back as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueNodesData {
    #[serde(default)]
    pub nodes: Vec<Option<IssueNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueNode {
    #[serde(rename = "node_id")]
    pub node_id: String,
    #[serde(rename = "__typename")]
    pub typename: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub number: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub body: Option<String>,
    pub author: Option<UserNode>,
    pub repository: Option<RepositoryRefNode>,
    pub assignees: Option<NodesConnection<UserNode>>,
    pub participants: Option<NodesConnection<UserNode>>,
    pub timeline_items: Option<NodesConnection<TimelineItem>>,
    pub is_draft: Option<bool>,
    pub mergeable: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub review_requests: Option<NodesConnection<ReviewRequestNode>>,
    pub reviews: Option<NodesConnection<ReviewNode>>,
    pub review_threads: Option<NodesConnection<ReviewThreadNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    pub author: Option<UserNode>,
    pub state: ReviewState,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewThreadNode {
    pub comments: NodesConnection<ReviewThreadCommentNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewThreadCommentNode {
    pub author: Option<UserNode>,
    pub updated_at: DateTime<Utc>,
}

impl IssueNode {
    fn author_user(&self) -> Option<User> {
        self.author.as_ref().map(User::from)
    }

    /// Most recent activity: the newest timeline item, or a newer review-thread comment.
    ///
    /// With no timeline at all the issue counts as new. A `PullRequestCommit`
    /// older than `updatedAt` (a freshly opened pull request) reports the
    /// author and `updatedAt` instead of the commit.
    pub fn last_timeline(
        &self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> LastTimeline {
        let newest = self.timeline_items.as_ref().and_then(|items| {
            items
                .iter()
                .rev()
                .max_by_key(|item| item.activity_at().unwrap_or(created_at))
        });

        let timeline = match newest {
            None => LastTimeline {
                user: self.author_user(),
                at: updated_at,
                event_type: format!("New{}", self.typename.as_deref().unwrap_or_default()),
            },
            Some(item) => {
                let at = item.activity_at().unwrap_or(created_at);
                if item.is_pull_request_commit() && at < updated_at {
                    LastTimeline {
                        user: self.author_user(),
                        at: updated_at,
                        event_type: item.typename.clone(),
                    }
                } else {
                    LastTimeline {
                        user: item.activity_user().map(User::from),
                        at,
                        event_type: item.typename.clone(),
                    }
                }
            }
        };

        match self.latest_review_thread_comment() {
            Some(comment) if comment.updated_at > timeline.at => LastTimeline {
                user: comment.author.as_ref().map(User::from),
                at: comment.updated_at,
                event_type: REVIEW_THREAD_COMMENT_TYPE.to_string(),
            },
            _ => timeline,
        }
    }

    fn latest_review_thread_comment(&self) -> Option<&ReviewThreadCommentNode> {
        self.review_threads
            .as_ref()?
            .iter()
            .flat_map(|thread| thread.comments.iter())
            .max_by_key(|comment| comment.updated_at)
    }

    /// Latest review of each reviewer, preferring an approval or change request
    /// over a plain comment.
    pub fn latest_reviews_by_user(&self) -> Vec<Review> {
        let Some(reviews) = self.reviews.as_ref() else {
            return Vec::new();
        };

        let mut sorted: Vec<(&UserNode, &ReviewNode)> = reviews
            .iter()
            .filter_map(|review| review.author.as_ref().map(|author| (author, review)))
            .filter(|(author, _)| !author.login.is_empty())
            .collect();
        sorted.sort_by(|(_, a), (_, b)| b.updated_at.cmp(&a.updated_at));

        let mut logins: Vec<&str> = Vec::new();
        for (author, _) in &sorted {
            if !logins.contains(&author.login.as_str()) {
                logins.push(author.login.as_str());
            }
        }

        logins
            .into_iter()
            .filter_map(|login| {
                let by_user = || sorted.iter().filter(move |(a, _)| a.login == login);
                by_user()
                    .find(|(_, r)| r.state.is_decisive())
                    .or_else(|| by_user().find(|(_, r)| r.state == ReviewState::Commented))
                    .map(|(author, review)| Review {
                        user: User::from(*author),
                        avatar_url: author.avatar_url.clone(),
                        state: review.state,
                        updated_at: review.updated_at,
                    })
            })
            .collect()
    }

    pub fn requested_reviewers(&self) -> Vec<User> {
        self.review_requests
            .as_ref()
            .map(|requests| {
                requests
                    .iter()
                    .filter_map(|r| r.requested_reviewer.as_ref())
                    .filter_map(|r| r.reviewer_login())
                    .map(User::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Users and teams mentioned in the body and in timeline comments, in first-seen order.
    pub fn mentions(&self) -> Vec<User> {
        let comment_bodies = self
            .timeline_items
            .iter()
            .flat_map(|items| items.iter())
            .filter_map(|item| item.body.as_ref());

        let mut mentions: Vec<User> = Vec::new();
        for login in self
            .body
            .iter()
            .chain(comment_bodies)
            .flat_map(|body| mentioned_logins(body))
        {
            let user = User::from(login);
            if !mentions.contains(&user) {
                mentions.push(user);
            }
        }
        mentions
    }

    /// Everyone involved: author, assignees, participants, requested reviewers and mentions.
    pub fn involves(&self) -> Vec<User> {
        let mut involves = vec![self.author_user().unwrap_or_else(User::ghost)];

        let people = [&self.assignees, &self.participants]
            .into_iter()
            .flatten()
            .flat_map(|conn| conn.iter().map(User::from))
            .chain(self.requested_reviewers())
            .chain(self.mentions());

        for user in people {
            if !involves.contains(&user) {
                involves.push(user);
            }
        }
        involves
    }
}

impl TryFrom<IssueNode> for IssueDetail {
    type Error = anyhow::Error;

    fn try_from(node: IssueNode) -> Result<Self, Self::Error> {
        let typename = node.typename.as_deref().unwrap_or_default();
        let kind = IssueKind::from_typename(typename).ok_or_else(|| {
            anyhow::anyhow!("Node {} is not an issue or pull request", node.node_id)
        })?;
        let missing = |field: &str| anyhow::anyhow!("Node {} has no {}", node.node_id, field);

        let created_at = node.created_at.ok_or_else(|| missing("createdAt"))?;
        let updated_at = node.updated_at.ok_or_else(|| missing("updatedAt"))?;
        let repository = node
            .repository
            .as_ref()
            .ok_or_else(|| missing("repository"))?;

        let (requested_reviewers, reviews) = match kind {
            IssueKind::PullRequest => {
                (node.requested_reviewers(), node.latest_reviews_by_user())
            }
            IssueKind::Issue => (Vec::new(), Vec::new()),
        };

        Ok(IssueDetail {
            kind,
            number: node.number.ok_or_else(|| missing("number"))?,
            title: node.title.clone().unwrap_or_default(),
            url: node.url.clone().ok_or_else(|| missing("url"))?,
            repository: RepositoryId::try_from(repository)?,
            is_private: repository.is_private,
            author: node.author_user(),
            created_at,
            updated_at,
            involves: node.involves(),
            mentions: node.mentions(),
            last_timeline: node.last_timeline(created_at, updated_at),
            draft: node.is_draft,
            mergeable: node.mergeable.clone(),
            merged_at: node.merged_at,
            requested_reviewers,
            reviews,
            node_id: node.node_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_request(extra: serde_json::Value) -> IssueNode {
        let mut base = serde_json::json!({
            "node_id": "PR_1",
            "__typename": "PullRequest",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-05T10:00:00Z",
            "number": 7,
            "title": "Add widgets",
            "url": "https://github.com/acme/widgets/pull/7",
            "author": {"login": "alice", "avatarUrl": "https://a/alice"},
            "repository": {"nameWithOwner": "acme/widgets", "isPrivate": false},
            "assignees": {"nodes": [{"login": "bob"}]},
            "participants": {"nodes": [{"login": "alice"}, {"login": "carol"}]},
            "isDraft": false,
            "mergeable": "MERGEABLE",
            "mergedAt": null
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_timeline_is_new_item() {
        let detail = IssueDetail::try_from(pull_request(serde_json::json!({}))).unwrap();
        assert_eq!(detail.last_timeline.event_type, "NewPullRequest");
        assert_eq!(detail.last_timeline.user, Some(User::from("alice")));
        assert_eq!(detail.last_timeline.at, at("2024-05-05T10:00:00Z"));
    }

    #[test]
    fn test_newest_timeline_item_wins() {
        let node = pull_request(serde_json::json!({
            "timelineItems": {"nodes": [
                {"__typename": "LabeledEvent", "createdAt": "2024-05-06T10:00:00Z", "actor": {"login": "dave"}},
                null,
                {"__typename": "IssueComment", "createdAt": "2024-05-02T10:00:00Z", "updatedAt": "2024-05-02T10:00:00Z", "author": {"login": "erin"}}
            ]}
        }));
        let timeline = node.last_timeline(at("2024-05-01T10:00:00Z"), at("2024-05-05T10:00:00Z"));
        assert_eq!(timeline.event_type, "LabeledEvent");
        assert_eq!(timeline.user, Some(User::from("dave")));
        assert_eq!(timeline.at, at("2024-05-06T10:00:00Z"));
    }

    #[test]
    fn test_stale_commit_reports_author_and_updated_at() {
        let node = pull_request(serde_json::json!({
            "timelineItems": {"nodes": [
                {"__typename": "PullRequestCommit", "commit": {"pushedDate": null, "authoredDate": "2024-05-01T09:00:00Z", "committedDate": "2024-05-01T09:00:00Z", "author": {"user": {"login": "bob"}}}}
            ]}
        }));
        let timeline = node.last_timeline(at("2024-05-01T10:00:00Z"), at("2024-05-05T10:00:00Z"));
        assert_eq!(timeline.event_type, "PullRequestCommit");
        assert_eq!(timeline.user, Some(User::from("alice")));
        assert_eq!(timeline.at, at("2024-05-05T10:00:00Z"));
    }

    #[test]
    fn test_newer_review_thread_comment_overrides_timeline() {
        let node = pull_request(serde_json::json!({
            "timelineItems": {"nodes": [
                {"__typename": "LabeledEvent", "createdAt": "2024-05-06T10:00:00Z", "actor": {"login": "dave"}}
            ]},
            "reviewThreads": {"nodes": [
                {"comments": {"nodes": [{"author": {"login": "frank"}, "updatedAt": "2024-05-07T10:00:00Z"}]}}
            ]}
        }));
        let timeline = node.last_timeline(at("2024-05-01T10:00:00Z"), at("2024-05-05T10:00:00Z"));
        assert_eq!(timeline.event_type, "ReviewThreadComment");
        assert_eq!(timeline.user, Some(User::from("frank")));
    }

    #[test]
    fn test_latest_reviews_prefer_decisive_state() {
        let node = pull_request(serde_json::json!({
            "reviews": {"nodes": [
                {"author": {"login": "bob"}, "state": "APPROVED", "updatedAt": "2024-05-02T10:00:00Z"},
                {"author": {"login": "bob"}, "state": "COMMENTED", "updatedAt": "2024-05-03T10:00:00Z"},
                {"author": {"login": "carol"}, "state": "COMMENTED", "updatedAt": "2024-05-04T10:00:00Z"},
                {"author": {"login": "carol"}, "state": "DISMISSED", "updatedAt": "2024-05-05T10:00:00Z"},
                {"author": null, "state": "APPROVED", "updatedAt": "2024-05-06T10:00:00Z"}
            ]}
        }));
        let reviews = node.latest_reviews_by_user();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].user, User::from("carol"));
        assert_eq!(reviews[0].state, ReviewState::Commented);
        assert_eq!(reviews[1].user, User::from("bob"));
        assert_eq!(reviews[1].state, ReviewState::Approved);
    }

    #[test]
    fn test_involves_dedupes_people() {
        let node = pull_request(serde_json::json!({
            "reviewRequests": {"nodes": [
                {"requestedReviewer": {"login": "carol"}},
                {"requestedReviewer": {"teamLogin": "acme/reviewers", "teamName": "Reviewers"}},
                {"requestedReviewer": null}
            ]}
        }));
        let involves: Vec<String> = node.involves().iter().map(|u| u.to_string()).collect();
        assert_eq!(involves, vec!["alice", "bob", "carol", "acme/reviewers"]);
        assert_eq!(
            node.requested_reviewers(),
            vec![User::from("carol"), User::from("acme/reviewers")]
        );
    }

    #[test]
    fn test_mentions_from_body_and_comments() {
        let node = pull_request(serde_json::json!({
            "body": "cc @dave and @acme/reviewers. Mail ops@example.com, not `@nobody`.\n\n```\n@also-nobody\n```",
            "timelineItems": {"nodes": [
                {"__typename": "IssueComment", "createdAt": "2024-05-02T10:00:00Z", "author": {"login": "bob"}, "body": "@erin, can you look? (@dave too)"},
                {"__typename": "LabeledEvent", "createdAt": "2024-05-03T10:00:00Z", "actor": {"login": "bob"}},
                null
            ]}
        }));
        assert_eq!(
            node.mentions(),
            vec![
                User::from("dave"),
                User::from("acme/reviewers"),
                User::from("erin")
            ]
        );

        let detail = IssueDetail::try_from(node).unwrap();
        let involves: Vec<&str> = detail.involves.iter().map(|u| u.as_str()).collect();
        assert_eq!(
            involves,
            vec!["alice", "bob", "carol", "dave", "acme/reviewers", "erin"]
        );
        assert_eq!(detail.mentions.len(), 3);
    }

    #[test]
    fn test_no_body_has_no_mentions() {
        let node = pull_request(serde_json::json!({"body": null}));
        assert!(node.mentions().is_empty());
        assert_eq!(mentioned_logins("@alice-"), vec!["alice"]);
        assert!(mentioned_logins("name@host and @-dash").is_empty());
    }

    #[test]
    fn test_non_issue_node_is_rejected() {
        let node: IssueNode = serde_json::from_str(r#"{"node_id": "R_1"}"#).unwrap();
        assert!(IssueDetail::try_from(node).is_err());
    }
}
