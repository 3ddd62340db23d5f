use std::sync::LazyLock;

use super::compat::gate_template;
use super::graphql_types::GraphQLQuery;
use super::query::{QueryBuildError, QueryTemplate};

const CONNECTION_LIMIT: u8 = 100;
const TIMELINE_LIMIT: u8 = 100;

/// Timeline events on issues whose only interesting fields are `createdAt` and `actor`.
const ISSUE_ACTOR_EVENTS: &[&str] = &[
    "AddedToProjectEvent",
    "AssignedEvent",
    "ClosedEvent",
    "CommentDeletedEvent",
    "ConnectedEvent",
    "ConvertedNoteToIssueEvent",
    "CrossReferencedEvent",
    "DemilestonedEvent",
    "DisconnectedEvent",
    "LabeledEvent",
    "LockedEvent",
    "MarkedAsDuplicateEvent",
    "MentionedEvent",
    "MilestonedEvent",
    "MovedColumnsInProjectEvent",
    "PinnedEvent",
    "ReferencedEvent",
    "RemovedFromProjectEvent",
    "RenamedTitleEvent",
    "ReopenedEvent",
    "SubscribedEvent",
    "TransferredEvent",
    "UnassignedEvent",
    "UnlabeledEvent",
    "UnlockedEvent",
    "UnmarkedAsDuplicateEvent",
    "UnpinnedEvent",
    "UnsubscribedEvent",
    "UserBlockedEvent",
];

const PULL_REQUEST_ACTOR_EVENTS: &[&str] = &[
    "AddedToProjectEvent",
    "AssignedEvent",
    "AutomaticBaseChangeFailedEvent",
    "AutomaticBaseChangeSucceededEvent",
    "BaseRefChangedEvent",
    "BaseRefForcePushedEvent",
    "ClosedEvent",
    "CommentDeletedEvent",
    "ConnectedEvent",
    "ConvertToDraftEvent",
    "ConvertedNoteToIssueEvent",
    "CrossReferencedEvent",
    "DemilestonedEvent",
    "DeployedEvent",
    "DeploymentEnvironmentChangedEvent",
    "DisconnectedEvent",
    "HeadRefDeletedEvent",
    "HeadRefForcePushedEvent",
    "HeadRefRestoredEvent",
    "LabeledEvent",
    "LockedEvent",
    "MarkedAsDuplicateEvent",
    "MentionedEvent",
    "MergedEvent",
    "MilestonedEvent",
    "MovedColumnsInProjectEvent",
    "PinnedEvent",
    "ReadyForReviewEvent",
    "ReferencedEvent",
    "RemovedFromProjectEvent",
    "RenamedTitleEvent",
    "ReopenedEvent",
    "ReviewDismissedEvent",
    "ReviewRequestRemovedEvent",
    "ReviewRequestedEvent",
    "SubscribedEvent",
    "TransferredEvent",
    "UnassignedEvent",
    "UnlabeledEvent",
    "UnlockedEvent",
    "UnmarkedAsDuplicateEvent",
    "UnpinnedEvent",
    "UnsubscribedEvent",
    "UserBlockedEvent",
];

const ISSUE_COMMENT_ITEM: &str =
    "... on IssueComment {__typename createdAt updatedAt author {login} editor {login} body}";

const PULL_REQUEST_ACTIVITY_ITEMS: &str = r#"... on PullRequestCommit {__typename commit {pushedDate committedDate authoredDate author {user {login}}}}
            ... on PullRequestCommitCommentThread {__typename comments(last: 1) {nodes {createdAt updatedAt author {login} editor {login}}}}
            ... on PullRequestReview {__typename createdAt updatedAt author {login} editor {login} body}
            ... on PullRequestReviewThread {__typename comments(last: 1) {nodes {createdAt updatedAt author {login} editor {login}}}}
            ... on PullRequestRevisionMarker {__typename lastSeenCommit {pushedDate committedDate authoredDate author {user {login}}}}"#;

static ISSUE_EVENT_ITEMS: LazyLock<String> =
    LazyLock::new(|| actor_event_fragments(ISSUE_ACTOR_EVENTS));

static PULL_REQUEST_EVENT_ITEMS: LazyLock<String> =
    LazyLock::new(|| actor_event_fragments(PULL_REQUEST_ACTOR_EVENTS));

/// One inline fragment per line so version gating can drop a single event type.
fn actor_event_fragments(events: &[&str]) -> String {
    events
        .iter()
        .map(|event| format!("... on {} {{__typename createdAt actor {{login}}}}", event))
        .collect::<Vec<_>>()
        .join("\n            ")
}

fn common_issue_fields() -> String {
    format!(
        r#"__typename
      createdAt
      updatedAt
      number
      title
      url
      body
      author {{
        login
        avatarUrl
      }}
      repository {{
        nameWithOwner
        isPrivate
      }}
      assignees(first: {limit}) {{
        nodes {{
          login
          avatarUrl
          name
        }}
      }}
      participants(first: {limit}) {{
        nodes {{
          login
          avatarUrl
          name
        }}
      }}"#,
        limit = CONNECTION_LIMIT
    )
}

static ISSUE_NODES_TEMPLATE: LazyLock<String> = LazyLock::new(|| {
    let common = common_issue_fields();
    format!(
        r#"nodes(ids: [__NODE_IDS__]) {{
    node_id: id
    ... on Issue {{
      {common}
      timelineItems(last: {timeline_limit}) {{
        nodes {{
          __typename
            {issue_comment}
            __ISSUE_EVENTS__
        }}
      }}
    }}
    ... on PullRequest {{
      {common}
      isDraft
      mergeable
      mergedAt
      reviewRequests(first: {limit}) {{
        nodes {{
          requestedReviewer {{
            ... on User {{
              login
              avatarUrl
              name
            }}
            ... on Team {{
              teamLogin: combinedSlug
              teamName: name
              teamAvatarUrl: avatarUrl
            }}
          }}
        }}
      }}
      reviews(first: {limit}) {{
        nodes {{
          author {{
            login
            avatarUrl
          }}
          state
          updatedAt
        }}
      }}
      reviewThreads(last: {limit}) {{
        nodes {{
          comments(last: {limit}) {{
            nodes {{
              author {{
                login
                avatarUrl
              }}
              updatedAt
            }}
          }}
        }}
      }}
      timelineItems(last: {timeline_limit}) {{
        nodes {{
          __typename
            {issue_comment}
            {pull_request_activity}
            __PULL_REQUEST_EVENTS__
        }}
      }}
    }}
  }}"#,
        common = common,
        limit = CONNECTION_LIMIT,
        timeline_limit = TIMELINE_LIMIT,
        issue_comment = ISSUE_COMMENT_ITEM,
        pull_request_activity = PULL_REQUEST_ACTIVITY_ITEMS,
    )
});

/// Builds the `nodes(ids: ...)` selection set for one batch of node ids.
///
/// Duplicate ids are sent once.
pub fn issue_nodes_query(
    node_ids: &[&str],
    ghe_version_context: &str,
) -> Result<GraphQLQuery, QueryBuildError> {
    let mut unique_ids: Vec<String> = Vec::with_capacity(node_ids.len());
    for id in node_ids {
        if !unique_ids.iter().any(|seen| seen == id) {
            unique_ids.push(id.to_string());
        }
    }

    let source = gate_template(&ISSUE_NODES_TEMPLATE, ghe_version_context).into_owned();
    QueryTemplate::from_string("issue_nodes", source)
        .bind()
        .string_list("NODE_IDS", unique_ids)
        .fragment(
            "ISSUE_EVENTS",
            gate_template(&ISSUE_EVENT_ITEMS, ghe_version_context),
        )
        .fragment(
            "PULL_REQUEST_EVENTS",
            gate_template(&PULL_REQUEST_EVENT_ITEMS, ghe_version_context),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_nodes_query_dedupes_ids() {
        let query = issue_nodes_query(&["I_1", "PR_2", "I_1"], "").unwrap();
        assert!(
            query
                .as_str()
                .starts_with(r#"nodes(ids: ["I_1","PR_2"]) {"#)
        );
    }

    #[test]
    fn test_issue_nodes_query_full_template_on_github_com() {
        let query = issue_nodes_query(&["I_1"], "").unwrap();
        let text = query.as_str();
        assert!(text.contains("node_id: id"));
        assert!(text.contains("... on ConnectedEvent {__typename createdAt actor {login}}"));
        assert!(text.contains("... on AutomaticBaseChangeFailedEvent"));
        assert!(text.contains("isDraft"));
        assert!(text.contains("reviewThreads(last: 100)"));
        assert!(text.contains("... on PullRequestCommit {__typename commit"));
        assert!(text.contains("... on IssueComment {__typename createdAt updatedAt author {login} editor {login} body}"));
        assert_eq!(text.matches("\n      body\n").count(), 2);
        assert!(!text.contains("__ISSUE_EVENTS__"));
        assert!(!text.contains("__PULL_REQUEST_EVENTS__"));
    }

    #[test]
    fn test_issue_nodes_query_gated_for_old_ghe() {
        let query = issue_nodes_query(&["I_1"], "2.20.1").unwrap();
        let text = query.as_str();
        assert!(!text.contains("ConnectedEvent"));
        assert!(!text.contains("ConvertToDraftEvent"));
        assert!(!text.contains("AutomaticBaseChangeSucceededEvent"));
        assert!(!text.contains("isDraft"));
        assert!(text.contains("... on ClosedEvent"));
        assert!(text.contains("... on ReviewRequestedEvent"));
        assert!(text.contains("mergedAt"));
    }
}
