use crate::types::{IssueDetail, IssueKind, IssueNodesResult};

use super::{MarkdownContent, TimezoneOffset, format_datetime};

pub fn issue_nodes_result_markdown(
    result: &IssueNodesResult,
    timezone: Option<&TimezoneOffset>,
) -> MarkdownContent {
    let mut content = String::new();

    for issue in &result.issues {
        content.push_str(&issue_detail_markdown(issue, timezone).0);
        content.push('\n');
    }

    if !result.not_found.is_empty() {
        content.push_str("# NOT FOUND\n");
        for missing in &result.not_found {
            if missing.html_url.is_empty() {
                content.push_str(&format!("- {}\n", missing.node_id));
            } else {
                content.push_str(&format!("- {} ({})\n", missing.node_id, missing.html_url));
            }
        }
        content.push('\n');
    }

    if !result.partial_errors.is_empty() {
        content.push_str("# PARTIAL ERRORS\n");
        for error in &result.partial_errors {
            match &error.error_type {
                Some(error_type) => {
                    content.push_str(&format!("- {}: {}\n", error_type, error.message))
                }
                None => content.push_str(&format!("- {}\n", error.message)),
            }
        }
    }

    MarkdownContent(content)
}

/// Format a refreshed issue or pull request into markdown
pub fn issue_detail_markdown(
    issue: &IssueDetail,
    timezone: Option<&TimezoneOffset>,
) -> MarkdownContent {
    let mut content = String::new();

    // Header
    let kind = match issue.kind {
        IssueKind::Issue => "ISSUE",
        IssueKind::PullRequest => "PR",
    };
    content.push_str(&format!(
        "# {} {}#{}: {}\n",
        kind, issue.repository, issue.number, issue.title
    ));
    content.push_str(&format!("url: {}\n", issue.url));
    content.push_str(&format!("node id: {}\n", issue.node_id));
    if issue.is_private {
        content.push_str("private: true\n");
    }
    match &issue.author {
        Some(author) => content.push_str(&format!("author: {}\n", author)),
        None => content.push_str("author: (deleted)\n"),
    }
    content.push_str(&format!(
        "created: {}\n",
        format_datetime(issue.created_at, timezone)
    ));
    content.push_str(&format!(
        "updated: {}\n",
        format_datetime(issue.updated_at, timezone)
    ));

    // Pull request state
    if issue.kind == IssueKind::PullRequest {
        if let Some(draft) = issue.draft {
            content.push_str(&format!("draft: {}\n", draft));
        }
        if let Some(mergeable) = &issue.mergeable {
            content.push_str(&format!("mergeable: {}\n", mergeable.to_lowercase()));
        }
        if let Some(merged_at) = issue.merged_at {
            content.push_str(&format!("merged: {}\n", format_datetime(merged_at, timezone)));
        }
    }
    content.push('\n');

    // Last activity
    let timeline = &issue.last_timeline;
    content.push_str("## last activity\n");
    content.push_str(&format!(
        "{} by {} at {}\n\n",
        timeline.event_type,
        timeline
            .user
            .as_ref()
            .map(|u| u.as_str())
            .unwrap_or("(unknown)"),
        format_datetime(timeline.at, timezone)
    ));

    if !issue.involves.is_empty() {
        content.push_str("## involves\n");
        let people: Vec<String> = issue.involves.iter().map(|u| format!("`{}`", u)).collect();
        content.push_str(&people.join(" "));
        content.push_str("\n\n");
    }

    if !issue.mentions.is_empty() {
        content.push_str("## mentions\n");
        let people: Vec<String> = issue.mentions.iter().map(|u| format!("`@{}`", u)).collect();
        content.push_str(&people.join(" "));
        content.push_str("\n\n");
    }

    if !issue.requested_reviewers.is_empty() {
        content.push_str("## requested reviewers\n");
        for reviewer in &issue.requested_reviewers {
            content.push_str(&format!("- {}\n", reviewer));
        }
        content.push('\n');
    }

    if !issue.reviews.is_empty() {
        content.push_str("## reviews\n");
        for review in &issue.reviews {
            content.push_str(&format!(
                "- {}: {:?} ({})\n",
                review.user,
                review.state,
                format_datetime(review.updated_at, timezone)
            ));
        }
        content.push('\n');
    }

    MarkdownContent(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::graphql::graphql_types::GraphQLError;
    use crate::types::{LastTimeline, PartialIssue, RepositoryId, Review, ReviewState, User};

    fn detail() -> IssueDetail {
        IssueDetail {
            node_id: "PR_1".to_string(),
            kind: IssueKind::PullRequest,
            number: 7,
            title: "Add widgets".to_string(),
            url: "https://github.com/acme/widgets/pull/7".to_string(),
            repository: RepositoryId::new("acme", "widgets"),
            is_private: false,
            author: Some(User::from("alice")),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            updated_at: "2024-05-05T10:00:00Z".parse().unwrap(),
            involves: vec![User::from("alice"), User::from("bob"), User::from("dave")],
            mentions: vec![User::from("dave")],
            last_timeline: LastTimeline {
                user: Some(User::from("bob")),
                at: "2024-05-05T10:00:00Z".parse().unwrap(),
                event_type: "IssueComment".to_string(),
            },
            draft: Some(false),
            mergeable: Some("MERGEABLE".to_string()),
            merged_at: None,
            requested_reviewers: vec![User::from("carol")],
            reviews: vec![Review {
                user: User::from("bob"),
                avatar_url: None,
                state: ReviewState::Approved,
                updated_at: "2024-05-04T10:00:00Z".parse().unwrap(),
            }],
        }
    }

    #[test]
    fn test_issue_detail_markdown() {
        let content = issue_detail_markdown(&detail(), None).0;
        assert!(content.starts_with("# PR acme/widgets#7: Add widgets\n"));
        assert!(content.contains("mergeable: mergeable\n"));
        assert!(content.contains("IssueComment by bob at 2024-05-05 10:00:00 UTC\n"));
        assert!(content.contains("## involves\n`alice` `bob` `dave`\n"));
        assert!(content.contains("## mentions\n`@dave`\n"));
        assert!(content.contains("- carol\n"));
        assert!(content.contains("- bob: Approved (2024-05-04 10:00:00 UTC)\n"));
    }

    #[test]
    fn test_nodes_result_lists_missing_and_errors() {
        let result = IssueNodesResult {
            issues: vec![detail()],
            not_found: vec![PartialIssue::new(
                "I_9",
                "https://github.com/acme/widgets/issues/9",
            )],
            partial_errors: vec![GraphQLError {
                message: "Resource not accessible".to_string(),
                error_type: Some("FORBIDDEN".to_string()),
                path: Vec::new(),
            }],
        };
        let content = issue_nodes_result_markdown(&result, None).0;
        assert!(content.contains("# NOT FOUND\n- I_9 (https://github.com/acme/widgets/issues/9)\n"));
        assert!(content.contains("# PARTIAL ERRORS\n- FORBIDDEN: Resource not accessible\n"));
    }
}
