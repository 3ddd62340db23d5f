use crate::types::{IssueKind, IssueSummary, SearchResult};

use super::{MarkdownContent, TimezoneOffset, format_datetime};

/// Maximum number of characters of an item body shown in search listings
const MAX_BODY_LENGTH: usize = 100;

pub fn search_result_markdown(
    result: &SearchResult,
    timezone: Option<&TimezoneOffset>,
) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("# SEARCH: {}\n", result.query));
    content.push_str(&format!(
        "{} issues, {} pull requests\n\n",
        result.issues().count(),
        result.pull_requests().count()
    ));

    if result.is_empty() {
        content.push_str("No matches.\n");
        return MarkdownContent(content);
    }

    for item in &result.items {
        content.push_str(&issue_summary_markdown(item, timezone).0);
        content.push('\n');
    }

    MarkdownContent(content)
}

pub fn issue_summary_markdown(
    item: &IssueSummary,
    timezone: Option<&TimezoneOffset>,
) -> MarkdownContent {
    let mut content = String::new();

    let kind = match item.kind {
        IssueKind::Issue => "ISSUE",
        IssueKind::PullRequest => "PR",
    };
    content.push_str(&format!(
        "## {} {}#{}: {}\n",
        kind, item.repository, item.number, item.title
    ));
    content.push_str(&format!("url: {}\n", item.url));

    let mut state = item.state.to_string();
    if item.draft == Some(true) {
        state.push_str(" (draft)");
    }
    content.push_str(&format!("state: {}\n", state));

    if let Some(author) = &item.author {
        content.push_str(&format!("author: {}\n", author));
    }
    if !item.assignees.is_empty() {
        let assignees: Vec<String> = item.assignees.iter().map(|a| format!("`{}`", a)).collect();
        content.push_str(&format!("assignees: {}\n", assignees.join(" ")));
    }
    if !item.labels.is_empty() {
        let labels: Vec<String> = item.labels.iter().map(|l| format!("`{}`", l)).collect();
        content.push_str(&format!("labels: {}\n", labels.join(" ")));
    }
    if let Some(milestone) = &item.milestone {
        content.push_str(&format!("milestone: {}\n", milestone.title));
    }

    content.push_str(&format!(
        "created: {}\n",
        format_datetime(item.created_at, timezone)
    ));
    content.push_str(&format!(
        "updated: {}\n",
        format_datetime(item.updated_at, timezone)
    ));
    if let Some(merged_at) = item.merged_at {
        content.push_str(&format!("merged: {}\n", format_datetime(merged_at, timezone)));
    } else if let Some(closed_at) = item.closed_at {
        content.push_str(&format!("closed: {}\n", format_datetime(closed_at, timezone)));
    }
    content.push_str(&format!("comments: {}\n", item.comments_count));

    if let Some(body) = item.body.as_deref().filter(|b| !b.trim().is_empty()) {
        content.push('\n');
        if body.chars().count() > MAX_BODY_LENGTH {
            let truncated: String = body.chars().take(MAX_BODY_LENGTH).collect();
            content.push_str(&truncated);
            content.push_str("...\n");
        } else {
            content.push_str(body);
            content.push('\n');
        }
    }

    MarkdownContent(content)
}
