use crate::types::{ProjectStatusFields, ProjectUrl};

use super::MarkdownContent;

pub fn project_status_fields_markdown(
    project_url: &ProjectUrl,
    fields: &ProjectStatusFields,
) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("# PROJECT FIELDS: {}\n", project_url.0));
    match &fields.iteration_name {
        Some(name) => content.push_str(&format!("iteration field: {}\n", name)),
        None => content.push_str("iteration field: (none)\n"),
    }

    content.push_str("## status options\n");
    if fields.status_names.is_empty() {
        content.push_str("(no status field)\n");
    }
    for name in &fields.status_names {
        content.push_str(&format!("- {}\n", name));
    }

    MarkdownContent(content)
}
