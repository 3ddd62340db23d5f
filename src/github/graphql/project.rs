use crate::types::{ProjectId, ProjectType};

use super::graphql_types::GraphQLQuery;
use super::query::{QueryBuildError, QueryTemplate};

const FIELD_LIMIT: u8 = 100;

/// Root field under which a project of the given type lives.
pub fn project_root_field(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Organization => "organization",
        ProjectType::User => "user",
    }
}

fn project_fields_template() -> QueryTemplate {
    QueryTemplate::from_string(
        "project_fields",
        format!(
            r#"__ROOT__(login: __LOGIN__) {{
      projectV2(number: __NUMBER__) {{
        fields(first: {}) {{
          nodes {{
            ... on ProjectV2SingleSelectField {{
              name
              dataType
              options {{
                name
              }}
            }}
            ... on ProjectV2IterationField {{
              name
              dataType
            }}
          }}
        }}
      }}
    }}"#,
            FIELD_LIMIT
        ),
    )
}

/// Builds the selection set listing the single-select and iteration fields of a project.
pub fn project_fields_query(project_id: &ProjectId) -> Result<GraphQLQuery, QueryBuildError> {
    project_fields_template()
        .bind()
        .identifier("ROOT", project_root_field(project_id.project_type()))
        .string("LOGIN", project_id.owner().as_str())
        .int("NUMBER", project_id.project_number().value())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectUrl;

    #[test]
    fn test_org_project_fields_query() {
        let project_id =
            ProjectId::parse(&ProjectUrl("https://github.com/orgs/acme/projects/3".to_string()))
                .unwrap();
        let query = project_fields_query(&project_id).unwrap();
        let text = query.as_str();
        assert!(text.starts_with(r#"organization(login: "acme") {"#));
        assert!(text.contains("projectV2(number: 3)"));
        assert!(text.contains("fields(first: 100)"));
        assert!(text.contains("... on ProjectV2SingleSelectField"));
        assert!(text.contains("... on ProjectV2IterationField"));
    }

    #[test]
    fn test_user_project_fields_query() {
        let project_id = ProjectId::parse(&ProjectUrl(
            "https://ghe.example.com/users/octocat/projects/12/views/1".to_string(),
        ))
        .unwrap();
        let query = project_fields_query(&project_id).unwrap();
        assert!(query.as_str().starts_with(r#"user(login: "octocat") {"#));
        assert!(query.as_str().contains("projectV2(number: 12)"));
    }
}
