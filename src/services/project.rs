use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::github::Requester;
use crate::github::graphql::graphql_types::ProjectFieldsData;
use crate::github::graphql::project::project_fields_query;
use crate::types::{ProjectId, ProjectStatusFields, ProjectUrl};

/// Discovers which Project V2 fields carry iteration and status information.
pub struct ProjectFieldDiscoveryClient<R> {
    requester: R,
}

impl<R: Requester> ProjectFieldDiscoveryClient<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    /// Finds the project's iteration field name and the options of its "status" field.
    ///
    /// A project without an iteration field, or without a single-select field
    /// named "status", is not an error: the missing part is simply empty.
    pub async fn get_project_status_field_names(
        &self,
        project_url: &ProjectUrl,
    ) -> Result<ProjectStatusFields> {
        let project_id = ProjectId::parse(project_url)?;
        let query = project_fields_query(&project_id)
            .with_context(|| format!("Failed to build fields query for {}", project_id))?;

        let data = self
            .requester
            .execute::<ProjectFieldsData>("project_fields", &query)
            .await
            .into_result()
            .inspect_err(|e| error!("Failed to fetch fields of {}: {}", project_id, e))?;

        if data.project().is_none() {
            debug!("No projectV2 returned for {}", project_id);
        }

        Ok(data.status_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::FakeRequester;
    use serde_json::json;

    fn url(s: &str) -> ProjectUrl {
        ProjectUrl(s.to_string())
    }

    #[tokio::test]
    async fn test_discovers_status_and_iteration_fields() {
        let requester = FakeRequester::with_data(json!({
            "organization": {"projectV2": {"fields": {"nodes": [
                {"name": "Status", "dataType": "SINGLE_SELECT", "options": [{"name": "Todo"}, {"name": "Done"}]},
                {"name": "Sprint", "dataType": "ITERATION"}
            ]}}}
        }));
        let client = ProjectFieldDiscoveryClient::new(&requester);

        let fields = client
            .get_project_status_field_names(&url("https://github.com/orgs/acme/projects/3"))
            .await
            .unwrap();

        assert_eq!(fields.iteration_name.as_deref(), Some("Sprint"));
        assert_eq!(fields.status_names, vec!["Todo", "Done"]);

        let queries = requester.queries();
        assert!(queries[0].starts_with(r#"organization(login: "acme")"#));
        assert!(queries[0].contains("projectV2(number: 3)"));
    }

    #[tokio::test]
    async fn test_user_project_without_single_select() {
        let requester = FakeRequester::with_data(json!({
            "user": {"projectV2": {"fields": {"nodes": [
                {"name": "Iteration", "dataType": "ITERATION"},
                {}
            ]}}}
        }));
        let client = ProjectFieldDiscoveryClient::new(&requester);

        let fields = client
            .get_project_status_field_names(&url("https://github.com/users/octocat/projects/1"))
            .await
            .unwrap();

        assert_eq!(fields.iteration_name.as_deref(), Some("Iteration"));
        assert!(fields.status_names.is_empty());
        assert!(requester.queries()[0].starts_with(r#"user(login: "octocat")"#));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_request() {
        let requester = FakeRequester::with_data(json!({}));
        let client = ProjectFieldDiscoveryClient::new(&requester);

        let result = client
            .get_project_status_field_names(&url("https://github.com/acme/widgets"))
            .await;

        assert!(result.is_err());
        assert!(requester.queries().is_empty());
    }

    #[tokio::test]
    async fn test_request_error_fails_fast() {
        let client = ProjectFieldDiscoveryClient::new(FakeRequester::failing("Server Error"));
        let err = client
            .get_project_status_field_names(&url("https://github.com/orgs/acme/projects/3"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Server Error");
    }
}
