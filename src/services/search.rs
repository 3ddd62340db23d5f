use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::github::Requester;
use crate::github::graphql::graphql_types::SearchData;
use crate::github::graphql::search::search_query;
use crate::types::{IssueSummary, SearchQuery, SearchResult};

/// Full-text search over issues and pull requests.
///
/// Returns a single page: the last 100 matches GitHub reports for the query.
pub struct SearchClient<R> {
    requester: R,
}

impl<R: Requester> SearchClient<R> {
    pub fn new(requester: R) -> Self {
        Self { requester }
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult> {
        let graphql_query = search_query(&query, self.requester.ghe_version_context())
            .context("Failed to build search query")?;

        let data = self
            .requester
            .execute::<SearchData>("search", &graphql_query)
            .await
            .into_result()
            .inspect_err(|e| error!("Search for '{}' failed: {}", query, e))?;

        let mut items = Vec::new();
        for node in data.search.into_nodes() {
            match IssueSummary::try_from(node) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping search result: {}", e),
            }
        }

        info!("Search for '{}' returned {} items", query, items.len());
        Ok(SearchResult { query, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::FakeRequester;
    use crate::types::IssueKind;
    use serde_json::json;

    fn issue_node(typename: &str, number: u64, state_key: &str, state: &str) -> serde_json::Value {
        let mut node = json!({
            "__typename": typename,
            "number": number,
            "title": format!("item {}", number),
            "url": format!("https://github.com/acme/widgets/issues/{}", number),
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T10:00:00Z",
            "repository": {"owner": {"login": "acme"}, "name": "widgets", "isPrivate": false},
            "comments": {"totalCount": 1}
        });
        node[state_key] = json!(state);
        node
    }

    #[tokio::test]
    async fn test_search_returns_issues_and_pull_requests() {
        let requester = FakeRequester::with_data(json!({
            "search": {"edges": [
                {"node": issue_node("Issue", 1, "issueState", "OPEN")},
                {"node": issue_node("PullRequest", 2, "prState", "CLOSED")},
                {"node": {}},
                {"node": null}
            ]}
        }));
        let client = SearchClient::new(&requester);

        let result = client
            .search(SearchQuery::new("repo:acme/widgets is:open"))
            .await
            .unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.issues().count(), 1);
        assert_eq!(result.pull_requests().count(), 1);
        assert_eq!(result.items[1].kind, IssueKind::PullRequest);

        let queries = requester.queries();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains(r#"search(query: "repo:acme/widgets is:open", type: ISSUE"#));
    }

    #[tokio::test]
    async fn test_search_propagates_request_error() {
        let requester = FakeRequester::failing("Bad credentials");
        let client = SearchClient::new(requester);

        let err = client
            .search(SearchQuery::new("is:open"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad credentials");
    }
}
