pub mod issue;
pub mod project;
pub mod repository;
mod search;
mod timeline;
mod user;

use serde::{Deserialize, Deserializer, Serialize};

pub use issue::*;
pub use project::*;
pub use repository::*;
pub use search::*;
pub use timeline::*;
pub use user::*;

/// Error types GitHub emits per node when the token cannot see a referenced entity.
pub const ERROR_TYPE_NOT_FOUND: &str = "NOT_FOUND";
pub const ERROR_TYPE_FORBIDDEN: &str = "FORBIDDEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphQLQuery(pub String);

impl GraphQLQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GraphQLQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request body: `{"query": "<document>"}`
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload {
    pub query: GraphQLQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Empty when the error is not tied to a field. GitHub sends `null` or omits it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: Vec<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphQLError {
    /// Whether this is a per-node visibility error that should not fail the whole query.
    pub fn is_visibility_error(&self) -> bool {
        matches!(
            self.error_type.as_deref(),
            Some(ERROR_TYPE_NOT_FOUND) | Some(ERROR_TYPE_FORBIDDEN)
        )
    }
}

/// `edges { node { ... } }` connection shape used by the search selection set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgesConnection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> EdgesConnection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().filter_map(|edge| edge.node)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

/// `nodes { ... }` connection shape; null entries are kept as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodesConnection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<Option<T>>,
}

impl<T> NodesConnection<T> {
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.nodes.iter().flatten()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelNode {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneNode {
    pub id: Option<String>,
    pub title: String,
    pub due_on: Option<chrono::DateTime<chrono::Utc>>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}
