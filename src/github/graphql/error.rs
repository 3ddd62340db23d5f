use tracing::{error, warn};

use crate::github::graphql::graphql_types::GraphQLError;

/// Outcome of inspecting the `errors` array of a 200 response.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphQLErrorClass {
    /// No errors at all.
    Clean,
    /// Every error is a per-node `NOT_FOUND` / `FORBIDDEN`; `data` is still usable.
    Partial(Vec<GraphQLError>),
    /// At least one error is of another kind, or untyped; `data` must be discarded.
    Hard { message: String, error_type: Option<String> },
}

/// Classifies GraphQL errors into clean, partial-success, or hard failure.
///
/// # Arguments
///
/// * `query_name` - Name of the query, used for logging only
/// * `errors` - The `errors` array of the response, if present
///
/// # Returns
///
/// A hard failure carries the first error's message.
pub fn classify_graphql_errors(
    query_name: &str,
    errors: Option<Vec<GraphQLError>>,
) -> GraphQLErrorClass {
    let errors = match errors {
        Some(errors) if !errors.is_empty() => errors,
        _ => return GraphQLErrorClass::Clean,
    };

    if errors.iter().all(GraphQLError::is_visibility_error) {
        for e in &errors {
            warn!(
                query = query_name,
                error_type = e.error_type.as_deref().unwrap_or_default(),
                path = ?e.path,
                "Ignoring partial GraphQL error: {}",
                e.message
            );
        }
        return GraphQLErrorClass::Partial(errors);
    }

    let first = &errors[0];
    error!(
        query = query_name,
        error_count = errors.len(),
        error_type = first.error_type.as_deref().unwrap_or("<none>"),
        "GraphQL request failed: {}",
        first.message
    );
    GraphQLErrorClass::Hard {
        message: first.message.clone(),
        error_type: first.error_type.clone(),
    }
}
