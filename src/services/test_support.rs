use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::github::graphql::graphql_types::{GraphQLError, GraphQLQuery};
use crate::github::{ClientError, Requester, ResponseEnvelope};

type Responder =
    Box<dyn Fn(&str) -> Result<(serde_json::Value, Vec<GraphQLError>), ClientError> + Send + Sync>;

/// In-memory requester that answers every query through a closure and records
/// the selection sets it was given.
pub(crate) struct FakeRequester {
    responder: Responder,
    queries: Mutex<Vec<String>>,
    ghe_version: String,
}

impl FakeRequester {
    pub(crate) fn new(
        responder: impl Fn(&str) -> Result<(serde_json::Value, Vec<GraphQLError>), ClientError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            queries: Mutex::new(Vec::new()),
            ghe_version: String::new(),
        }
    }

    pub(crate) fn with_data(data: serde_json::Value) -> Self {
        Self::new(move |_| Ok((data.clone(), Vec::new())))
    }

    pub(crate) fn failing(message: &'static str) -> Self {
        Self::new(move |_| {
            Err(ClientError::HttpStatus {
                status: 502,
                body: message.to_string(),
            })
        })
    }

    pub(crate) fn on_ghe(mut self, version: &str) -> Self {
        self.ghe_version = version.to_string();
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Requester for FakeRequester {
    async fn execute<R: DeserializeOwned>(
        &self,
        _query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R> {
        self.queries.lock().unwrap().push(query.as_str().to_string());

        match (self.responder)(query.as_str()) {
            Ok((data, partial_errors)) => match serde_json::from_value(data) {
                Ok(data) => ResponseEnvelope {
                    partial_errors,
                    ..ResponseEnvelope::from_data(data)
                },
                Err(e) => ResponseEnvelope::from_error(ClientError::Decode(e), Some(200)),
            },
            Err(ClientError::HttpStatus { status, body }) => {
                ResponseEnvelope::from_error(ClientError::HttpStatus { status, body }, Some(status))
            }
            Err(e) => ResponseEnvelope::from_error(e, None),
        }
    }

    fn is_github_com(&self) -> bool {
        self.ghe_version.is_empty()
    }

    fn ghe_version_context(&self) -> &str {
        &self.ghe_version
    }
}
