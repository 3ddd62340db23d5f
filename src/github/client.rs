use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use secrecy::ExposeSecret;
use tracing::{debug, error, info, warn};
use url::Url;

use super::config::ClientConfig;
use super::error::{ClientError, Result};
use super::graphql::error::{GraphQLErrorClass, classify_graphql_errors};
use super::graphql::graphql_types::{GraphQLError, GraphQLPayload, GraphQLQuery, GraphQLResponse};
use super::graphql::query::with_rate_limit_probe;
use super::rate_limit::{RATE_LIMIT_FIELD, RateLimit, RateLimitGovernor};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Result of a single GraphQL request.
///
/// `result` holds either the decoded `data` or the error that ended the
/// request. `status_code` is set whenever an HTTP response was received.
#[derive(Debug)]
pub struct ResponseEnvelope<T> {
    pub result: std::result::Result<T, ClientError>,
    pub status_code: Option<u16>,
    pub headers: HeaderMap,
    /// Node-level NOT_FOUND / FORBIDDEN errors that were swallowed.
    pub partial_errors: Vec<GraphQLError>,
    pub rate_limit: Option<RateLimit>,
}

impl<T> ResponseEnvelope<T> {
    pub fn from_data(data: T) -> Self {
        Self {
            result: Ok(data),
            status_code: Some(StatusCode::OK.as_u16()),
            headers: HeaderMap::new(),
            partial_errors: Vec::new(),
            rate_limit: None,
        }
    }

    pub fn from_error(error: ClientError, status_code: Option<u16>) -> Self {
        Self {
            result: Err(error),
            status_code,
            headers: HeaderMap::new(),
            partial_errors: Vec::new(),
            rate_limit: None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.result.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T> {
        self.result
    }
}

/// The capability every specialized client is built on: execute a selection
/// set and get back a typed envelope.
pub trait Requester {
    /// Executes `query` (a selection set, without the outer `query { }`).
    #[allow(async_fn_in_trait)]
    async fn execute<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R>;

    fn is_github_com(&self) -> bool;

    /// Empty for github.com, the GHE version otherwise.
    fn ghe_version_context(&self) -> &str;
}

impl<T: Requester + ?Sized> Requester for &T {
    async fn execute<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R> {
        (**self).execute(query_name, query).await
    }

    fn is_github_com(&self) -> bool {
        (**self).is_github_com()
    }

    fn ghe_version_context(&self) -> &str {
        (**self).ghe_version_context()
    }
}

impl<T: Requester + ?Sized> Requester for Arc<T> {
    async fn execute<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R> {
        (**self).execute(query_name, query).await
    }

    fn is_github_com(&self) -> bool {
        (**self).is_github_com()
    }

    fn ghe_version_context(&self) -> &str {
        (**self).ghe_version_context()
    }
}

/// GitHub GraphQL client for github.com or a GitHub Enterprise installation.
///
/// Every request is wrapped with a `rateLimit` probe. When the probe reports an
/// exhausted quota the call does not return until the quota resets. No request
/// is ever retried.
///
/// # Examples
///
/// ```no_run
/// use github_pulse::github::{ClientConfig, GitHubClient, Requester};
/// use github_pulse::github::graphql::graphql_types::GraphQLQuery;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = GitHubClient::new(ClientConfig::github_com("ghp_xxx"))?;
/// let query = GraphQLQuery("viewer { login }".to_string());
/// let envelope = client.execute::<serde_json::Value>("viewer", &query).await;
/// println!("{:?}", envelope.into_result()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
    is_github_com: bool,
    ghe_version: String,
    governor: RateLimitGovernor,
}

impl GitHubClient {
    /// Builds a client, failing immediately if the configuration is unusable.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate().inspect_err(|e| {
            error!("Failed to create GitHub client: {}", e);
        })?;

        let endpoint = config.endpoint()?;

        let mut authorization =
            HeaderValue::from_str(&format!("bearer {}", config.access_token.expose_secret()))
                .map_err(|_| {
                    ClientError::InvalidConfig(
                        "access token contains characters not allowed in a header".to_string(),
                    )
                })?;
        authorization.set_sensitive(true);

        let timeout = config.request_timeout();
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(std::cmp::min(timeout, std::time::Duration::from_secs(10)))
            // each call owns its connection
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        info!(
            endpoint = %endpoint,
            ghe_version = config.ghe_version_context(),
            "Created GitHub GraphQL client"
        );

        Ok(Self {
            http,
            endpoint,
            authorization,
            is_github_com: config.is_github_com(),
            ghe_version: config.ghe_version_context().to_string(),
            governor: RateLimitGovernor::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `query` with the rate-limit probe and classifies the response.
    pub async fn request<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R> {
        let payload = GraphQLPayload {
            query: with_rate_limit_probe(query),
        };
        debug!(query = query_name, "Sending GraphQL document: {}", payload.query);

        let start_time = std::time::Instant::now();
        let response = match self
            .http
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(
                    query = query_name,
                    "GraphQL transport failure after {:?}: {}",
                    start_time.elapsed(),
                    e
                );
                return ResponseEnvelope::from_error(ClientError::Transport(e), None);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        info!(
            query = query_name,
            status = status.as_u16(),
            "GraphQL request completed in {:?}",
            start_time.elapsed()
        );

        let failure = |error: ClientError, headers: HeaderMap| ResponseEnvelope {
            result: Err(error),
            status_code: Some(status.as_u16()),
            headers,
            partial_errors: Vec::new(),
            rate_limit: None,
        };

        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => return failure(ClientError::Transport(e), headers),
            };
            error!(
                query = query_name,
                status = status.as_u16(),
                "GraphQL request returned non-200 status: {}",
                body
            );
            return failure(
                ClientError::HttpStatus {
                    status: status.as_u16(),
                    body,
                },
                headers,
            );
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return failure(ClientError::Transport(e), headers),
        };
        let body: GraphQLResponse<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => {
                error!(query = query_name, "GraphQL response is not valid JSON: {}", e);
                return failure(ClientError::Decode(e), headers);
            }
        };

        let partial_errors = match classify_graphql_errors(query_name, body.errors) {
            GraphQLErrorClass::Clean => Vec::new(),
            GraphQLErrorClass::Partial(errors) => errors,
            GraphQLErrorClass::Hard {
                message,
                error_type,
            } => {
                return failure(
                    ClientError::GraphQL {
                        message,
                        error_type,
                    },
                    headers,
                );
            }
        };

        let mut data = body.data.unwrap_or(serde_json::Value::Null);
        let rate_limit = take_rate_limit(query_name, &mut data);

        self.governor.govern(rate_limit.as_ref()).await;

        let result = serde_json::from_value::<R>(data).map_err(|e| {
            error!(query = query_name, "Failed to decode GraphQL data: {}", e);
            ClientError::Decode(e)
        });

        ResponseEnvelope {
            result,
            status_code: Some(status.as_u16()),
            headers,
            partial_errors,
            rate_limit,
        }
    }
}

impl Requester for GitHubClient {
    async fn execute<R: DeserializeOwned>(
        &self,
        query_name: &str,
        query: &GraphQLQuery,
    ) -> ResponseEnvelope<R> {
        self.request(query_name, query).await
    }

    fn is_github_com(&self) -> bool {
        self.is_github_com
    }

    fn ghe_version_context(&self) -> &str {
        &self.ghe_version
    }
}

/// Removes the probe field from `data` so callers only see their own selection.
fn take_rate_limit(query_name: &str, data: &mut serde_json::Value) -> Option<RateLimit> {
    let probe = data.as_object_mut()?.remove(RATE_LIMIT_FIELD)?;
    if probe.is_null() {
        return None;
    }
    match serde_json::from_value::<RateLimit>(probe) {
        Ok(rate_limit) => {
            debug!(
                query = query_name,
                remaining = rate_limit.remaining,
                cost = rate_limit.cost,
                "Observed GraphQL rate limit"
            );
            Some(rate_limit)
        }
        Err(e) => {
            warn!(query = query_name, "Malformed rateLimit in response: {}", e);
            None
        }
    }
}
