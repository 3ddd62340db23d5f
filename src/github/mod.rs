pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod rate_limit;

pub use client::{GitHubClient, Requester, ResponseEnvelope};
pub use config::ClientConfig;
pub use error::ClientError;
pub use graphql::graphql_types;
pub use rate_limit::{RateLimit, RateLimitGovernor};
