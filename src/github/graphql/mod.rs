pub mod compat;
pub mod error;
pub mod graphql_types;
pub mod issue;
pub mod project;
pub mod query;
pub mod search;
