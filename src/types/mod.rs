//! Core type definitions
//!
//! Domain types handed to callers. Wire shapes live in
//! `github::graphql::graphql_types` and are converted into these.

pub mod issue;
pub mod label;
pub mod project;
pub mod repository;
pub mod search;
pub mod user;

pub use issue::*;
pub use label::*;
pub use project::*;
pub use repository::*;
pub use search::*;
pub use user::*;
