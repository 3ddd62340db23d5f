//! Specialized clients built on a [`Requester`](crate::github::Requester)
//!
//! Each client templates its own selection set, sends it through the shared
//! request pipeline and turns the returned `data` into domain types.
//! [`Settings`] loads the configuration the command line client builds them from.

pub mod issue;
pub mod project;
pub mod search;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use issue::IssueNodeClient;
pub use project::ProjectFieldDiscoveryClient;
pub use search::SearchClient;
pub use settings::Settings;
