//! User identity
//!
//! GitHub replaces deleted accounts with `ghost`; a null author is reported as
//! that user wherever a login is required.

use serde::{Deserialize, Serialize};

/// Login GitHub substitutes for deleted accounts.
pub const GHOST_LOGIN: &str = "ghost";

/// User identifier wrapper type for GitHub logins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct User(String);

impl User {
    pub fn new(login: String) -> Self {
        Self(login)
    }

    pub fn ghost() -> Self {
        Self(GHOST_LOGIN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for User {
    fn from(s: &str) -> Self {
        User::new(s.to_string())
    }
}

impl From<String> for User {
    fn from(s: String) -> Self {
        User::new(s)
    }
}

impl PartialEq<&str> for User {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
