//! Repository identity types
//!
//! Search results carry a repository as `owner { login } name`, node lookups as
//! `nameWithOwner`. Both end up as a [`RepositoryId`].

use serde::{Deserialize, Serialize};

use crate::github::graphql::graphql_types::{RepositoryNode, RepositoryRefNode};

/// Owner name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Owner(pub String);

impl Owner {
    pub fn new(owner: String) -> Self {
        Self(owner)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Owner {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Repository name wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryName(pub String);

impl RepositoryName {
    pub fn new(repo_name: String) -> Self {
        Self(repo_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RepositoryId {
    pub owner: Owner,
    pub repository_name: RepositoryName,
}

impl RepositoryId {
    pub fn new<T1: Into<String>, T2: Into<String>>(owner: T1, name: T2) -> Self {
        Self {
            owner: Owner::new(owner.into()),
            repository_name: RepositoryName::new(name.into()),
        }
    }

    /// Parses GitHub's `nameWithOwner` form, `owner/name`.
    pub fn parse_name_with_owner(name_with_owner: &str) -> Option<Self> {
        let (owner, name) = name_with_owner.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn repo_name(&self) -> &RepositoryName {
        &self.repository_name
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repository_name)
    }
}

impl From<&RepositoryNode> for RepositoryId {
    fn from(node: &RepositoryNode) -> Self {
        Self::new(node.owner.login.clone(), node.name.clone())
    }
}

impl TryFrom<&RepositoryRefNode> for RepositoryId {
    type Error = anyhow::Error;

    fn try_from(node: &RepositoryRefNode) -> Result<Self, Self::Error> {
        Self::parse_name_with_owner(&node.name_with_owner).ok_or_else(|| {
            anyhow::anyhow!("Invalid nameWithOwner: {}", node.name_with_owner)
        })
    }
}
