use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// `repository { owner { login } name isPrivate }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub owner: RepositoryOwner,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

/// `repository { nameWithOwner isPrivate }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRefNode {
    pub name_with_owner: String,
    #[serde(default)]
    pub is_private: bool,
}
