use serde::{Deserialize, Serialize};

use crate::github::graphql::graphql_types::LabelNode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without the leading `#`
    pub color: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<LabelNode> for Label {
    fn from(node: LabelNode) -> Self {
        Self {
            name: node.name,
            color: node.color,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
