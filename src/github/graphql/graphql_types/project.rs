use serde::{Deserialize, Serialize};

use super::NodesConnection;
use crate::types::ProjectStatusFields;

const STATUS_FIELD_NAME: &str = "status";

/// `data` of the project fields query. Exactly one root is selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFieldsData {
    #[serde(default)]
    pub organization: Option<ProjectOwnerNode>,
    #[serde(default)]
    pub user: Option<ProjectOwnerNode>,
}

impl ProjectFieldsData {
    /// The project under whichever root is non-null.
    pub fn project(&self) -> Option<&ProjectV2Node> {
        self.user
            .as_ref()
            .and_then(|u| u.project_v2.as_ref())
            .or_else(|| {
                self.organization
                    .as_ref()
                    .and_then(|o| o.project_v2.as_ref())
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = &ProjectFieldNode> {
        self.project().into_iter().flat_map(|p| p.fields.iter())
    }

    /// Picks the first iteration field and the single-select field named "status".
    pub fn status_fields(&self) -> ProjectStatusFields {
        let iteration_name = self
            .fields()
            .find(|f| f.data_type == Some(ProjectFieldDataType::Iteration))
            .and_then(|f| f.name.clone());

        let status_names = self
            .fields()
            .find(|f| f.is_status_field())
            .and_then(|f| f.options.as_ref())
            .map(|options| options.iter().map(|o| o.name.clone()).collect())
            .unwrap_or_default();

        ProjectStatusFields {
            iteration_name,
            status_names,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOwnerNode {
    pub project_v2: Option<ProjectV2Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectV2Node {
    pub fields: NodesConnection<ProjectFieldNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectFieldDataType {
    Iteration,
    SingleSelect,
    #[serde(other)]
    Other,
}

/// A project field. Fields that are neither single-select nor iteration
/// match no fragment and arrive as `{}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFieldNode {
    pub name: Option<String>,
    pub data_type: Option<ProjectFieldDataType>,
    pub options: Option<Vec<ProjectFieldOption>>,
}

impl ProjectFieldNode {
    fn is_status_field(&self) -> bool {
        self.data_type == Some(ProjectFieldDataType::SingleSelect)
            && self
                .name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(STATUS_FIELD_NAME))
            && self.options.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFieldOption {
    pub name: String,
}
