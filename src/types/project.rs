//! Project V2 identity and URL parsing
//!
//! A project is addressed by the URL GitHub shows in the browser,
//! `https://{host}/{orgs|users}/{login}/projects/{number}`, optionally followed
//! by a view path. Any host is accepted so GHE project URLs work the same way.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::repository::Owner;

const ORGANIZATION_SEGMENT: &str = "orgs";
const USER_SEGMENT: &str = "users";
const PROJECTS_SEGMENT: &str = "projects";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectUrlError {
    #[error("invalid project URL '{url}': {reason}")]
    Unparsable { url: String, reason: String },

    #[error("project URL '{0}' does not match /{{orgs|users}}/{{login}}/projects/{{number}}")]
    UnexpectedPath(String),

    #[error("project URL '{url}' has an invalid project number '{number}'")]
    InvalidNumber { url: String, number: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectUrl(pub String);

impl std::fmt::Display for ProjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project type to distinguish between user and organization projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    User,
    Organization,
}

impl ProjectType {
    fn path_segment(&self) -> &'static str {
        match self {
            ProjectType::Organization => ORGANIZATION_SEGMENT,
            ProjectType::User => USER_SEGMENT,
        }
    }
}

/// Project number wrapper for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectNumber(pub u64);

impl ProjectNumber {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProjectNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strong-typed project identifier parsed from a project URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId {
    pub owner: Owner,
    pub number: ProjectNumber,
    pub project_type: ProjectType,
}

impl ProjectId {
    pub fn new(owner: Owner, number: ProjectNumber, project_type: ProjectType) -> Self {
        Self {
            owner,
            number,
            project_type,
        }
    }

    /// Parses `https://{host}/{orgs|users}/{login}/projects/{number}[/...]`.
    ///
    /// Only `orgs` selects an organization project; any other first segment is
    /// treated as user scope.
    pub fn parse(url: &ProjectUrl) -> Result<Self, ProjectUrlError> {
        let parsed = Url::parse(url.0.trim()).map_err(|e| ProjectUrlError::Unparsable {
            url: url.0.clone(),
            reason: e.to_string(),
        })?;

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let [scope, login, projects, number, ..] = segments.as_slice() else {
            return Err(ProjectUrlError::UnexpectedPath(url.0.clone()));
        };
        if *projects != PROJECTS_SEGMENT {
            return Err(ProjectUrlError::UnexpectedPath(url.0.clone()));
        }

        let project_type = if *scope == ORGANIZATION_SEGMENT {
            ProjectType::Organization
        } else {
            ProjectType::User
        };
        let number = number
            .parse::<u64>()
            .map_err(|_| ProjectUrlError::InvalidNumber {
                url: url.0.clone(),
                number: number.to_string(),
            })?;

        Ok(Self::new(
            Owner::from(*login),
            ProjectNumber::new(number),
            project_type,
        ))
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn project_number(&self) -> ProjectNumber {
        self.number
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/projects/{}",
            self.project_type.path_segment(),
            self.owner,
            self.number
        )
    }
}

/// The field names a project exposes for iteration and status tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusFields {
    /// Name of the first iteration field, if the project has one.
    pub iteration_name: Option<String>,
    /// Options of the single-select field named "status", in board order.
    pub status_names: Vec<String>,
}
