//! GitHub Enterprise version gating for query templates.
//!
//! Older GHE releases reject queries that mention schema types or fields they
//! do not know. Templates are written against the current schema and every line
//! naming something the target cannot serve is dropped before dispatch.

use std::borrow::Cow;
use std::str::FromStr;

use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid GHE version '{0}', expected major.minor[.patch]")]
pub struct InvalidGheVersion(String);

/// Names missing from GHE 2.20 and earlier.
const MISSING_UP_TO_2_20: &[&str] = &[
    "ConnectedEvent",
    "DisconnectedEvent",
    "UnmarkedAsDuplicateEvent",
    "ConvertToDraftEvent",
    "isDraft",
];

/// Names missing from GHE 2.21 and earlier.
const MISSING_UP_TO_2_21: &[&str] = &[
    "AutomaticBaseChangeFailedEvent",
    "AutomaticBaseChangeSucceededEvent",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GheVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl GheVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Schema names this version cannot serve. Empty for 3.x and later.
    pub fn unsupported_names(&self) -> Vec<&'static str> {
        if self.major >= 3 {
            return Vec::new();
        }

        let mut names = Vec::new();
        if self.minor <= 20 {
            names.extend_from_slice(MISSING_UP_TO_2_20);
        }
        if self.minor <= 21 {
            names.extend_from_slice(MISSING_UP_TO_2_21);
        }
        names
    }
}

impl FromStr for GheVersion {
    type Err = InvalidGheVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidGheVersion(s.to_string());
        let mut parts = s.trim().split('.');

        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let patch = match parts.next() {
            Some(p) => Some(p.parse::<u32>().map_err(|_| invalid())?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl std::fmt::Display for GheVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

/// Removes every line of `source` that mentions one of `names`.
pub fn strip_lines_mentioning<'a>(source: &'a str, names: &[&str]) -> Cow<'a, str> {
    if names.is_empty() {
        return Cow::Borrowed(source);
    }

    let kept: Vec<&str> = source
        .lines()
        .filter(|line| !names.iter().any(|name| line.contains(name)))
        .collect();
    Cow::Owned(kept.join("\n"))
}

/// Adapts `source` to the target described by `ghe_version_context`.
///
/// An empty context means github.com, which always gets the full template.
/// An unparsable version is treated as current.
pub fn gate_template<'a>(source: &'a str, ghe_version_context: &str) -> Cow<'a, str> {
    if ghe_version_context.is_empty() {
        return Cow::Borrowed(source);
    }

    match ghe_version_context.parse::<GheVersion>() {
        Ok(version) => strip_lines_mentioning(source, &version.unsupported_names()),
        Err(e) => {
            warn!("{}, sending the full query", e);
            Cow::Borrowed(source)
        }
    }
}
