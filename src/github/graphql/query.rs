//! Structured query templates.
//!
//! Templates carry `__NAME__` placeholders. A [`QueryBuilder`] binds each
//! placeholder to a typed [`QueryParam`] and refuses to render while any
//! placeholder is left unfilled or any parameter matches nothing, so a typo in
//! a placeholder name fails loudly instead of silently sending the marker to
//! the API.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::github::graphql::graphql_types::GraphQLQuery;
use crate::github::rate_limit::RATE_LIMIT_SELECTION;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__([A-Z][A-Z0-9_]*)__").expect("Failed to compile placeholder regex")
});

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("Failed to compile identifier regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuildError {
    #[error("query template '{template}' has unfilled placeholder __{placeholder}__")]
    MissingParameter {
        template: &'static str,
        placeholder: String,
    },
    #[error("query template '{template}' has no placeholder __{placeholder}__")]
    UnusedParameter {
        template: &'static str,
        placeholder: String,
    },
    #[error("'{0}' is not a valid GraphQL identifier")]
    InvalidIdentifier(String),
    #[error("failed to encode string literal: {0}")]
    InvalidString(String),
}

/// A typed value substituted into a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    /// Rendered as an escaped GraphQL string literal, quotes included.
    String(String),
    Int(u64),
    /// Rendered as a comma separated list of string literals, without brackets.
    StringList(Vec<String>),
    /// A GraphQL name such as a root field (`organization`, `user`).
    Identifier(String),
    /// Raw selection-set text, inserted verbatim.
    Fragment(String),
}

impl QueryParam {
    fn render(&self) -> Result<String, QueryBuildError> {
        match self {
            Self::String(value) => string_literal(value),
            Self::Int(value) => Ok(value.to_string()),
            Self::StringList(values) => Ok(values
                .iter()
                .map(|v| string_literal(v))
                .collect::<Result<Vec<_>, _>>()?
                .join(",")),
            Self::Identifier(name) => {
                if IDENTIFIER_PATTERN.is_match(name) {
                    Ok(name.clone())
                } else {
                    Err(QueryBuildError::InvalidIdentifier(name.clone()))
                }
            }
            Self::Fragment(text) => Ok(text.clone()),
        }
    }
}

/// Escapes `value` as a GraphQL string literal, surrounding quotes included.
///
/// GraphQL string escapes are those of JSON, so serde_json does the quoting.
pub fn string_literal(value: &str) -> Result<String, QueryBuildError> {
    serde_json::to_string(value).map_err(|e| QueryBuildError::InvalidString(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct QueryTemplate {
    name: &'static str,
    source: Cow<'static, str>,
}

impl QueryTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source: Cow::Borrowed(source),
        }
    }

    pub fn from_string(name: &'static str, source: String) -> Self {
        Self {
            name,
            source: Cow::Owned(source),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> BTreeSet<&str> {
        PLACEHOLDER_PATTERN
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    pub fn bind(&self) -> QueryBuilder<'_> {
        QueryBuilder {
            template: self,
            params: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    template: &'a QueryTemplate,
    params: BTreeMap<String, QueryParam>,
}

impl QueryBuilder<'_> {
    pub fn param(mut self, placeholder: impl Into<String>, value: QueryParam) -> Self {
        self.params.insert(placeholder.into(), value);
        self
    }

    pub fn string(self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.param(placeholder, QueryParam::String(value.into()))
    }

    pub fn int(self, placeholder: impl Into<String>, value: u64) -> Self {
        self.param(placeholder, QueryParam::Int(value))
    }

    pub fn string_list(self, placeholder: impl Into<String>, values: Vec<String>) -> Self {
        self.param(placeholder, QueryParam::StringList(values))
    }

    pub fn identifier(self, placeholder: impl Into<String>, name: impl Into<String>) -> Self {
        self.param(placeholder, QueryParam::Identifier(name.into()))
    }

    pub fn fragment(self, placeholder: impl Into<String>, text: impl Into<String>) -> Self {
        self.param(placeholder, QueryParam::Fragment(text.into()))
    }

    /// Renders the template. Substitution is a single pass, so placeholder-like
    /// text inside a parameter value is never expanded.
    pub fn build(self) -> Result<GraphQLQuery, QueryBuildError> {
        let placeholders = self.template.placeholders();

        if let Some(missing) = placeholders
            .iter()
            .find(|p| !self.params.contains_key(**p))
        {
            return Err(QueryBuildError::MissingParameter {
                template: self.template.name,
                placeholder: missing.to_string(),
            });
        }

        if let Some(unused) = self
            .params
            .keys()
            .find(|k| !placeholders.contains(k.as_str()))
        {
            return Err(QueryBuildError::UnusedParameter {
                template: self.template.name,
                placeholder: unused.clone(),
            });
        }

        let rendered = self
            .params
            .iter()
            .map(|(name, value)| value.render().map(|text| (name.as_str(), text)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let query =
            PLACEHOLDER_PATTERN.replace_all(&self.template.source, |caps: &regex::Captures| {
                rendered
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            });

        Ok(GraphQLQuery(query.into_owned()))
    }
}

/// Wraps a caller selection set in an outer query that also requests `rateLimit`.
///
/// The caller's text is embedded byte for byte.
pub fn with_rate_limit_probe(selection: &GraphQLQuery) -> GraphQLQuery {
    GraphQLQuery(format!(
        "query {{\n  {}\n\n  {}\n}}\n",
        selection.as_str(),
        RATE_LIMIT_SELECTION
    ))
}
