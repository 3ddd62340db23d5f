/// Markdown formatting for search, project field and issue results
pub mod formatter;

/// GitHub GraphQL transport, response classification and rate-limit governance
pub mod github;

/// Search, project field discovery and issue refresh clients, plus settings
pub mod services;

/// Core type definitions and domain models used throughout the library
pub mod types;
