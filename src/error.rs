//! Error taxonomy for content generation.
//!
//! Three classes of failure exist and each is handled at a different layer:
//!
//! - [`ValidationError`] - bad user input, detected by the dispatcher before
//!   any network call and never retried.
//! - [`GenerationError`] - anything that goes wrong while talking to the
//!   completion API. Retried by the retry policy, then folded into a failed
//!   [`GenerationResult`](crate::content::GenerationResult).
//! - [`ConfigError`] - raised once at startup and fatal for the process.

use std::time::Duration;
use thiserror::Error;

/// A required input was missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),
    #[error("field '{0}' must be a positive number")]
    NonPositive(&'static str),
    #[error("field '{field}' must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown content type '{0}'")]
    UnknownContentType(String),
}

/// A single failed attempt against the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("rate limited by provider: {0}")]
    RateLimited(String),
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Startup configuration problem. Prevents the process from serving requests.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "GROQ_API_KEY not found. Set it with `copysmith --set-api-key <key>` \
         or export GROQ_API_KEY=<key>"
    )]
    MissingApiKey,
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("could not find home directory")]
    NoHomeDir,
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}
