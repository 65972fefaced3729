//! Error handling for the apigen code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! Errors fall into three groups:
//! - structural errors, raised when the document lacks shape the pipeline
//!   depends on (no `200` response, no schema reference, malformed paths);
//! - conflict errors, raised when an endpoint cannot be expressed as a single
//!   function (body data and query data competing for the request payload);
//! - everything around the pipeline (I/O, parsing, templates, configuration).
//!
//! # Examples
//!
//! ```
//! use apigen_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::structural("GET /role/list", "missing 200 response"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for apigen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apigen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Loading or parsing the OpenAPI document failed
    #[error("OpenAPI error: {0}")]
    OpenApi(String),

    /// The document is missing structure the pipeline requires
    #[error("{location}: {reason}")]
    Structural { location: String, reason: String },

    /// An endpoint carries both body data and aggregated query data
    #[error(
        "{path}: the request carries both body data and query parameters; \
         split them on the server side or send the query values in the body"
    )]
    Conflict { path: String },

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),
}

impl Error {
    /// Create a new OpenAPI error
    pub fn openapi<S: Into<String>>(msg: S) -> Self {
        Self::OpenApi(msg.into())
    }

    /// Create a new structural error for the given location (usually `METHOD /path`)
    pub fn structural<L: Into<String>, R: Into<String>>(location: L, reason: R) -> Self {
        Self::Structural {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create a new conflict error for the given endpoint path
    pub fn conflict<S: Into<String>>(path: S) -> Self {
        Self::Conflict { path: path.into() }
    }
}
