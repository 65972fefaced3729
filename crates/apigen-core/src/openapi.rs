//! OpenAPI document loading.
//!
//! This module loads OpenAPI 3.x documents from files or URLs into the
//! `openapiv3` object model and provides a few accessors used for logging
//! and grouping.
//!
//! # Examples
//!
//! ```no_run
//! use apigen_core::openapi::OpenApiContext;
//! use apigen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Load an OpenAPI document from a file
//! let spec = OpenApiContext::from_file("openapi.json").await?;
//!
//! // Access common fields
//! println!("API Title: {}", spec.title());
//! println!("API Version: {}", spec.version());
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use openapiv3::OpenAPI;
use tokio::fs;
use url::Url;

/// A loaded OpenAPI document
#[derive(Debug, Clone)]
pub struct OpenApiContext {
    /// The parsed document
    pub document: OpenAPI,
}

impl OpenApiContext {
    pub fn new(document: OpenAPI) -> Self {
        Self { document }
    }

    /// Load a document from a file or an http(s) URL (YAML or JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> crate::Result<Self> {
        let location = location.as_ref();

        if is_remote(location) {
            return Self::from_url(location).await;
        }

        Self::from_file(location).await
    }

    /// Load a document from a file (YAML or JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            crate::Error::openapi(format!(
                "Failed to parse OpenAPI document at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a document from a URL (YAML or JSON)
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        let response = reqwest::get(url).await.map_err(|e| {
            crate::Error::openapi(format!("Failed to fetch OpenAPI document from {}: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(crate::Error::openapi(format!(
                "Failed to fetch OpenAPI document from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().await.map_err(|e| {
            crate::Error::openapi(format!("Failed to read response from {}: {}", url, e))
        })?;

        Self::parse_content(&content).map_err(|e| {
            crate::Error::openapi(format!(
                "Failed to parse OpenAPI document from {}: {}",
                url, e
            ))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> Result<Self, String> {
        let json_err = match serde_json::from_str::<OpenAPI>(content) {
            Ok(document) => return Ok(Self::new(document)),
            Err(e) => e,
        };

        serde_yaml::from_str::<OpenAPI>(content)
            .map(Self::new)
            .map_err(|yaml_err| {
                format!(
                    "content is neither a valid JSON ({}) nor YAML ({}) document",
                    json_err, yaml_err
                )
            })
    }

    /// Get the title of the API
    pub fn title(&self) -> &str {
        &self.document.info.title
    }

    /// Get the version of the API
    pub fn version(&self) -> &str {
        &self.document.info.version
    }
}

fn is_remote(location: &str) -> bool {
    Url::parse(location)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
