//! Configuration management for apigen code generation.
//!
//! This module defines the `GeneratorConfig` struct and related functionality
//! for managing code generation settings. The configuration can be loaded
//! from a YAML or TOML file, created programmatically, or adjusted from
//! command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use apigen_core::config::{GeneratorConfig, ParamMode, TypeMode};
//!
//! # #[tokio::main]
//! # async fn main() -> apigen_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = GeneratorConfig::new("openapi.json", "src/api");
//! config.param_mode = ParamMode::Aggregated;
//! config.type_mode = TypeMode::Generic;
//! config.container_types = vec!["CommonResult".into(), "CommonPage".into()];
//!
//! // Or load from a config file
//! let config = GeneratorConfig::from_file("apigen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::rules::{FixRule, RuleTarget};

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;
use tokio::fs;

/// Which artifacts to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenMode {
    /// Typed function files plus a type declaration file
    #[default]
    Ts,
    /// Untyped function files only
    Js,
}

/// How request parameters become function parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParamMode {
    /// Every path variable, query parameter and body value is its own parameter
    #[default]
    Expanded,
    /// Query parameters collapse into one synthetic record parameter
    Aggregated,
}

/// How reference names become type names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TypeMode {
    /// Reference names are used as declared
    #[default]
    Plain,
    /// Names starting with a container type fold into generic syntax
    Generic,
}

/// Where generated declarations live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TypeScope {
    /// Exported from the declaration file and imported by function files
    #[default]
    Module,
    /// Declared inside a global namespace
    Namespace,
    /// Declared globally
    Global,
}

/// Configuration for one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Path or URL of the OpenAPI document
    pub input_path: String,

    /// Output directory for generated files
    pub output_dir: String,

    /// Optional directory with templates overriding the built-in ones
    #[serde(default)]
    pub templates_dir: Option<String>,

    #[serde(default)]
    pub gen_mode: GenMode,

    /// Lines placed at the top of every function file
    #[serde(default = "default_file_heads", deserialize_with = "deserialize_lines")]
    pub file_heads: Vec<String>,

    #[serde(default)]
    pub param_mode: ParamMode,

    #[serde(default)]
    pub type_mode: TypeMode,

    /// Container type prefixes folded into generics in generic mode
    #[serde(default)]
    pub container_types: Vec<String>,

    #[serde(default)]
    pub type_scope: TypeScope,

    /// Namespace holding the declarations in namespace scope
    #[serde(default = "default_namespace_id")]
    pub namespace_id: String,

    /// Request content types whose header is written into functions
    #[serde(default = "default_show_content_types")]
    pub show_content_types: Vec<String>,

    #[serde(default)]
    pub function_name_rules: Vec<FixRule>,

    #[serde(default)]
    pub type_name_rules: Vec<FixRule>,

    #[serde(default)]
    pub function_order_rules: Vec<RuleTarget>,

    #[serde(default)]
    pub type_order_rules: Vec<RuleTarget>,
}

impl GeneratorConfig {
    /// Create a new GeneratorConfig with default values
    pub fn new(input_path: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            templates_dir: None,
            gen_mode: GenMode::default(),
            file_heads: default_file_heads(),
            param_mode: ParamMode::default(),
            type_mode: TypeMode::default(),
            container_types: Vec::new(),
            type_scope: TypeScope::default(),
            namespace_id: default_namespace_id(),
            show_content_types: default_show_content_types(),
            function_name_rules: Vec::new(),
            type_name_rules: Vec::new(),
            function_order_rules: Vec::new(),
            type_order_rules: Vec::new(),
        }
    }

    /// Load configuration from a YAML file, or TOML when the extension is `.toml`
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file, in TOML when the extension is `.toml`
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Whether container types are folded into generic syntax
    pub fn generics_enabled(&self) -> bool {
        self.type_mode == TypeMode::Generic
    }

    /// Whether a function may surface the given request content type
    pub fn shows_content_type(&self, content_type: &str) -> bool {
        self.show_content_types.iter().any(|ct| ct == content_type)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

fn default_file_heads() -> Vec<String> {
    vec!["import request from '@/utils/request';".to_string()]
}

fn default_namespace_id() -> String {
    "API".to_string()
}

fn default_show_content_types() -> Vec<String> {
    vec![
        "application/x-www-form-urlencoded".to_string(),
        "multipart/form-data".to_string(),
    ]
}

/// Accept either a single line or a list of lines
fn deserialize_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = SerdeValue::deserialize(deserializer)?;

    match value {
        SerdeValue::String(s) => Ok(vec![s]),
        SerdeValue::Seq(seq) => seq
            .into_iter()
            .map(|item| match item {
                SerdeValue::String(s) => Ok(s),
                _ => Err(serde::de::Error::custom(
                    "Expected string or array of strings",
                )),
            })
            .collect(),
        _ => Err(serde::de::Error::custom(
            "Expected string or array of strings",
        )),
    }
}
