//! Apigen Core Library
//!
//! This library generates typed client functions and type declarations from
//! OpenAPI 3.x documents. The pipeline normalizes the document into a
//! canonical model, resolves type names (with optional generic container
//! folding and naming-fix rules), assembles one function per endpoint, and
//! renders function files and a declaration file from templates.
//!
//! # Examples
//!
//! ```no_run
//! use apigen_core::{generate, GeneratorConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> apigen_core::Result<()> {
//! let config = GeneratorConfig::from_file("apigen.yaml").await?;
//! let report = generate(&config).await?;
//! println!("functions: {}, types: {}", report.functions, report.types);
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod normalize;
pub mod openapi;
pub mod resolver;
pub mod rules;
pub mod templates;
pub mod utils;

pub use crate::{
    config::{GenMode, GeneratorConfig, ParamMode, TypeMode, TypeScope},
    error::{Error, Result},
    generate::{generate, GenerationReport, PhaseOutcome},
    model::{ApiModel, ReferenceTable},
    normalize::normalize,
    openapi::OpenApiContext,
    resolver::TypeResolver,
    rules::{FixRule, RuleTarget},
    templates::TemplateManager,
};
