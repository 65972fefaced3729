//! Template rendering for generated files.
//!
//! Two templates are compiled into the library: `api-funs.tera` renders one
//! function file and `api-types.tera` renders the declaration file. A
//! templates directory may override either one by file name.
//!
//! Rendered output goes through a cleanup pass that drops the separators a
//! template loop leaves behind: a comma right after `(`, a comma right
//! before `)`, and a comma before a closing `}`.

mod types;

pub use types::*;

// Internal imports (std, crate)
use std::io;
use std::path::Path;

use crate::error::Result;

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera};
use tokio::fs;

/// Template rendering one function file
pub const FUNCTIONS_TEMPLATE: &str = "api-funs.tera";

/// Template rendering the declaration file
pub const TYPES_TEMPLATE: &str = "api-types.tera";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (FUNCTIONS_TEMPLATE, include_str!("../../templates/api-funs.tera")),
    (TYPES_TEMPLATE, include_str!("../../templates/api-types.tera")),
];

static LEADING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(, *").expect("leading comma pattern is valid"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r", *\)").expect("trailing comma pattern is valid"));
static CLOSING_BRACE_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*\})").expect("closing brace pattern is valid"));

/// Remove dangling commas left by template loops
pub fn cleanup(rendered: &str) -> String {
    let output = LEADING_COMMA.replace_all(rendered, "(");
    let output = TRAILING_COMMA.replace_all(&output, ")");
    CLOSING_BRACE_COMMA.replace_all(&output, "$1").into_owned()
}

/// Loads and renders the generation templates
#[derive(Debug, Clone)]
pub struct TemplateManager {
    tera: Tera,
}

impl TemplateManager {
    /// A manager holding only the built-in templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.to_vec())?;
        Ok(Self { tera })
    }

    /// A manager whose built-in templates are overridden by same-named files
    /// in `template_dir`
    pub async fn with_template_dir(template_dir: Option<&Path>) -> Result<Self> {
        let mut manager = Self::new()?;
        let Some(dir) = template_dir else {
            return Ok(manager);
        };

        if !fs::try_exists(dir).await? {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Template directory not found: {}", dir.display()),
            )
            .into());
        }

        for (name, _) in BUILTIN_TEMPLATES {
            let path = dir.join(name);
            if fs::try_exists(&path).await? {
                let content = fs::read_to_string(&path).await?;
                manager.tera.add_raw_template(name, &content)?;
                log::info!("Using template override {}", path.display());
            }
        }
        Ok(manager)
    }

    /// Render a template with serializable data, then clean up the output
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let context = Context::from_serialize(data)?;
        let rendered = self.tera.render(template, &context)?;
        Ok(cleanup(&rendered))
    }

    pub fn render_functions(&self, data: &FunctionFileData) -> Result<String> {
        self.render(FUNCTIONS_TEMPLATE, data)
    }

    pub fn render_types(&self, data: &TypeFileData) -> Result<String> {
        self.render(TYPES_TEMPLATE, data)
    }

    /// Names of the loaded templates
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}
