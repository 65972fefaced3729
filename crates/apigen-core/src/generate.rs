//! Code generation entry point.
//!
//! Generation runs in two phases over one normalized document: the function
//! phase renders one file per endpoint group, then the type phase renders the
//! declaration file. Each phase reports its own [`PhaseOutcome`], and the type
//! phase runs even when the function phase failed, so synthetic records
//! registered before the failure are still declared.

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};

use crate::{
    builders::{DeclarationBuilder, FunctionAssembler},
    config::{GenMode, GeneratorConfig},
    error::Result,
    model::{ApiModel, EndpointGroup, ReferenceTable},
    normalize::normalize,
    openapi::OpenApiContext,
    resolver::TypeResolver,
    templates::TemplateManager,
};

// External imports (alphabetized)
use futures::future::try_join_all;
use indexmap::IndexMap;
use tokio::fs;

/// Result of one generation phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Files written, by name
    Generated(Vec<String>),
    /// The phase stopped with the given reason
    Failed(String),
    /// The phase does not apply to the configured mode
    Skipped,
}

impl PhaseOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PhaseOutcome::Failed(_))
    }
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseOutcome::Generated(files) => write!(f, "generated {}", files.join(", ")),
            PhaseOutcome::Failed(reason) => write!(f, "failed: {}", reason),
            PhaseOutcome::Skipped => f.write_str("skipped"),
        }
    }
}

/// Outcomes of both phases for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub functions: PhaseOutcome,
    pub types: PhaseOutcome,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        !self.functions.is_failed() && !self.types.is_failed()
    }
}

/// Main entry point for code generation.
///
/// Loading, parsing and normalization failures abort the run with an error;
/// failures inside a phase are reported in the returned [`GenerationReport`].
pub async fn generate(config: &GeneratorConfig) -> Result<GenerationReport> {
    // 1. Load the OpenAPI document
    let context = OpenApiContext::from_file_or_url(&config.input_path).await?;
    log::info!(
        "Loaded '{}' version {} from {}",
        context.title(),
        context.version(),
        config.input_path
    );

    // 2. Normalize it into the canonical model
    let model = normalize(&context.document)?;

    // 3. Load templates, then run both phases
    let templates_dir = config.templates_dir.as_ref().map(PathBuf::from);
    let templates = TemplateManager::with_template_dir(templates_dir.as_deref()).await?;

    Generator::new(config, templates, model).run().await
}

/// One run of both phases over a normalized model
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    templates: TemplateManager,
    groups: Vec<EndpointGroup>,
    references: ReferenceTable,
    resolver: TypeResolver,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig, templates: TemplateManager, model: ApiModel) -> Self {
        let resolver = TypeResolver::new(config, &model.references);
        Self {
            config,
            templates,
            groups: model.groups,
            references: model.references,
            resolver,
        }
    }

    /// Run the function phase, then the type phase
    pub async fn run(mut self) -> Result<GenerationReport> {
        let output_dir = PathBuf::from(&self.config.output_dir);
        fs::create_dir_all(&output_dir).await?;

        let functions = match self.function_files() {
            Ok(files) => write_phase(&output_dir, files).await,
            Err(e) => PhaseOutcome::Failed(e.to_string()),
        };
        log_outcome("Function", &functions);

        let types = if self.config.gen_mode == GenMode::Js {
            PhaseOutcome::Skipped
        } else {
            match self.type_file() {
                Ok(file) => write_phase(&output_dir, vec![file]).await,
                Err(e) => PhaseOutcome::Failed(e.to_string()),
            }
        };
        log_outcome("Type", &types);

        Ok(GenerationReport { functions, types })
    }

    /// Render one function file per group name
    pub fn function_files(&mut self) -> Result<Vec<(String, String)>> {
        let groups = merge_groups(&self.groups);
        let mut assembler =
            FunctionAssembler::new(self.config, &mut self.references, &mut self.resolver);
        let mut files = Vec::with_capacity(groups.len());
        for group in &groups {
            let data = assembler.assemble_file(group)?;
            let content = self.templates.render_functions(&data)?;
            files.push((data.file_name, content));
        }
        Ok(files)
    }

    /// Render the declaration file
    pub fn type_file(&self) -> Result<(String, String)> {
        let data = DeclarationBuilder::new(self.config, &self.resolver).build(&self.references);
        let content = self.templates.render_types(&data)?;
        Ok((data.file_name, content))
    }
}

/// Merge groups whose names collide, in first-seen order.
///
/// Different tags can share a URL prefix and so a file name; the merged group
/// keeps the first tag and description and lists the endpoints of every tag.
fn merge_groups(groups: &[EndpointGroup]) -> Vec<EndpointGroup> {
    let mut merged: IndexMap<&str, EndpointGroup> = IndexMap::new();
    for group in groups {
        match merged.get_mut(group.name.as_str()) {
            Some(existing) => {
                log::info!(
                    "Tags '{}' and '{}' share group '{}'; merging their functions",
                    existing.tag,
                    group.tag,
                    group.name
                );
                existing.endpoints.extend(group.endpoints.iter().cloned());
            }
            None => {
                merged.insert(group.name.as_str(), group.clone());
            }
        }
    }
    merged.into_values().collect()
}

async fn write_phase(output_dir: &Path, files: Vec<(String, String)>) -> PhaseOutcome {
    match write_files(output_dir, files).await {
        Ok(names) => PhaseOutcome::Generated(names),
        Err(e) => PhaseOutcome::Failed(e.to_string()),
    }
}

/// Write rendered files concurrently, returning their names
async fn write_files(output_dir: &Path, files: Vec<(String, String)>) -> Result<Vec<String>> {
    let writes = files.into_iter().map(|(name, content)| async move {
        let path = output_dir.join(&name);
        fs::write(&path, content).await?;
        log::debug!("Wrote {}", path.display());
        Ok::<_, crate::Error>(name)
    });
    try_join_all(writes).await
}

fn log_outcome(phase: &str, outcome: &PhaseOutcome) {
    match outcome {
        PhaseOutcome::Failed(reason) => log::warn!("{} phase failed: {}", phase, reason),
        other => log::info!("{} phase {}", phase, other),
    }
}
