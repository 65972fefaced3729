//! apigen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};
use std::process::ExitCode;

// External imports (alphabetized)
use anyhow::Context;
use apigen_core::{generate, GeneratorConfig, ParamMode, PhaseOutcome, TypeMode, TypeScope};
use clap::Parser;
use futures::future::join_all;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate client functions and type declarations from OpenAPI documents
    Generate {
        /// Configuration files (YAML, or TOML with a .toml extension); each
        /// one is generated independently
        #[arg(short, long = "config", required = true, num_args = 1..)]
        configs: Vec<PathBuf>,
        /// Override the OpenAPI document path or URL
        #[arg(long)]
        input: Option<String>,
        /// Override the output directory
        #[arg(long)]
        output_dir: Option<String>,
        /// Override the templates directory
        #[arg(long)]
        templates_dir: Option<String>,
        #[arg(long, value_enum)]
        param_mode: Option<ParamMode>,
        #[arg(long, value_enum)]
        type_mode: Option<TypeMode>,
        #[arg(long, value_enum)]
        type_scope: Option<TypeScope>,
    },
    /// Write a starter configuration file
    Init {
        /// Where to write the configuration
        #[arg(long, default_value = "apigen.yaml")]
        path: PathBuf,
        /// Path or URL of the OpenAPI document
        #[arg(long, default_value = "openapi.json")]
        input: String,
        /// Output directory for generated files
        #[arg(long, default_value = "src/api")]
        output_dir: String,
    },
}

/// Command-line values that override every loaded configuration
#[derive(Debug, Default, Clone)]
struct Overrides {
    input: Option<String>,
    output_dir: Option<String>,
    templates_dir: Option<String>,
    param_mode: Option<ParamMode>,
    type_mode: Option<TypeMode>,
    type_scope: Option<TypeScope>,
}

impl Overrides {
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(templates_dir) = &self.templates_dir {
            config.templates_dir = Some(templates_dir.clone());
        }
        if let Some(mode) = self.param_mode {
            config.param_mode = mode;
        }
        if let Some(mode) = self.type_mode {
            config.type_mode = mode;
        }
        if let Some(scope) = self.type_scope {
            config.type_scope = scope;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            configs,
            input,
            output_dir,
            templates_dir,
            param_mode,
            type_mode,
            type_scope,
        } => {
            let overrides = Overrides {
                input,
                output_dir,
                templates_dir,
                param_mode,
                type_mode,
                type_scope,
            };

            // Documents are independent; one failing does not stop the others
            let runs = configs.iter().map(|path| run_config(path, &overrides));
            let results = join_all(runs).await;

            let mut failed = 0;
            for (path, result) in configs.iter().zip(results) {
                if !report(path, result) {
                    failed += 1;
                }
            }

            if failed > 0 {
                tracing::error!("{} of {} configurations failed", failed, configs.len());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init {
            path,
            input,
            output_dir,
        } => {
            if path.exists() {
                anyhow::bail!("Refusing to overwrite existing file {}", path.display());
            }
            GeneratorConfig::new(input, output_dir)
                .save(&path)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✅ Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load one configuration, apply overrides and generate
async fn run_config(
    path: &Path,
    overrides: &Overrides,
) -> anyhow::Result<apigen_core::GenerationReport> {
    let mut config = GeneratorConfig::from_file(path)
        .await
        .with_context(|| format!("Failed to load configuration {}", path.display()))?;
    overrides.apply(&mut config);

    tracing::info!(
        "Generating from {} into {}",
        config.input_path,
        config.output_dir
    );
    generate(&config)
        .await
        .with_context(|| format!("Failed to generate from {}", config.input_path))
}

/// Print per-phase results; returns whether the configuration succeeded
fn report(path: &Path, result: anyhow::Result<apigen_core::GenerationReport>) -> bool {
    println!("{}", path.display());
    match result {
        Ok(report) => {
            print_phase("Functions", &report.functions);
            print_phase("Types", &report.types);
            report.is_success()
        }
        Err(e) => {
            println!("❌ {:#}", e);
            false
        }
    }
}

fn print_phase(label: &str, outcome: &PhaseOutcome) {
    match outcome {
        PhaseOutcome::Generated(files) => println!("✅ {}: {}", label, files.join(", ")),
        PhaseOutcome::Failed(reason) => println!("❌ {}: {}", label, reason),
        PhaseOutcome::Skipped => println!("➖ {}: skipped", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = GeneratorConfig::new("openapi.json", "out");
        let overrides = Overrides {
            output_dir: Some("generated".to_string()),
            type_mode: Some(TypeMode::Generic),
            ..Default::default()
        };
        overrides.apply(&mut config);
        assert_eq!(config.input_path, "openapi.json");
        assert_eq!(config.output_dir, "generated");
        assert_eq!(config.type_mode, TypeMode::Generic);
    }

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "apigen",
            "generate",
            "-c",
            "a.yaml",
            "b.toml",
            "--param-mode",
            "aggregated",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                configs,
                param_mode,
                ..
            } => {
                assert_eq!(configs.len(), 2);
                assert_eq!(param_mode, Some(ParamMode::Aggregated));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
