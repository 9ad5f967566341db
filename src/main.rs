//! bindsmith CLI entrypoint
//! Parses command-line arguments and dispatches to the application use cases.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use bindsmith::application::{
    BatchGenerator, GenerateClientUseCase, GenerateRequest, GenerateResponse,
};
use bindsmith::config::{GeneratorSettings, MultipleInterfaces, load_settings_file};
use bindsmith::infrastructure::openapi::CompositeDocumentLoader;
use bindsmith::infrastructure::output::FileSystemOutputService;
use bindsmith::infrastructure::rendering::TeraArtifactRenderer;
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bindsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate client bindings from one OpenAPI document
    Generate(GenerateArgs),
    /// Generate client bindings for every *.bindsmith settings file under a directory
    Batch {
        /// Directory to search for settings files
        directory: PathBuf,
        /// Render without writing files
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Settings file (.json, .bindsmith, .yaml, .yml or .toml)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Path or URL to the OpenAPI document (YAML or JSON)
    #[arg(long)]
    openapi: Option<String>,
    /// Output directory for generated code
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output directory for contracts (implies multiple files)
    #[arg(long)]
    contracts_output: Option<PathBuf>,
    /// Namespace of the generated code
    #[arg(long)]
    namespace: Option<String>,
    /// Namespace of the generated contracts
    #[arg(long)]
    contracts_namespace: Option<String>,
    /// Name of the single generated interface
    #[arg(long)]
    interface_name: Option<String>,
    /// How operations are split into interfaces
    #[arg(long, value_enum)]
    multiple_interfaces: Option<MultipleInterfaces>,
    /// Only include operations with one of these tags
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Only include operations whose path matches one of these patterns
    #[arg(long = "match-path")]
    path_matches: Vec<String>,
    /// Remove schemas no retained operation reaches
    #[arg(long)]
    trim_unused_schema: bool,
    /// Write interfaces, contracts and registration to separate files
    #[arg(long)]
    multiple_files: bool,
    /// Render without writing files
    #[arg(long)]
    dry_run: bool,
}

impl GenerateArgs {
    /// Merge command-line flags over the settings file, if any
    async fn settings(&self) -> anyhow::Result<GeneratorSettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings_file(path)
                .await
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => GeneratorSettings::default(),
        };

        if let Some(openapi) = &self.openapi {
            settings.openapi_path = Some(openapi.clone());
        }
        if let Some(output) = &self.output {
            settings.output_folder = output.clone();
        }
        if let Some(folder) = &self.contracts_output {
            settings.contracts_output_folder = Some(folder.clone());
        }
        if let Some(namespace) = &self.namespace {
            settings.namespace = namespace.clone();
        }
        if let Some(namespace) = &self.contracts_namespace {
            settings.contracts_namespace = Some(namespace.clone());
        }
        if let Some(name) = &self.interface_name {
            settings.naming.interface_name = name.clone();
        }
        if let Some(mode) = self.multiple_interfaces {
            settings.multiple_interfaces = mode;
        }
        if !self.tags.is_empty() {
            settings.include_tags = self.tags.clone();
        }
        if !self.path_matches.is_empty() {
            settings.include_path_matches = self.path_matches.clone();
        }
        settings.trim_unused_schema |= self.trim_unused_schema;
        settings.generate_multiple_files |= self.multiple_files;

        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging with default level INFO, DEBUG with --verbose
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let use_case = Arc::new(build_use_case()?);
    match cli.command {
        Commands::Generate(args) => {
            let settings = args.settings().await?;
            let request = GenerateRequest {
                dry_run: args.dry_run,
                ..GenerateRequest::new(settings)
            };
            let response = use_case
                .execute(request)
                .await
                .context("Failed to generate client bindings")?;
            report(&response);
        }
        Commands::Batch { directory, dry_run } => {
            let outcomes = BatchGenerator::new(use_case)
                .with_dry_run(dry_run)
                .run_directory(&directory)
                .await
                .with_context(|| format!("Failed to scan {}", directory.display()))?;

            let mut failures = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(response) => report(response),
                    Err(e) => {
                        error!("{}: {e}", outcome.settings_file.display());
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} generations failed", outcomes.len());
            }
        }
    }
    Ok(())
}

fn build_use_case() -> anyhow::Result<GenerateClientUseCase> {
    let loader = CompositeDocumentLoader::new().context("Failed to create document loader")?;
    let renderer = TeraArtifactRenderer::new().context("Failed to load templates")?;
    Ok(GenerateClientUseCase::new(
        Arc::new(loader),
        Arc::new(renderer),
        Arc::new(FileSystemOutputService::new()),
    ))
}

fn report(response: &GenerateResponse) {
    info!(
        "{}: {} interfaces, {} contracts, {} warnings",
        response.source,
        response.interface_count,
        response.contract_count,
        response.warnings.len()
    );
    for file in &response.files {
        if response.written {
            println!("{}", file.path.display());
        } else {
            println!("{} (dry run, {} bytes)", file.path.display(), file.content.len());
        }
    }
}
