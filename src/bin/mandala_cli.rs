//! Mandala CLI - Bridge interface for the host application
//!
//! Commands: presets, validate, render, export
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on invalid input

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mandala_core::{
    export, generate, DirectorySink, ExportManifest, MandalaResult, MandalaSpec,
    PresetRegistry, RawMandalaSpec, Validator,
};

#[derive(Parser)]
#[command(name = "mandala-cli")]
#[command(about = "Mandala CLI - Parametric pattern generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to presets directory
    #[arg(short, long, default_value = "presets")]
    presets_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct SpecSource {
    /// JSON payload (MandalaSpec)
    #[arg(long, conflicts_with = "preset")]
    payload: Option<String>,

    /// Preset ID
    #[arg(long)]
    preset: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available presets
    Presets,

    /// Validate a raw spec payload
    Validate {
        /// JSON payload (MandalaSpec)
        #[arg(long)]
        payload: String,
    },

    /// Generate and export, printing the document as JSON
    Render {
        #[command(flatten)]
        source: SpecSource,
    },

    /// Generate, export and save mandala.svg into a directory
    Export {
        #[command(flatten)]
        source: SpecSource,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "command failed");
            let output = serde_json::json!({
                "success": false,
                "error": e.to_string(),
            });
            println!("{}", output);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> MandalaResult<ExitCode> {
    let registry = PresetRegistry::load_from_dir(&cli.presets_dir)?;

    match &cli.command {
        Commands::Presets => {
            let presets: Vec<_> = registry.list()
                .iter()
                .map(|p| serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "description": p.description,
                    "spec": p.spec,
                }))
                .collect();

            println!("{}", serde_json::to_string_pretty(&presets)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { payload } => {
            let input: RawMandalaSpec = serde_json::from_str(payload)?;
            let result = Validator::new().validate(&input);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.valid {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))  // Validation failure
            }
        }

        Commands::Render { source } => {
            let spec = resolve_spec(source, &registry)?;
            let scene = generate(&spec);
            let document = export(&scene);
            let manifest = ExportManifest::new(&spec, &scene, &document)?;

            let output = serde_json::json!({
                "success": true,
                "filename": document.filename(),
                "mimeType": document.mime_type(),
                "bytes": document.len(),
                "dataBase64": document.to_base64(),
                "dataUri": document.data_uri(),
                "manifest": manifest,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Export { source, out_dir } => {
            let spec = resolve_spec(source, &registry)?;
            let scene = generate(&spec);
            let document = export(&scene);
            let manifest = ExportManifest::new(&spec, &scene, &document)?;

            let mut sink = DirectorySink::new(out_dir);
            mandala_core::deliver(Some(&document), &mut sink)?;

            let output = serde_json::json!({
                "success": true,
                "path": sink.target(document.filename()),
                "manifest": manifest,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_spec(source: &SpecSource, registry: &PresetRegistry) -> MandalaResult<MandalaSpec> {
    match (&source.payload, &source.preset) {
        (Some(payload), _) => {
            let raw: RawMandalaSpec = serde_json::from_str(payload)?;
            Ok(MandalaSpec::try_from(raw)?)
        }
        (None, Some(id)) => Ok(registry.require(id)?.spec.clone()),
        (None, None) => Ok(MandalaSpec::default()),
    }
}

