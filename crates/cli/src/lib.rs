//! # `mdenrich` CLI Library Crate
//!
//! Argument parsing, wiring and reporting for the `mdenrich` command-line
//! tool. The binary in `main.rs` only sets up logging and calls [`run`].

pub mod config;

use crate::config::{get_config, AppConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdenrich::{
    run_enrichment, Enricher, EnrichmentMetrics, EnrichmentRecords, EnrichmentRun,
    HttpConnection, StatusBucket,
};
use mdenrich_source::{discover_components, select_components};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate descriptions for the Lightning Web Components of a project
    Enrich(EnrichArgs),
}

#[derive(Parser, Debug)]
pub struct EnrichArgs {
    /// Root directory of the project. Defaults to the current directory.
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,
    /// Only enrich these components (comma separated names).
    #[arg(long, value_delimiter = ',')]
    pub components: Option<Vec<String>>,
    /// Print the run as JSON instead of a text summary.
    #[arg(long)]
    pub json: bool,
    /// Path to a configuration file. Defaults to `mdenrich.yml`.
    #[arg(long, env = "MDENRICH_CONFIG")]
    pub config: Option<String>,
}

// --- Report ---

/// The JSON document printed with `--json`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RunReport<'a> {
    pub metrics: &'a EnrichmentMetrics,
    pub records: &'a EnrichmentRecords,
    pub files_written: usize,
}

impl<'a> From<&'a EnrichmentRun> for RunReport<'a> {
    fn from(run: &'a EnrichmentRun) -> Self {
        Self {
            metrics: &run.metrics,
            records: &run.records,
            files_written: run.files_written,
        }
    }
}

/// Renders a human-readable summary of a run.
pub fn format_summary(run: &EnrichmentRun) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Enriched {} of {} component(s), {} configuration file(s) updated.",
        run.metrics.success.count, run.metrics.total, run.files_written
    );
    write_bucket(&mut out, "Succeeded", &run.metrics.success);
    write_bucket(&mut out, "Failed", &run.metrics.fail);
    write_bucket(&mut out, "Skipped", &run.metrics.skipped);
    out
}

fn write_bucket(out: &mut String, title: &str, bucket: &StatusBucket) {
    if bucket.count == 0 {
        return;
    }
    let _ = writeln!(out, "\n{title} ({}):", bucket.count);
    for component in &bucket.components {
        let type_name = component.component_type.as_deref().unwrap_or("Unknown");
        match &component.message {
            Some(message) => {
                let _ = writeln!(
                    out,
                    "  - {type_name} {}: {message}",
                    component.component_name
                );
            }
            None => {
                let _ = writeln!(out, "  - {type_name} {}", component.component_name);
            }
        }
    }
}

// --- Command Handlers ---

/// Builds an `Enricher` talking to the configured org.
pub fn build_enricher(config: &AppConfig) -> Result<Enricher> {
    let connection = HttpConnection::new(
        config.require_instance_url()?.to_string(),
        config.api_version.clone(),
        config.require_access_token()?.to_string(),
        config.request_timeout(),
    )?;
    Ok(Enricher::new(Arc::new(connection)).with_options(config.enrichment_options()))
}

async fn handle_enrich(args: EnrichArgs) -> Result<()> {
    let config = get_config(args.config.as_deref()).context("Failed to load configuration")?;
    let enricher = build_enricher(&config)?;

    let discovered = discover_components(&args.project_dir).with_context(|| {
        format!(
            "Failed to discover components in '{}'",
            args.project_dir.display()
        )
    })?;
    let requested = args.components.unwrap_or_default();
    let (selected, unresolved) = select_components(discovered, &requested);
    info!(
        "Enriching {} component(s), {} requested name(s) not found.",
        selected.len(),
        unresolved.len()
    );

    let run = run_enrichment(&enricher, &selected, &unresolved).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&RunReport::from(&run))?);
    } else {
        print!("{}", format_summary(&run));
    }
    Ok(())
}

/// The main entry point for the CLI logic.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Enrich(args) => handle_enrich(args).await,
    }
}
