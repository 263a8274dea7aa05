//! # mdenrich: Metadata Enrichment CLI
//!
//! Thin entrypoint for the `mdenrich` binary. All logic lives in the
//! `mdenrich_cli` library crate.

use anyhow::Result;
use clap::Parser;
use mdenrich_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, if any, before anything reads the environment.
    dotenvy::dotenv().ok();

    // 2. Setup logging
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mdenrich=info".parse()?)
                .add_directive("mdenrich_cli=info".parse()?)
                .add_directive("mdenrich_source=info".parse()?),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run and map failures to a non-zero exit code
    if let Err(e) = run(cli).await {
        eprintln!("[mdenrich error] Failed to execute command: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
