//! `aktor` — console for seeding and querying the actor search index.
//!
//! # Usage
//!
//! ```
//! aktor --url http://localhost:9200 --index aktorer
//! aktor --config aktor.toml --seed 42
//! ```
//!
//! Commands, one per line: `h` help, `ci` create index, `i` generate and
//! index the actors, `q` query. An empty line quits.

mod command;
mod console;
mod settings;

use std::{io, path::PathBuf};

use aktor_core::schema::IndexSchema;
use aktor_elastic::ElasticGateway;
use aktor_seed::RecordFactory;
use anyhow::{Context, Result};
use clap::Parser;
use console::CommandLoop;
use rand::{SeedableRng, rngs::StdRng};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "aktor", about = "Seed and query the actor search index")]
pub struct Cli {
  /// Path to a TOML settings file; ignored when missing.
  #[arg(short, long, value_name = "FILE", default_value = "aktor.toml")]
  config: PathBuf,

  /// Base URL of the search engine (default: http://localhost:9200).
  #[arg(long)]
  url: Option<String>,

  /// Index name (default: aktorer).
  #[arg(long)]
  index: Option<String>,

  /// Seed for reproducible record generation.
  #[arg(long)]
  seed: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
  // Logs go to stderr; stdout is the console.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli)?;

  let rng = match settings.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let gateway = ElasticGateway::new(settings.elastic_config())
    .context("failed to set up search engine client")?;
  tracing::info!(url = %settings.url, index = %settings.index, "using search engine");

  let mut console = CommandLoop::new(
    gateway,
    RecordFactory::new(rng),
    IndexSchema::actors(),
    settings.max_hits,
  );

  let stdin = io::stdin();
  let stdout = io::stdout();
  console.run(&mut stdin.lock(), &mut stdout.lock()).await
}

#[cfg(test)]
mod tests;
