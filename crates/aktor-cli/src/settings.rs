//! Layered settings: defaults, optional TOML file, `AKTOR_*` environment
//! variables, then command-line flags.

use std::time::Duration;

use aktor_core::query::DEFAULT_MAX_HITS;
use aktor_elastic::ElasticConfig;
use anyhow::Context as _;
use serde::Deserialize;

use crate::Cli;

pub const DEFAULT_URL: &str = "http://localhost:9200";
pub const DEFAULT_INDEX: &str = "aktorer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Base URL of the search engine.
  pub url:          String,
  pub index:        String,
  #[serde(default)]
  pub username:     String,
  #[serde(default)]
  pub password:     String,
  pub timeout_secs: u64,
  /// Page size of every query.
  pub max_hits:     usize,
  /// Seed for record generation; entropy when absent.
  #[serde(default)]
  pub seed:         Option<u64>,
}

impl Settings {
  pub fn load(cli: &Cli) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("url", DEFAULT_URL)?
      .set_default("index", DEFAULT_INDEX)?
      .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
      .set_default("max_hits", DEFAULT_MAX_HITS as u64)?
      .add_source(config::File::from(cli.config.clone()).required(false))
      .add_source(config::Environment::with_prefix("AKTOR"))
      .set_override_option("url", cli.url.clone())?
      .set_override_option("index", cli.index.clone())?
      .set_override_option("seed", cli.seed)?
      .build()
      .context("failed to read settings")?;

    settings
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn elastic_config(&self) -> ElasticConfig {
    ElasticConfig {
      base_url: self.url.clone(),
      index:    self.index.clone(),
      username: self.username.clone(),
      password: self.password.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}
