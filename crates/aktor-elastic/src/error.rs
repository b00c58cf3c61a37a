//! Error type for `aktor-elastic`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The engine answered with a non-success status. `message` is the
  /// engine's own diagnostic.
  #[error("engine error ({status}): {message}")]
  Engine { status: u16, message: String },

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("unexpected response: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
