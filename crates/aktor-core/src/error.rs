//! Error types for `aktor-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown actor type code: {0}")]
  UnknownActorType(u8),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
