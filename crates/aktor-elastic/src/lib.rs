//! Elasticsearch backend for the aktor console.
//!
//! [`ElasticGateway`] implements [`aktor_core::engine::SearchEngine`] over the
//! engine's HTTP/JSON API with [`reqwest`]. Request and response shapes live
//! in the private `encode` module.

mod encode;
mod gateway;

pub mod error;

pub use error::{Error, Result};
pub use gateway::{ElasticConfig, ElasticGateway};
