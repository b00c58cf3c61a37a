//! Core types and trait definitions for the aktor seeding console.
//!
//! This crate is deliberately free of HTTP dependencies. The engine backend
//! (`aktor-elastic`) and the console (`aktor-cli`) depend on it.

pub mod actor;
pub mod engine;
pub mod error;
pub mod query;
pub mod result;
pub mod schema;

pub use error::{Error, Result};
