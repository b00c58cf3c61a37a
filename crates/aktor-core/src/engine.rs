//! The `SearchEngine` trait.
//!
//! Implemented by engine backends (e.g. `aktor-elastic`). The console depends
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  actor::Actor,
  query::SearchRequest,
  result::{BulkReport, SearchResult},
  schema::IndexSchema,
};

/// Abstraction over the external document-search engine.
///
/// Every call is a single request; implementations do not retry and do not
/// validate query syntax locally. Documents written by
/// [`bulk_index`](Self::bulk_index) may not be visible to an immediately
/// following [`search`](Self::search).
pub trait SearchEngine: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the index with the given field mappings.
  fn create_index<'a>(
    &'a self,
    schema: &'a IndexSchema,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Store all `actors` in one submission, keyed by actor id.
  ///
  /// Per-document failures are reported in the returned [`BulkReport`]; an
  /// `Err` means the submission as a whole failed.
  fn bulk_index<'a>(
    &'a self,
    actors: &'a [Actor],
  ) -> impl Future<Output = Result<BulkReport, Self::Error>> + Send + 'a;

  /// Run a query and return the matched actors with their highlights.
  fn search<'a>(
    &'a self,
    request: &'a SearchRequest,
  ) -> impl Future<Output = Result<SearchResult, Self::Error>> + Send + 'a;
}
