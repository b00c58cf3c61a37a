//! Results returned by a [`SearchEngine`](crate::engine::SearchEngine).

use std::collections::BTreeMap;

use crate::actor::Actor;

/// Highlighted fragments of one field of one matched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightHit {
  pub document_id: String,
  pub field:       String,
  pub fragments:   Vec<String>,
}

/// Document key → field name → highlight.
pub type Highlights = BTreeMap<String, BTreeMap<String, HighlightHit>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
  /// Total number of matches reported by the engine; may exceed
  /// `documents.len()` when the page size cuts the hit list.
  pub total:      u64,
  pub took_ms:    u64,
  pub documents:  Vec<Actor>,
  pub highlights: Highlights,
}

/// A single document the engine refused during a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
  pub id:     String,
  pub status: u16,
  pub reason: String,
}

/// Outcome of a bulk submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
  pub indexed:  usize,
  pub failures: Vec<BulkFailure>,
}

impl BulkReport {
  pub fn is_complete(&self) -> bool { self.failures.is_empty() }
}
