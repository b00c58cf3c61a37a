//! Search request value objects.
//!
//! A [`SearchRequest`] is assembled from one value per clause: the free-text
//! query, an optional nested exact-term filter and the highlight settings.
//! The clauses are combined conjunctively; how they are rendered on the wire
//! is the backend's concern.

use crate::schema::fields;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_MAX_HITS: usize = 100;

// ─── Free text ───────────────────────────────────────────────────────────────

/// Free-text query over the engine's default fields.
///
/// Blank text matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeText(String);

impl FreeText {
  pub fn new(text: impl Into<String>) -> Self { Self(text.into()) }

  pub fn text(&self) -> &str { &self.0 }

  pub fn is_match_all(&self) -> bool { self.0.trim().is_empty() }
}

// ─── Nested filter ───────────────────────────────────────────────────────────

/// Requires at least one element of the nested array at `path` whose `field`
/// equals `value` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedTerm {
  path:  String,
  field: String,
  value: String,
}

impl NestedTerm {
  pub fn new(
    path: impl Into<String>,
    field: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    Self { path: path.into(), field: field.into(), value: value.into() }
  }

  /// Filter on `grants[].description`.
  pub fn grant_description(value: impl Into<String>) -> Self {
    Self::new(fields::GRANTS, fields::GRANT_DESCRIPTION, value)
  }

  pub fn path(&self) -> &str { &self.path }

  pub fn field(&self) -> &str { &self.field }

  pub fn value(&self) -> &str { &self.value }
}

// ─── Highlighting ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tags {
  pub pre:  String,
  pub post: String,
}

impl Tags {
  pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
    Self { pre: pre.into(), post: post.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightField {
  pub name: String,
  pub tags: Tags,
}

/// Highlight settings: outer tags plus per-field overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
  pub tags:   Tags,
  pub fields: Vec<HighlightField>,
}

impl Default for Highlight {
  /// `<em>`/`</em>` on `name`, inside `<b>`/`</b>`.
  fn default() -> Self {
    Self {
      tags:   Tags::new("<b>", "</b>"),
      fields: vec![HighlightField {
        name: fields::NAME.to_owned(),
        tags: Tags::new("<em>", "</em>"),
      }],
    }
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  free_text: FreeText,
  filter:    Option<NestedTerm>,
  highlight: Highlight,
  size:      usize,
}

impl SearchRequest {
  pub fn build(
    free_text: FreeText,
    filter: Option<NestedTerm>,
    highlight: Highlight,
    size: usize,
  ) -> Self {
    Self { free_text, filter, highlight, size }
  }

  /// Build a request from raw console input. An empty or absent filter adds
  /// no nested clause; highlighting is always requested.
  pub fn from_input(
    free_text: Option<&str>,
    filter: Option<&str>,
    size: usize,
  ) -> Self {
    let filter = filter
      .filter(|value| !value.is_empty())
      .map(NestedTerm::grant_description);
    Self::build(
      FreeText::new(free_text.unwrap_or_default()),
      filter,
      Highlight::default(),
      size,
    )
  }

  pub fn free_text(&self) -> &FreeText { &self.free_text }

  pub fn filter(&self) -> Option<&NestedTerm> { self.filter.as_ref() }

  pub fn highlight(&self) -> &Highlight { &self.highlight }

  pub fn size(&self) -> usize { self.size }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_or_absent_filter_adds_no_clause() {
    let absent = SearchRequest::from_input(Some("tomas"), None, DEFAULT_MAX_HITS);
    let empty = SearchRequest::from_input(Some("tomas"), Some(""), DEFAULT_MAX_HITS);
    assert!(absent.filter().is_none());
    assert!(empty.filter().is_none());
    assert_eq!(absent.free_text().text(), "tomas");
  }

  #[test]
  fn filter_targets_grant_description() {
    let request = SearchRequest::from_input(None, Some("X"), DEFAULT_MAX_HITS);
    let filter = request.filter().unwrap();
    assert_eq!(filter.path(), "grants");
    assert_eq!(filter.field(), "grants.description");
    assert_eq!(filter.value(), "X");
  }

  #[test]
  fn blank_free_text_matches_all() {
    assert!(FreeText::new("").is_match_all());
    assert!(FreeText::new("   ").is_match_all());
    assert!(!FreeText::new("DNB").is_match_all());
    let request = SearchRequest::from_input(None, None, 10);
    assert!(request.free_text().is_match_all());
  }

  #[test]
  fn highlight_is_always_requested_on_name() {
    for filter in [None, Some(""), Some("konsesjon av type0")] {
      let request = SearchRequest::from_input(Some(""), filter, DEFAULT_MAX_HITS);
      let highlight = request.highlight();
      assert_eq!(highlight.tags, Tags::new("<b>", "</b>"));
      assert_eq!(highlight.fields.len(), 1);
      assert_eq!(highlight.fields[0].name, "name");
      assert_eq!(highlight.fields[0].tags, Tags::new("<em>", "</em>"));
    }
  }
}
