//! Index schema — an explicit description of how actor fields are mapped.
//!
//! The schema is a plain value handed once to
//! [`SearchEngine::create_index`](crate::engine::SearchEngine::create_index);
//! the record types carry no mapping annotations of their own.

use std::collections::BTreeMap;

/// Field names as they appear in stored documents.
pub mod fields {
  pub const ID: &str = "id";
  pub const NAME: &str = "name";
  pub const ACTOR_TYPE: &str = "actorType";
  pub const LOOKUP_ID: &str = "lookupId";
  pub const ACTIVE: &str = "active";
  pub const GRANTS: &str = "grants";

  pub const DESCRIPTION: &str = "description";
  pub const TYPE: &str = "type";
  pub const VALID_FROM: &str = "validFrom";
  pub const VALID_TO: &str = "validTo";

  /// Full path of a grant's description, for queries scoped to `grants`.
  pub const GRANT_DESCRIPTION: &str = "grants.description";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  String,
  Integer,
  Boolean,
  Date,
  /// An array of objects indexed so each element is matched independently.
  Nested,
}

/// How the engine treats a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indexing {
  /// Tokenized for full-text search.
  Analyzed,
  /// Indexed verbatim; only exact terms match.
  NotAnalyzed,
  /// Stored but not searchable.
  No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
  pub field_type: FieldType,
  pub indexing:   Indexing,
  /// Sub-fields; non-empty only for [`FieldType::Nested`].
  pub properties: BTreeMap<String, FieldMapping>,
}

impl FieldMapping {
  fn leaf(field_type: FieldType, indexing: Indexing) -> Self {
    Self { field_type, indexing, properties: BTreeMap::new() }
  }

  pub fn analyzed(field_type: FieldType) -> Self {
    Self::leaf(field_type, Indexing::Analyzed)
  }

  pub fn not_analyzed(field_type: FieldType) -> Self {
    Self::leaf(field_type, Indexing::NotAnalyzed)
  }

  pub fn unindexed(field_type: FieldType) -> Self {
    Self::leaf(field_type, Indexing::No)
  }

  pub fn nested(properties: IndexSchema) -> Self {
    Self {
      field_type: FieldType::Nested,
      indexing:   Indexing::NotAnalyzed,
      properties: properties.fields,
    }
  }

  pub fn is_nested(&self) -> bool { self.field_type == FieldType::Nested }
}

/// Mapping from field name to its [`FieldMapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSchema {
  pub fields: BTreeMap<String, FieldMapping>,
}

impl IndexSchema {
  pub fn new() -> Self { Self::default() }

  pub fn field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
    self.fields.insert(name.into(), mapping);
    self
  }

  pub fn get(&self, name: &str) -> Option<&FieldMapping> { self.fields.get(name) }

  /// The schema of the actor index.
  ///
  /// `actorType` is an integer indexed verbatim and `grants` is nested, so a
  /// filter on one grant's description never matches across sibling grants.
  /// Grant dates are kept in the source but are not searchable.
  pub fn actors() -> Self {
    let grants = IndexSchema::new()
      .field(fields::DESCRIPTION, FieldMapping::not_analyzed(FieldType::String))
      .field(fields::TYPE, FieldMapping::not_analyzed(FieldType::Integer))
      .field(fields::VALID_FROM, FieldMapping::unindexed(FieldType::Date))
      .field(fields::VALID_TO, FieldMapping::unindexed(FieldType::Date));

    IndexSchema::new()
      .field(fields::ID, FieldMapping::analyzed(FieldType::String))
      .field(fields::NAME, FieldMapping::analyzed(FieldType::String))
      .field(fields::ACTOR_TYPE, FieldMapping::not_analyzed(FieldType::Integer))
      .field(fields::LOOKUP_ID, FieldMapping::analyzed(FieldType::Integer))
      .field(fields::ACTIVE, FieldMapping::analyzed(FieldType::Boolean))
      .field(fields::GRANTS, FieldMapping::nested(grants))
  }
}
