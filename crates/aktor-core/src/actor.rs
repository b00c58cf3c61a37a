//! Actor and grant records — the documents seeded into the search index.
//!
//! An actor is a person or an organization. Each actor carries an ordered list
//! of grants (licenses), every one of them valid over a closed date interval.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The kind of entity an actor represents.
///
/// Integer-coded on the wire: `0` for organizations, `1` for persons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ActorKind {
  Organization,
  Person,
}

impl ActorKind {
  pub fn code(self) -> u8 {
    match self {
      Self::Organization => 0,
      Self::Person => 1,
    }
  }

  /// Prefix of every actor id of this kind (`f_3`, `p_7`).
  pub fn id_prefix(self) -> &'static str {
    match self {
      Self::Organization => "f_",
      Self::Person => "p_",
    }
  }

  /// Lowest grant type code handed out to actors of this kind.
  pub fn grant_type_base(self) -> i32 {
    match self {
      Self::Organization => 1,
      Self::Person => 6,
    }
  }
}

impl From<ActorKind> for u8 {
  fn from(kind: ActorKind) -> Self { kind.code() }
}

impl TryFrom<u8> for ActorKind {
  type Error = Error;

  fn try_from(code: u8) -> Result<Self> {
    match code {
      0 => Ok(Self::Organization),
      1 => Ok(Self::Person),
      other => Err(Error::UnknownActorType(other)),
    }
  }
}

impl fmt::Display for ActorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Organization => f.write_str("Organization"),
      Self::Person => f.write_str("Person"),
    }
  }
}

// ─── Interval ────────────────────────────────────────────────────────────────

/// A closed validity interval. Intervals come from a fixed pool whose
/// entries all satisfy `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidInterval {
  pub from: NaiveDate,
  pub to:   NaiveDate,
}

// ─── Grant ───────────────────────────────────────────────────────────────────

/// A license sub-record nested under an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
  pub description: String,
  #[serde(rename = "type")]
  pub grant_type:  i32,
  pub valid_from:  NaiveDate,
  pub valid_to:    NaiveDate,
}

impl Grant {
  pub fn new(
    description: impl Into<String>,
    grant_type: i32,
    interval: ValidInterval,
  ) -> Self {
    Self {
      description: description.into(),
      grant_type,
      valid_from: interval.from,
      valid_to: interval.to,
    }
  }
}

impl fmt::Display for Grant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "\tGrant: {}, {}, {}, {}",
      self.grant_type, self.description, self.valid_from, self.valid_to
    )
  }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// A synthetic person or organization, stored as one search document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
  /// Document id, `<kind prefix><lookup id>`.
  pub id:         String,
  pub name:       String,
  pub actor_type: ActorKind,
  pub lookup_id:  i32,
  pub active:     bool,
  /// Never null; a stored document without grants decodes as empty.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub grants:     Vec<Grant>,
}

impl Actor {
  /// The document id for the `lookup_id`-th actor of `kind`.
  pub fn id_for(kind: ActorKind, lookup_id: i32) -> String {
    format!("{}{lookup_id}", kind.id_prefix())
  }

  /// Whether any grant's description equals `description` exactly.
  pub fn has_grant_described(&self, description: &str) -> bool {
    self.grants.iter().any(|g| g.description == description)
  }
}

impl fmt::Display for Actor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "{}, {}, {}, {}, {}",
      self.id, self.name, self.actor_type, self.lookup_id, self.active
    )?;
    for grant in &self.grants {
      writeln!(f, "{grant}")?;
    }
    Ok(())
  }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Grant>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Vec<Grant>>::deserialize(deserializer)?.unwrap_or_default())
}
