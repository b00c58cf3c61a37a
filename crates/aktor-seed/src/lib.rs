//! Synthetic actor generation.
//!
//! [`RecordFactory`] builds ten organizations and ten persons with randomized
//! grants. The random source is injected, so a seeded RNG reproduces a batch
//! exactly.

use std::ops::Range;

use aktor_core::actor::{Actor, ActorKind, Grant, ValidInterval};
use chrono::NaiveDate;
use rand::Rng;

pub const ORGANIZATION_NAMES: [&str; 10] = [
  "KPMG AS",
  "Gjensidige",
  "KPMG Oslo AS",
  "DNB",
  "DNB Bank",
  "Sparebank1",
  "Sparebank1 forsikring",
  "Nordea",
  "Handelsbanken",
  "Superbanken",
];

pub const PERSON_NAMES: [&str; 10] = [
  "Tomas Jansson",
  "tomas awesome",
  "Mads Nyborg",
  "mads mediocre",
  "Ulf Nyborg",
  "King Jansson",
  "John Doe",
  "King Doe",
  "Kingson awesome",
  "Tomas jansson",
];

/// The only intervals a grant is ever valid over.
pub const VALID_INTERVALS: [ValidInterval; 5] = [
  interval(date(2010, 1, 1), date(2010, 12, 31)),
  interval(date(2010, 5, 1), date(2010, 12, 31)),
  interval(date(2010, 9, 1), date(2011, 12, 31)),
  interval(date(2010, 2, 1), date(2010, 4, 29)),
  interval(date(2011, 1, 1), date(2011, 5, 31)),
];

/// Number of grants per actor, upper bound exclusive.
pub const GRANTS_PER_ACTOR: Range<usize> = 3..7;

/// Width of the grant type window starting at
/// [`ActorKind::grant_type_base`].
pub const GRANT_TYPE_SPAN: i32 = 5;

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  match NaiveDate::from_ymd_opt(year, month, day) {
    Some(date) => date,
    None => panic!("invalid calendar date"),
  }
}

const fn interval(from: NaiveDate, to: NaiveDate) -> ValidInterval {
  ValidInterval { from, to }
}

/// Description of the `position`-th grant of an actor.
pub fn grant_description(position: usize) -> String {
  format!("konsesjon av type{position}")
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// Generates actor batches from a shared, stateful random source.
///
/// Draw order per actor: grant count, then for each grant its interval and
/// type, then the `active` flag.
pub struct RecordFactory<R> {
  rng: R,
}

impl<R: Rng> RecordFactory<R> {
  pub fn new(rng: R) -> Self { Self { rng } }

  /// Ten organizations, `f_0` through `f_9`.
  pub fn generate_organizations(&mut self) -> Vec<Actor> {
    self.generate(ActorKind::Organization, &ORGANIZATION_NAMES)
  }

  /// Ten persons, `p_0` through `p_9`.
  pub fn generate_persons(&mut self) -> Vec<Actor> {
    self.generate(ActorKind::Person, &PERSON_NAMES)
  }

  /// Organizations followed by persons.
  pub fn generate_all(&mut self) -> Vec<Actor> {
    let mut actors = self.generate_organizations();
    actors.extend(self.generate_persons());
    actors
  }

  fn generate(&mut self, kind: ActorKind, names: &[&str]) -> Vec<Actor> {
    names
      .iter()
      .zip(0..)
      .map(|(name, lookup_id)| self.actor(kind, lookup_id, name))
      .collect()
  }

  fn actor(&mut self, kind: ActorKind, lookup_id: i32, name: &str) -> Actor {
    let count = self.rng.gen_range(GRANTS_PER_ACTOR);
    let grants = (0..count).map(|position| self.grant(kind, position)).collect();
    let active = self.rng.gen_range(1..=10_u8) > 7;

    Actor {
      id: Actor::id_for(kind, lookup_id),
      name: name.to_owned(),
      actor_type: kind,
      lookup_id,
      active,
      grants,
    }
  }

  fn grant(&mut self, kind: ActorKind, position: usize) -> Grant {
    let interval = VALID_INTERVALS[self.rng.gen_range(0..VALID_INTERVALS.len())];
    let base = kind.grant_type_base();
    let grant_type = self.rng.gen_range(base..base + GRANT_TYPE_SPAN);
    Grant::new(grant_description(position), grant_type, interval)
  }
}
