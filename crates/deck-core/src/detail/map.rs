//! Keyed store of a card's contribution under every team shape it may end up in.

use crate::error::DetailError;
use crate::model::unit::Unit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Member count meaning "every slot matches".
pub const ALL_MATCH: u8 = 5;
/// Member count standing for "mixed" or "does not matter".
pub const MIXED: u8 = 1;

/// Collapses a real member count into the two buckets stored in the maps.
pub const fn coarsen(member: u8) -> u8 {
    if member == ALL_MATCH { ALL_MATCH } else { MIXED }
}

/// Team dimension of a [`DetailKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Most general case; every map that can be queried owns `(Any, 1, 1)`
    /// or resolves through a narrower key first.
    Any,
    /// Number of distinct other teams in the deck.
    Diff,
    Unit(Unit),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Any => f.write_str("any"),
            Tag::Diff => f.write_str("diff"),
            Tag::Unit(unit) => write!(f, "{unit}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailKey {
    pub tag: Tag,
    pub unit_member: u8,
    pub attr_member: u8,
}

impl DetailKey {
    pub const fn new(tag: Tag, unit_member: u8, attr_member: u8) -> Self {
        Self {
            tag,
            unit_member,
            attr_member,
        }
    }

    pub const FALLBACK: DetailKey = DetailKey::new(Tag::Any, MIXED, MIXED);
}

/// Values keyed by `(tag, unit members, attribute members)` together with
/// running bounds over every comparison value ever written.
#[derive(Debug, Clone)]
pub struct ConditionalValueMap<V> {
    min: f64,
    max: f64,
    values: HashMap<DetailKey, V>,
}

impl<V> Default for ConditionalValueMap<V> {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: HashMap::new(),
        }
    }
}

impl<V> ConditionalValueMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or overwrites) the value for a key and widens the bounds.
    ///
    /// `unit_member` is 1..=5 for per-count skills and otherwise one of the
    /// two buckets; `attr_member` is always a bucket.
    pub fn set(&mut self, tag: Tag, unit_member: u8, attr_member: u8, cmp_value: f64, value: V) {
        self.update_bounds(cmp_value);
        self.values
            .insert(DetailKey::new(tag, unit_member, attr_member), value);
    }

    /// Widens the bounds without storing anything.
    pub fn update_bounds(&mut self, cmp_value: f64) {
        self.min = self.min.min(cmp_value);
        self.max = self.max.max(cmp_value);
    }

    /// Resolves the most specific value for a real team shape.
    ///
    /// Lookup order: exact unit count with coarsened attribute count, then the
    /// coarsened unit count, then `(Any, 1, 1)`.
    pub fn get(&self, tag: Tag, unit_member: u8, attr_member: u8) -> Result<&V, DetailError> {
        let attr_member0 = coarsen(attr_member);
        [
            DetailKey::new(tag, unit_member, attr_member0),
            DetailKey::new(tag, coarsen(unit_member), attr_member0),
            DetailKey::FALLBACK,
        ]
        .iter()
        .find_map(|key| self.values.get(key))
        .ok_or(DetailError::CaseNotFound {
            tag,
            unit_member,
            attr_member,
        })
    }

    pub fn get_exact(&self, key: &DetailKey) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &DetailKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DetailKey> {
        self.values.keys()
    }

    /// True when every value this map can yield is below every value of
    /// `other`. A sufficient condition only: overlapping ranges return false.
    pub fn is_certainly_less_than(&self, other: &Self) -> bool {
        self.max < other.min
    }
}
