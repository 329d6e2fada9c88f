//! Precomputed per-card values under every team shape.
//!
//! - `map`: the generic conditional value map and its typed key.
//! - `power`: power per team / attribute match.
//! - `skill`: skill per team member count, with fixed and reference variants.
//! - `event_bonus`: bounded event bonus of a card.

mod event_bonus;
mod map;
mod power;
mod skill;

pub use event_bonus::{EventBonus, EventBonusDetail};
pub use map::{ALL_MATCH, ConditionalValueMap, DetailKey, MIXED, Tag, coarsen};
pub use power::PowerMap;
pub use skill::{ReferenceSkill, SkillMap, SkillPrepare};
