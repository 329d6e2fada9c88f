use serde::{Deserialize, Serialize};

/// Event bonus percentages of one card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EventBonus {
    /// Always applies (character, attribute, master rank).
    pub fixed_bonus: f64,
    /// Bonus of the event's featured cards. Events may cap how many members of
    /// one deck receive it.
    #[serde(default)]
    pub card_bonus: f64,
    /// Only applies while the card is the leader.
    #[serde(default)]
    pub leader_bonus: f64,
}

/// Bounded event bonus of one card. A single value is possible per card, so
/// the range is `fixed ..= fixed + card + leader`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventBonusDetail {
    bonus: EventBonus,
}

impl EventBonusDetail {
    pub const fn new(bonus: EventBonus) -> Self {
        Self { bonus }
    }

    pub const fn bonus(&self) -> EventBonus {
        self.bonus
    }

    pub fn min(&self) -> f64 {
        self.bonus.fixed_bonus
    }

    /// Bonus with every component applied.
    pub fn max(&self) -> f64 {
        self.max_bonus(true)
    }

    pub fn max_bonus(&self, leader: bool) -> f64 {
        self.bonus_in_slot(leader, true)
    }

    /// Bonus of the card in a concrete deck slot, with or without its share of
    /// the capped card bonus.
    pub fn bonus_in_slot(&self, leader: bool, card_bonus: bool) -> f64 {
        let leader_bonus = if leader { self.bonus.leader_bonus } else { 0.0 };
        let card_bonus = if card_bonus { self.bonus.card_bonus } else { 0.0 };
        self.bonus.fixed_bonus + card_bonus + leader_bonus
    }
}
