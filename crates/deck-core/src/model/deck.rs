use serde::{Deserialize, Serialize};

/// Power of one card in a given team shape.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CardPowerDetail {
    pub base: f64,
    pub area_item_bonus: f64,
    pub character_bonus: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeckPowerDetail {
    pub base: f64,
    pub area_item_bonus: f64,
    pub character_bonus: f64,
    pub honor_bonus: f64,
    pub total: f64,
}

/// Skill of a card after every in-deck dependency has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeckCardSkill {
    pub score_up: f64,
    pub life_recovery: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckCardDetail {
    pub card_id: u32,
    pub character_id: u32,
    pub level: u16,
    pub skill_level: u8,
    pub master_rank: u8,
    pub power: CardPowerDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_bonus: Option<f64>,
    pub skill: DeckCardSkill,
}

/// Full breakdown of a deck in slot order; slot 0 is the leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckDetail {
    pub power: DeckPowerDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_bonus: Option<f64>,
    /// World-link support deck bonus, on top of `event_bonus`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_deck_bonus: Option<f64>,
    pub cards: Vec<DeckCardDetail>,
}

impl DeckDetail {
    pub fn leader(&self) -> Option<&DeckCardDetail> {
        self.cards.first()
    }

    /// Event bonus the event point formula applies.
    pub fn total_event_bonus(&self) -> Option<f64> {
        match (self.event_bonus, self.support_deck_bonus) {
            (None, None) => None,
            (bonus, support) => Some(bonus.unwrap_or(0.0) + support.unwrap_or(0.0)),
        }
    }

    /// Slot holding the strongest skill. Ties go to the lowest card id, so
    /// one card set always ends up with the same leader.
    pub fn best_skill_slot(&self) -> usize {
        let mut best = 0;
        for (slot, card) in self.cards.iter().enumerate().skip(1) {
            let current = &self.cards[best];
            if card.skill.score_up > current.skill.score_up
                || (card.skill.score_up == current.skill.score_up
                    && card.card_id < current.card_id)
            {
                best = slot;
            }
        }
        best
    }
}
