//! Tiered candidate filter.
//!
//! Tiers are appended in priority order until the accumulated cards can form a
//! deck and are more than the previous round accepted. The driver widens by
//! calling again with the previous size; once the tiers run out the whole pool
//! is returned.

mod matching;
pub mod tiers;

pub use matching::attribute_matching;

use deck_core::CardDetail;
use deck_core::model::attr::Attr;
use deck_core::model::rarity::CardRarity;
use serde::{Deserialize, Serialize};

/// Distinct characters a single attribute or team needs for a full synergy
/// deck. Smaller decks need one per member.
pub const SYNERGY_MEMBERS: usize = 5;

/// One eligibility tier. Lower `priority` is more desirable; several tiers may
/// share a priority and are then appended together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPriority {
    pub event_bonus: f64,
    pub rarity: CardRarity,
    #[serde(default)]
    pub master_rank: u8,
    pub priority: u32,
}

impl CardPriority {
    fn admits(&self, card: &CardDetail, leader: Option<u32>) -> bool {
        let may_lead = leader.is_none_or(|leader| leader == card.character_id);
        card.rarity == self.rarity
            && card.master_rank >= self.master_rank
            && card
                .max_event_bonus(may_lead)
                .is_none_or(|bonus| bonus >= self.event_bonus)
    }
}

/// How to decide whether a set of cards can plausibly form a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityMode {
    /// Enough cards, repeats allowed.
    #[default]
    MemberCount,
    /// Some attribute or team has enough distinct characters.
    Synergy,
    /// Every attribute can be covered by a different character.
    DistinctAttributes,
}

impl FeasibilityMode {
    pub fn can_make_deck(self, cards: &[&CardDetail], member: usize) -> bool {
        match self {
            FeasibilityMode::MemberCount => cards.len() >= member,
            FeasibilityMode::Synergy => has_synergy_group(cards, member.min(SYNERGY_MEMBERS)),
            FeasibilityMode::DistinctAttributes => {
                attribute_matching(cards) >= member.min(Attr::ALL.len())
            }
        }
    }

    /// Whether `card` may join `deck` at all under this mode.
    pub fn can_extend(self, deck: &[&CardDetail], card: &CardDetail) -> bool {
        match self {
            FeasibilityMode::DistinctAttributes => deck.iter().all(|other| other.attr != card.attr),
            FeasibilityMode::MemberCount | FeasibilityMode::Synergy => true,
        }
    }
}

fn has_synergy_group(cards: &[&CardDetail], characters: usize) -> bool {
    let mut by_attr: [Vec<u32>; 5] = Default::default();
    let mut by_unit: [Vec<u32>; 6] = Default::default();
    for card in cards {
        insert_distinct(&mut by_attr[card.attr.index()], card.character_id);
        for unit in &card.units {
            insert_distinct(&mut by_unit[unit.index()], card.character_id);
        }
    }
    by_attr
        .iter()
        .chain(by_unit.iter())
        .any(|group| group.len() >= characters)
}

fn insert_distinct(characters: &mut Vec<u32>, character_id: u32) {
    if !characters.contains(&character_id) {
        characters.push(character_id);
    }
}

/// Smallest tier prefix that can form a deck and is larger than
/// `previous_len`, or the whole pool once no such prefix exists.
///
/// Returned cards keep tier order; the whole pool keeps pool order. A result is
/// always a superset of any shorter result for the same inputs.
pub fn filter_card_priority<'a>(
    pool: &'a [CardDetail],
    previous_len: usize,
    tiers: &[CardPriority],
    mode: FeasibilityMode,
    member: usize,
    leader: Option<u32>,
) -> Vec<&'a CardDetail> {
    let mut cards: Vec<&'a CardDetail> = Vec::new();
    let mut added = vec![false; pool.len()];
    let mut latest_priority: Option<u32> = None;
    for tier in tiers {
        // Tiers sharing a priority are only judged together.
        let new_priority = latest_priority.is_none_or(|latest| tier.priority > latest);
        if new_priority && cards.len() > previous_len && mode.can_make_deck(&cards, member) {
            return cards;
        }
        latest_priority = Some(tier.priority);
        for (index, card) in pool.iter().enumerate() {
            if !added[index] && tier.admits(card, leader) {
                added[index] = true;
                cards.push(card);
            }
        }
    }
    pool.iter().collect()
}
