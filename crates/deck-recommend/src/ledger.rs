use deck_core::DeckDetail;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A complete deck with its objective value. Slot 0 of `detail` is the leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendDeck {
    pub score: f64,
    pub detail: DeckDetail,
}

impl RecommendDeck {
    pub fn total_power(&self) -> f64 {
        self.detail.power.total
    }

    pub fn leader_card_id(&self) -> u32 {
        self.detail.leader().map(|card| card.card_id).unwrap_or(0)
    }

    pub fn card_ids(&self) -> Vec<u32> {
        self.detail.cards.iter().map(|card| card.card_id).collect()
    }

    fn same_deck(&self, other: &RecommendDeck) -> bool {
        self.score == other.score
            && self.total_power() == other.total_power()
            && self.leader_card_id() == other.leader_card_id()
    }
}

/// Best first: score, then power, then the smaller leader id.
pub fn compare(a: &RecommendDeck, b: &RecommendDeck) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.total_power().total_cmp(&a.total_power()))
        .then_with(|| a.leader_card_id().cmp(&b.leader_card_id()))
}

/// Merges two result sets into at most `limit` ordered, deduplicated decks.
pub fn merge(
    mut existing: Vec<RecommendDeck>,
    incoming: Vec<RecommendDeck>,
    limit: usize,
) -> Vec<RecommendDeck> {
    existing.extend(incoming);
    existing.sort_by(compare);
    existing.dedup_by(|later, earlier| later.same_deck(earlier));
    existing.truncate(limit);
    existing
}
