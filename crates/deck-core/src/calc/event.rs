use crate::calc::live::{LiveCalculator, LiveType, MusicMeta};
use crate::model::deck::DeckDetail;
use serde::{Deserialize, Serialize};

const BASE_POINT: f64 = 114.0;
const SCORE_PER_POINT: f64 = 20_000.0;
const OTHERS_SCORE_PER_POINT: f64 = 100_000.0;
const OTHER_ROOM_MEMBERS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Marathon,
    CheerfulCarnival,
    WorldBloom,
}

pub struct EventCalculator;

impl EventCalculator {
    /// Event points for one play scoring `score` with `deck`.
    ///
    /// In multi lives the other room members are assumed to score the same.
    /// A world-link support deck adds its bonus to the deck's own.
    pub fn event_point(score: f64, deck: &DeckDetail, music: &MusicMeta, live_type: LiveType) -> f64 {
        let others = if live_type == LiveType::Multi {
            OTHER_ROOM_MEMBERS * score
        } else {
            0.0
        };
        let bonus = deck.total_event_bonus().unwrap_or(0.0);
        let base = BASE_POINT
            + (score / SCORE_PER_POINT).floor()
            + (others / OTHERS_SCORE_PER_POINT).floor();
        (base * music.event_rate / 100.0 * (100.0 + bonus) / 100.0).floor()
    }

    /// Live score and event point in one go.
    pub fn deck_event_point(deck: &DeckDetail, music: &MusicMeta, live_type: LiveType) -> f64 {
        let score = LiveCalculator::live_score(deck, music, live_type);
        Self::event_point(score, deck, music, live_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::live::tests::{deck, music};

    #[test]
    fn solo_point_uses_score_and_bonus() {
        let mut deck = deck(100_000.0, &[100.0]);
        deck.event_bonus = Some(150.0);
        // (114 + 30) * 1.0 * 2.5
        assert_eq!(
            EventCalculator::event_point(600_000.0, &deck, &music(), LiveType::Solo),
            360.0
        );
    }

    #[test]
    fn multi_point_counts_other_members() {
        let deck = deck(100_000.0, &[100.0]);
        // 114 + 30 + floor(2_400_000 / 100_000)
        assert_eq!(
            EventCalculator::event_point(600_000.0, &deck, &music(), LiveType::Multi),
            168.0
        );
    }

    #[test]
    fn support_deck_bonus_joins_the_deck_bonus() {
        let mut deck = deck(100_000.0, &[100.0]);
        deck.event_bonus = Some(100.0);
        deck.support_deck_bonus = Some(50.0);
        // (114 + 30) * 1.0 * 2.5
        assert_eq!(
            EventCalculator::event_point(600_000.0, &deck, &music(), LiveType::Solo),
            360.0
        );
    }

    #[test]
    fn missing_bonus_counts_as_zero() {
        let deck = deck(100_000.0, &[100.0]);
        let mut music = music();
        music.event_rate = 120.0;
        assert_eq!(
            EventCalculator::event_point(0.0, &deck, &music, LiveType::Auto),
            136.0
        );
    }
}
