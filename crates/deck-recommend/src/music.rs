//! Live score and event points of one finished deck across many charts.

use crate::scoring::Objective;
use deck_core::DeckDetail;
use deck_core::calc::{EventCalculator, LiveCalculator, LiveType, MusicMeta};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{Level, event};

pub const DEFAULT_LIVE_TYPES: [LiveType; 3] = [LiveType::Solo, LiveType::Multi, LiveType::Auto];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveTypeScore {
    pub live_type: LiveType,
    pub live_score: f64,
    /// Only when the deck carries an event bonus, or for challenge lives.
    pub event_point: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicRecommendation {
    pub music_id: u32,
    pub difficulty: String,
    pub scores: Vec<LiveTypeScore>,
}

impl MusicRecommendation {
    pub fn live_score(&self, live_type: LiveType) -> Option<f64> {
        self.entry(live_type).map(|entry| entry.live_score)
    }

    pub fn event_point(&self, live_type: LiveType) -> Option<f64> {
        self.entry(live_type).and_then(|entry| entry.event_point)
    }

    pub fn value(&self, live_type: LiveType, objective: Objective) -> Option<f64> {
        match objective {
            Objective::LiveScore => self.live_score(live_type),
            Objective::EventPoint => self.event_point(live_type),
        }
    }

    fn entry(&self, live_type: LiveType) -> Option<&LiveTypeScore> {
        self.scores.iter().find(|entry| entry.live_type == live_type)
    }
}

/// Scores `deck` on every chart in `musics`, keeping their order.
pub fn recommend_music(
    deck: &DeckDetail,
    musics: &[MusicMeta],
    live_types: &[LiveType],
) -> Vec<MusicRecommendation> {
    let with_points = deck.total_event_bonus().is_some();
    musics
        .iter()
        .map(|music| {
            let scores = live_types
                .iter()
                .map(|&live_type| {
                    let live_score = LiveCalculator::live_score(deck, music, live_type);
                    let event_point = (with_points || live_type == LiveType::Challenge)
                        .then(|| EventCalculator::event_point(live_score, deck, music, live_type));
                    LiveTypeScore {
                        live_type,
                        live_score,
                        event_point,
                    }
                })
                .collect();
            MusicRecommendation {
                music_id: music.music_id,
                difficulty: music.difficulty.clone(),
                scores,
            }
        })
        .collect()
}

/// Charts ordered best first by `objective` under `live_type`; charts without
/// that value go last. Ties keep the lower music id first.
pub fn rank_music(
    deck: &DeckDetail,
    musics: &[MusicMeta],
    live_type: LiveType,
    objective: Objective,
) -> Vec<MusicRecommendation> {
    let mut ranked = recommend_music(deck, musics, &[live_type]);
    ranked.sort_by(|a, b| {
        let by_value = match (a.value(live_type, objective), b.value(live_type, objective)) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_value
            .then(a.music_id.cmp(&b.music_id))
            .then_with(|| a.difficulty.cmp(&b.difficulty))
    });
    event!(
        target: "deck_recommend::music",
        Level::DEBUG,
        charts = ranked.len(),
        ?live_type,
        ?objective,
        best_music = ranked.first().map(|music| music.music_id),
    );
    ranked
}
