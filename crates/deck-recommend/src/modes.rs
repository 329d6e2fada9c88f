//! Ready-made recommendations for the game modes.

use crate::ledger::RecommendDeck;
use crate::recommend::{RecommendConfig, RecommendError, recommend};
use crate::scoring::MusicScore;
use deck_core::CardDetail;
use deck_core::calc::{EventType, LiveType, MusicMeta};
use serde::{Deserialize, Serialize};

/// What to optimise for, as read from run configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecommendMode {
    ChallengeLive { character_id: u32 },
    Event { event_type: EventType },
}

impl RecommendMode {
    pub fn config(&self) -> RecommendConfig {
        match self {
            RecommendMode::ChallengeLive { .. } => RecommendConfig::challenge_live(),
            RecommendMode::Event { event_type } => RecommendConfig::event(*event_type),
        }
    }
}

/// Highest live score using only cards of `character_id`.
pub fn recommend_challenge_live(
    pool: &[CardDetail],
    character_id: u32,
    music: &MusicMeta,
    config: &RecommendConfig,
) -> Result<Vec<RecommendDeck>, RecommendError> {
    let own: Vec<CardDetail> = pool
        .iter()
        .filter(|card| card.character_id == character_id)
        .cloned()
        .collect();
    let score = MusicScore::live_score(music, LiveType::Challenge);
    recommend(&own, config, &score)
}

/// Most event points per play.
pub fn recommend_event_deck(
    pool: &[CardDetail],
    music: &MusicMeta,
    live_type: LiveType,
    config: &RecommendConfig,
) -> Result<Vec<RecommendDeck>, RecommendError> {
    let score = MusicScore::event_point(music, live_type);
    recommend(pool, config, &score)
}

/// Runs the preset for `mode` with caller overrides already applied to
/// `config`.
pub fn recommend_for_mode(
    pool: &[CardDetail],
    mode: RecommendMode,
    music: &MusicMeta,
    live_type: LiveType,
    config: &RecommendConfig,
) -> Result<Vec<RecommendDeck>, RecommendError> {
    match mode {
        RecommendMode::ChallengeLive { character_id } => {
            recommend_challenge_live(pool, character_id, music, config)
        }
        RecommendMode::Event { .. } => recommend_event_deck(pool, music, live_type, config),
    }
}
