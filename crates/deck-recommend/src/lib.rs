pub mod dominance;
pub mod ledger;
pub mod modes;
pub mod music;
pub mod priority;
pub mod recommend;
pub mod scoring;
pub mod search;

pub use dominance::is_certainly_less_than;
pub use ledger::RecommendDeck;
pub use modes::{RecommendMode, recommend_challenge_live, recommend_event_deck, recommend_for_mode};
pub use music::{MusicRecommendation, rank_music, recommend_music};
pub use priority::{CardPriority, FeasibilityMode, filter_card_priority};
pub use recommend::{RecommendConfig, RecommendError, recommend};
pub use scoring::{MusicScore, Objective, ScoreFunction};
pub use search::{DeckSearch, SearchParams, SearchStats};
