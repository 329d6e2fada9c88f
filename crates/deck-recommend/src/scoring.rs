use deck_core::DeckDetail;
use deck_core::calc::{EventCalculator, LiveCalculator, LiveType, MusicMeta};
use serde::{Deserialize, Serialize};

/// Objective the search maximises. Must be deterministic; it is called once
/// per complete deck and once more after a leader swap.
pub trait ScoreFunction {
    fn score(&self, deck: &DeckDetail) -> f64;
}

impl<F> ScoreFunction for F
where
    F: Fn(&DeckDetail) -> f64,
{
    fn score(&self, deck: &DeckDetail) -> f64 {
        self(deck)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    #[default]
    LiveScore,
    EventPoint,
}

/// Live score or event points of a deck on one chart.
#[derive(Debug, Clone, Copy)]
pub struct MusicScore<'a> {
    music: &'a MusicMeta,
    live_type: LiveType,
    objective: Objective,
}

impl<'a> MusicScore<'a> {
    pub const fn new(music: &'a MusicMeta, live_type: LiveType, objective: Objective) -> Self {
        Self {
            music,
            live_type,
            objective,
        }
    }

    pub const fn live_score(music: &'a MusicMeta, live_type: LiveType) -> Self {
        Self::new(music, live_type, Objective::LiveScore)
    }

    pub const fn event_point(music: &'a MusicMeta, live_type: LiveType) -> Self {
        Self::new(music, live_type, Objective::EventPoint)
    }
}

impl ScoreFunction for MusicScore<'_> {
    fn score(&self, deck: &DeckDetail) -> f64 {
        match self.objective {
            Objective::LiveScore => LiveCalculator::live_score(deck, self.music, self.live_type),
            Objective::EventPoint => {
                EventCalculator::deck_event_point(deck, self.music, self.live_type)
            }
        }
    }
}
