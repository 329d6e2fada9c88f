//! Calculators layered on top of the detail maps: card producer, deck
//! breakdown, live score and event point.

pub mod card;
pub mod deck;
pub mod event;
pub mod live;

pub use card::{
    AreaItemLevel, CardCalculator, CardConfig, CardSpec, CharacterRankBonus, DifferentUnitBonus,
    ReferenceRate, SameUnitBonus, SkillSpec, SupportDeckRates, SupportRarityRates, UserContext,
};
pub use deck::{DeckBonusRules, DeckCalculator, SupportDeck, TeamShape};
pub use event::{EventCalculator, EventType};
pub use live::{LiveCalculator, LiveDetail, LiveType, MusicMeta, SKILL_ACTIVATIONS};
