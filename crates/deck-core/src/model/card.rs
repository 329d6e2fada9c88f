use crate::detail::{EventBonusDetail, PowerMap, SkillMap};
use crate::model::attr::Attr;
use crate::model::rarity::CardRarity;
use crate::model::unit::Unit;
use core::fmt;

/// Everything the recommender needs to know about one owned card.
///
/// Built once per recommendation call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CardDetail {
    pub card_id: u32,
    pub character_id: u32,
    pub rarity: CardRarity,
    pub master_rank: u8,
    pub skill_level: u8,
    pub level: u16,
    /// One entry, or two for a virtual singer with a supporting team.
    pub units: Vec<Unit>,
    pub attr: Attr,
    pub power: PowerMap,
    pub skill: SkillMap,
    pub event_bonus: Option<EventBonusDetail>,
    /// Bonus the card adds while sitting in a world-link support deck.
    pub support_bonus: f64,
}

impl CardDetail {
    pub fn has_unit(&self, unit: Unit) -> bool {
        self.units.contains(&unit)
    }

    pub fn shares_unit_with(&self, other: &CardDetail) -> bool {
        self.units.iter().any(|unit| other.has_unit(*unit))
    }

    /// Event bonus used for tier filtering; the leader component only counts
    /// when this card may lead.
    pub fn max_event_bonus(&self, leader: bool) -> Option<f64> {
        self.event_bonus.map(|bonus| bonus.max_bonus(leader))
    }
}

impl fmt::Display for CardDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} (char {}, {}, {})",
            self.card_id, self.character_id, self.rarity, self.attr
        )
    }
}
