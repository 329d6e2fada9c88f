//! Seeded generator of plausible card pools for tests and benchmarks.

use crate::calc::card::{
    AreaItemLevel, CardSpec, CharacterRankBonus, DifferentUnitBonus, ReferenceRate,
    SameUnitBonus, SkillSpec, SupportDeckRates, SupportRarityRates, UserContext,
};
use crate::detail::EventBonus;
use crate::model::attr::Attr;
use crate::model::rarity::CardRarity;
use crate::model::unit::Unit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const MAX_CHARACTERS: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticPool {
    pub seed: u64,
    pub cards: usize,
    #[serde(default = "default_characters")]
    pub characters: u32,
}

fn default_characters() -> u32 {
    MAX_CHARACTERS
}

impl SyntheticPool {
    pub fn generate(&self) -> Vec<CardSpec> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let characters = self.characters.clamp(1, MAX_CHARACTERS);
        (0..self.cards)
            .map(|index| random_card(&mut rng, index as u32 + 1, characters))
            .collect()
    }

    /// Area items for every unit and attribute at a mid level, a few character
    /// ranks and world-link support rates featuring one character.
    pub fn user_context(&self) -> UserContext {
        let mut rng = StdRng::seed_from_u64(self.seed ^ 0x5eed);
        let mut area_items: Vec<AreaItemLevel> = Unit::ALL
            .iter()
            .map(|unit| AreaItemLevel {
                target_unit: Some(*unit),
                target_attr: None,
                target_character: None,
                rates: [10.0; 3],
                all_match_rates: [15.0; 3],
            })
            .collect();
        area_items.extend(Attr::ALL.iter().map(|attr| AreaItemLevel {
            target_unit: None,
            target_attr: Some(*attr),
            target_character: None,
            rates: [10.0; 3],
            all_match_rates: [15.0; 3],
        }));
        let character_ranks = (1..=self.characters.clamp(1, MAX_CHARACTERS))
            .map(|character_id| {
                let rate = f64::from(rng.gen_range(0..=10u8)) * 0.5;
                CharacterRankBonus {
                    character_id,
                    rates: [rate; 3],
                }
            })
            .collect();
        let featured = rng.gen_range(1..=self.characters.clamp(1, MAX_CHARACTERS));
        UserContext {
            area_items,
            character_ranks,
            score_up_limit: None,
            disabled_rarities: Vec::new(),
            support_deck: Some(support_rates(featured)),
        }
    }
}

fn support_rates(character_id: u32) -> SupportDeckRates {
    let rarities = CardRarity::ALL
        .iter()
        .map(|rarity| {
            let (specific, others) = match rarity {
                CardRarity::One | CardRarity::Two => (5.0, 2.0),
                CardRarity::Three => (10.0, 5.0),
                CardRarity::Four | CardRarity::Birthday => (25.0, 15.0),
            };
            SupportRarityRates {
                rarity: *rarity,
                specific,
                others,
                master_rank: (0..=5u8).map(|rank| f64::from(rank) * 0.5).collect(),
                skill_level: (0..4u8).map(|level| f64::from(level) * 0.5).collect(),
            }
        })
        .collect();
    SupportDeckRates {
        character_id,
        rarities,
    }
}

fn random_rarity(rng: &mut StdRng) -> CardRarity {
    match rng.gen_range(0..100u8) {
        0..=9 => CardRarity::One,
        10..=29 => CardRarity::Two,
        30..=59 => CardRarity::Three,
        60..=94 => CardRarity::Four,
        _ => CardRarity::Birthday,
    }
}

fn base_power(rarity: CardRarity) -> f64 {
    match rarity {
        CardRarity::One => 3_000.0,
        CardRarity::Two => 5_000.0,
        CardRarity::Three => 8_000.0,
        CardRarity::Four => 11_000.0,
        CardRarity::Birthday => 10_000.0,
    }
}

fn random_card(rng: &mut StdRng, card_id: u32, characters: u32) -> CardSpec {
    let rarity = random_rarity(rng);
    let character_id = rng.gen_range(1..=characters);
    let attr = Attr::ALL[rng.gen_range(0..Attr::ALL.len())];
    let support_unit = if Unit::of_character(character_id) == Unit::Piapro && rng.gen_bool(0.7) {
        Some(Unit::ALL[rng.gen_range(0..Unit::ALL.len() - 1)])
    } else {
        None
    };
    let base = base_power(rarity);
    let power = [
        (base * rng.gen_range(0.25..0.40)).round(),
        (base * rng.gen_range(0.25..0.40)).round(),
        (base * rng.gen_range(0.25..0.40)).round(),
    ];
    let master_rank = rng.gen_range(0..=5u8);
    let skill_level = rng.gen_range(1..=4u8);
    let score_up = match rarity {
        CardRarity::One | CardRarity::Two => 20.0 + 10.0 * f64::from(skill_level),
        CardRarity::Three => 40.0 + 10.0 * f64::from(skill_level),
        CardRarity::Four | CardRarity::Birthday => 80.0 + 10.0 * f64::from(skill_level),
    };
    let mut skill = SkillSpec {
        score_up,
        life_recovery: if rng.gen_bool(0.1) { 350.0 } else { 0.0 },
        ..SkillSpec::default()
    };
    match rng.gen_range(0..10u8) {
        0 => {
            skill.same_unit = Some(SameUnitBonus {
                unit: Unit::of_character(character_id),
                value: 10.0,
            });
            skill.score_up -= 20.0;
        }
        1 => {
            skill.reference = Some(ReferenceRate {
                rate: 90.0 + 10.0 * f64::from(skill_level),
                max: 50.0,
            });
            skill.score_up -= 30.0;
        }
        2 => {
            skill.different_unit = vec![
                DifferentUnitBonus {
                    unit_count: 1,
                    value: 10.0,
                },
                DifferentUnitBonus {
                    unit_count: 2,
                    value: 20.0,
                },
            ];
            skill.score_up -= 10.0;
        }
        _ => {}
    }
    let event_bonus = rng.gen_bool(0.6).then(|| EventBonus {
        fixed_bonus: [0.0, 25.0, 50.0][rng.gen_range(0..3)] + 2.5 * f64::from(master_rank),
        card_bonus: if rng.gen_bool(0.1) { 20.0 } else { 0.0 },
        leader_bonus: if rng.gen_bool(0.05) { 10.0 } else { 0.0 },
    });
    CardSpec {
        card_id,
        character_id,
        rarity,
        attr,
        master_rank,
        skill_level,
        level: 60,
        support_unit,
        power,
        skills: vec![skill],
        event_bonus,
    }
}
