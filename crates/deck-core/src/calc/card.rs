use crate::detail::{
    EventBonus, EventBonusDetail, PowerMap, ReferenceSkill, SkillMap, SkillPrepare,
};
use crate::error::DetailError;
use crate::model::attr::Attr;
use crate::model::card::CardDetail;
use crate::model::deck::CardPowerDetail;
use crate::model::rarity::CardRarity;
use crate::model::unit::Unit;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL: u16 = 1;
const DEFAULT_SKILL_LEVEL: u8 = 1;

/// Owned card as handed to the calculator: identity plus the already-resolved
/// base parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub card_id: u32,
    pub character_id: u32,
    pub rarity: CardRarity,
    pub attr: Attr,
    #[serde(default)]
    pub master_rank: u8,
    #[serde(default = "default_skill_level")]
    pub skill_level: u8,
    #[serde(default = "default_level")]
    pub level: u16,
    /// Supporting team of a virtual singer, if any.
    #[serde(default)]
    pub support_unit: Option<Unit>,
    /// The three power parameters after level, training, episodes and ranks.
    pub power: [f64; 3],
    /// One skill, or two once special training unlocked a second one.
    pub skills: Vec<SkillSpec>,
    #[serde(default)]
    pub event_bonus: Option<EventBonus>,
}

impl CardSpec {
    pub fn units(&self) -> Vec<Unit> {
        let own = Unit::of_character(self.character_id);
        match self.support_unit {
            Some(support) if own == Unit::Piapro && support != Unit::Piapro => {
                vec![Unit::Piapro, support]
            }
            _ => vec![own],
        }
    }
}

fn default_level() -> u16 {
    DEFAULT_LEVEL
}

fn default_skill_level() -> u8 {
    DEFAULT_SKILL_LEVEL
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkillSpec {
    /// Score-up percentage at the card's skill level.
    pub score_up: f64,
    /// Extra score-up unlocked by the character rank.
    #[serde(default)]
    pub character_rank_bonus: f64,
    #[serde(default)]
    pub life_recovery: f64,
    #[serde(default)]
    pub same_unit: Option<SameUnitBonus>,
    #[serde(default)]
    pub reference: Option<ReferenceRate>,
    #[serde(default)]
    pub different_unit: Vec<DifferentUnitBonus>,
}

impl SkillSpec {
    fn self_fixed(&self) -> f64 {
        self.score_up + self.character_rank_bonus
    }
}

/// Bonus per extra member of `unit`; a full team of five counts five times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SameUnitBonus {
    pub unit: Unit,
    pub value: f64,
}

/// Copies `rate`% of the best other member, adding at most `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRate {
    pub rate: f64,
    pub max: f64,
}

/// Bonus when `unit_count` other teams (1..=2) are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferentUnitBonus {
    pub unit_count: u8,
    pub value: f64,
}

/// Area item owned by the user. `None` targets mean "any".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaItemLevel {
    #[serde(default)]
    pub target_unit: Option<Unit>,
    #[serde(default)]
    pub target_attr: Option<Attr>,
    #[serde(default)]
    pub target_character: Option<u32>,
    pub rates: [f64; 3],
    pub all_match_rates: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterRankBonus {
    pub character_id: u32,
    pub rates: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default)]
    pub disable: bool,
}

/// Support deck rates of one rarity in a world-link event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportRarityRates {
    pub rarity: CardRarity,
    /// Rate for cards of the event's featured character.
    pub specific: f64,
    pub others: f64,
    /// Indexed by master rank.
    pub master_rank: Vec<f64>,
    /// Indexed by skill level, starting at level 1.
    pub skill_level: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportDeckRates {
    pub character_id: u32,
    pub rarities: Vec<SupportRarityRates>,
}

impl SupportDeckRates {
    /// Character, master rank and skill level rates added together.
    pub fn card_bonus(&self, spec: &CardSpec) -> Result<f64, DetailError> {
        let missing = |field| DetailError::MissingSupportRate {
            card_id: spec.card_id,
            field,
        };
        let rates = self
            .rarities
            .iter()
            .find(|rates| rates.rarity == spec.rarity)
            .ok_or_else(|| missing("rarity"))?;
        let character = if spec.character_id == self.character_id {
            rates.specific
        } else {
            rates.others
        };
        let master_rank = rates
            .master_rank
            .get(usize::from(spec.master_rank))
            .ok_or_else(|| missing("master_rank"))?;
        let skill_level = usize::from(spec.skill_level)
            .checked_sub(1)
            .and_then(|index| rates.skill_level.get(index))
            .ok_or_else(|| missing("skill_level"))?;
        Ok(character + master_rank + skill_level)
    }
}

/// User-wide state shared by every card computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default)]
    pub area_items: Vec<AreaItemLevel>,
    #[serde(default)]
    pub character_ranks: Vec<CharacterRankBonus>,
    /// Event-wide cap on a single skill's score-up.
    #[serde(default)]
    pub score_up_limit: Option<f64>,
    #[serde(default)]
    pub disabled_rarities: Vec<CardRarity>,
    /// Present only during world-link events.
    #[serde(default)]
    pub support_deck: Option<SupportDeckRates>,
}

impl UserContext {
    fn config_for(&self, rarity: CardRarity) -> CardConfig {
        CardConfig {
            disable: self.disabled_rarities.contains(&rarity),
        }
    }
}

/// Produces [`CardDetail`]s: power for every team shape and skill for every
/// member count the card's skills react to.
#[derive(Debug, Clone, Copy)]
pub struct CardCalculator<'a> {
    context: &'a UserContext,
}

impl<'a> CardCalculator<'a> {
    pub const fn new(context: &'a UserContext) -> Self {
        Self { context }
    }

    /// `Ok(None)` when the card's rarity is disabled for this run.
    pub fn card_detail(&self, spec: &CardSpec) -> Result<Option<CardDetail>, DetailError> {
        if self.context.config_for(spec.rarity).disable {
            return Ok(None);
        }
        let units = spec.units();
        let power = self.card_power(spec, &units);
        let skill = self.card_skill(spec)?;
        let support_bonus = match &self.context.support_deck {
            Some(rates) => rates.card_bonus(spec)?,
            None => 0.0,
        };
        Ok(Some(CardDetail {
            card_id: spec.card_id,
            character_id: spec.character_id,
            rarity: spec.rarity,
            master_rank: spec.master_rank,
            skill_level: spec.skill_level,
            level: spec.level,
            units,
            attr: spec.attr,
            power,
            skill,
            event_bonus: spec.event_bonus.map(EventBonusDetail::new),
            support_bonus,
        }))
    }

    /// Computes every card independently in parallel. Output is sorted by card
    /// id regardless of scheduling.
    pub fn batch_card_details(&self, specs: &[CardSpec]) -> Result<Vec<CardDetail>, DetailError> {
        let details = specs
            .par_iter()
            .map(|spec| self.card_detail(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let mut details: Vec<CardDetail> = details.into_iter().flatten().collect();
        details.sort_by_key(|detail| detail.card_id);
        Ok(details)
    }

    fn card_power(&self, spec: &CardSpec, units: &[Unit]) -> PowerMap {
        let mut map = PowerMap::new();
        let base: f64 = spec.power.iter().sum();
        let character_bonus = self.character_bonus(spec);
        for unit in units {
            for (same_unit, same_attr) in [(true, true), (true, false), (false, true), (false, false)] {
                let area_item_bonus = self.area_item_bonus(spec, *unit, same_unit, same_attr);
                map.set_power(
                    *unit,
                    same_unit,
                    same_attr,
                    CardPowerDetail {
                        base,
                        area_item_bonus,
                        character_bonus,
                        total: base + area_item_bonus + character_bonus,
                    },
                );
            }
        }
        map
    }

    fn area_item_bonus(&self, spec: &CardSpec, unit: Unit, same_unit: bool, same_attr: bool) -> f64 {
        let mut bonus = [0.0f64; 3];
        let items = self.context.area_items.iter().filter(|item| {
            item.target_unit.is_none_or(|target| target == unit)
                && item.target_attr.is_none_or(|target| target == spec.attr)
                && item
                    .target_character
                    .is_none_or(|target| target == spec.character_id)
        });
        for item in items {
            let all_match = (item.target_unit.is_some() && same_unit)
                || (item.target_attr.is_some() && same_attr);
            let rates = if all_match {
                item.all_match_rates
            } else {
                item.rates
            };
            for (i, rate) in rates.iter().enumerate() {
                bonus[i] += rate * 0.01 * spec.power[i];
            }
        }
        bonus.iter().map(|value| value.floor()).sum()
    }

    fn character_bonus(&self, spec: &CardSpec) -> f64 {
        self.context
            .character_ranks
            .iter()
            .find(|rank| rank.character_id == spec.character_id)
            .map(|rank| {
                rank.rates
                    .iter()
                    .zip(spec.power.iter())
                    .map(|(rate, power)| (rate * 0.01 * power).floor())
                    .sum()
            })
            .unwrap_or(0.0)
    }

    fn card_skill(&self, spec: &CardSpec) -> Result<SkillMap, DetailError> {
        let limit = self.context.score_up_limit.unwrap_or(f64::INFINITY);
        let mut map = SkillMap::new();
        let max_basic = spec
            .skills
            .iter()
            .map(SkillSpec::self_fixed)
            .fold(0.0f64, f64::max)
            .min(limit);
        let max_life = spec
            .skills
            .iter()
            .map(|skill| skill.life_recovery)
            .fold(0.0f64, f64::max);
        // The strongest deck-independent value is the floor every lookup falls
        // back to.
        map.set_fixed_skill(SkillPrepare::fixed(max_basic, max_life));
        for skill in &spec.skills {
            add_conditional_skills(&mut map, skill, max_basic, limit)?;
        }
        Ok(map)
    }
}

fn add_conditional_skills(
    map: &mut SkillMap,
    skill: &SkillSpec,
    max_basic: f64,
    limit: f64,
) -> Result<(), DetailError> {
    let self_fixed = skill.self_fixed();
    if let Some(same_unit) = skill.same_unit {
        for members in 1..=5u8 {
            let extra = if members == 5 { 5.0 } else { f64::from(members - 1) };
            let score_up = (self_fixed + extra * same_unit.value).min(limit);
            map.set_same_unit_skill(
                same_unit.unit,
                members,
                SkillPrepare::fixed(score_up, skill.life_recovery),
            );
        }
    }
    if let Some(reference) = skill.reference {
        let max_value = (self_fixed + reference.max).min(limit);
        if max_value > max_basic {
            map.set_reference_skill(SkillPrepare {
                score_up_fixed: max_basic,
                score_up_to_reference: max_value,
                score_up_reference: Some(ReferenceSkill {
                    base: self_fixed,
                    rate: reference.rate,
                    max: max_value,
                }),
                life_recovery: skill.life_recovery,
            })?;
        }
    }
    for bonus in &skill.different_unit {
        let score_up = (self_fixed + bonus.value).min(limit);
        // Below the fixed value the fallback already wins.
        if score_up > max_basic {
            map.set_diff_unit_skill(
                bonus.unit_count,
                SkillPrepare::fixed(score_up, skill.life_recovery),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::Tag;

    fn spec(card_id: u32, character_id: u32) -> CardSpec {
        CardSpec {
            card_id,
            character_id,
            rarity: CardRarity::Four,
            attr: Attr::Cool,
            master_rank: 0,
            skill_level: 4,
            level: 60,
            support_unit: None,
            power: [10_000.0, 10_000.0, 10_000.0],
            skills: vec![SkillSpec {
                score_up: 100.0,
                ..SkillSpec::default()
            }],
            event_bonus: None,
        }
    }

    fn context() -> UserContext {
        UserContext {
            area_items: vec![
                AreaItemLevel {
                    target_unit: Some(Unit::Street),
                    target_attr: None,
                    target_character: None,
                    rates: [10.0, 10.0, 10.0],
                    all_match_rates: [15.0, 15.0, 15.0],
                },
                AreaItemLevel {
                    target_unit: None,
                    target_attr: Some(Attr::Cool),
                    target_character: None,
                    rates: [10.0, 10.0, 10.0],
                    all_match_rates: [15.0, 15.0, 15.0],
                },
                AreaItemLevel {
                    target_unit: None,
                    target_attr: None,
                    target_character: Some(9),
                    rates: [5.0, 5.0, 5.0],
                    all_match_rates: [5.0, 5.0, 5.0],
                },
            ],
            character_ranks: vec![CharacterRankBonus {
                character_id: 9,
                rates: [2.0, 2.0, 2.0],
            }],
            score_up_limit: None,
            disabled_rarities: Vec::new(),
            support_deck: None,
        }
    }

    #[test]
    fn power_uses_all_match_rates_per_dimension() {
        let context = context();
        let calculator = CardCalculator::new(&context);
        let detail = calculator.card_detail(&spec(1, 9)).unwrap().unwrap();
        assert_eq!(detail.units, vec![Unit::Street]);

        let full = detail.power.get_power(Unit::Street, 5, 5).unwrap();
        assert_eq!(full.base, 30_000.0);
        assert_eq!(full.area_item_bonus, 10_500.0);
        assert_eq!(full.character_bonus, 600.0);
        assert_eq!(full.total, 41_100.0);

        let unit_only = detail.power.get_power(Unit::Street, 5, 2).unwrap();
        assert_eq!(unit_only.area_item_bonus, 9_000.0);
        let mixed = detail.power.get_power(Unit::Street, 3, 3).unwrap();
        assert_eq!(mixed.area_item_bonus, 7_500.0);
    }

    #[test]
    fn virtual_singer_counts_for_both_units() {
        let context = UserContext::default();
        let calculator = CardCalculator::new(&context);
        let mut spec = spec(2, 21);
        spec.support_unit = Some(Unit::Idol);
        let detail = calculator.card_detail(&spec).unwrap().unwrap();
        assert_eq!(detail.units, vec![Unit::Piapro, Unit::Idol]);
        assert!(detail.power.get_power(Unit::Idol, 5, 5).is_ok());
        assert!(detail.power.get_power(Unit::Piapro, 1, 1).is_ok());
    }

    #[test]
    fn same_unit_skill_counts_full_team_five_times() {
        let context = UserContext::default();
        let calculator = CardCalculator::new(&context);
        let mut spec = spec(3, 21);
        spec.skills = vec![SkillSpec {
            score_up: 60.0,
            same_unit: Some(SameUnitBonus {
                unit: Unit::Piapro,
                value: 10.0,
            }),
            ..SkillSpec::default()
        }];
        let detail = calculator.card_detail(&spec).unwrap().unwrap();
        let skill = |n| {
            detail
                .skill
                .get_skill(Tag::Unit(Unit::Piapro), n)
                .unwrap()
                .score_up_fixed
        };
        assert_eq!(skill(1), 60.0);
        assert_eq!(skill(4), 90.0);
        assert_eq!(skill(5), 110.0);
        assert_eq!(
            detail.skill.get_skill(Tag::Diff, 1).unwrap().score_up_fixed,
            60.0
        );
    }

    #[test]
    fn reference_skill_only_registered_when_it_can_beat_fixed() {
        let context = UserContext::default();
        let calculator = CardCalculator::new(&context);
        let mut spec = spec(4, 1);
        spec.skills = vec![
            SkillSpec {
                score_up: 120.0,
                ..SkillSpec::default()
            },
            SkillSpec {
                score_up: 60.0,
                reference: Some(ReferenceRate {
                    rate: 90.0,
                    max: 100.0,
                }),
                ..SkillSpec::default()
            },
        ];
        let detail = calculator.card_detail(&spec).unwrap().unwrap();
        let skill = detail.skill.get_skill(Tag::Any, 1).unwrap();
        let reference = skill.score_up_reference.expect("reference registered");
        assert_eq!(reference.max, 160.0);
        assert_eq!(skill.score_up_fixed, 120.0);
        assert_eq!(detail.skill.min(), 69.0);
        assert_eq!(detail.skill.max(), 160.0);

        spec.skills[1].reference = Some(ReferenceRate {
            rate: 90.0,
            max: 50.0,
        });
        let detail = calculator.card_detail(&spec).unwrap().unwrap();
        let skill = detail.skill.get_skill(Tag::Any, 1).unwrap();
        assert!(skill.score_up_reference.is_none());
    }

    #[test]
    fn score_up_limit_caps_every_variant() {
        let context = UserContext {
            score_up_limit: Some(100.0),
            ..UserContext::default()
        };
        let calculator = CardCalculator::new(&context);
        let mut spec = spec(5, 1);
        spec.skills[0].score_up = 140.0;
        let detail = calculator.card_detail(&spec).unwrap().unwrap();
        assert_eq!(detail.skill.max(), 100.0);
    }

    #[test]
    fn disabled_rarity_is_skipped_and_batch_is_sorted() {
        let context = UserContext {
            disabled_rarities: vec![CardRarity::Two],
            ..UserContext::default()
        };
        let calculator = CardCalculator::new(&context);
        let mut weak = spec(7, 2);
        weak.rarity = CardRarity::Two;
        let specs = vec![spec(9, 3), weak, spec(8, 4)];
        let details = calculator.batch_card_details(&specs).unwrap();
        let ids: Vec<u32> = details.iter().map(|d| d.card_id).collect();
        assert_eq!(ids, vec![8, 9]);
    }

    fn support_rates() -> SupportDeckRates {
        SupportDeckRates {
            character_id: 9,
            rarities: vec![SupportRarityRates {
                rarity: CardRarity::Four,
                specific: 25.0,
                others: 15.0,
                master_rank: vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5],
                skill_level: vec![0.0, 0.5, 1.0, 1.5],
            }],
        }
    }

    #[test]
    fn support_bonus_adds_character_rank_and_skill_rates() {
        let context = UserContext {
            support_deck: Some(support_rates()),
            ..UserContext::default()
        };
        let calculator = CardCalculator::new(&context);
        let mut featured = spec(1, 9);
        featured.master_rank = 5;
        let featured = calculator.card_detail(&featured).unwrap().unwrap();
        assert_eq!(featured.support_bonus, 25.0 + 2.5 + 1.5);

        let other = calculator.card_detail(&spec(2, 3)).unwrap().unwrap();
        assert_eq!(other.support_bonus, 15.0 + 1.5);

        let plain = UserContext::default();
        let detail = CardCalculator::new(&plain)
            .card_detail(&spec(3, 9))
            .unwrap()
            .unwrap();
        assert_eq!(detail.support_bonus, 0.0);
    }

    #[test]
    fn support_bonus_without_rarity_rates_is_an_error() {
        let context = UserContext {
            support_deck: Some(support_rates()),
            ..UserContext::default()
        };
        let mut spec = spec(4, 9);
        spec.rarity = CardRarity::Three;
        let err = CardCalculator::new(&context).card_detail(&spec).unwrap_err();
        assert_eq!(
            err,
            DetailError::MissingSupportRate {
                card_id: 4,
                field: "rarity"
            }
        );
    }
}
