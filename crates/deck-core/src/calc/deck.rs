use crate::detail::{SkillPrepare, Tag};
use crate::error::DetailError;
use crate::model::attr::Attr;
use crate::model::card::CardDetail;
use crate::model::deck::{
    CardPowerDetail, DeckCardDetail, DeckCardSkill, DeckDetail, DeckPowerDetail,
};
use crate::model::unit::Unit;
use serde::{Deserialize, Serialize};

/// Member counts of one deck, per team and per attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamShape {
    units: [u8; 6],
    attrs: [u8; 5],
}

impl TeamShape {
    pub fn of(cards: &[&CardDetail]) -> Self {
        let mut shape = Self::default();
        for card in cards {
            shape.attrs[card.attr.index()] += 1;
            for unit in &card.units {
                shape.units[unit.index()] += 1;
            }
        }
        shape
    }

    pub fn unit_count(&self, unit: Unit) -> u8 {
        self.units[unit.index()]
    }

    pub fn attr_count(&self, attr: Attr) -> u8 {
        self.attrs[attr.index()]
    }

    pub fn distinct_units(&self) -> u8 {
        self.units.iter().filter(|count| **count > 0).count() as u8
    }

    pub fn distinct_attrs(&self) -> u8 {
        self.attrs.iter().filter(|count| **count > 0).count() as u8
    }
}

/// Event rules that change how a deck's bonus adds up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckBonusRules {
    /// How many members receive their card bonus. The largest ones count.
    pub card_bonus_count_limit: Option<usize>,
    /// Deck bonus by number of distinct attributes; index 0 is one attribute.
    pub different_attribute_bonus: Option<[f64; 5]>,
    /// Cards in the world-link support deck.
    pub support_deck_size: Option<usize>,
}

/// Owned cards ranked by support bonus, best first. The support deck of a
/// deck is the top `size` cards that are not in it.
#[derive(Debug, Clone)]
pub struct SupportDeck<'a> {
    ranked: Vec<&'a CardDetail>,
    size: usize,
}

impl<'a> SupportDeck<'a> {
    pub fn new(pool: &'a [CardDetail], size: usize) -> Self {
        let mut ranked: Vec<&CardDetail> = pool.iter().collect();
        ranked.sort_by(|a, b| {
            b.support_bonus
                .total_cmp(&a.support_bonus)
                .then(a.card_id.cmp(&b.card_id))
        });
        Self { ranked, size }
    }

    pub fn bonus(&self, deck: &[&CardDetail]) -> f64 {
        self.ranked
            .iter()
            .filter(|card| deck.iter().all(|member| member.card_id != card.card_id))
            .take(self.size)
            .map(|card| card.support_bonus)
            .sum()
    }
}

/// Turns a concrete list of cards (slot 0 = leader) into a [`DeckDetail`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckCalculator {
    honor_bonus: f64,
    rules: DeckBonusRules,
}

impl DeckCalculator {
    pub const fn new(honor_bonus: f64) -> Self {
        Self {
            honor_bonus,
            rules: DeckBonusRules {
                card_bonus_count_limit: None,
                different_attribute_bonus: None,
                support_deck_size: None,
            },
        }
    }

    pub const fn with_rules(mut self, rules: DeckBonusRules) -> Self {
        self.rules = rules;
        self
    }

    pub const fn rules(&self) -> &DeckBonusRules {
        &self.rules
    }

    /// [`Self::deck_detail`] plus the bonus of the support deck left over
    /// from `support`.
    pub fn deck_detail_with_support(
        &self,
        cards: &[&CardDetail],
        support: Option<&SupportDeck<'_>>,
    ) -> Result<DeckDetail, DetailError> {
        let mut detail = self.deck_detail(cards)?;
        detail.support_deck_bonus = support.map(|support| support.bonus(cards));
        Ok(detail)
    }

    pub fn deck_detail(&self, cards: &[&CardDetail]) -> Result<DeckDetail, DetailError> {
        if cards.is_empty() {
            return Err(DetailError::EmptyDeck);
        }
        let shape = TeamShape::of(cards);

        let mut powers = Vec::with_capacity(cards.len());
        let mut skills = Vec::with_capacity(cards.len());
        for card in cards {
            powers.push(card_power(card, &shape)?);
            skills.push(card_skill(card, &shape)?);
        }
        let skills = resolve_reference_skills(&skills);

        let mut power = DeckPowerDetail {
            honor_bonus: self.honor_bonus,
            ..DeckPowerDetail::default()
        };
        for card_power in &powers {
            power.base += card_power.base;
            power.area_item_bonus += card_power.area_item_bonus;
            power.character_bonus += card_power.character_bonus;
            power.total += card_power.total;
        }
        power.total += self.honor_bonus;

        let has_event_bonus = cards.iter().any(|card| card.event_bonus.is_some());
        let card_bonus_slots = self.card_bonus_slots(cards);
        let details: Vec<DeckCardDetail> = cards
            .iter()
            .zip(powers)
            .zip(skills)
            .enumerate()
            .map(|(slot, ((card, power), skill))| DeckCardDetail {
                card_id: card.card_id,
                character_id: card.character_id,
                level: card.level,
                skill_level: card.skill_level,
                master_rank: card.master_rank,
                power,
                event_bonus: card
                    .event_bonus
                    .map(|bonus| bonus.bonus_in_slot(slot == 0, card_bonus_slots[slot])),
                skill,
            })
            .collect();
        let attribute_bonus = self
            .rules
            .different_attribute_bonus
            .map(|table| table[usize::from(shape.distinct_attrs().clamp(1, 5)) - 1]);
        let event_bonus = (has_event_bonus || attribute_bonus.is_some()).then(|| {
            details
                .iter()
                .map(|card| card.event_bonus.unwrap_or(0.0))
                .sum::<f64>()
                + attribute_bonus.unwrap_or(0.0)
        });

        Ok(DeckDetail {
            power,
            event_bonus,
            support_deck_bonus: None,
            cards: details,
        })
    }

    /// Which slots receive their card bonus under the count limit.
    fn card_bonus_slots(&self, cards: &[&CardDetail]) -> Vec<bool> {
        let Some(limit) = self.rules.card_bonus_count_limit else {
            return vec![true; cards.len()];
        };
        let card_bonus = |slot: usize| {
            cards[slot]
                .event_bonus
                .map_or(0.0, |bonus| bonus.bonus().card_bonus)
        };
        let mut ranked: Vec<usize> = (0..cards.len())
            .filter(|slot| card_bonus(*slot) > 0.0)
            .collect();
        ranked.sort_by(|a, b| card_bonus(*b).total_cmp(&card_bonus(*a)).then(a.cmp(b)));
        let mut slots = vec![false; cards.len()];
        for slot in ranked.into_iter().take(limit) {
            slots[slot] = true;
        }
        slots
    }
}

/// Best power over the teams the card counts under.
fn card_power(card: &CardDetail, shape: &TeamShape) -> Result<CardPowerDetail, DetailError> {
    let mut best: Option<CardPowerDetail> = None;
    for unit in &card.units {
        let current = card.power.get_power(
            *unit,
            shape.unit_count(*unit),
            shape.attr_count(card.attr),
        )?;
        if best.is_none_or(|best| current.total > best.total) {
            best = Some(*current);
        }
    }
    best.ok_or(DetailError::CaseNotFound {
        tag: Tag::Any,
        unit_member: 0,
        attr_member: 0,
    })
}

/// Best skill over the different-team bucket and each of the card's teams.
fn card_skill(card: &CardDetail, shape: &TeamShape) -> Result<SkillPrepare, DetailError> {
    let other_units = shape.distinct_units().saturating_sub(1);
    let mut best = *card.skill.get_skill(Tag::Diff, other_units)?;
    for unit in &card.units {
        let current = card
            .skill
            .get_skill(Tag::Unit(*unit), shape.unit_count(*unit))?;
        if current.score_up_fixed > best.score_up_fixed {
            best = *current;
        }
    }
    Ok(best)
}

/// Reference skills copy a share of the best other member's value.
fn resolve_reference_skills(skills: &[SkillPrepare]) -> Vec<DeckCardSkill> {
    skills
        .iter()
        .enumerate()
        .map(|(slot, skill)| {
            let score_up = match skill.score_up_reference {
                Some(reference) => {
                    let best_other = skills
                        .iter()
                        .enumerate()
                        .filter(|(other, _)| *other != slot)
                        .map(|(_, other)| other.score_up_to_reference)
                        .fold(0.0f64, f64::max);
                    let copied = (best_other * reference.rate / 100.0).floor();
                    (reference.base + copied).min(reference.max).max(skill.score_up_fixed)
                }
                None => skill.score_up_fixed,
            };
            DeckCardSkill {
                score_up,
                life_recovery: skill.life_recovery,
            }
        })
        .collect()
}
