use super::map::{ConditionalValueMap, DetailKey, MIXED, Tag};
use crate::error::DetailError;
use crate::model::unit::Unit;
use serde::{Deserialize, Serialize};

/// "Steal" component of a skill: adds a share of the best other member's
/// skill on top of `base`, never exceeding `max` (which includes `base`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSkill {
    pub base: f64,
    pub rate: f64,
    pub max: f64,
}

/// Skill of a card once the team shape is known, before reference skills are
/// resolved against the other members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillPrepare {
    pub score_up_fixed: f64,
    /// Value another member's reference skill reads from this card.
    pub score_up_to_reference: f64,
    pub score_up_reference: Option<ReferenceSkill>,
    pub life_recovery: f64,
}

impl SkillPrepare {
    pub const fn fixed(score_up: f64, life_recovery: f64) -> Self {
        Self {
            score_up_fixed: score_up,
            score_up_to_reference: score_up,
            score_up_reference: None,
            life_recovery,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillMap {
    inner: ConditionalValueMap<SkillPrepare>,
    fixed: Option<SkillPrepare>,
}

impl SkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skill independent of the other members. Also the fallback every other
    /// skill kind relies on.
    pub fn set_fixed_skill(&mut self, value: SkillPrepare) {
        self.inner
            .set(Tag::Any, MIXED, MIXED, value.score_up_fixed, value);
        self.fixed = Some(value);
    }

    /// Skill that copies part of another member's effect. Lower bound is the
    /// minimum 10% copy.
    pub fn set_reference_skill(&mut self, value: SkillPrepare) -> Result<(), DetailError> {
        let reference = value
            .score_up_reference
            .ok_or(DetailError::MissingReference)?;
        self.inner
            .update_bounds(reference.base + (10.0 * reference.rate / 100.0).floor());
        self.inner
            .set(Tag::Any, MIXED, MIXED, reference.max, value);
        self.fixed = Some(value);
        Ok(())
    }

    /// Skill depending on how many members (1..=5) share `unit`.
    pub fn set_same_unit_skill(&mut self, unit: Unit, unit_member: u8, value: SkillPrepare) {
        self.set_counted(Tag::Unit(unit), unit_member, value);
    }

    /// Skill depending on how many other teams (1..=2) are in the deck.
    pub fn set_diff_unit_skill(&mut self, unit_count: u8, value: SkillPrepare) {
        self.set_counted(Tag::Diff, unit_count, value);
    }

    fn set_counted(&mut self, tag: Tag, unit_member: u8, value: SkillPrepare) {
        self.inner
            .set(tag, unit_member, MIXED, value.score_up_fixed, value);
        self.fixed = None;
    }

    /// Skill for a real member count of `tag`.
    ///
    /// A card whose skill never depends on the deck answers every query with
    /// its fixed skill. Otherwise: exact count, then (for the different-team
    /// bucket) the count capped at 2, then `(Any, 1, 1)`.
    pub fn get_skill(&self, tag: Tag, unit_member: u8) -> Result<&SkillPrepare, DetailError> {
        if let Some(fixed) = self.fixed.as_ref() {
            return Ok(fixed);
        }
        if let Some(best) = self
            .inner
            .get_exact(&DetailKey::new(tag, unit_member, MIXED))
        {
            return Ok(best);
        }
        if tag == Tag::Diff {
            if let Some(best) = self
                .inner
                .get_exact(&DetailKey::new(Tag::Diff, unit_member.min(2), MIXED))
            {
                return Ok(best);
            }
        }
        self.inner
            .get_exact(&DetailKey::FALLBACK)
            .ok_or(DetailError::CaseNotFound {
                tag,
                unit_member,
                attr_member: MIXED,
            })
    }

    pub fn as_map(&self) -> &ConditionalValueMap<SkillPrepare> {
        &self.inner
    }

    pub fn min(&self) -> f64 {
        self.inner.min()
    }

    pub fn max(&self) -> f64 {
        self.inner.max()
    }

    pub fn is_certainly_less_than(&self, other: &SkillMap) -> bool {
        self.inner.is_certainly_less_than(&other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_skill_answers_every_query() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(SkillPrepare::fixed(100.0, 0.0));
        assert_eq!(
            map.get_skill(Tag::Unit(Unit::Idol), 5).unwrap().score_up_fixed,
            100.0
        );
        assert_eq!(map.get_skill(Tag::Diff, 2).unwrap().score_up_fixed, 100.0);
    }

    #[test]
    fn same_unit_skill_scales_with_members() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(SkillPrepare::fixed(80.0, 0.0));
        for i in 1..=5u8 {
            map.set_same_unit_skill(
                Unit::Piapro,
                i,
                SkillPrepare::fixed(80.0 + f64::from(i) * 10.0, 0.0),
            );
        }
        assert_eq!(
            map.get_skill(Tag::Unit(Unit::Piapro), 3).unwrap().score_up_fixed,
            110.0
        );
        // Teams the card has no entry for fall back to the fixed value.
        assert_eq!(
            map.get_skill(Tag::Unit(Unit::Street), 5).unwrap().score_up_fixed,
            80.0
        );
        assert_eq!(map.min(), 80.0);
        assert_eq!(map.max(), 130.0);
    }

    #[test]
    fn diff_bucket_caps_at_two() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(SkillPrepare::fixed(60.0, 0.0));
        map.set_diff_unit_skill(1, SkillPrepare::fixed(90.0, 0.0));
        map.set_diff_unit_skill(2, SkillPrepare::fixed(120.0, 0.0));
        assert_eq!(map.get_skill(Tag::Diff, 4).unwrap().score_up_fixed, 120.0);
        assert_eq!(map.get_skill(Tag::Diff, 1).unwrap().score_up_fixed, 90.0);
        assert_eq!(map.get_skill(Tag::Diff, 0).unwrap().score_up_fixed, 60.0);
    }

    #[test]
    fn reference_skill_widens_bounds_downward() {
        let mut map = SkillMap::new();
        map.set_fixed_skill(SkillPrepare::fixed(100.0, 0.0));
        map.set_reference_skill(SkillPrepare {
            score_up_fixed: 100.0,
            score_up_to_reference: 150.0,
            score_up_reference: Some(ReferenceSkill {
                base: 60.0,
                rate: 90.0,
                max: 150.0,
            }),
            life_recovery: 0.0,
        })
        .unwrap();
        assert_eq!(map.min(), 69.0);
        assert_eq!(map.max(), 150.0);
        let skill = map.get_skill(Tag::Unit(Unit::Idol), 1).unwrap();
        assert!(skill.score_up_reference.is_some());
    }

    #[test]
    fn reference_skill_without_reference_is_rejected() {
        let mut map = SkillMap::new();
        let err = map
            .set_reference_skill(SkillPrepare::fixed(100.0, 0.0))
            .unwrap_err();
        assert_eq!(err, DetailError::MissingReference);
    }

    #[test]
    fn empty_map_reports_case_not_found() {
        let map = SkillMap::new();
        assert!(matches!(
            map.get_skill(Tag::Any, 1),
            Err(DetailError::CaseNotFound { .. })
        ));
    }
}
