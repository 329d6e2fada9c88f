use deck_core::CardDetail;

/// True when `a` can never beat `b` in any slot of any deck: its best power
/// and skill are below `b`'s worst, and its event bonus cannot exceed `b`'s.
///
/// Overlapping ranges answer false, so callers only ever under-prune.
pub fn is_certainly_less_than(a: &CardDetail, b: &CardDetail) -> bool {
    if !a.power.is_certainly_less_than(&b.power) || !a.skill.is_certainly_less_than(&b.skill) {
        return false;
    }
    match (a.event_bonus, b.event_bonus) {
        (Some(a), Some(b)) => a.max() <= b.max(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::calc::{CardCalculator, CardSpec, SkillSpec, UserContext};
    use deck_core::detail::EventBonus;
    use deck_core::model::attr::Attr;
    use deck_core::model::rarity::CardRarity;
    use deck_core::model::unit::Unit;
    use proptest::prelude::*;

    fn card(card_id: u32, power: f64, score_up: f64, bonus: Option<f64>) -> CardDetail {
        let spec = CardSpec {
            card_id,
            character_id: card_id,
            rarity: CardRarity::Four,
            attr: Attr::Happy,
            master_rank: 0,
            skill_level: 1,
            level: 60,
            support_unit: None,
            power: [power, power, power],
            skills: vec![SkillSpec {
                score_up,
                ..SkillSpec::default()
            }],
            event_bonus: bonus.map(|fixed_bonus| EventBonus {
                fixed_bonus,
                ..EventBonus::default()
            }),
        };
        CardCalculator::new(&UserContext::default())
            .card_detail(&spec)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn weaker_in_every_dimension_is_dominated() {
        let weak = card(1, 1_000.0, 50.0, Some(10.0));
        let strong = card(2, 2_000.0, 100.0, Some(20.0));
        assert!(is_certainly_less_than(&weak, &strong));
        assert!(!is_certainly_less_than(&strong, &weak));
    }

    #[test]
    fn higher_event_bonus_blocks_dominance() {
        let weak = card(1, 1_000.0, 50.0, Some(30.0));
        let strong = card(2, 2_000.0, 100.0, Some(20.0));
        assert!(!is_certainly_less_than(&weak, &strong));
    }

    #[test]
    fn missing_bonus_on_either_side_is_ignored() {
        let weak = card(1, 1_000.0, 50.0, Some(30.0));
        let strong = card(2, 2_000.0, 100.0, None);
        assert!(is_certainly_less_than(&weak, &strong));
    }

    #[test]
    fn equal_cards_do_not_dominate_each_other() {
        let a = card(1, 1_000.0, 50.0, None);
        let b = card(2, 1_000.0, 50.0, None);
        assert!(!is_certainly_less_than(&a, &b));
    }

    proptest! {
        #[test]
        fn dominated_card_is_never_better_in_any_shape(
            pa in 100u32..5_000,
            pb in 100u32..5_000,
            sa in 0u32..150,
            sb in 0u32..150,
            unit_member in 1u8..=5,
            attr_member in 1u8..=5,
        ) {
            let a = card(1, f64::from(pa), f64::from(sa), None);
            let b = card(2, f64::from(pb), f64::from(sb), None);
            if is_certainly_less_than(&a, &b) {
                let unit = Unit::of_character(1);
                let other = Unit::of_character(2);
                let power_a = a.power.get_power(unit, unit_member, attr_member).unwrap().total;
                let power_b = b.power.get_power(other, unit_member, attr_member).unwrap().total;
                prop_assert!(power_a <= power_b);
                prop_assert!(a.skill.max() <= b.skill.min());
            }
        }
    }
}
