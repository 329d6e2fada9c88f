use deck_core::calc::{
    CardCalculator, CardSpec, EventType, LiveType, MusicMeta, SkillSpec, UserContext,
};
use deck_core::model::attr::Attr;
use deck_core::model::rarity::CardRarity;
use deck_core::synthetic::SyntheticPool;
use deck_core::{CardDetail, DeckDetail};
use deck_recommend::ledger::compare;
use deck_recommend::{
    FeasibilityMode, MusicScore, RecommendConfig, RecommendError, filter_card_priority, recommend,
    recommend_challenge_live,
};
use std::cmp::Ordering;

fn card(card_id: u32, character_id: u32, value: f64, score_up: f64) -> CardDetail {
    let spec = CardSpec {
        card_id,
        character_id,
        rarity: CardRarity::Four,
        attr: Attr::Mysterious,
        master_rank: 0,
        skill_level: 1,
        level: 60,
        support_unit: None,
        power: [value, 0.0, 0.0],
        skills: vec![SkillSpec {
            score_up,
            ..SkillSpec::default()
        }],
        event_bonus: None,
    };
    CardCalculator::new(&UserContext::default())
        .card_detail(&spec)
        .unwrap()
        .unwrap()
}

fn card_of(card_id: u32, character_id: u32, attr: Attr, value: f64) -> CardDetail {
    let mut card = card(card_id, character_id, value, 100.0);
    card.attr = attr;
    card
}

fn by_power(deck: &DeckDetail) -> f64 {
    deck.power.total
}

fn music() -> MusicMeta {
    MusicMeta {
        music_id: 1,
        difficulty: "expert".into(),
        music_time: 110.0,
        event_rate: 100.0,
        base_score: 1.0,
        base_score_auto: 0.75,
        skill_score_solo: vec![0.125, 0.125, 0.125, 0.125, 0.125, 0.25],
        skill_score_auto: vec![0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.125],
        skill_score_multi: vec![0.125, 0.125, 0.125, 0.125, 0.125, 0.25],
        fever_score: 0.5,
        fever_end_time: 80.0,
        tap_count: 700,
    }
}

fn synthetic(seed: u64, cards: usize) -> Vec<CardDetail> {
    let pool = SyntheticPool {
        seed,
        cards,
        characters: 26,
    };
    let context = pool.user_context();
    CardCalculator::new(&context)
        .batch_card_details(&pool.generate())
        .unwrap()
}

#[test]
fn picks_best_five_of_six_with_best_card_leading() {
    let pool: Vec<CardDetail> = (1..=6)
        .map(|i| card(i, i, 1_000.0 * f64::from(i), 50.0 + 10.0 * f64::from(i)))
        .collect();
    let decks = recommend(&pool, &RecommendConfig::default(), &by_power).unwrap();
    assert_eq!(decks.len(), 1);
    let best = &decks[0];
    assert_eq!(best.score, 20_000.0);
    assert_eq!(best.leader_card_id(), 6);
    let mut ids = best.card_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3, 4, 5, 6]);
}

#[test]
fn repeats_mode_combines_cards_of_one_character() {
    let pool = vec![
        card(1, 7, 1_000.0, 100.0),
        card(2, 7, 2_000.0, 100.0),
        card(3, 7, 3_000.0, 100.0),
    ];
    let config = RecommendConfig {
        member: 2,
        allow_repeats: true,
        ..RecommendConfig::default()
    };
    let decks = recommend(&pool, &config, &by_power).unwrap();
    let mut ids = decks[0].card_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(decks[0].score, 5_000.0);
}

#[test]
fn repeats_mode_caps_member_at_pool_size() {
    let pool = vec![card(1, 7, 1_000.0, 100.0), card(2, 7, 2_000.0, 100.0)];
    let config = RecommendConfig {
        allow_repeats: true,
        ..RecommendConfig::default()
    };
    let decks = recommend(&pool, &config, &by_power).unwrap();
    assert_eq!(decks[0].card_ids().len(), 2);
}

#[test]
fn dominant_card_leads_top_result() {
    let pool = vec![
        card(1, 1, 2_000.0, 90.0),
        card(2, 2, 2_500.0, 60.0),
        card(3, 3, 1_500.0, 80.0),
        card(4, 4, 1_000.0, 70.0),
        card(10, 5, 5_000.0, 150.0),
    ];
    let config = RecommendConfig {
        member: 3,
        ..RecommendConfig::default()
    };
    let decks = recommend(&pool, &config, &by_power).unwrap();
    assert_eq!(decks[0].leader_card_id(), 10);
    assert_eq!(decks[0].score, 9_500.0);
}

#[test]
fn not_enough_characters_is_infeasible() {
    let pool = vec![
        card(1, 1, 1_000.0, 100.0),
        card(2, 1, 2_000.0, 100.0),
        card(3, 2, 3_000.0, 100.0),
    ];
    let config = RecommendConfig {
        member: 3,
        ..RecommendConfig::default()
    };
    let err = recommend(&pool, &config, &by_power).unwrap_err();
    assert_eq!(
        err,
        RecommendError::Infeasible {
            pool_size: 3,
            member: 3
        }
    );
}

#[test]
fn results_are_ordered_unique_and_led_by_best_skill() {
    let pool = synthetic(5, 40);
    let music = music();
    let score = MusicScore::event_point(&music, LiveType::Multi);
    let config = RecommendConfig {
        limit: 8,
        ..RecommendConfig::event(EventType::Marathon)
    };
    let decks = recommend(&pool, &config, &score).unwrap();
    assert!(!decks.is_empty());
    assert!(decks.len() <= 8);
    for pair in decks.windows(2) {
        assert_eq!(compare(&pair[0], &pair[1]), Ordering::Less);
    }
    for deck in &decks {
        let leader = deck.detail.cards[0].skill.score_up;
        assert!(deck.detail.cards.iter().all(|card| card.skill.score_up <= leader));
        let mut characters: Vec<u32> = deck.detail.cards.iter().map(|c| c.character_id).collect();
        characters.sort_unstable();
        characters.dedup();
        assert_eq!(characters.len(), deck.detail.cards.len());
    }
}

#[test]
fn same_input_same_output() {
    let pool = synthetic(9, 24);
    let music = music();
    let score = MusicScore::live_score(&music, LiveType::Solo);
    let config = RecommendConfig {
        limit: 3,
        ..RecommendConfig::event(EventType::WorldBloom)
    };
    let first = recommend(&pool, &config, &score);
    let second = recommend(&pool, &config, &score);
    assert_eq!(first, second);
}

#[test]
fn widening_only_grows_the_candidate_set() {
    let pool = synthetic(21, 40);
    let config = RecommendConfig::event(EventType::Marathon);
    let mut previous: Vec<u32> = Vec::new();
    loop {
        let candidates = filter_card_priority(
            &pool,
            previous.len(),
            &config.tiers,
            config.feasibility,
            config.member,
            None,
        );
        let ids: Vec<u32> = candidates.iter().map(|card| card.card_id).collect();
        assert!(ids.len() > previous.len() || ids.len() == pool.len());
        assert!(previous.iter().all(|id| ids.contains(id)));
        if ids.len() == pool.len() {
            break;
        }
        previous = ids;
    }
}

#[test]
fn challenge_live_uses_one_character_only() {
    let pool = synthetic(13, 60);
    let character_id = pool[0].character_id;
    let config = RecommendConfig {
        limit: 2,
        ..RecommendConfig::challenge_live()
    };
    let decks = recommend_challenge_live(&pool, character_id, &music(), &config).unwrap();
    for deck in &decks {
        assert!(
            deck.detail
                .cards
                .iter()
                .all(|card| card.character_id == character_id)
        );
    }
}

#[test]
fn fixed_leader_character_always_leads() {
    let pool = synthetic(17, 30);
    let leader = pool[3].character_id;
    let music = music();
    let score = MusicScore::event_point(&music, LiveType::Multi);
    let config = RecommendConfig {
        fixed_leader: Some(leader),
        limit: 3,
        feasibility: FeasibilityMode::Synergy,
        ..RecommendConfig::event(EventType::CheerfulCarnival)
    };
    match recommend(&pool, &config, &score) {
        Ok(decks) => {
            for deck in &decks {
                assert_eq!(deck.detail.cards[0].character_id, leader);
            }
        }
        Err(err) => assert!(matches!(err, RecommendError::Infeasible { .. })),
    }
}

#[test]
fn world_link_deck_covers_every_attribute_and_counts_support() {
    // Virtual singers 21..=26 share one team.
    let mut pool = vec![
        card_of(1, 21, Attr::Cute, 3_000.0),
        card_of(2, 22, Attr::Cool, 2_000.0),
        card_of(3, 23, Attr::Pure, 2_500.0),
        card_of(4, 24, Attr::Happy, 1_000.0),
        card_of(5, 25, Attr::Mysterious, 1_500.0),
        card_of(6, 26, Attr::Cute, 3_500.0),
        card_of(7, 21, Attr::Cool, 4_000.0),
    ];
    for card in &mut pool {
        card.support_bonus = f64::from(card.card_id);
    }
    let config = RecommendConfig::event(EventType::WorldBloom);
    let decks = recommend(&pool, &config, &by_power).unwrap();
    let best = &decks[0];

    let mut ids = best.card_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![3, 4, 5, 6, 7]);
    let mut attrs: Vec<usize> = ids
        .iter()
        .filter_map(|id| pool.iter().find(|card| card.card_id == *id))
        .map(|card| card.attr.index())
        .collect();
    attrs.sort_unstable();
    attrs.dedup();
    assert_eq!(attrs.len(), 5);

    assert_eq!(best.score, 12_500.0);
    assert_eq!(best.detail.support_deck_bonus, Some(3.0));
    // Equal skills: the lowest card id leads.
    assert_eq!(best.leader_card_id(), 3);
}

#[test]
fn equal_skills_do_not_repeat_a_card_set() {
    let pool: Vec<CardDetail> = (1..=6)
        .map(|i| card(i, i, 1_000.0 * f64::from(i), 100.0))
        .collect();
    let config = RecommendConfig {
        limit: 10,
        ..RecommendConfig::default()
    };
    let decks = recommend(&pool, &config, &by_power).unwrap();
    assert_eq!(decks.len(), 6);
    let mut sets: Vec<Vec<u32>> = decks
        .iter()
        .map(|deck| {
            let mut ids = deck.card_ids();
            ids.sort_unstable();
            assert_eq!(deck.leader_card_id(), ids[0]);
            ids
        })
        .collect();
    sets.sort();
    sets.dedup();
    assert_eq!(sets.len(), 6);
}
