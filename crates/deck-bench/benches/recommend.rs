use criterion::{Criterion, criterion_group, criterion_main};
use deck_core::calc::{CardCalculator, EventType, LiveType, MusicMeta};
use deck_core::synthetic::SyntheticPool;
use deck_recommend::{MusicScore, RecommendConfig, recommend};

fn music() -> MusicMeta {
    MusicMeta {
        music_id: 74,
        difficulty: "expert".into(),
        music_time: 123.4,
        event_rate: 100.0,
        base_score: 1.0,
        base_score_auto: 0.75,
        skill_score_solo: vec![0.125, 0.125, 0.125, 0.125, 0.125, 0.25],
        skill_score_auto: vec![0.0625, 0.0625, 0.0625, 0.0625, 0.0625, 0.125],
        skill_score_multi: vec![0.125, 0.125, 0.125, 0.125, 0.125, 0.25],
        fever_score: 0.5,
        fever_end_time: 95.0,
        tap_count: 880,
    }
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    let music = music();
    let score = MusicScore::event_point(&music, LiveType::Multi);

    for (cards, event_type) in [
        (60, EventType::Marathon),
        (120, EventType::Marathon),
        (120, EventType::WorldBloom),
    ] {
        let pool = SyntheticPool {
            seed: 20251017,
            cards,
            characters: 26,
        };
        let details = match CardCalculator::new(&pool.user_context())
            .batch_card_details(&pool.generate())
        {
            Ok(details) => details,
            Err(err) => panic!("synthetic pool failed: {err}"),
        };
        let config = RecommendConfig {
            limit: 10,
            ..RecommendConfig::event(event_type)
        };
        group.bench_function(format!("{event_type:?}_{cards}_cards"), |b| {
            b.iter(|| {
                let _ = recommend(&details, &config, &score);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recommend);
criterion_main!(benches);
