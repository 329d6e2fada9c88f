use crate::model::deck::{DeckCardSkill, DeckDetail};
use serde::{Deserialize, Serialize};

/// Activations per live: five members, then the leader once more.
pub const SKILL_ACTIVATIONS: usize = 6;

const MULTI_OTHER_MEMBER_SHARE: f64 = 0.2;
const MULTI_ACTIVE_BONUS_RATE: f64 = 5.0 * 0.015;
const ROOM_SIZE: f64 = 5.0;
const BASE_LIFE: f64 = 1_000.0;
const MAX_LIFE: f64 = 2_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveType {
    Solo,
    Multi,
    Auto,
    /// Scored like a solo live.
    Challenge,
}

/// Per-chart scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicMeta {
    pub music_id: u32,
    pub difficulty: String,
    #[serde(default)]
    pub music_time: f64,
    pub event_rate: f64,
    pub base_score: f64,
    pub base_score_auto: f64,
    pub skill_score_solo: Vec<f64>,
    pub skill_score_auto: Vec<f64>,
    pub skill_score_multi: Vec<f64>,
    #[serde(default)]
    pub fever_score: f64,
    #[serde(default)]
    pub fever_end_time: f64,
    #[serde(default)]
    pub tap_count: u32,
}

impl MusicMeta {
    fn base_rate(&self, live_type: LiveType) -> f64 {
        match live_type {
            LiveType::Solo | LiveType::Challenge => self.base_score,
            LiveType::Multi => self.base_score + self.fever_score,
            LiveType::Auto => self.base_score_auto,
        }
    }

    fn skill_rates(&self, live_type: LiveType) -> &[f64] {
        match live_type {
            LiveType::Solo | LiveType::Challenge => &self.skill_score_solo,
            LiveType::Multi => &self.skill_score_multi,
            LiveType::Auto => &self.skill_score_auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveDetail {
    pub score: f64,
    pub time: f64,
    pub life: f64,
    pub tap: u32,
}

pub struct LiveCalculator;

impl LiveCalculator {
    /// Expected score of `deck` on `music`, activating skills in the best
    /// possible order.
    pub fn live_detail(deck: &DeckDetail, music: &MusicMeta, live_type: LiveType) -> LiveDetail {
        let skills = match live_type {
            LiveType::Multi => vec![multi_live_skill(deck); SKILL_ACTIVATIONS],
            _ => best_order_skills(deck),
        };
        let mut rates = music.skill_rates(live_type).to_vec();
        if live_type != LiveType::Multi {
            // Strongest effect on the strongest window.
            rates.sort_by(|a, b| b.total_cmp(a));
        }
        let rate = music.base_rate(live_type)
            + skills
                .iter()
                .zip(rates.iter())
                .map(|(skill, rate)| skill.score_up * rate / 100.0)
                .sum::<f64>();
        let life: f64 = skills.iter().map(|skill| skill.life_recovery).sum();
        let power = deck.power.total;
        let active_bonus = if live_type == LiveType::Multi {
            MULTI_ACTIVE_BONUS_RATE * ROOM_SIZE * power
        } else {
            0.0
        };
        LiveDetail {
            score: (rate * power * 4.0 + active_bonus).floor(),
            time: music.music_time,
            life: (BASE_LIFE + life).min(MAX_LIFE),
            tap: music.tap_count,
        }
    }

    pub fn live_score(deck: &DeckDetail, music: &MusicMeta, live_type: LiveType) -> f64 {
        Self::live_detail(deck, music, live_type).score
    }
}

/// Member skills plus the leader's repeat, strongest first.
fn best_order_skills(deck: &DeckDetail) -> Vec<DeckCardSkill> {
    let mut skills: Vec<DeckCardSkill> = deck.cards.iter().map(|card| card.skill).collect();
    if let Some(leader) = deck.cards.first() {
        skills.push(leader.skill);
    }
    skills.sort_by(|a, b| b.score_up.total_cmp(&a.score_up));
    skills
}

/// In a room the leader always fires and the others only a fifth of the time.
fn multi_live_skill(deck: &DeckDetail) -> DeckCardSkill {
    let score_up = deck
        .cards
        .iter()
        .enumerate()
        .map(|(slot, card)| {
            if slot == 0 {
                card.skill.score_up
            } else {
                card.skill.score_up * MULTI_OTHER_MEMBER_SHARE
            }
        })
        .sum();
    DeckCardSkill {
        score_up,
        life_recovery: deck
            .leader()
            .map(|leader| leader.skill.life_recovery)
            .unwrap_or(0.0),
    }
}
