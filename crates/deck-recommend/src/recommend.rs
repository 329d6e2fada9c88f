use crate::ledger::RecommendDeck;
use crate::priority::{CardPriority, FeasibilityMode, filter_card_priority, tiers};
use crate::scoring::ScoreFunction;
use crate::search::{DeckSearch, SearchParams};
use deck_core::calc::{DeckBonusRules, EventType, SupportDeck};
use deck_core::{CardDetail, DetailError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

pub const MAX_MEMBER: usize = 5;
/// Cards in a world-link support deck.
pub const WORLD_BLOOM_SUPPORT_DECK: usize = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    /// A detail lookup failed; the precomputed cards are inconsistent.
    #[error(transparent)]
    Detail(#[from] DetailError),
    #[error("cannot assemble a deck of {member} from {pool_size} cards")]
    Infeasible { pool_size: usize, member: usize },
    #[error("invalid config field `{field}`: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub member: usize,
    pub limit: usize,
    pub allow_repeats: bool,
    pub fixed_leader: Option<u32>,
    pub tiers: Vec<CardPriority>,
    pub feasibility: FeasibilityMode,
    /// Flat power added to every deck.
    pub honor_bonus: f64,
    pub bonus_rules: DeckBonusRules,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            member: MAX_MEMBER,
            limit: 1,
            allow_repeats: false,
            fixed_leader: None,
            tiers: Vec::new(),
            feasibility: FeasibilityMode::MemberCount,
            honor_bonus: 0.0,
            bonus_rules: DeckBonusRules::default(),
        }
    }
}

impl RecommendConfig {
    /// Single-character lives: the same character may fill every slot.
    pub fn challenge_live() -> Self {
        Self {
            allow_repeats: true,
            tiers: tiers::CHALLENGE_LIVE.to_vec(),
            feasibility: FeasibilityMode::MemberCount,
            ..Self::default()
        }
    }

    pub fn event(event_type: EventType) -> Self {
        let (tiers, feasibility, support_deck_size) = match event_type {
            EventType::Marathon | EventType::CheerfulCarnival => {
                (tiers::MARATHON_CHEERFUL, FeasibilityMode::Synergy, None)
            }
            EventType::WorldBloom => (
                tiers::WORLD_BLOOM,
                FeasibilityMode::DistinctAttributes,
                Some(WORLD_BLOOM_SUPPORT_DECK),
            ),
        };
        Self {
            tiers: tiers.to_vec(),
            feasibility,
            bonus_rules: DeckBonusRules {
                support_deck_size,
                ..DeckBonusRules::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RecommendError> {
        if !(1..=MAX_MEMBER).contains(&self.member) {
            return Err(RecommendError::InvalidConfig {
                field: "member",
                message: format!("must be between 1 and {MAX_MEMBER}, got {}", self.member),
            });
        }
        if self.limit == 0 {
            return Err(RecommendError::InvalidConfig {
                field: "limit",
                message: "must be at least 1".into(),
            });
        }
        if !self.honor_bonus.is_finite() {
            return Err(RecommendError::InvalidConfig {
                field: "honor_bonus",
                message: "must be a finite number".into(),
            });
        }
        if self
            .bonus_rules
            .different_attribute_bonus
            .is_some_and(|table| table.iter().any(|bonus| !bonus.is_finite()))
        {
            return Err(RecommendError::InvalidConfig {
                field: "different_attribute_bonus",
                message: "must be finite numbers".into(),
            });
        }
        if self.tiers.windows(2).any(|w| w[0].priority > w[1].priority) {
            return Err(RecommendError::InvalidConfig {
                field: "tiers",
                message: "priorities must be non-decreasing".into(),
            });
        }
        Ok(())
    }
}

/// Best decks for `pool` under `config`, best first, at most `config.limit`.
///
/// Runs the tiered filter and the search, widening the candidate set until
/// enough decks are found or the whole pool has been searched.
pub fn recommend<S>(
    pool: &[CardDetail],
    config: &RecommendConfig,
    score: &S,
) -> Result<Vec<RecommendDeck>, RecommendError>
where
    S: ScoreFunction + ?Sized,
{
    config.validate()?;
    let member = if config.allow_repeats {
        config.member.min(pool.len())
    } else {
        config.member
    };
    let infeasible = RecommendError::Infeasible {
        pool_size: pool.len(),
        member: config.member,
    };
    if member == 0 {
        return Err(infeasible);
    }
    let params = SearchParams {
        member,
        limit: config.limit,
        allow_repeats: config.allow_repeats,
        fixed_leader: config.fixed_leader,
        feasibility: config.feasibility,
        honor_bonus: config.honor_bonus,
        bonus_rules: config.bonus_rules,
    };
    let support = config
        .bonus_rules
        .support_deck_size
        .map(|size| SupportDeck::new(pool, size));

    let mut previous_len = 0;
    let mut round = 0u32;
    loop {
        round += 1;
        let candidates = filter_card_priority(
            pool,
            previous_len,
            &config.tiers,
            config.feasibility,
            member,
            config.fixed_leader,
        );
        let whole_pool = candidates.len() >= pool.len();
        let mut search = DeckSearch::new(&candidates, params, score);
        if let Some(support) = &support {
            search = search.with_support(support);
        }
        let (decks, stats) = search.run()?;
        event!(
            target: "deck_recommend::driver",
            Level::DEBUG,
            round,
            candidates = candidates.len(),
            whole_pool,
            found = decks.len(),
            nodes = stats.nodes,
        );

        if decks.len() >= config.limit || (whole_pool && !decks.is_empty()) {
            log_outcome(round, pool.len(), &decks);
            return Ok(decks);
        }
        if whole_pool {
            event!(
                target: "deck_recommend::driver",
                Level::WARN,
                round,
                pool_size = pool.len(),
                member,
                "no deck can be assembled"
            );
            return Err(infeasible);
        }
        previous_len = candidates.len();
    }
}

fn log_outcome(rounds: u32, pool_size: usize, decks: &[RecommendDeck]) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let best = decks.first();
    event!(
        target: "deck_recommend::driver",
        Level::INFO,
        rounds,
        pool_size,
        decks = decks.len(),
        best_score = best.map(|deck| deck.score).unwrap_or(0.0),
        best_cards = ?best.map(RecommendDeck::card_ids).unwrap_or_default(),
    );
}
