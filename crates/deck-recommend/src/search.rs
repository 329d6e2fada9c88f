//! Branch-and-bound deck search.
//!
//! The partial deck is a stack: every branch pushes one card, recurses and
//! pops it again before the next sibling is tried. Candidates are filtered by
//! a fixed sequence of rules (see [`PruneRule`]); complete decks are scored,
//! the best skill is moved into the leader slot and the result is merged into
//! the ledger of the current level.

use crate::dominance::is_certainly_less_than;
use crate::ledger::{RecommendDeck, merge};
use crate::priority::FeasibilityMode;
use crate::scoring::ScoreFunction;
use deck_core::calc::{DeckBonusRules, DeckCalculator, SupportDeck};
use deck_core::{CardDetail, DetailError};
use serde::Serialize;
use tracing::{Level, event};

/// Why a candidate was skipped, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneRule {
    AlreadyInDeck,
    CharacterUsed,
    FixedLeader,
    /// The leader's skill is provably worse than the candidate's.
    LeaderSkill,
    /// Shares neither attribute nor team with the leader. A performance
    /// heuristic tied to how bonuses are structured, not a proven bound.
    NoSynergy,
    Feasibility,
    /// Interchangeable non-leader slots are filled in ascending id order.
    CanonicalOrder,
    /// Provably worse than the card last accepted on this level.
    Dominated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub leader_swaps: u64,
    pub pruned_in_deck: u64,
    pub pruned_character: u64,
    pub pruned_fixed_leader: u64,
    pub pruned_leader_skill: u64,
    pub pruned_synergy: u64,
    pub pruned_feasibility: u64,
    pub pruned_order: u64,
    pub pruned_dominated: u64,
}

impl SearchStats {
    fn record(&mut self, rule: PruneRule) {
        let counter = match rule {
            PruneRule::AlreadyInDeck => &mut self.pruned_in_deck,
            PruneRule::CharacterUsed => &mut self.pruned_character,
            PruneRule::FixedLeader => &mut self.pruned_fixed_leader,
            PruneRule::LeaderSkill => &mut self.pruned_leader_skill,
            PruneRule::NoSynergy => &mut self.pruned_synergy,
            PruneRule::Feasibility => &mut self.pruned_feasibility,
            PruneRule::CanonicalOrder => &mut self.pruned_order,
            PruneRule::Dominated => &mut self.pruned_dominated,
        };
        *counter += 1;
    }

    pub fn pruned(&self) -> u64 {
        self.pruned_in_deck
            + self.pruned_character
            + self.pruned_fixed_leader
            + self.pruned_leader_skill
            + self.pruned_synergy
            + self.pruned_feasibility
            + self.pruned_order
            + self.pruned_dominated
    }
}

/// Shape of the decks one search assembles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub member: usize,
    pub limit: usize,
    pub allow_repeats: bool,
    pub fixed_leader: Option<u32>,
    pub feasibility: FeasibilityMode,
    pub honor_bonus: f64,
    pub bonus_rules: DeckBonusRules,
}

pub struct DeckSearch<'a, S: ?Sized> {
    candidates: &'a [&'a CardDetail],
    params: SearchParams,
    calculator: DeckCalculator,
    support: Option<&'a SupportDeck<'a>>,
    score: &'a S,
    deck: Vec<&'a CardDetail>,
    characters: Vec<u32>,
    stats: SearchStats,
}

impl<'a, S> DeckSearch<'a, S>
where
    S: ScoreFunction + ?Sized,
{
    pub fn new(candidates: &'a [&'a CardDetail], params: SearchParams, score: &'a S) -> Self {
        Self {
            candidates,
            params,
            calculator: DeckCalculator::new(params.honor_bonus).with_rules(params.bonus_rules),
            support: None,
            score,
            deck: Vec::with_capacity(params.member),
            characters: Vec::with_capacity(params.member),
            stats: SearchStats::default(),
        }
    }

    /// Scores decks together with the support deck they leave behind.
    pub fn with_support(mut self, support: &'a SupportDeck<'a>) -> Self {
        self.support = Some(support);
        self
    }

    /// Best decks found, best first, at most `limit` of them.
    pub fn run(mut self) -> Result<(Vec<RecommendDeck>, SearchStats), DetailError> {
        let decks = if self.params.member == 0 || self.params.limit == 0 {
            Vec::new()
        } else {
            self.descend()?
        };
        log_search(&self.params, self.candidates.len(), decks.len(), &self.stats);
        Ok((decks, self.stats))
    }

    fn descend(&mut self) -> Result<Vec<RecommendDeck>, DetailError> {
        self.stats.nodes += 1;
        if self.deck.len() == self.params.member {
            return Ok(vec![self.leaf()?]);
        }
        let mut results = Vec::new();
        let mut last_accepted: Option<&'a CardDetail> = None;
        let candidates = self.candidates;
        for &card in candidates {
            if let Some(rule) = self.prune(card, last_accepted) {
                self.stats.record(rule);
                continue;
            }
            last_accepted = Some(card);
            let branch = self.with_card(card)?;
            results = merge(results, branch, self.params.limit);
        }
        Ok(results)
    }

    /// Explores the subtree below `card` and leaves the partial deck as it was,
    /// also when the subtree fails.
    fn with_card(&mut self, card: &'a CardDetail) -> Result<Vec<RecommendDeck>, DetailError> {
        self.deck.push(card);
        self.characters.push(card.character_id);
        let result = self.descend();
        self.characters.pop();
        self.deck.pop();
        result
    }

    fn prune(&self, card: &CardDetail, last_accepted: Option<&CardDetail>) -> Option<PruneRule> {
        if self.deck.iter().any(|placed| placed.card_id == card.card_id) {
            return Some(PruneRule::AlreadyInDeck);
        }
        if !self.params.allow_repeats && self.characters.contains(&card.character_id) {
            return Some(PruneRule::CharacterUsed);
        }
        match self.deck.first() {
            None => {
                if self
                    .params
                    .fixed_leader
                    .is_some_and(|leader| leader != card.character_id)
                {
                    return Some(PruneRule::FixedLeader);
                }
            }
            Some(leader) => {
                if self.params.fixed_leader.is_none()
                    && leader.skill.is_certainly_less_than(&card.skill)
                {
                    return Some(PruneRule::LeaderSkill);
                }
                if card.attr != leader.attr && !card.shares_unit_with(leader) {
                    return Some(PruneRule::NoSynergy);
                }
            }
        }
        if !self.params.feasibility.can_extend(&self.deck, card) {
            return Some(PruneRule::Feasibility);
        }
        if self.deck.len() >= 2 {
            if let Some(previous) = self.deck.last() {
                if card.card_id < previous.card_id && !self.certainly_worse(card, previous) {
                    return Some(PruneRule::CanonicalOrder);
                }
            }
        }
        if last_accepted.is_some_and(|last| self.certainly_worse(card, last)) {
            return Some(PruneRule::Dominated);
        }
        None
    }

    /// Dominance, plus a card taken into the deck must not be worth more in
    /// the support deck than the card it replaces.
    fn certainly_worse(&self, card: &CardDetail, other: &CardDetail) -> bool {
        is_certainly_less_than(card, other)
            && (self.support.is_none() || card.support_bonus >= other.support_bonus)
    }

    fn leaf(&mut self) -> Result<RecommendDeck, DetailError> {
        self.stats.leaves += 1;
        let detail = self
            .calculator
            .deck_detail_with_support(&self.deck, self.support)?;
        let best = detail.best_skill_slot();
        if best != 0 && self.may_lead(self.deck[best]) {
            self.stats.leader_swaps += 1;
            let mut cards = self.deck.clone();
            cards.swap(0, best);
            let detail = self.calculator.deck_detail_with_support(&cards, self.support)?;
            return Ok(RecommendDeck {
                score: self.score.score(&detail),
                detail,
            });
        }
        Ok(RecommendDeck {
            score: self.score.score(&detail),
            detail,
        })
    }

    fn may_lead(&self, card: &CardDetail) -> bool {
        self.params
            .fixed_leader
            .is_none_or(|leader| leader == card.character_id)
    }
}

fn log_search(params: &SearchParams, candidates: usize, found: usize, stats: &SearchStats) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "deck_recommend::search",
        Level::DEBUG,
        candidates,
        member = params.member,
        limit = params.limit,
        found,
        nodes = stats.nodes,
        leaves = stats.leaves,
        leader_swaps = stats.leader_swaps,
        pruned = stats.pruned(),
        pruned_leader_skill = stats.pruned_leader_skill,
        pruned_synergy = stats.pruned_synergy,
        pruned_order = stats.pruned_order,
        pruned_dominated = stats.pruned_dominated,
    );
}
