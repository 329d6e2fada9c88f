use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use deck_core::calc::{EventCalculator, LiveCalculator, LiveType};
use deck_recommend::{RecommendDeck, RecommendError, RecommendMode, recommend_for_mode};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, RunConfig};
use crate::pool::{PoolError, PoolLoader};

/// Runs one configured recommendation and streams the decks to JSONL.
pub struct RecommendRunner {
    config: RunConfig,
    outputs: ResolvedOutputs,
    loader: PoolLoader,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub pool_size: usize,
    pub rows_written: usize,
    pub best_score: Option<f64>,
    pub elapsed: Duration,
    pub jsonl_path: PathBuf,
}

#[derive(Debug, Serialize)]
struct DeckRow<'a> {
    run_id: &'a str,
    rank: usize,
    score: f64,
    leader_card_id: u32,
    card_ids: Vec<u32>,
    power: f64,
    event_bonus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    support_deck_bonus: Option<f64>,
    live_score: f64,
    life: f64,
    event_point: Option<f64>,
}

impl RecommendRunner {
    pub fn new(config: RunConfig, outputs: ResolvedOutputs) -> Self {
        Self::with_loader(config, outputs, PoolLoader::default())
    }

    /// Shares already computed pools with other runners.
    pub fn with_loader(config: RunConfig, outputs: ResolvedOutputs, loader: PoolLoader) -> Self {
        Self {
            config,
            outputs,
            loader,
        }
    }

    /// Live type the decks are evaluated under. Challenge lives have their own.
    fn live_type(&self) -> LiveType {
        match self.config.recommend.mode {
            RecommendMode::ChallengeLive { .. } => LiveType::Challenge,
            RecommendMode::Event { .. } => self.config.recommend.live_type,
        }
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let started = Instant::now();
        let pool = self.loader.load(&self.config.pool)?;
        let live_type = self.live_type();
        let decks = recommend_for_mode(
            &pool,
            self.config.recommend.mode,
            &self.config.music,
            live_type,
            &self.config.recommend_config(),
        )?;

        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let rows_written = write_deck_rows(&mut writer, &self.config, live_type, &decks)?;
        writer.flush()?;

        let elapsed = started.elapsed();
        event!(
            target: "deck_bench::runner",
            Level::INFO,
            run_id = %self.config.run_id,
            pool_size = pool.len(),
            rows_written,
            elapsed_ms = elapsed.as_millis() as u64,
        );

        Ok(RunSummary {
            pool_size: pool.len(),
            rows_written,
            best_score: decks.first().map(|deck| deck.score),
            elapsed,
            jsonl_path: self.outputs.jsonl.clone(),
        })
    }
}

fn ensure_parent(dir: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = dir {
        if dir.as_os_str().is_empty() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_deck_rows(
    writer: &mut BufWriter<File>,
    config: &RunConfig,
    live_type: LiveType,
    decks: &[RecommendDeck],
) -> Result<usize, RunnerError> {
    let music = &config.music;
    let mut rows_written = 0usize;
    for (rank, deck) in decks.iter().enumerate() {
        let live = LiveCalculator::live_detail(&deck.detail, music, live_type);
        let event_point = match config.recommend.mode {
            RecommendMode::ChallengeLive { .. } => None,
            RecommendMode::Event { .. } => Some(EventCalculator::event_point(
                live.score,
                &deck.detail,
                music,
                live_type,
            )),
        };
        let row = DeckRow {
            run_id: &config.run_id,
            rank: rank + 1,
            score: deck.score,
            leader_card_id: deck.leader_card_id(),
            card_ids: deck.card_ids(),
            power: deck.total_power(),
            event_bonus: deck.detail.event_bonus,
            support_deck_bonus: deck.detail.support_deck_bonus,
            live_score: live.score,
            life: live.life,
            event_point,
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Pool(#[from] PoolError),
    #[error("recommendation failed: {0}")]
    Recommend(#[from] RecommendError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize deck row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
