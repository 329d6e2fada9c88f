use std::path::PathBuf;

use clap::Parser;

use deck_bench::config::{ResolvedOutputs, RunConfig};
use deck_bench::logging::init_logging;
use deck_bench::runner::RecommendRunner;

/// Recommendation harness for card decks.
#[derive(Debug, Parser)]
#[command(
    name = "deck-bench",
    author,
    version,
    about = "Deterministic deck recommendation harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/run.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of decks to return.
    #[arg(long, value_name = "COUNT")]
    limit: Option<usize>,

    /// Override the number of cards per deck.
    #[arg(long, value_name = "COUNT")]
    member: Option<usize>,

    /// Override the seed of a synthetic pool.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no recommendation is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = RunConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(limit) = cli.limit {
        config.recommend.limit = limit;
    }

    if let Some(member) = cli.member {
        config.recommend.member = Some(member);
    }

    if let Some(seed) = cli.seed {
        if !config.pool.reseed(seed) {
            eprintln!("WARN: --seed ignored for a pool loaded from file");
        }
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    println!(
        "Loaded configuration '{run_id}' ({:?}, limit {})",
        config.recommend.mode, config.recommend.limit
    );

    if cli.validate_only {
        println!("Validation-only mode: recommendation skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = RecommendRunner::new(config, outputs);
    let summary = runner.run()?;
    println!(
        "Recommendation complete for '{run_id}': {} decks from {} cards in {} ms → {}",
        summary.rows_written,
        summary.pool_size,
        summary.elapsed.as_millis(),
        summary.jsonl_path.display()
    );
    if let Some(best) = summary.best_score {
        println!("Best score: {best}");
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
