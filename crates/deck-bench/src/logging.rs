use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing::span::EnteredSpan;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Targets that log at the configured level; everything else only warns.
const DECK_TARGETS: [&str; 3] = ["deck_core", "deck_recommend", "deck_bench"];
const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Keeps the run span entered and the background writer alive. Dropping it
/// closes the span, then flushes the telemetry file.
pub struct LoggingGuard {
    _run: EnteredSpan,
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Filter directives for `level` on the deck crates.
pub fn telemetry_filter(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(DECK_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Installs a JSON subscriber writing `telemetry.jsonl` next to the results
/// file and enters a `run` span, so every event of the run carries `run_id`.
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs
        .jsonl
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            telemetry_dir.display()
        )
    })?;

    let telemetry_path = telemetry_dir.join(TELEMETRY_FILE);
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(telemetry_filter(level))
            .context("building the telemetry filter")?,
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed (tests run several harnesses).
    let _ = tracing::subscriber::set_global_default(subscriber);

    let run = tracing::info_span!(target: "deck_bench::run", "run", run_id = %run_id).entered();

    Ok(Some(LoggingGuard {
        _run: run,
        _guard: guard,
        telemetry_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn filter_raises_only_deck_targets() {
        assert_eq!(
            telemetry_filter(Level::DEBUG),
            "warn,deck_core=debug,deck_recommend=debug,deck_bench=debug"
        );
        assert!(EnvFilter::try_new(telemetry_filter(Level::TRACE)).is_ok());
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let dir = tempdir().expect("tempdir");
        let outputs = ResolvedOutputs {
            jsonl: dir.path().join("decks.jsonl"),
        };
        let guard = init_logging(&LoggingConfig::default(), &outputs, "quiet").expect("init");
        assert!(guard.is_none());
        assert!(!dir.path().join(TELEMETRY_FILE).exists());
    }

    #[test]
    fn telemetry_lands_next_to_the_results() {
        let dir = tempdir().expect("tempdir");
        let outputs = ResolvedOutputs {
            jsonl: dir.path().join("run_a").join("decks.jsonl"),
        };
        let logging = LoggingConfig {
            enable_structured: true,
            tracing_level: "debug".to_string(),
        };
        let guard = init_logging(&logging, &outputs, "run_a")
            .expect("init")
            .expect("enabled");
        assert_eq!(
            guard.telemetry_path,
            dir.path().join("run_a").join(TELEMETRY_FILE)
        );
        assert!(guard.telemetry_path.exists());
    }
}
