use deck_core::calc::{DeckBonusRules, LiveType, MusicMeta, SKILL_ACTIVATIONS};
use deck_core::synthetic::SyntheticPool;
use deck_recommend::recommend::MAX_MEMBER;
use deck_recommend::{RecommendConfig, RecommendMode};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_LIMIT: usize = 10;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root run configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RunConfig {
    pub run_id: String,
    pub pool: PoolSource,
    pub music: MusicMeta,
    pub recommend: RecommendSection,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RunConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: RunConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.pool.validate()?;
        validate_music(&self.music)?;
        self.recommend.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Engine configuration: the preset of the chosen mode with this run's
    /// overrides applied.
    pub fn recommend_config(&self) -> RecommendConfig {
        let section = &self.recommend;
        let mut config = section.mode.config();
        if let Some(member) = section.member {
            config.member = member;
        }
        config.limit = section.limit;
        config.fixed_leader = section.leader;
        config.honor_bonus = section.honor_bonus;
        if let Some(rules) = section.bonus_rules {
            let preset = &mut config.bonus_rules;
            preset.card_bonus_count_limit =
                rules.card_bonus_count_limit.or(preset.card_bonus_count_limit);
            preset.different_attribute_bonus = rules
                .different_attribute_bonus
                .or(preset.different_attribute_bonus);
            preset.support_deck_size = rules.support_deck_size.or(preset.support_deck_size);
        }
        config
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }
}

/// Where the card pool comes from.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PoolSource {
    /// JSON file holding card descriptions and the user context.
    Path(PathBuf),
    Synthetic(SyntheticPool),
}

impl PoolSource {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PoolSource::Path(path) if path.as_os_str().is_empty() => {
                Err(ValidationError::InvalidField {
                    field: "pool.path".to_string(),
                    message: "path must not be empty".to_string(),
                })
            }
            PoolSource::Synthetic(pool) if pool.cards == 0 => Err(ValidationError::InvalidField {
                field: "pool.synthetic.cards".to_string(),
                message: "synthetic pool needs at least one card".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Replaces the seed of a synthetic pool. File pools are left alone.
    pub fn reseed(&mut self, seed: u64) -> bool {
        match self {
            PoolSource::Synthetic(pool) => {
                pool.seed = seed;
                true
            }
            PoolSource::Path(_) => false,
        }
    }
}

/// Engine block: the mode preset plus per-run overrides.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecommendSection {
    #[serde(flatten)]
    pub mode: RecommendMode,
    #[serde(default = "default_live_type")]
    pub live_type: LiveType,
    #[serde(default)]
    pub member: Option<usize>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Character pinned to the leader slot.
    #[serde(default)]
    pub leader: Option<u32>,
    #[serde(default)]
    pub honor_bonus: f64,
    /// Event bonus rules; fields left out keep the mode's preset.
    #[serde(default)]
    pub bonus_rules: Option<DeckBonusRules>,
}

impl RecommendSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(member) = self.member {
            if !(1..=MAX_MEMBER).contains(&member) {
                return Err(ValidationError::InvalidField {
                    field: "recommend.member".to_string(),
                    message: format!("member must be between 1 and {MAX_MEMBER}"),
                });
            }
        }

        if self.limit == 0 {
            return Err(ValidationError::InvalidField {
                field: "recommend.limit".to_string(),
                message: "limit must be greater than zero".to_string(),
            });
        }

        if !self.honor_bonus.is_finite() || self.honor_bonus < 0.0 {
            return Err(ValidationError::InvalidField {
                field: "recommend.honor_bonus".to_string(),
                message: "honor bonus must be a non-negative number".to_string(),
            });
        }

        if let Some(table) = self
            .bonus_rules
            .and_then(|rules| rules.different_attribute_bonus)
        {
            if table.iter().any(|bonus| !bonus.is_finite() || *bonus < 0.0) {
                return Err(ValidationError::InvalidField {
                    field: "recommend.bonus_rules.different_attribute_bonus".to_string(),
                    message: "bonuses must be non-negative numbers".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn default_live_type() -> LiveType {
    LiveType::Multi
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.jsonl);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_music(music: &MusicMeta) -> Result<(), ValidationError> {
    for (label, rates) in [
        ("music.skill_score_solo", &music.skill_score_solo),
        ("music.skill_score_auto", &music.skill_score_auto),
        ("music.skill_score_multi", &music.skill_score_multi),
    ] {
        if rates.len() != SKILL_ACTIVATIONS {
            return Err(ValidationError::InvalidField {
                field: label.to_string(),
                message: format!(
                    "expected {SKILL_ACTIVATIONS} skill windows, found {}",
                    rates.len()
                ),
            });
        }
    }

    if music.event_rate <= 0.0 {
        return Err(ValidationError::InvalidField {
            field: "music.event_rate".to_string(),
            message: "event rate must be greater than zero".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
