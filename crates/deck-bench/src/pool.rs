//! Loading the card pool a run recommends from.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use deck_core::cache::RequestCache;
use deck_core::calc::{CardCalculator, CardSpec, UserContext};
use deck_core::synthetic::SyntheticPool;
use deck_core::{CardDetail, DetailError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::PoolSource;

/// On-disk pool: the user's cards plus the account state they are computed
/// under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolFile {
    pub cards: Vec<CardSpec>,
    #[serde(default)]
    pub context: UserContext,
}

impl PoolFile {
    pub fn from_path(path: &Path) -> Result<Self, PoolError> {
        let file = File::open(path).map_err(|source| PoolError::Read {
            source,
            path: path.to_path_buf(),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| PoolError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    pub fn synthetic(pool: &SyntheticPool) -> Self {
        Self {
            cards: pool.generate(),
            context: pool.user_context(),
        }
    }

    pub fn card_details(&self) -> Result<Vec<CardDetail>, PoolError> {
        Ok(CardCalculator::new(&self.context).batch_card_details(&self.cards)?)
    }
}

/// Computed pools, shared between the runs of one process.
#[derive(Default)]
pub struct PoolLoader {
    cache: RequestCache<Vec<CardDetail>>,
}

impl PoolLoader {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: RequestCache::new(capacity),
        }
    }

    /// Card details for `source`, computed at most once per distinct source.
    pub fn load(&self, source: &PoolSource) -> Result<Arc<Vec<CardDetail>>, PoolError> {
        let key = cache_key(source);
        let pool = self.cache.get_or_compute(&key, || {
            let file = match source {
                PoolSource::Path(path) => PoolFile::from_path(path)?,
                PoolSource::Synthetic(pool) => PoolFile::synthetic(pool),
            };
            file.card_details()
        })?;
        let stats = self.cache.stats();
        event!(
            target: "deck_bench::pool",
            Level::DEBUG,
            key = %key,
            cards = pool.len(),
            hits = stats.hits,
            misses = stats.misses,
        );
        Ok(pool)
    }
}

fn cache_key(source: &PoolSource) -> String {
    match source {
        PoolSource::Path(path) => format!("file:{}", path.display()),
        PoolSource::Synthetic(pool) => format!(
            "synthetic:{}:{}:{}",
            pool.seed, pool.cards, pool.characters
        ),
    }
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to read pool {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse pool {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("card details could not be computed: {0}")]
    Detail(#[from] DetailError),
}
