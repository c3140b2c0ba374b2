//! Best score persistence.

use crate::{constants::BEST_SCORE_KEY, Error, Result};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Outcome of recording a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRecord {
    /// Best score after recording
    pub best: u64,
    /// The recorded score matched or beat the previous best
    pub is_new_best: bool,
}

/// Storage for the best score across sessions
pub trait ScoreStore {
    /// Best score so far, zero if none
    fn best(&self) -> u64;

    /// Record a final score
    fn record(&mut self, score: u64) -> Result<ScoreRecord>;
}

fn evaluate(previous: u64, score: u64) -> ScoreRecord {
    // A tie counts as a new best, a zero never does
    let is_new_best = score >= previous && score > 0;
    ScoreRecord {
        best: if is_new_best { score } else { previous },
        is_new_best,
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    best: u64,
}

impl MemoryScoreStore {
    pub const fn new(best: u64) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best(&self) -> u64 {
        self.best
    }

    fn record(&mut self, score: u64) -> Result<ScoreRecord> {
        let record = evaluate(self.best, score);
        self.best = record.best;
        Ok(record)
    }
}

/// YAML key/value file holding the best score under `dinoHighScore`
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    entries: BTreeMap<String, u64>,
}

impl FileScoreStore {
    /// Open a store; a missing or unreadable file starts from zero
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Option<BTreeMap<String, u64>>>(&content) {
                Ok(entries) => entries.unwrap_or_default(),
                Err(e) => {
                    warn!("Ignoring malformed score file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let content = serde_yaml::to_string(&self.entries)
            .map_err(|e| Error::StoreError(format!("Failed to serialize scores: {e}")))?;
        std::fs::write(&self.path, content)
            .map_err(|e| Error::StoreError(format!("Failed to write {}: {e}", self.path.display())))
    }
}

impl ScoreStore for FileScoreStore {
    fn best(&self) -> u64 {
        self.entries.get(BEST_SCORE_KEY).copied().unwrap_or(0)
    }

    fn record(&mut self, score: u64) -> Result<ScoreRecord> {
        let record = evaluate(self.best(), score);
        if record.is_new_best {
            info!("New best score {}", record.best);
            self.entries.insert(BEST_SCORE_KEY.to_string(), record.best);
            self.save()?;
        }
        Ok(record)
    }
}
