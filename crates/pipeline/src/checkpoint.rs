//! On-disk checkpoints for resumable runs.
//!
//! Three artifacts, all pretty-printed JSON:
//! - `{year_dir}/{year}.json`: the trades of one year
//! - `{range_dir}/trades_{start}_{end}.json`: year -> trades for one range
//! - the corpus output: year -> trades for everything processed
//!
//! Writes go to a temporary file in the target directory which is then
//! renamed over the destination, so a crash never leaves a truncated artifact.
//! A checkpoint that exists but does not parse is reported and ignored.

use ledger_core::config::CheckpointConfig;
use ledger_core::{Error, Result, Trade, TradesByYear, Year, YearRange};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Locations of every checkpoint artifact.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    year_dir: PathBuf,
    range_dir: PathBuf,
    output: PathBuf,
}

impl CheckpointStore {
    /// Create a store over the configured locations. Nothing is touched on disk.
    pub fn new(config: &CheckpointConfig) -> Self {
        Self {
            year_dir: config.year_dir.clone(),
            range_dir: config.range_dir.clone(),
            output: config.output.clone(),
        }
    }

    /// `{year_dir}/{year}.json`
    pub fn year_path(&self, year: Year) -> PathBuf {
        self.year_dir.join(format!("{year}.json"))
    }

    /// `{range_dir}/trades_{start}_{end}.json`
    pub fn range_path(&self, range: &YearRange) -> PathBuf {
        self.range_dir.join(format!("trades_{}.json", range.label()))
    }

    /// Location of the corpus artifact.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Trades of a completed year, if checkpointed.
    pub fn load_year(&self, year: Year) -> Option<Vec<Trade>> {
        load_json(&self.year_path(year))
    }

    /// Checkpoint a completed year.
    pub fn save_year(&self, year: Year, trades: &[Trade]) -> Result<()> {
        write_json_atomic(&self.year_path(year), trades)
    }

    /// Trades of a completed range, if checkpointed.
    pub fn load_range(&self, range: &YearRange) -> Option<TradesByYear> {
        load_json(&self.range_path(range))
    }

    /// Checkpoint a completed range.
    pub fn save_range(&self, range: &YearRange, trades: &TradesByYear) -> Result<()> {
        write_json_atomic(&self.range_path(range), trades)
    }

    /// Write the corpus artifact.
    pub fn save_corpus(&self, trades: &TradesByYear) -> Result<()> {
        write_json_atomic(&self.output, trades)
    }
}

/// Read a checkpoint. Missing and unreadable files both yield `None`.
fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), "Unreadable checkpoint, recomputing: {}", e);
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => {
            debug!(path = %path.display(), "Loaded checkpoint");
            Some(value)
        }
        Err(e) => {
            warn!(path = %path.display(), "Corrupt checkpoint, recomputing: {}", e);
            None
        }
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| Error::checkpoint(dir, e.to_string()))?;

    let json = serde_json::to_string_pretty(value)?;
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::checkpoint(path, e.to_string()))?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| Error::checkpoint(path, e.to_string()))?;
    file.persist(path).map_err(|e| Error::checkpoint(path, e.error.to_string()))?;

    debug!(path = %path.display(), bytes = json.len(), "Wrote checkpoint");
    Ok(())
}
