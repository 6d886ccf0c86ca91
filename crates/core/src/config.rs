//! Configuration structures for the trade-ledger system.

use crate::error::{Error, Result};
use crate::types::{Year, YearRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source corpus layout and year partition.
    pub corpus: CorpusConfig,
    /// Extraction service configuration.
    pub extraction: ExtractionConfig,
    /// Checkpoint and output locations.
    pub checkpoint: CheckpointConfig,
    /// Diagnostics log configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse a configuration from TOML text. Missing sections take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.corpus.year_ranges()?;
        if !self.corpus.archive_pattern.contains("{year}") {
            return Err(Error::config("corpus.archive_pattern must contain {year}"));
        }
        if self.extraction.model.trim().is_empty() {
            return Err(Error::config("extraction.model must not be empty"));
        }
        if self.extraction.timeout_secs == 0 {
            return Err(Error::config("extraction.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Corpus layout and the partition of years into checkpointed ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Directory holding one archive per year.
    pub archive_dir: PathBuf,
    /// Archive file name; `{year}` is replaced by the season year.
    pub archive_pattern: String,
    /// Explicit ranges, processed in the order given. Defaults to the four
    /// historical ranges even when a `[corpus]` section omits the key; set
    /// `ranges = []` to partition into the fixed windows below instead.
    pub ranges: Vec<YearRange>,
    /// First year when partitioning into fixed windows.
    pub first_year: Year,
    /// Last year (inclusive) when partitioning into fixed windows.
    pub last_year: Year,
    /// Window size in years. Used only when `ranges` is empty.
    pub window_years: u16,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("bbref_htmls"),
            archive_pattern: "{year}.html".to_string(),
            ranges: vec![
                YearRange::new(2004, 2008),
                YearRange::new(2009, 2014),
                YearRange::new(2015, 2019),
                YearRange::new(2020, 2024),
            ],
            first_year: 2004,
            last_year: 2024,
            window_years: 5,
        }
    }
}

impl CorpusConfig {
    /// Resolve the year partition.
    ///
    /// An empty `ranges` list selects fixed windows. Ranges must be non-empty
    /// and pairwise disjoint.
    pub fn year_ranges(&self) -> Result<Vec<YearRange>> {
        let ranges = if self.ranges.is_empty() {
            fixed_windows(self.first_year, self.last_year, self.window_years)?
        } else {
            self.ranges.clone()
        };

        for (i, range) in ranges.iter().enumerate() {
            if range.is_empty() {
                return Err(Error::config(format!("range {range} ends before it starts")));
            }
            if let Some(other) = ranges[..i].iter().find(|r| r.overlaps(range)) {
                return Err(Error::config(format!("range {range} overlaps {other}")));
            }
        }
        Ok(ranges)
    }

    /// Path of the archive for a year.
    pub fn archive_path(&self, year: Year) -> PathBuf {
        self.archive_dir
            .join(self.archive_pattern.replace("{year}", &year.to_string()))
    }
}

/// Split `first..=last` into consecutive windows of `window` years.
/// The final window may be shorter.
fn fixed_windows(first: Year, last: Year, window: u16) -> Result<Vec<YearRange>> {
    if window == 0 {
        return Err(Error::config("corpus.window_years must be positive"));
    }
    if last < first {
        return Err(Error::config("corpus.last_year is before corpus.first_year"));
    }

    let mut ranges = Vec::new();
    let mut start = first;
    loop {
        let end = start.saturating_add(window - 1).min(last);
        ranges.push(YearRange::new(start, end));
        if end == last {
            break;
        }
        start = end + 1;
    }
    Ok(ranges)
}

/// Extraction service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Base URL of the Ollama server.
    pub endpoint: String,
    /// Model name.
    pub model: String,
    /// Sampling temperature. Zero keeps reruns reproducible.
    pub temperature: f32,
    /// Sampling seed passed to the server.
    pub seed: Option<u64>,
    /// CPU threads the server may use for one request.
    pub num_thread: Option<u32>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen2.5:3b".to_string(),
            temperature: 0.0,
            seed: Some(0),
            num_thread: Some(6),
            timeout_secs: 300,
        }
    }
}

/// Checkpoint and output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Directory for per-year checkpoints (`{year}.json`).
    pub year_dir: PathBuf,
    /// Directory for per-range checkpoints (`trades_{start}_{end}.json`).
    pub range_dir: PathBuf,
    /// Corpus-wide output artifact.
    pub output: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            year_dir: PathBuf::from("trade_checkpoints"),
            range_dir: PathBuf::from("."),
            output: PathBuf::from("trades.json"),
        }
    }
}

/// Diagnostics log configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file, truncated at the start of every run.
    pub file: PathBuf,
    /// Default level filter when `RUST_LOG` is unset.
    pub level: String,
    /// Write the file log as JSON lines instead of text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("trade_parser.log"),
            level: "info".to_string(),
            json: false,
        }
    }
}
