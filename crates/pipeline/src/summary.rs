//! Per-run counters and the end-of-run report.

use chrono::{DateTime, Utc};
use ledger_core::YearRange;
use ledger_extraction::ExtractionStats;
use serde::Serialize;
use std::fmt;

/// Where a range's trades came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    /// Loaded from an existing range checkpoint.
    Checkpoint,
    /// Computed and checkpointed in this run.
    Computed,
    /// Computed, but an archive could not be read so no checkpoint was written.
    Partial,
}

impl fmt::Display for RangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSource::Checkpoint => write!(f, "checkpoint"),
            RangeSource::Computed => write!(f, "computed"),
            RangeSource::Partial => write!(f, "partial, not checkpointed"),
        }
    }
}

/// Outcome of one year range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeSummary {
    /// The years covered.
    pub range: YearRange,
    /// Where its trades came from.
    pub source: RangeSource,
    /// Trades across all of its years.
    pub trades: usize,
}

/// Mutable state of one orchestrator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Paragraphs found in archives.
    pub paragraphs_seen: u64,
    /// Paragraphs that mention a trade.
    pub paragraphs_qualifying: u64,
    /// Trades that passed validation.
    pub trades_accepted: u64,
    /// Paragraphs whose trade failed validation.
    pub rejected: u64,
    /// Paragraphs whose extraction failed.
    pub failed: u64,
    /// Years with no archive file.
    pub missing_archives: u64,
    /// Archives that exist but could not be read.
    pub unreadable_archives: u64,
    /// Years answered from a year checkpoint.
    pub year_checkpoints_loaded: u64,
    /// Finished ranges, in processing order.
    pub ranges: Vec<RangeSummary>,
}

impl RunContext {
    /// Append the outcome of a finished range.
    pub fn record_range(&mut self, range: YearRange, source: RangeSource, trades: usize) {
        self.ranges.push(RangeSummary { range, source, trades });
    }
}

/// Report of a finished run. Counters mirror [`RunContext`].
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ranges: Vec<RangeSummary>,
    pub total_trades: usize,
    pub paragraphs_seen: u64,
    pub paragraphs_qualifying: u64,
    pub rejected: u64,
    pub failed: u64,
    pub missing_archives: u64,
    pub unreadable_archives: u64,
    pub year_checkpoints_loaded: u64,
    pub extraction: ExtractionStats,
}

impl RunSummary {
    /// Combine the run counters with the extractor's statistics.
    pub fn new(
        context: RunContext,
        extraction: ExtractionStats,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            started_at,
            finished_at,
            total_trades: context.ranges.iter().map(|r| r.trades).sum(),
            ranges: context.ranges,
            paragraphs_seen: context.paragraphs_seen,
            paragraphs_qualifying: context.paragraphs_qualifying,
            rejected: context.rejected,
            failed: context.failed,
            missing_archives: context.missing_archives,
            unreadable_archives: context.unreadable_archives,
            year_checkpoints_loaded: context.year_checkpoints_loaded,
            extraction,
        }
    }

    /// Wall-clock duration of the run in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run finished in {:.1}s", self.elapsed_secs())?;
        for range in &self.ranges {
            writeln!(f, "  {}: {} trades ({})", range.range, range.trades, range.source)?;
        }
        writeln!(f, "Total trades: {}", self.total_trades)?;
        writeln!(
            f,
            "Paragraphs: {} seen, {} mention a trade, {} rejected, {} failed",
            self.paragraphs_seen, self.paragraphs_qualifying, self.rejected, self.failed
        )?;
        writeln!(
            f,
            "Archives: {} missing, {} unreadable; {} years loaded from checkpoints",
            self.missing_archives, self.unreadable_archives, self.year_checkpoints_loaded
        )?;
        write!(
            f,
            "Extraction: {} calls, {} candidates, {} accepted, {} dropped",
            self.extraction.service_calls,
            self.extraction.candidates,
            self.extraction.accepted,
            self.extraction.dropped_total()
        )?;
        for (reason, count) in &self.extraction.dropped {
            write!(f, "\n    {reason}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_summary() -> RunSummary {
        let mut context = RunContext::default();
        context.record_range(YearRange::new(2004, 2008), RangeSource::Checkpoint, 120);
        context.record_range(YearRange::new(2009, 2014), RangeSource::Computed, 80);
        context.paragraphs_seen = 10;
        context.year_checkpoints_loaded = 3;

        let mut extraction = ExtractionStats::default();
        extraction.dropped.insert("bad_round".to_string(), 2);

        let started = Utc::now();
        RunSummary::new(context, extraction, started, started + Duration::milliseconds(2500))
    }

    #[test]
    fn test_totals() {
        let summary = make_summary();
        assert_eq!(summary.total_trades, 200);
        assert!((summary.elapsed_secs() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let text = make_summary().to_string();
        assert!(text.contains("2004-2008: 120 trades (checkpoint)"));
        assert!(text.contains("2009-2014: 80 trades (computed)"));
        assert!(text.contains("Total trades: 200"));
        assert!(text.contains("bad_round: 2"));
        assert!(text.contains("3 years loaded from checkpoints"));
    }

    #[test]
    fn test_serialize() {
        let value = serde_json::to_value(make_summary()).unwrap();
        assert_eq!(value["ranges"][0]["range"], serde_json::json!([2004, 2008]));
        assert_eq!(value["ranges"][1]["source"], "computed");
    }
}
