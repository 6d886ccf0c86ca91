//! Batch orchestration over the yearly archives.
//!
//! Years are processed range by range. A range whose checkpoint exists is
//! merged without touching the archives; otherwise each year is loaded from
//! its own checkpoint or parsed from its archive, and the range checkpoint is
//! written once every year is done. A range with an unreadable archive gets no
//! range checkpoint, so the next run retries that year. The corpus artifact is
//! written last.

use crate::checkpoint::CheckpointStore;
use crate::document::{parse_document, DocumentOutcome};
use crate::summary::{RangeSource, RunContext, RunSummary};
use chrono::Utc;
use ledger_core::config::CorpusConfig;
use ledger_core::{Config, Result, Trade, TradesByYear, Year, YearRange};
use ledger_extraction::{ExtractionService, TransferExtractor};
use ledger_ingestion::{extract_paragraphs, is_trade_paragraph};
use tracing::{error, info, warn};

/// Drives a full run: archives in, checkpoints and corpus artifact out.
pub struct BatchOrchestrator<S> {
    corpus: CorpusConfig,
    ranges: Vec<YearRange>,
    store: CheckpointStore,
    extractor: TransferExtractor<S>,
}

impl<S: ExtractionService> BatchOrchestrator<S> {
    /// Create an orchestrator. Fails if the year partition is invalid.
    pub fn new(config: &Config, service: S) -> Result<Self> {
        Ok(Self {
            ranges: config.corpus.year_ranges()?,
            corpus: config.corpus.clone(),
            store: CheckpointStore::new(&config.checkpoint),
            extractor: TransferExtractor::new(service),
        })
    }

    /// The resolved year partition, in processing order.
    pub fn ranges(&self) -> &[YearRange] {
        &self.ranges
    }

    /// The extractor, for its statistics and service.
    pub fn extractor(&self) -> &TransferExtractor<S> {
        &self.extractor
    }

    /// Process every range in order and write the corpus artifact.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started_at = Utc::now();
        self.extractor.reset_stats();
        let mut context = RunContext::default();
        let mut all_trades = TradesByYear::new();

        for range in self.ranges.clone() {
            let trades = self.process_range(range, &mut context).await?;
            all_trades.extend(trades);
        }

        self.store.save_corpus(&all_trades)?;
        let total: usize = all_trades.values().map(Vec::len).sum();
        info!(
            path = %self.store.output_path().display(),
            total_trades = total,
            "All ranges complete"
        );

        Ok(RunSummary::new(
            context,
            self.extractor.stats().clone(),
            started_at,
            Utc::now(),
        ))
    }

    /// Trades of one range, from its checkpoint or computed year by year.
    pub async fn process_range(&mut self, range: YearRange, context: &mut RunContext) -> Result<TradesByYear> {
        info!(range = %range, "Processing years");

        if let Some(saved) = self.store.load_range(&range) {
            let count = count_trades(&saved);
            info!(
                range = %range,
                path = %self.store.range_path(&range).display(),
                trades = count,
                "Range already complete, loaded from checkpoint"
            );
            context.record_range(range, RangeSource::Checkpoint, count);
            return Ok(saved);
        }

        let unreadable_before = context.unreadable_archives;
        let mut range_trades = TradesByYear::new();
        for year in range.years() {
            let trades = self.process_year(year, context).await?;
            range_trades.insert(year, trades);
        }

        let count = count_trades(&range_trades);
        if context.unreadable_archives > unreadable_before {
            warn!(range = %range, trades = count, "Range incomplete, not checkpointed");
            context.record_range(range, RangeSource::Partial, count);
            return Ok(range_trades);
        }

        self.store.save_range(&range, &range_trades)?;
        info!(
            range = %range,
            path = %self.store.range_path(&range).display(),
            trades = count,
            "Range complete"
        );
        context.record_range(range, RangeSource::Computed, count);
        Ok(range_trades)
    }

    /// Trades of one year, from its checkpoint or parsed from its archive.
    pub async fn process_year(&mut self, year: Year, context: &mut RunContext) -> Result<Vec<Trade>> {
        if let Some(saved) = self.store.load_year(year) {
            info!(year, trades = saved.len(), "Year already parsed, loaded from checkpoint");
            context.year_checkpoints_loaded += 1;
            return Ok(saved);
        }

        let path = self.corpus.archive_path(year);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(year, path = %path.display(), "No archive for year");
                context.missing_archives += 1;
                self.store.save_year(year, &[])?;
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(year, path = %path.display(), "Cannot read archive: {}", e);
                context.unreadable_archives += 1;
                return Ok(Vec::new());
            }
        };

        info!(year, path = %path.display(), "Parsing archive");
        let html = String::from_utf8_lossy(&bytes);
        let trades = self.parse_archive(&html, context).await;

        self.store.save_year(year, &trades)?;
        info!(year, trades = trades.len(), "Year complete");
        Ok(trades)
    }

    /// Run every trade paragraph of an archive through the document pipeline.
    pub async fn parse_archive(&mut self, html: &str, context: &mut RunContext) -> Vec<Trade> {
        let mut trades = Vec::new();

        for paragraph in extract_paragraphs(html) {
            context.paragraphs_seen += 1;
            if !is_trade_paragraph(&paragraph) {
                continue;
            }
            context.paragraphs_qualifying += 1;

            match parse_document(&mut self.extractor, &paragraph).await {
                DocumentOutcome::Parsed(trade) => {
                    context.trades_accepted += 1;
                    trades.push(trade);
                }
                DocumentOutcome::Rejected => context.rejected += 1,
                DocumentOutcome::Failed(_) => context.failed += 1,
            }
        }
        trades
    }
}

fn count_trades(trades: &TradesByYear) -> usize {
    trades.values().map(Vec::len).sum()
}
