//! Paragraph-level transfer extraction.
//!
//! A paragraph is split into clauses, each clause gets one service call, and
//! every returned candidate goes through the repair pass. Bad candidates are
//! dropped with a warning; a failed call or an unusable response aborts the
//! whole paragraph so no partial trade is ever built from it.

use crate::repair::{repair_transfer, RepairIssue};
use crate::service::{ExtractionRequest, ExtractionService};
use ledger_core::{Result, Transfer};
use ledger_ingestion::preprocess_trade_text;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Counters accumulated across every paragraph an extractor has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    /// Paragraphs submitted.
    pub documents: u64,
    /// Paragraphs aborted by a service or schema error.
    pub failed_documents: u64,
    /// Clauses produced by preprocessing.
    pub clauses: u64,
    /// Calls made to the extraction service.
    pub service_calls: u64,
    /// Raw candidate items returned.
    pub candidates: u64,
    /// Candidates that survived repair.
    pub accepted: u64,
    /// Dropped candidates, keyed by reason.
    pub dropped: BTreeMap<String, u64>,
}

impl ExtractionStats {
    /// Total dropped candidates.
    pub fn dropped_total(&self) -> u64 {
        self.dropped.values().sum()
    }

    /// Fraction of candidates accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates > 0 {
            self.accepted as f64 / self.candidates as f64
        } else {
            0.0
        }
    }

    fn record_drop(&mut self, issue: &RepairIssue) {
        *self.dropped.entry(issue.reason().to_string()).or_insert(0) += 1;
    }

    /// Reset statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Turns trade paragraphs into validated transfers using an extraction service.
pub struct TransferExtractor<S> {
    service: S,
    stats: ExtractionStats,
}

impl<S: ExtractionService> TransferExtractor<S> {
    /// Create an extractor with empty statistics.
    pub fn new(service: S) -> Self {
        Self {
            service,
            stats: ExtractionStats::default(),
        }
    }

    /// Extract transfers from every clause of a paragraph, in clause order.
    pub async fn extract_document(&mut self, text: &str) -> Result<Vec<Transfer>> {
        self.stats.documents += 1;
        let clauses = preprocess_trade_text(text);
        self.stats.clauses += clauses.len() as u64;

        let mut transfers = Vec::new();
        for clause in &clauses {
            match self.extract_clause(clause).await {
                Ok(mut found) => transfers.append(&mut found),
                Err(e) => {
                    self.stats.failed_documents += 1;
                    return Err(e);
                }
            }
        }
        Ok(transfers)
    }

    /// Extract and repair the transfers of a single clause.
    pub async fn extract_clause(&mut self, clause: &str) -> Result<Vec<Transfer>> {
        let request = ExtractionRequest::for_clause(clause);
        self.stats.service_calls += 1;
        let batch = self.service.extract(&request).await?;

        self.stats.candidates += batch.len() as u64;
        debug!(service = self.service.name(), clause, candidates = batch.len(), "Clause extracted");

        let mut transfers = Vec::with_capacity(batch.len());
        for candidate in batch.decode() {
            match candidate.and_then(repair_transfer) {
                Ok(transfer) => {
                    self.stats.accepted += 1;
                    transfers.push(transfer);
                }
                Err(issue) => {
                    warn!(reason = issue.reason(), clause, "Dropped transfer: {}", issue);
                    self.stats.record_drop(&issue);
                }
            }
        }
        Ok(transfers)
    }

    /// Statistics accumulated since creation or the last reset.
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// The underlying extraction service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::ReplayService;
    use ledger_core::{DraftRound, Error, TransferAsset};
    use serde_json::json;

    const SWAP: &str = "Lakers traded Kendrick Nunn to Wizards for Rui Hachimura";

    fn make_extractor() -> TransferExtractor<ReplayService> {
        let service = ReplayService::new()
            .with_response(
                SWAP,
                json!({"transfers": [
                    {"from_team": "Los Angeles Lakers", "to_team": "Washington Wizards",
                     "asset": {"type": "player", "name": "Kendrick Nunn"}},
                    {"from_team": "Washington Wizards", "to_team": "Los Angeles Lakers",
                     "asset": {"type": "player", "name": "Rui Hachimura"}}
                ]}),
            )
            .with_response(
                "the Heat traded a 2026 pick to the Celtics",
                json!({"transfers": [
                    {"from_team": "Miami Heat", "to_team": "Boston Celtics",
                     "asset": {"type": "draft pick", "year": "2026", "round": 3}},
                    {"from_team": "Miami Heat", "to_team": "Boston Celtics",
                     "asset": {"type": "pick", "year": "2026", "round": "1"}},
                    "garbage"
                ]}),
            );
        TransferExtractor::new(service)
    }

    #[tokio::test]
    async fn test_extract_document() {
        let mut extractor = make_extractor();
        let transfers = extractor.extract_document(&format!("{SWAP}.")).await.unwrap();

        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].from_team, "LAL");
        assert_eq!(transfers[1].from_team, "WAS");

        let stats = extractor.stats();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.clauses, 1);
        assert_eq!(stats.service_calls, 1);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.dropped_total(), 0);
    }

    #[tokio::test]
    async fn test_bad_candidates_dropped_individually() {
        let mut extractor = make_extractor();
        let transfers = extractor
            .extract_clause("the Heat traded a 2026 pick to the Celtics")
            .await
            .unwrap();

        assert_eq!(transfers.len(), 1);
        assert_eq!(
            transfers[0].asset,
            TransferAsset::Pick {
                year: "2026".to_string(),
                round: DraftRound::First,
                owning_team: Some("MIA".to_string()),
            }
        );
        let stats = extractor.stats();
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.dropped.get("bad_round"), Some(&1));
        assert_eq!(stats.dropped.get("malformed"), Some(&1));
        assert!((stats.acceptance_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_service_error_aborts_document() {
        let mut extractor = make_extractor();
        let text = format!("{SWAP}; the Jazz traded an unrecorded player to the Bulls");
        let result = extractor.extract_document(&text).await;

        assert!(matches!(result, Err(Error::Service(_))));
        assert_eq!(extractor.stats().failed_documents, 1);
        assert_eq!(extractor.service().calls(), 2);
    }

    #[tokio::test]
    async fn test_paragraph_without_clauses() {
        let mut extractor = make_extractor();
        let transfers = extractor.extract_document("Traded.").await.unwrap();
        assert!(transfers.is_empty());
        assert_eq!(extractor.service().calls(), 0);

        extractor.reset_stats();
        assert_eq!(extractor.stats(), &ExtractionStats::default());
    }
}
