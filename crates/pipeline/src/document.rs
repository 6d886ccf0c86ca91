//! The per-paragraph pipeline: extract, aggregate, validate.

use crate::aggregate::aggregate_transfers;
use crate::validate::validate_trade;
use ledger_core::{Error, Trade};
use ledger_extraction::{ExtractionService, TransferExtractor};
use tracing::{error, warn};

/// Characters of the paragraph quoted in diagnostics.
pub const EXCERPT_CHARS: usize = 80;

/// What one paragraph produced.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// An accepted trade.
    Parsed(Trade),
    /// Extraction worked but nothing moved.
    Rejected,
    /// Extraction failed; the paragraph contributes nothing.
    Failed(Error),
}

impl DocumentOutcome {
    /// The accepted trade, if any.
    pub fn trade(self) -> Option<Trade> {
        match self {
            DocumentOutcome::Parsed(trade) => Some(trade),
            _ => None,
        }
    }
}

/// Run one paragraph through the pipeline. Never fails the caller.
pub async fn parse_document<S: ExtractionService>(
    extractor: &mut TransferExtractor<S>,
    text: &str,
) -> DocumentOutcome {
    let transfers = match extractor.extract_document(text).await {
        Ok(transfers) => transfers,
        Err(e) => {
            error!(excerpt = %excerpt(text), "Failed to parse trade: {}", e);
            return DocumentOutcome::Failed(e);
        }
    };

    let trade = aggregate_transfers(&transfers);
    if validate_trade(&trade) {
        DocumentOutcome::Parsed(trade)
    } else {
        warn!(excerpt = %excerpt(text), "Trade failed validation");
        DocumentOutcome::Rejected
    }
}

/// First [`EXCERPT_CHARS`] characters of a paragraph.
pub fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Asset;
    use ledger_extraction::ReplayService;
    use serde_json::json;

    fn make_extractor() -> TransferExtractor<ReplayService> {
        TransferExtractor::new(
            ReplayService::new()
                .with_response(
                    "Lakers traded cash to Wizards",
                    json!({"transfers": [{"from_team": "Lakers", "to_team": "Wizards", "asset": {"type": "cash"}}]}),
                )
                .with_response(
                    "Lakers traded nothing useful to Wizards",
                    json!({"transfers": [{"from_team": "Lakers", "to_team": "Wizards", "asset": {"type": "exception"}}]}),
                ),
        )
    }

    #[tokio::test]
    async fn test_parsed() {
        let mut extractor = make_extractor();
        let trade = parse_document(&mut extractor, "Lakers traded cash to Wizards.").await.trade().unwrap();
        assert_eq!(trade.team_codes(), vec!["LAL", "WAS"]);
        assert_eq!(trade.team("WAS").unwrap().acquired, vec![Asset::cash()]);
    }

    #[tokio::test]
    async fn test_rejected_when_every_transfer_dropped() {
        let mut extractor = make_extractor();
        let outcome = parse_document(&mut extractor, "Lakers traded nothing useful to Wizards").await;
        assert!(matches!(outcome, DocumentOutcome::Rejected));
    }

    #[tokio::test]
    async fn test_failed() {
        let mut extractor = make_extractor();
        let outcome = parse_document(&mut extractor, "The Jazz traded somebody to the Bulls").await;
        assert!(matches!(outcome, DocumentOutcome::Failed(Error::Service(_))));
    }

    #[test]
    fn test_excerpt() {
        let long = "é".repeat(100);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }
}
