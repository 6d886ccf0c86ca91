//! Trade acceptance check.

use ledger_core::Trade;

/// A trade is kept unless no team sent or acquired anything.
pub fn validate_trade(trade: &Trade) -> bool {
    trade.teams.iter().any(|t| t.has_activity())
}
