//! Trade assembly and batch processing for the trade-ledger system.
//!
//! This crate handles:
//! - Aggregating transfers into team-centric trades and validating them
//! - The per-paragraph document pipeline
//! - Atomic year/range/corpus checkpoints
//! - Range-by-range orchestration with resumable runs

pub mod aggregate;
pub mod checkpoint;
pub mod document;
pub mod orchestrator;
pub mod summary;
pub mod validate;

pub use aggregate::aggregate_transfers;
pub use checkpoint::CheckpointStore;
pub use document::{parse_document, DocumentOutcome};
pub use orchestrator::BatchOrchestrator;
pub use summary::{RangeSource, RangeSummary, RunContext, RunSummary};
pub use validate::validate_trade;
