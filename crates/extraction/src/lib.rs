//! Transfer extraction for the trade-ledger system.
//!
//! This crate handles:
//! - The extraction service seam and its request/response shapes
//! - An Ollama chat client and an offline replay service
//! - Per-candidate repair and validation of extracted transfers
//! - Clause-by-clause extraction of a whole paragraph

pub mod candidate;
pub mod extractor;
pub mod ollama;
pub mod prompt;
pub mod repair;
pub mod replay;
pub mod service;

pub use candidate::{CandidateAsset, CandidateBatch, CandidateTransfer};
pub use extractor::{ExtractionStats, TransferExtractor};
pub use ollama::OllamaClient;
pub use repair::{repair_transfer, RepairIssue};
pub use replay::ReplayService;
pub use service::{ExtractionRequest, ExtractionService};
