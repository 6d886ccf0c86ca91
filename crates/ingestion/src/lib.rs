//! Text ingestion and normalization for the trade-ledger system.
//!
//! This crate handles:
//! - Team name canonicalization (relocations, renames, nicknames)
//! - Clause segmentation of trade paragraphs
//! - Paragraph extraction from per-year HTML archives

pub mod archive;
pub mod clauses;
pub mod teams;

pub use archive::{extract_paragraphs, is_trade_paragraph};
pub use clauses::preprocess_trade_text;
pub use teams::normalize_team_name;
