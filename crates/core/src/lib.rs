//! Core types and configuration for the trade-ledger system.
//!
//! This crate provides shared types used across all other crates:
//! - Trade data types (assets, transfers, team views, trades)
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
