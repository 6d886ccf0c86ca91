//! Offline extraction service backed by recorded responses.
//!
//! A replay file is a JSON object keyed by cleaned clause. Each value is either
//! the structured response itself (`{"transfers": [...]}` or an array) or a
//! string holding raw response text, which is parsed the same way a live
//! response is. Unrecorded clauses fail like an unreachable service.

use crate::candidate::CandidateBatch;
use crate::service::{ExtractionRequest, ExtractionService};
use async_trait::async_trait;
use ledger_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extraction service answering from recorded responses.
#[derive(Debug, Default)]
pub struct ReplayService {
    responses: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl ReplayService {
    /// Create a service with no recorded responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response for a clause.
    pub fn with_response(mut self, clause: impl Into<String>, response: Value) -> Self {
        self.responses.insert(clause.into(), response);
        self
    }

    /// Load recorded responses from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let responses: HashMap<String, Value> = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("replay file {}: {e}", path.display())))?;
        Ok(Self { responses, calls: AtomicUsize::new(0) })
    }

    /// Number of extract calls made so far, recorded or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of recorded clauses.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether no clause is recorded.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait]
impl ExtractionService for ReplayService {
    fn name(&self) -> &str {
        "replay"
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<CandidateBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(&request.clause) {
            Some(Value::String(raw)) => CandidateBatch::from_json(raw),
            Some(value) => CandidateBatch::from_value(value.clone()),
            None => Err(Error::service(format!("no recorded response for clause {:?}", request.clause))),
        }
    }
}
