//! The seam between the pipeline and whatever turns a clause into candidates.

use crate::candidate::CandidateBatch;
use crate::prompt::{transfer_list_schema, user_prompt, SYSTEM_PROMPT};
use async_trait::async_trait;
use ledger_core::Result;
use serde_json::Value;

/// Everything a service needs to answer one clause.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The cleaned clause, also used as the replay key.
    pub clause: String,
    /// System prompt.
    pub system: &'static str,
    /// User prompt wrapping the clause.
    pub user: String,
    /// JSON schema the answer must follow.
    pub schema: Value,
}

impl ExtractionRequest {
    /// Build the request for one cleaned clause.
    pub fn for_clause(clause: impl Into<String>) -> Self {
        let clause = clause.into();
        Self {
            user: user_prompt(&clause),
            clause,
            system: SYSTEM_PROMPT,
            schema: transfer_list_schema(),
        }
    }
}

/// A structured-output extraction backend.
///
/// Implementations return the raw batch; repair happens in the extractor.
/// Transport failures and unparseable answers are errors, an empty list is not.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn extract(&self, request: &ExtractionRequest) -> Result<CandidateBatch>;
}

#[async_trait]
impl<T: ExtractionService + ?Sized> ExtractionService for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn extract(&self, request: &ExtractionRequest) -> Result<CandidateBatch> {
        (**self).extract(request).await
    }
}
