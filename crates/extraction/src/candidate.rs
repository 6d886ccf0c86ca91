//! Untrusted candidate transfers as returned by the extraction service.
//!
//! Fields are deliberately loose (years and rounds may arrive as strings or
//! numbers, asset types may be misspelled); [`crate::repair`] decides what is
//! usable. Items in a batch are decoded independently.

use crate::repair::RepairIssue;
use ledger_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// One candidate transfer, before repair.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateTransfer {
    pub from_team: String,
    pub to_team: String,
    pub asset: CandidateAsset,
}

/// Candidate asset with every field optional except its declared type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateAsset {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub round: Option<Value>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

/// The raw items of one service response.
#[derive(Debug, Clone, Default)]
pub struct CandidateBatch {
    items: Vec<Value>,
}

impl CandidateBatch {
    /// Parse response text. Accepts `{"transfers": [...]}` or a bare array.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::schema(format!("response is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build a batch from an already-parsed response.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self { items }),
            Value::Object(mut map) => match map.remove("transfers") {
                Some(Value::Array(items)) => Ok(Self { items }),
                Some(other) => Err(Error::schema(format!(
                    "\"transfers\" must be an array, got {}",
                    json_kind(&other)
                ))),
                None => Err(Error::schema("response has no \"transfers\" key")),
            },
            other => Err(Error::schema(format!(
                "response must be an object or array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Number of raw items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the service returned no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Decode every item independently.
    pub fn decode(self) -> Vec<std::result::Result<CandidateTransfer, RepairIssue>> {
        self.items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<CandidateTransfer>(item)
                    .map_err(|e| RepairIssue::Malformed(e.to_string()))
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
