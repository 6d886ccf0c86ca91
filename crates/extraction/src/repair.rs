//! Repair and validation of candidate transfers.
//!
//! Steps run in a fixed order and any of them may drop the candidate:
//! 1. map pick synonyms ("draft_pick", ...) to "pick"
//! 2. reject unknown asset types
//! 3. for picks, take the first four consecutive digits of the year field and require round 1 or 2
//! 4. canonicalize every team name
//! 5. default an unowned pick to the sending team

use crate::candidate::{CandidateAsset, CandidateTransfer};
use ledger_core::{DraftRound, TeamCode, Transfer, TransferAsset};
use ledger_ingestion::normalize_team_name;
use serde_json::Value;
use thiserror::Error;

const PICK_SYNONYMS: &[&str] = &["draft_pick", "draft pick", "draftpick", "draft-pick"];

/// Why a candidate transfer was dropped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairIssue {
    /// The item does not have the transfer object shape.
    #[error("malformed transfer: {0}")]
    Malformed(String),

    /// Asset type outside player/pick/cash.
    #[error("invalid asset type: {0:?}")]
    InvalidAssetType(String),

    /// No four consecutive digits in a pick's year field.
    #[error("bad pick year: {0}")]
    BadYear(String),

    /// Pick round missing or not 1/2.
    #[error("invalid pick round: {0}")]
    BadRound(String),

    /// Player asset with no name.
    #[error("player asset without a name")]
    MissingPlayerName,

    /// Blank sending or receiving team.
    #[error("transfer without a sending or receiving team")]
    MissingTeam,
}

impl RepairIssue {
    /// Short key used for drop statistics.
    pub fn reason(&self) -> &'static str {
        match self {
            RepairIssue::Malformed(_) => "malformed",
            RepairIssue::InvalidAssetType(_) => "invalid_asset_type",
            RepairIssue::BadYear(_) => "bad_year",
            RepairIssue::BadRound(_) => "bad_round",
            RepairIssue::MissingPlayerName => "missing_player_name",
            RepairIssue::MissingTeam => "missing_team",
        }
    }
}

/// Asset kinds the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Player,
    Pick,
    Cash,
}

fn asset_kind(declared: &str) -> Result<AssetKind, RepairIssue> {
    let lowered = declared.trim().to_lowercase();
    let kind = if PICK_SYNONYMS.contains(&lowered.as_str()) {
        "pick"
    } else {
        lowered.as_str()
    };

    match kind {
        "player" => Ok(AssetKind::Player),
        "pick" => Ok(AssetKind::Pick),
        "cash" => Ok(AssetKind::Cash),
        _ => Err(RepairIssue::InvalidAssetType(declared.to_string())),
    }
}

/// Turn a candidate into a validated, normalized transfer.
pub fn repair_transfer(candidate: CandidateTransfer) -> Result<Transfer, RepairIssue> {
    let CandidateTransfer { from_team, to_team, asset } = candidate;
    let kind = asset_kind(&asset.kind)?;

    let asset = match kind {
        AssetKind::Player => player_asset(asset)?,
        AssetKind::Pick => pick_asset(asset)?,
        AssetKind::Cash => TransferAsset::Cash {
            amount: asset.amount.as_ref().and_then(scalar_text),
        },
    };

    if from_team.trim().is_empty() || to_team.trim().is_empty() {
        return Err(RepairIssue::MissingTeam);
    }
    let from_team = normalize_team_name(&from_team);
    let to_team = normalize_team_name(&to_team);

    let asset = match asset {
        TransferAsset::Pick { year, round, owning_team } => TransferAsset::Pick {
            year,
            round,
            owning_team: Some(owning_team.unwrap_or_else(|| from_team.clone())),
        },
        other => other,
    };

    Ok(Transfer { from_team, to_team, asset })
}

fn player_asset(asset: CandidateAsset) -> Result<TransferAsset, RepairIssue> {
    match asset.name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(TransferAsset::Player { name }),
        _ => Err(RepairIssue::MissingPlayerName),
    }
}

fn pick_asset(asset: CandidateAsset) -> Result<TransferAsset, RepairIssue> {
    let declared_year = asset.year.as_ref().and_then(scalar_text).unwrap_or_default();
    let year = first_four_digits(&declared_year)
        .ok_or_else(|| RepairIssue::BadYear(format!("{declared_year:?}")))?;

    let round = asset
        .round
        .as_ref()
        .and_then(parse_round)
        .ok_or_else(|| RepairIssue::BadRound(describe(asset.round.as_ref())))?;

    let owning_team: Option<TeamCode> = asset
        .team
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(normalize_team_name);

    Ok(TransferAsset::Pick { year: year.to_string(), round, owning_team })
}

/// First window of four consecutive ASCII digits, e.g. "20255" -> "2025".
pub fn first_four_digits(text: &str) -> Option<&str> {
    text.as_bytes()
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .map(|start| &text[start..start + 4])
}

/// Accepts 1, 2, "1", "2", "1st", "2nd".
fn parse_round(value: &Value) -> Option<DraftRound> {
    let number = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            let digits = s
                .strip_suffix("st")
                .or_else(|| s.strip_suffix("nd"))
                .unwrap_or(&s);
            digits.parse::<u64>().ok()?
        }
        _ => return None,
    };
    u8::try_from(number).ok().and_then(|n| DraftRound::try_from(n).ok())
}

/// Text of a string or number value; blank strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "missing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_candidate(from: &str, to: &str, asset: Value) -> CandidateTransfer {
        serde_json::from_value(json!({"from_team": from, "to_team": to, "asset": asset})).unwrap()
    }

    #[test]
    fn test_player_transfer_normalized() {
        let transfer = repair_transfer(make_candidate(
            "Los Angeles Lakers",
            "Washington Wizards",
            json!({"type": "player", "name": " Kendrick Nunn "}),
        ))
        .unwrap();
        assert_eq!(transfer.from_team, "LAL");
        assert_eq!(transfer.to_team, "WAS");
        assert_eq!(transfer.asset, TransferAsset::Player { name: "Kendrick Nunn".to_string() });
    }

    #[test]
    fn test_pick_synonym_and_default_owner() {
        let transfer = repair_transfer(make_candidate(
            "Detroit Pistons",
            "New York Knicks",
            json!({"type": "draft_pick", "year": "2025 second round", "round": 2}),
        ))
        .unwrap();
        assert_eq!(
            transfer.asset,
            TransferAsset::Pick {
                year: "2025".to_string(),
                round: DraftRound::Second,
                owning_team: Some("DET".to_string()),
            }
        );
    }

    #[test]
    fn test_third_party_owner() {
        let transfer = repair_transfer(make_candidate(
            "Miami Heat",
            "Boston Celtics",
            json!({"type": "pick", "year": 2026, "round": "1st", "team": "Los Angeles Lakers"}),
        ))
        .unwrap();
        assert_eq!(transfer.from_team, "MIA");
        assert_eq!(transfer.to_team, "BOS");
        assert_eq!(
            transfer.asset,
            TransferAsset::Pick {
                year: "2026".to_string(),
                round: DraftRound::First,
                owning_team: Some("LAL".to_string()),
            }
        );
    }

    #[test]
    fn test_invalid_type_dropped() {
        let issue = repair_transfer(make_candidate("Heat", "Celtics", json!({"type": "trade exception"})))
            .unwrap_err();
        assert_eq!(issue, RepairIssue::InvalidAssetType("trade exception".to_string()));
        assert_eq!(issue.reason(), "invalid_asset_type");
    }

    #[test]
    fn test_bad_years_dropped() {
        for year in [json!("next year"), json!("'25"), json!(null), json!(25)] {
            let issue = repair_transfer(make_candidate(
                "Heat",
                "Celtics",
                json!({"type": "pick", "year": year, "round": 1}),
            ))
            .unwrap_err();
            assert!(matches!(issue, RepairIssue::BadYear(_)), "{year} accepted");
        }
        let missing = repair_transfer(make_candidate("Heat", "Celtics", json!({"type": "pick", "round": 1})));
        assert!(matches!(missing, Err(RepairIssue::BadYear(_))));
    }

    #[test]
    fn test_bad_rounds_dropped() {
        for round in [json!(3), json!(0), json!("third"), json!(null), json!(-1)] {
            let issue = repair_transfer(make_candidate(
                "Heat",
                "Celtics",
                json!({"type": "pick", "year": "2026", "round": round}),
            ))
            .unwrap_err();
            assert!(matches!(issue, RepairIssue::BadRound(_)), "{round} accepted");
        }
    }

    #[test]
    fn test_cash_amount() {
        let transfer = repair_transfer(make_candidate(
            "New York Knicks",
            "Detroit Pistons",
            json!({"type": "Cash", "amount": "$110,000"}),
        ))
        .unwrap();
        assert_eq!(transfer.asset, TransferAsset::Cash { amount: Some("$110,000".to_string()) });

        let bare = repair_transfer(make_candidate("Knicks", "Pistons", json!({"type": "cash", "amount": ""})))
            .unwrap();
        assert_eq!(bare.asset, TransferAsset::Cash { amount: None });
    }

    #[test]
    fn test_missing_name_and_team() {
        let nameless = repair_transfer(make_candidate("Heat", "Celtics", json!({"type": "player"})));
        assert_eq!(nameless.unwrap_err(), RepairIssue::MissingPlayerName);

        let teamless = repair_transfer(make_candidate(" ", "Celtics", json!({"type": "cash"})));
        assert_eq!(teamless.unwrap_err(), RepairIssue::MissingTeam);
    }

    #[test]
    fn test_long_digit_run_truncated_to_year() {
        let transfer = repair_transfer(make_candidate(
            "Heat",
            "Celtics",
            json!({"type": "pick", "year": "20255", "round": 2}),
        ))
        .unwrap();
        assert!(matches!(transfer.asset, TransferAsset::Pick { ref year, .. } if year == "2025"));
    }

    #[test]
    fn test_first_four_digits() {
        assert_eq!(first_four_digits("2004-05"), Some("2004"));
        assert_eq!(first_four_digits("round 2 of 2019"), Some("2019"));
        assert_eq!(first_four_digits("12345 then 2020"), Some("1234"));
        assert_eq!(first_four_digits("20255"), Some("2025"));
        assert_eq!(first_four_digits("'24"), None);
        assert_eq!(first_four_digits("é2021"), Some("2021"));
    }
}
