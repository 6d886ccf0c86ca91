//! Core data types for the trade-ledger system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical 3-letter franchise code (e.g. "LAL").
pub type TeamCode = String;

/// Season year used to address archives and checkpoints.
pub type Year = u16;

/// Trades keyed by season year, in ascending year order.
pub type TradesByYear = BTreeMap<Year, Vec<Trade>>;

/// Draft round of a conveyed pick. Only the first two rounds exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DraftRound {
    First = 1,
    Second = 2,
}

impl DraftRound {
    /// Round number as it appears on the wire.
    #[inline]
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for DraftRound {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(DraftRound::First),
            2 => Ok(DraftRound::Second),
            other => Err(format!("draft round must be 1 or 2, got {other}")),
        }
    }
}

impl From<DraftRound> for u8 {
    fn from(round: DraftRound) -> Self {
        round.number()
    }
}

/// A concrete asset as it appears in a persisted trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Asset {
    /// A player changing teams.
    Player { name: String },
    /// A draft right. `owning_team` is the franchise whose pick is conveyed,
    /// which need not be either side of the transfer.
    Pick {
        year: String,
        round: DraftRound,
        #[serde(rename = "team")]
        owning_team: TeamCode,
    },
    /// Cash consideration.
    Cash {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<String>,
    },
}

impl Asset {
    /// Create a player asset.
    pub fn player(name: impl Into<String>) -> Self {
        Asset::Player { name: name.into() }
    }

    /// Create a pick asset.
    pub fn pick(year: impl Into<String>, round: DraftRound, owning_team: impl Into<TeamCode>) -> Self {
        Asset::Pick {
            year: year.into(),
            round,
            owning_team: owning_team.into(),
        }
    }

    /// Create a cash asset without a stated amount.
    pub fn cash() -> Self {
        Asset::Cash { amount: None }
    }
}

/// Asset carried by a transfer before aggregation.
///
/// Identical to [`Asset`] except that a pick's owning team may still be
/// unresolved; [`Transfer::materialize`] fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferAsset {
    Player { name: String },
    Pick {
        year: String,
        round: DraftRound,
        owning_team: Option<TeamCode>,
    },
    Cash { amount: Option<String> },
}

/// One atomic, directional movement of a single asset between two teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Team giving up the asset.
    pub from_team: TeamCode,
    /// Team receiving the asset.
    pub to_team: TeamCode,
    /// The asset moved.
    pub asset: TransferAsset,
}

impl Transfer {
    /// Create a transfer.
    pub fn new(from_team: impl Into<TeamCode>, to_team: impl Into<TeamCode>, asset: TransferAsset) -> Self {
        Self {
            from_team: from_team.into(),
            to_team: to_team.into(),
            asset,
        }
    }

    /// Produce the concrete asset, defaulting an unowned pick to `from_team`.
    pub fn materialize(&self) -> Asset {
        match &self.asset {
            TransferAsset::Player { name } => Asset::Player { name: name.clone() },
            TransferAsset::Pick { year, round, owning_team } => Asset::Pick {
                year: year.clone(),
                round: *round,
                owning_team: owning_team.clone().unwrap_or_else(|| self.from_team.clone()),
            },
            TransferAsset::Cash { amount } => Asset::Cash { amount: amount.clone() },
        }
    }
}

/// One team's side of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInTrade {
    /// Canonical team code.
    pub team: TeamCode,
    /// Assets this team gave up, in transfer order.
    pub sent: Vec<Asset>,
    /// Assets this team received, in transfer order.
    pub acquired: Vec<Asset>,
}

impl TeamInTrade {
    /// Create an empty team view.
    pub fn new(team: impl Into<TeamCode>) -> Self {
        Self {
            team: team.into(),
            sent: Vec::new(),
            acquired: Vec::new(),
        }
    }

    /// Whether anything moved in or out of this team.
    #[inline]
    pub fn has_activity(&self) -> bool {
        !self.sent.is_empty() || !self.acquired.is_empty()
    }
}

/// Aggregated, team-centric view of one trade announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// More than two teams involved.
    pub is_multi_team: bool,
    /// Number of distinct teams.
    pub num_teams: usize,
    /// Team views sorted by code.
    pub teams: Vec<TeamInTrade>,
}

impl Trade {
    /// Build a trade from team views, sorting them and deriving the counts.
    pub fn from_teams(mut teams: Vec<TeamInTrade>) -> Self {
        teams.sort_by(|a, b| a.team.cmp(&b.team));
        let num_teams = teams.len();
        Self {
            is_multi_team: num_teams > 2,
            num_teams,
            teams,
        }
    }

    /// Look up a team's view by code.
    pub fn team(&self, code: &str) -> Option<&TeamInTrade> {
        self.teams.iter().find(|t| t.team == code)
    }

    /// Team codes in order.
    pub fn team_codes(&self) -> Vec<&str> {
        self.teams.iter().map(|t| t.team.as_str()).collect()
    }
}

/// Inclusive span of season years processed and checkpointed as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(Year, Year)", into = "(Year, Year)")]
pub struct YearRange {
    /// First year (inclusive).
    pub start: Year,
    /// Last year (inclusive).
    pub end: Year,
}

impl YearRange {
    /// Create a range.
    pub fn new(start: Year, end: Year) -> Self {
        Self { start, end }
    }

    /// Years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = Year> {
        self.start..=self.end
    }

    /// Number of years covered.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    /// Whether the range covers no years.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the two ranges share a year.
    pub fn overlaps(&self, other: &YearRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Identifier used in artifact names, e.g. "2004_2008".
    pub fn label(&self) -> String {
        format!("{}_{}", self.start, self.end)
    }
}

impl From<(Year, Year)> for YearRange {
    fn from((start, end): (Year, Year)) -> Self {
        Self { start, end }
    }
}

impl From<YearRange> for (Year, Year) {
    fn from(range: YearRange) -> Self {
        (range.start, range.end)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        let mut lal = TeamInTrade::new("LAL");
        lal.sent.push(Asset::player("Kendrick Nunn"));
        lal.acquired.push(Asset::pick("2026", DraftRound::First, "BOS"));
        let mut was = TeamInTrade::new("WAS");
        was.sent.push(Asset::pick("2026", DraftRound::First, "BOS"));
        was.acquired.push(Asset::player("Kendrick Nunn"));
        was.acquired.push(Asset::Cash { amount: Some("$2M".to_string()) });
        Trade::from_teams(vec![was, lal])
    }

    #[test]
    fn test_trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string_pretty(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }

    #[test]
    fn test_asset_wire_format() {
        let pick = Asset::pick("2025", DraftRound::Second, "DET");
        let value = serde_json::to_value(&pick).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"type": "pick", "year": "2025", "round": 2, "team": "DET"})
        );

        let cash = serde_json::to_value(Asset::cash()).unwrap();
        assert_eq!(cash, serde_json::json!({"type": "cash"}));
    }

    #[test]
    fn test_round_rejects_third() {
        let json = r#"{"type": "pick", "year": "2025", "round": 3, "team": "DET"}"#;
        assert!(serde_json::from_str::<Asset>(json).is_err());
        assert!(DraftRound::try_from(0).is_err());
        assert_eq!(DraftRound::try_from(1).unwrap(), DraftRound::First);
    }

    #[test]
    fn test_from_teams_sorts_and_counts() {
        let trade = make_trade();
        assert_eq!(trade.team_codes(), vec!["LAL", "WAS"]);
        assert_eq!(trade.num_teams, 2);
        assert!(!trade.is_multi_team);

        let three = Trade::from_teams(vec![
            TeamInTrade::new("MIA"),
            TeamInTrade::new("BOS"),
            TeamInTrade::new("DEN"),
        ]);
        assert!(three.is_multi_team);
        assert_eq!(three.team_codes(), vec!["BOS", "DEN", "MIA"]);
    }

    #[test]
    fn test_materialize_defaults_pick_owner() {
        let transfer = Transfer::new(
            "DET",
            "NYK",
            TransferAsset::Pick {
                year: "2025".to_string(),
                round: DraftRound::Second,
                owning_team: None,
            },
        );
        assert_eq!(transfer.materialize(), Asset::pick("2025", DraftRound::Second, "DET"));
    }

    #[test]
    fn test_trades_by_year_keys_are_strings() {
        let mut by_year = TradesByYear::new();
        by_year.insert(2005, vec![]);
        by_year.insert(2004, vec![make_trade()]);
        let json = serde_json::to_string(&by_year).unwrap();
        assert!(json.starts_with("{\"2004\":"));
        let back: TradesByYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back, by_year);
    }

    #[test]
    fn test_year_range() {
        let range = YearRange::new(2004, 2008);
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2004, 2005, 2006, 2007, 2008]);
        assert_eq!(range.label(), "2004_2008");
        assert!(range.overlaps(&YearRange::new(2008, 2010)));
        assert!(!range.overlaps(&YearRange::new(2009, 2014)));
    }
}
