//! Fixed instructions and output schema sent with every clause.

use serde_json::{json, Value};

/// System instructions for the extraction model.
///
/// Worked examples cover a single asset, cash only, a two-way swap, pick plus
/// cash, and a pick owned by a third team.
pub const SYSTEM_PROMPT: &str = r#"Parse an NBA trade clause into atomic transfers.

PATTERN: "X traded A to Y for B"
-> X sends A to Y
-> Y sends B to X

ASSETS:
- Player: {"type": "player", "name": "Full Name"}
- Pick: {"type": "pick", "year": "YYYY", "round": 1 or 2, "team": "Owner Team Name"}
- Cash: {"type": "cash"}

PICK OWNERSHIP:
"Lakers 2024 1st" -> team="Los Angeles Lakers"
"their own 2024 1st" -> team=TEAM_TRADING_IT
No owner mentioned -> team=TEAM_TRADING_IT

IGNORE: trade exceptions, protections, conditionals

EXAMPLES:

"Hawks traded Glenn Robinson to 76ers"
-> [{"from_team": "Atlanta Hawks", "to_team": "Philadelphia 76ers", "asset": {"type": "player", "name": "Glenn Robinson"}}]

"Lakers traded cash to Wizards"
-> [{"from_team": "Los Angeles Lakers", "to_team": "Washington Wizards", "asset": {"type": "cash"}}]

"Lakers traded Nunn to Wizards for Hachimura"
-> [{"from_team": "Los Angeles Lakers", "to_team": "Washington Wizards", "asset": {"type": "player", "name": "Kendrick Nunn"}},
    {"from_team": "Washington Wizards", "to_team": "Los Angeles Lakers", "asset": {"type": "player", "name": "Rui Hachimura"}}]

"Pistons traded 2025 2nd to Knicks for cash"
-> [{"from_team": "Detroit Pistons", "to_team": "New York Knicks", "asset": {"type": "pick", "year": "2025", "round": 2, "team": "Detroit Pistons"}},
    {"from_team": "New York Knicks", "to_team": "Detroit Pistons", "asset": {"type": "cash"}}]

"Heat traded Lakers 2026 1st to Celtics"
-> [{"from_team": "Miami Heat", "to_team": "Boston Celtics", "asset": {"type": "pick", "year": "2026", "round": 1, "team": "Los Angeles Lakers"}}]

Return JSON only."#;

/// User message for one clause.
pub fn user_prompt(clause: &str) -> String {
    format!("Parse this clause into transfers:\n{clause}")
}

/// JSON schema the service must answer with: `{"transfers": [...]}`.
pub fn transfer_list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "transfers": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "from_team": {"type": "string"},
                        "to_team": {"type": "string"},
                        "asset": {
                            "type": "object",
                            "properties": {
                                "type": {"type": "string", "enum": ["player", "pick", "cash"]},
                                "name": {"type": "string"},
                                "year": {"type": "string"},
                                "round": {"type": "integer", "enum": [1, 2]},
                                "team": {"type": "string"},
                                "amount": {"type": "string"}
                            },
                            "required": ["type"]
                        }
                    },
                    "required": ["from_team", "to_team", "asset"]
                }
            }
        },
        "required": ["transfers"]
    })
}
