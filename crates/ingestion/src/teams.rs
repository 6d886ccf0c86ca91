//! Team name canonicalization.
//!
//! Maps current, legacy and relocated franchise names to a fixed 3-letter
//! code, so that e.g. "Seattle SuperSonics" and "Oklahoma City Thunder" land
//! on the same team.

use ledger_core::TeamCode;
use tracing::debug;

/// Look up a lower-cased, trimmed name.
fn lookup(key: &str) -> Option<&'static str> {
    let code = match key {
        "atlanta hawks" | "atlanta" | "hawks" | "atl" => "ATL",
        "boston celtics" | "boston" | "celtics" | "bos" => "BOS",
        "brooklyn nets" | "new jersey nets" | "brooklyn" | "new jersey" | "nets" | "bkn" | "brk"
        | "njn" => "BKN",
        "charlotte hornets" | "charlotte bobcats" | "charlotte" | "bobcats" | "cha" | "cho" => {
            "CHA"
        }
        "chicago bulls" | "chicago" | "bulls" | "chi" => "CHI",
        "cleveland cavaliers" | "cleveland" | "cavaliers" | "cavs" | "cle" => "CLE",
        "dallas mavericks" | "dallas" | "mavericks" | "mavs" | "dal" => "DAL",
        "denver nuggets" | "denver" | "nuggets" | "den" => "DEN",
        "detroit pistons" | "detroit" | "pistons" | "det" => "DET",
        "golden state warriors" | "golden state" | "warriors" | "gsw" => "GSW",
        "houston rockets" | "houston" | "rockets" | "hou" => "HOU",
        "indiana pacers" | "indiana" | "pacers" | "ind" => "IND",
        "los angeles clippers" | "la clippers" | "san diego clippers" | "clippers" | "lac" => "LAC",
        "los angeles lakers" | "la lakers" | "lakers" | "lal" => "LAL",
        "memphis grizzlies" | "vancouver grizzlies" | "memphis" | "vancouver" | "grizzlies"
        | "mem" | "van" => "MEM",
        "miami heat" | "miami" | "heat" | "mia" => "MIA",
        "milwaukee bucks" | "milwaukee" | "bucks" | "mil" => "MIL",
        "minnesota timberwolves" | "minnesota" | "timberwolves" | "wolves" | "min" => "MIN",
        "new orleans pelicans" | "new orleans hornets" | "new orleans/oklahoma city hornets"
        | "new orleans" | "pelicans" | "nop" | "noh" | "nok" => "NOP",
        "new york knicks" | "new york" | "knicks" | "nyk" => "NYK",
        "oklahoma city thunder" | "seattle supersonics" | "seattle sonics" | "oklahoma city"
        | "seattle" | "thunder" | "supersonics" | "sonics" | "okc" | "sea" => "OKC",
        "orlando magic" | "orlando" | "magic" | "orl" => "ORL",
        "philadelphia 76ers" | "philadelphia sixers" | "philadelphia" | "76ers" | "sixers"
        | "phi" => "PHI",
        "phoenix suns" | "phoenix" | "suns" | "phx" | "pho" => "PHX",
        "portland trail blazers" | "portland" | "trail blazers" | "blazers" | "por" => "POR",
        "sacramento kings" | "kansas city kings" | "sacramento" | "kings" | "sac" => "SAC",
        "san antonio spurs" | "san antonio" | "spurs" | "sas" => "SAS",
        "toronto raptors" | "toronto" | "raptors" | "tor" => "TOR",
        "utah jazz" | "utah" | "jazz" | "uta" => "UTA",
        "washington wizards" | "washington bullets" | "washington" | "wizards" | "bullets"
        | "was" => "WAS",
        _ => return None,
    };
    Some(code)
}

/// Canonicalize a team name to its 3-letter code.
///
/// Unknown names fall back to the upper-cased first three characters, which
/// are themselves resolved through the table once (so "Seattle" and "SEA"
/// both reach "OKC"). The function is idempotent.
pub fn normalize_team_name(name: &str) -> TeamCode {
    let trimmed = name.trim();
    if let Some(code) = lookup(&trimmed.to_lowercase()) {
        return code.to_string();
    }

    let prefix: String = trimmed.to_uppercase().chars().take(3).collect();
    let prefix = prefix.trim_end();
    match lookup(&prefix.to_lowercase()) {
        Some(code) => code.to_string(),
        None => {
            debug!(name = %trimmed, fallback = %prefix, "Unrecognized team name, using prefix");
            prefix.to_string()
        }
    }
}
