//! Transfer aggregation into the team-centric trade view.

use ledger_core::{TeamCode, TeamInTrade, Trade, Transfer};
use std::collections::BTreeMap;

/// Group transfers by team.
///
/// Every transfer puts its materialized asset into the sender's `sent` and the
/// receiver's `acquired` lists, preserving transfer order within each list.
/// Teams come out sorted by code.
pub fn aggregate_transfers(transfers: &[Transfer]) -> Trade {
    let mut teams: BTreeMap<TeamCode, TeamInTrade> = BTreeMap::new();

    for transfer in transfers {
        let asset = transfer.materialize();
        teams
            .entry(transfer.from_team.clone())
            .or_insert_with(|| TeamInTrade::new(transfer.from_team.clone()))
            .sent
            .push(asset.clone());
        teams
            .entry(transfer.to_team.clone())
            .or_insert_with(|| TeamInTrade::new(transfer.to_team.clone()))
            .acquired
            .push(asset);
    }

    Trade::from_teams(teams.into_values().collect())
}
