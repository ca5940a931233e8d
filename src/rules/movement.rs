//! Movement legality.
//!
//! A submarine moves 1 or 2 cells along a single cardinal axis. Friendly
//! boats block a destination; enemy boats do not -- a submarine may slip
//! onto (and share) a cell the enemy occupies.

use std::collections::BTreeSet;

use crate::board::{cardinal_reach, CellPos, Roster, Team};

/// Computes the legal destinations for the moving team's boat at `origin`.
///
/// Candidates are the up-to-8 cells of the cardinal reach (1 or 2 steps
/// along one axis), clipped to the grid; any cell holding a boat of the
/// moving team is removed. The origin itself is never a candidate, so a
/// boat cannot "move" in place.
pub fn movable_cells(origin: CellPos, team: Team, roster: &Roster) -> BTreeSet<CellPos> {
    cardinal_reach(origin)
        .into_iter()
        .filter(|&cell| !roster.exists_at(team, cell))
        .collect()
}
