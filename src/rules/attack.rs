//! Depth charge targeting and outcome classification.
//!
//! Pure functions over roster snapshots: which cells a fleet may fire at,
//! and what a shot at a given cell reports back. Nothing here mutates the
//! roster; damage is applied by the turn controller after classification.

use std::collections::BTreeSet;

use crate::board::{chebyshev, neighborhood, CellPos, Roster, Team};

/// What the attacking side learns when a depth charge resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// An enemy boat on its last hit point took the hit and went down.
    Sunk,
    /// An enemy boat took the hit and survives.
    Hit,
    /// The cell was empty but an enemy boat sits within Chebyshev
    /// distance 1 -- the sonar "warm" reading.
    Near,
    /// Open water, nothing nearby.
    Miss,
}

impl Outcome {
    /// Returns the lowercase protocol word for the outcome.
    pub const fn name(self) -> &'static str {
        match self {
            Outcome::Sunk => "sunk",
            Outcome::Hit => "hit",
            Outcome::Near => "near",
            Outcome::Miss => "miss",
        }
    }
}

/// Computes every cell the given team may legally fire at.
///
/// Each of the team's boats contributes its in-bounds 3x3 neighborhood
/// (the boat's own cell included); cells occupied by the team's own boats
/// are then removed, since a fleet may never target itself.
pub fn attackable_cells(team: Team, roster: &Roster) -> BTreeSet<CellPos> {
    let mut cells = BTreeSet::new();
    for unit in roster.units(team) {
        cells.extend(neighborhood(unit.pos));
    }
    for unit in roster.units(team) {
        cells.remove(&unit.pos);
    }
    cells
}

/// Classifies a depth charge dropped on `target` against the defending
/// team's roster, *before* any damage is applied.
///
/// An occupied target always reports `Hit` or `Sunk` regardless of what
/// else is nearby; the neighborhood scan only runs for empty cells.
pub fn classify_attack(target: CellPos, defender: Team, roster: &Roster) -> Outcome {
    if let Some(unit) = roster.unit_at(defender, target) {
        if unit.hp == 1 {
            return Outcome::Sunk;
        }
        return Outcome::Hit;
    }
    let near = roster
        .units(defender)
        .iter()
        .any(|u| chebyshev(u.pos, target) <= 1);
    if near {
        Outcome::Near
    } else {
        Outcome::Miss
    }
}
