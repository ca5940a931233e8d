//! Deployment-phase policy.
//!
//! The roster's `add` primitive is deliberately permissive; the rules that
//! players actually face (one boat per cell, exactly four boats per fleet
//! before battle) are enforced here, at the placement-flow boundary. The
//! placement UI toggles cells on and off; when both fleets are complete the
//! deployment is handed to the turn controller, which refuses anything
//! other than exactly four boats per side.

use std::collections::BTreeSet;

use super::grid::{self, CellPos};
use super::unit::Team;

/// Boats each fleet must field before battle can start.
pub const FLEET_SIZE: usize = 4;

/// Why a deployment was refused at battle start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    #[error("{} fleet has {} boats, needs exactly 4", .team.name(), .count)]
    WrongFleetSize { team: Team, count: usize },

    #[error("cell {0} is off the grid")]
    OutOfBounds(CellPos),

    #[error("duplicate cell {} in {} fleet", .0, .1.name())]
    DuplicateCell(CellPos, Team),
}

/// Per-team placement sets built up during the deployment phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployment {
    red: BTreeSet<CellPos>,
    blue: BTreeSet<CellPos>,
}

impl Deployment {
    /// Creates an empty deployment.
    pub fn new() -> Self {
        Deployment::default()
    }

    /// Builds a deployment from explicit placement lists, validating that
    /// every cell is on the grid, no cell repeats within a fleet, and each
    /// fleet has exactly [`FLEET_SIZE`] boats.
    pub fn from_lists(red: &[CellPos], blue: &[CellPos]) -> Result<Self, DeployError> {
        let mut deployment = Deployment::new();
        for (team, list) in [(Team::Red, red), (Team::Blue, blue)] {
            for &pos in list {
                if !grid::in_bounds(pos) {
                    return Err(DeployError::OutOfBounds(pos));
                }
                if !deployment.cells_mut(team).insert(pos) {
                    return Err(DeployError::DuplicateCell(pos, team));
                }
            }
        }
        deployment.check_complete()?;
        Ok(deployment)
    }

    /// Returns the cells a team has placed boats on so far.
    pub fn cells(&self, team: Team) -> &BTreeSet<CellPos> {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    fn cells_mut(&mut self, team: Team) -> &mut BTreeSet<CellPos> {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    /// Click-toggle semantics from the placement screen: a placed cell is
    /// removed; an empty cell is placed, unless the fleet is already full
    /// or the cell is off the grid. Returns whether anything changed.
    pub fn toggle(&mut self, team: Team, pos: CellPos) -> bool {
        if !grid::in_bounds(pos) {
            return false;
        }
        let cells = self.cells_mut(team);
        if cells.remove(&pos) {
            return true;
        }
        if cells.len() >= FLEET_SIZE {
            return false;
        }
        cells.insert(pos)
    }

    /// True once both fleets hold exactly [`FLEET_SIZE`] boats.
    pub fn is_complete(&self) -> bool {
        self.check_complete().is_ok()
    }

    fn check_complete(&self) -> Result<(), DeployError> {
        for team in [Team::Red, Team::Blue] {
            let count = self.cells(team).len();
            if count != FLEET_SIZE {
                return Err(DeployError::WrongFleetSize { team, count });
            }
        }
        Ok(())
    }

    /// Validates the deployment for battle start.
    pub fn validate(&self) -> Result<(), DeployError> {
        self.check_complete()
    }
}
