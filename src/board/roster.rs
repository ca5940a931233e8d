//! The unit roster: the authoritative store of living boats per team.
//!
//! Both fleets live in one `Roster` so the rule calculators can take a
//! single snapshot. Within a team, boats are keyed by position; the
//! opposing teams may occupy the same cell simultaneously (submarines pass
//! under each other), which is a legal and tactically distinct state.
//!
//! `add` is a permissive primitive: it does not police the one-boat-per-cell
//! or four-boats-per-team rules. That policy is enforced one layer up, at
//! the deployment boundary (`board::deploy`).

use super::grid::CellPos;
use super::unit::{Team, Unit};

/// Result of applying damage to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// No boat of the target team at that cell; nothing happened.
    NoTarget,
    /// The boat lost a hit point and survives.
    Damaged,
    /// The boat lost its last hit point and was removed from the roster.
    Destroyed,
}

/// The living units of both fleets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    red: Vec<Unit>,
    blue: Vec<Unit>,
}

impl Roster {
    /// Creates an empty roster with no boats on either side.
    pub fn new() -> Self {
        Roster::default()
    }

    /// Returns the living boats of a team.
    pub fn units(&self, team: Team) -> &[Unit] {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    fn units_mut(&mut self, team: Team) -> &mut Vec<Unit> {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }

    /// Inserts a fresh boat at full hit points for the given team.
    ///
    /// Does not check occupancy: adding onto a cell the same team already
    /// holds stacks a second boat there. Deployment validation prevents
    /// that state from ever reaching a battle.
    pub fn add(&mut self, team: Team, pos: CellPos) {
        self.units_mut(team).push(Unit::new(pos));
    }

    /// Removes the team's boat at `pos` if present. Returns whether a boat
    /// was removed; asking to remove from an empty cell is not an error.
    pub fn remove_at(&mut self, team: Team, pos: CellPos) -> bool {
        let units = self.units_mut(team);
        match units.iter().position(|u| u.pos == pos) {
            Some(idx) => {
                units.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns the team's boat at `pos`, if any.
    pub fn unit_at(&self, team: Team, pos: CellPos) -> Option<&Unit> {
        self.units(team).iter().find(|u| u.pos == pos)
    }

    /// Returns true if the team has a boat at `pos`.
    pub fn exists_at(&self, team: Team, pos: CellPos) -> bool {
        self.unit_at(team, pos).is_some()
    }

    /// Number of living boats in the team's fleet.
    pub fn count_alive(&self, team: Team) -> usize {
        self.units(team).len()
    }

    /// A team wins when it still has boats and the opponent has none.
    pub fn is_winner(&self, team: Team) -> bool {
        self.count_alive(team) > 0 && self.count_alive(team.opponent()) == 0
    }

    /// Deals one hit point of damage to the team's boat at `pos`.
    ///
    /// Removes the boat when its last hit point is gone; the roster never
    /// retains a boat at 0 hp. A cell with no boat reports `NoTarget`.
    pub fn apply_damage(&mut self, team: Team, pos: CellPos) -> DamageResult {
        let units = self.units_mut(team);
        let idx = match units.iter().position(|u| u.pos == pos) {
            Some(i) => i,
            None => return DamageResult::NoTarget,
        };
        if units[idx].hp > 1 {
            units[idx].hp -= 1;
            DamageResult::Damaged
        } else {
            units.remove(idx);
            DamageResult::Destroyed
        }
    }

    /// Moves the team's boat at `from` to `to`, keeping its hit points.
    /// Returns false (and changes nothing) if the team has no boat at `from`.
    pub fn relocate(&mut self, team: Team, from: CellPos, to: CellPos) -> bool {
        let units = self.units_mut(team);
        match units.iter_mut().find(|u| u.pos == from) {
            Some(unit) => {
                unit.pos = to;
                true
            }
            None => false,
        }
    }
}
