//! Teams and units.
//!
//! Represents the two opposing fleets and the individual submarines,
//! each with a grid position and remaining hit points.

use serde::{Deserialize, Serialize};

use super::grid::CellPos;

/// Hit points a submarine starts the battle with.
pub const MAX_HP: u8 = 3;

/// One of the two opposing fleets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Blue,
}

/// Both teams, in protocol order.
pub const ALL_TEAMS: [Team; 2] = [Team::Red, Team::Blue];

impl Team {
    /// Returns the opposing team.
    pub const fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Returns the single-character SFEN abbreviation.
    pub const fn sfen_char(self) -> char {
        match self {
            Team::Red => 'r',
            Team::Blue => 'b',
        }
    }

    /// Parses a team from its single-character SFEN abbreviation.
    pub fn from_sfen_char(c: char) -> Option<Team> {
        match c {
            'r' => Some(Team::Red),
            'b' => Some(Team::Blue),
            _ => None,
        }
    }

    /// Returns the lowercase team name used in protocol output.
    pub const fn name(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    /// Parses a team from its lowercase name.
    pub fn from_name(s: &str) -> Option<Team> {
        match s {
            "red" => Some(Team::Red),
            "blue" => Some(Team::Blue),
            _ => None,
        }
    }
}

/// A single submarine: where it sits and how much damage it can still take.
///
/// A boat at 0 hit points does not exist; the roster removes it the moment
/// the last point is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub pos: CellPos,
    pub hp: u8,
}

impl Unit {
    /// Creates a fresh boat at full hit points.
    pub const fn new(pos: CellPos) -> Self {
        Unit { pos, hp: MAX_HP }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_swaps_teams() {
        assert_eq!(Team::Red.opponent(), Team::Blue);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn opponent_is_involutive() {
        for team in ALL_TEAMS {
            assert_eq!(team.opponent().opponent(), team);
        }
    }

    #[test]
    fn team_sfen_roundtrip() {
        for team in ALL_TEAMS {
            assert_eq!(Team::from_sfen_char(team.sfen_char()), Some(team));
        }
        assert_eq!(Team::from_sfen_char('x'), None);
    }

    #[test]
    fn team_name_roundtrip() {
        for team in ALL_TEAMS {
            assert_eq!(Team::from_name(team.name()), Some(team));
        }
        assert_eq!(Team::from_name("green"), None);
        assert_eq!(Team::from_name(""), None);
    }

    #[test]
    fn new_unit_starts_at_full_health() {
        let unit = Unit::new(CellPos::new(2, 3));
        assert_eq!(unit.pos, CellPos::new(2, 3));
        assert_eq!(unit.hp, MAX_HP);
    }
}
