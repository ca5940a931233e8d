//! SFEN (Submarine FEN) encoding and decoding.
//!
//! SFEN is a compact string notation for a battle position between turns,
//! inspired by chess FEN. It encodes the turn counter, the side to act,
//! whether the battle is over, and both fleets in a single line.
//!
//! Format: `<turn_info>/<red units>/<blue units>`
//!
//! - `turn_info` is the turn number, the side to act (`r`/`b`), and a
//!   phase character: `s` while the battle runs (the side is choosing its
//!   operation), `f` once a fleet has been eliminated.
//! - Each fleet section lists its boats as `<row><col>` cells with an
//!   optional `.<hp>` suffix (full health when omitted), comma separated;
//!   an empty fleet is written `-`.
//!
//! Example: `7bs/00,11.2,22,33/44,40.1,04,13`
//!
//! Pending in-turn selections are transient interaction state, not
//! position, so SFEN only represents between-turn snapshots.

use std::collections::BTreeSet;

use crate::board::{in_bounds, CellPos, Roster, Team, FLEET_SIZE, MAX_HP};
use crate::turn::TurnController;

/// Errors that can occur during SFEN parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SfenError {
    #[error("expected 3 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid turn info: '{0}'")]
    InvalidTurnInfo(String),

    #[error("invalid turn number: '{0}'")]
    InvalidTurnNumber(String),

    #[error("invalid team character: '{0}'")]
    InvalidTeam(char),

    #[error("invalid phase character: '{0}'")]
    InvalidPhase(char),

    #[error("invalid unit entry: '{0}'")]
    InvalidUnitEntry(String),

    #[error("cell '{0}' is off the grid")]
    OffGridCell(String),

    #[error("invalid hit points in entry '{0}'")]
    InvalidHitPoints(String),

    #[error("duplicate {1} unit at '{0}'")]
    DuplicateUnit(String, &'static str),

    #[error("{0} fleet exceeds {FLEET_SIZE} boats")]
    FleetTooLarge(&'static str),

    #[error("{0} fleet is empty but the battle is not finished")]
    EmptyFleet(&'static str),

    #[error("finished position must have exactly one eliminated fleet")]
    FinishedWithoutWinner,
}

/// Formats a cell as its two-digit SFEN token, e.g. `(2,3)` -> "23".
pub fn format_cell(pos: CellPos) -> String {
    format!("{}{}", pos.row, pos.col)
}

/// Parses a two-digit SFEN cell token. Checks digits only, not bounds.
pub fn parse_cell(token: &str) -> Option<CellPos> {
    let mut chars = token.chars();
    let row = chars.next()?.to_digit(10)?;
    let col = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    Some(CellPos::new(row as u8, col as u8))
}

/// Encodes the battle position as an SFEN string.
///
/// Fleets are listed in cell order, so equal positions encode identically.
pub fn encode_sfen(ctrl: &TurnController) -> String {
    let phase = if ctrl.winner().is_some() { 'f' } else { 's' };
    let mut out = format!(
        "{}{}{}",
        ctrl.turn_number(),
        ctrl.current_team().sfen_char(),
        phase
    );
    for team in [Team::Red, Team::Blue] {
        out.push('/');
        out.push_str(&encode_fleet(ctrl.roster(), team));
    }
    out
}

fn encode_fleet(roster: &Roster, team: Team) -> String {
    let mut units: Vec<_> = roster.units(team).to_vec();
    if units.is_empty() {
        return "-".to_string();
    }
    units.sort_by_key(|u| u.pos);
    let entries: Vec<String> = units
        .iter()
        .map(|u| {
            if u.hp == MAX_HP {
                format_cell(u.pos)
            } else {
                format!("{}.{}", format_cell(u.pos), u.hp)
            }
        })
        .collect();
    entries.join(",")
}

/// Parses an SFEN string into a turn controller positioned at the top of
/// a turn (or at the finished state).
pub fn parse_sfen(sfen: &str) -> Result<TurnController, SfenError> {
    let sections: Vec<&str> = sfen.split('/').collect();
    if sections.len() != 3 {
        return Err(SfenError::WrongSectionCount(sections.len()));
    }

    let (turn_number, team, phase) = parse_turn_info(sections[0])?;

    let mut roster = Roster::new();
    for (fleet_team, section) in [(Team::Red, sections[1]), (Team::Blue, sections[2])] {
        parse_fleet(section, fleet_team, &mut roster)?;
    }

    let red = roster.count_alive(Team::Red);
    let blue = roster.count_alive(Team::Blue);
    match phase {
        's' => {
            if red == 0 {
                return Err(SfenError::EmptyFleet(Team::Red.name()));
            }
            if blue == 0 {
                return Err(SfenError::EmptyFleet(Team::Blue.name()));
            }
        }
        'f' => {
            if (red == 0) == (blue == 0) {
                return Err(SfenError::FinishedWithoutWinner);
            }
        }
        other => return Err(SfenError::InvalidPhase(other)),
    }

    Ok(TurnController::from_position(roster, team, turn_number))
}

/// Parses `<turn number><team char><phase char>`, e.g. "12bs".
fn parse_turn_info(section: &str) -> Result<(u32, Team, char), SfenError> {
    let digits: String = section.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest: Vec<char> = section.chars().skip(digits.len()).collect();

    if digits.is_empty() || rest.len() != 2 {
        return Err(SfenError::InvalidTurnInfo(section.to_string()));
    }
    let turn_number: u32 = digits
        .parse()
        .map_err(|_| SfenError::InvalidTurnNumber(digits.clone()))?;
    if turn_number == 0 {
        return Err(SfenError::InvalidTurnNumber(digits));
    }
    let team = Team::from_sfen_char(rest[0]).ok_or(SfenError::InvalidTeam(rest[0]))?;
    Ok((turn_number, team, rest[1]))
}

fn parse_fleet(section: &str, team: Team, roster: &mut Roster) -> Result<(), SfenError> {
    if section == "-" {
        return Ok(());
    }
    let mut seen: BTreeSet<CellPos> = BTreeSet::new();
    for entry in section.split(',') {
        let (pos, hp) = parse_unit_entry(entry)?;
        if !seen.insert(pos) {
            return Err(SfenError::DuplicateUnit(entry.to_string(), team.name()));
        }
        if seen.len() > FLEET_SIZE {
            return Err(SfenError::FleetTooLarge(team.name()));
        }
        roster.add(team, pos);
        for _ in hp..MAX_HP {
            roster.apply_damage(team, pos);
        }
    }
    Ok(())
}

/// Parses a unit entry: `<row><col>` with an optional `.<hp>` suffix.
fn parse_unit_entry(entry: &str) -> Result<(CellPos, u8), SfenError> {
    let (cell_part, hp_part) = match entry.split_once('.') {
        Some((cell, hp)) => (cell, Some(hp)),
        None => (entry, None),
    };
    let pos = parse_cell(cell_part).ok_or_else(|| SfenError::InvalidUnitEntry(entry.to_string()))?;
    if !in_bounds(pos) {
        return Err(SfenError::OffGridCell(entry.to_string()));
    }
    let hp = match hp_part {
        Some(text) => {
            let hp: u8 = text
                .parse()
                .map_err(|_| SfenError::InvalidHitPoints(entry.to_string()))?;
            if hp == 0 || hp > MAX_HP {
                return Err(SfenError::InvalidHitPoints(entry.to_string()));
            }
            hp
        }
        None => MAX_HP,
    };
    Ok((pos, hp))
}
