//! SBI command parser.
//!
//! Parses incoming SBI protocol commands from raw text into structured
//! `Command` variants that the session main loop can dispatch on.

use crate::board::CellPos;
use crate::turn::OpKind;

use super::sfen::parse_cell;

/// A parsed presentation-to-engine SBI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the SBI protocol handshake.
    Sbi,

    /// Synchronization ping; the engine must reply `readyok`.
    IsReady,

    /// Discard any battle in progress.
    NewGame,

    /// Start a battle from deployment lists: `start <red>/<blue>`.
    Start { red: Vec<CellPos>, blue: Vec<CellPos> },

    /// Set the battle position from an SFEN string.
    Position { sfen: String },

    /// Choose the operation for this turn: `op attack` or `op move`.
    Op { kind: OpKind },

    /// Select a cell: `cell <row> <col>`.
    Cell { pos: CellPos },

    /// Commit the pending selection.
    Apply,

    /// Abandon the pending selection and return to the top of the turn.
    Back,

    /// Acknowledge that the presentation finished showing the committed
    /// action; performs the deferred turn handoff.
    Ack,

    /// Report the current position and phase.
    State,

    /// Report the currently selectable cells.
    Legal,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    match tokens[0] {
        "sbi" => Some(Command::Sbi),
        "isready" => Some(Command::IsReady),
        "newgame" => Some(Command::NewGame),
        "apply" => Some(Command::Apply),
        "back" => Some(Command::Back),
        "ack" => Some(Command::Ack),
        "state" => Some(Command::State),
        "legal" => Some(Command::Legal),
        "quit" => Some(Command::Quit),

        "start" => parse_start(&tokens),
        "position" => parse_position(&tokens),
        "op" => parse_op(&tokens),
        "cell" => parse_cell_command(&tokens),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `start <red cells>/<blue cells>`, e.g. `start 00,01,02,03/40,41,42,43`.
///
/// Cells are checked for digit syntax only; grid bounds and fleet sizes
/// are validated by deployment at battle start.
fn parse_start(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        eprintln!("malformed start: expected 'start <red cells>/<blue cells>'");
        return None;
    }
    let sections: Vec<&str> = tokens[1].split('/').collect();
    if sections.len() != 2 {
        eprintln!("malformed start: expected two '/'-separated fleets");
        return None;
    }
    let red = parse_cell_list(sections[0])?;
    let blue = parse_cell_list(sections[1])?;
    Some(Command::Start { red, blue })
}

fn parse_cell_list(section: &str) -> Option<Vec<CellPos>> {
    let mut cells = Vec::new();
    for token in section.split(',') {
        match parse_cell(token) {
            Some(pos) => cells.push(pos),
            None => {
                eprintln!("invalid cell token: '{}'", token);
                return None;
            }
        }
    }
    Some(cells)
}

/// Parses `position <sfen>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        eprintln!("malformed position: expected 'position <sfen>'");
        return None;
    }
    // SFEN is a single token (no spaces) following "position".
    let sfen = tokens[1].to_string();
    Some(Command::Position { sfen })
}

/// Parses `op attack` or `op move`.
fn parse_op(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        eprintln!("malformed op: expected 'op attack|move'");
        return None;
    }
    match OpKind::from_name(tokens[1]) {
        Some(kind) => Some(Command::Op { kind }),
        None => {
            eprintln!("unknown operation: '{}'", tokens[1]);
            None
        }
    }
}

/// Parses `cell <row> <col>`.
fn parse_cell_command(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 {
        eprintln!("malformed cell: expected 'cell <row> <col>'");
        return None;
    }
    let row: u8 = match tokens[1].parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("invalid row: '{}'", tokens[1]);
            return None;
        }
    };
    let col: u8 = match tokens[2].parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("invalid col: '{}'", tokens[2]);
            return None;
        }
    };
    Some(Command::Cell {
        pos: CellPos::new(row, col),
    })
}
