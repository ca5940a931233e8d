//! Engine session management.
//!
//! Holds the battle in progress between commands and translates SBI
//! protocol traffic into calls on the turn controller. Handlers write
//! responses to a caller-supplied sink so they can be tested against
//! in-memory buffers.
//!
//! Illegal in-battle selections follow the engine contract: they are
//! silently absorbed, and the presentation discovers the lack of effect
//! through `state`/`legal`. Only construction boundaries (`start`,
//! `position`) report errors.

use std::io::Write;

use crate::board::{CellPos, Deployment};
use crate::protocol::sfen::{encode_sfen, format_cell, parse_sfen};
use crate::turn::{Action, OpKind, Phase, TurnController};

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub battle: Option<TurnController>,
}

impl Engine {
    /// Creates a new engine with no battle in progress.
    pub fn new() -> Self {
        Engine { battle: None }
    }

    /// Discards any battle in progress.
    pub fn new_game(&mut self) {
        self.battle = None;
    }

    /// Starts a battle from deployment lists.
    /// Returns an error message on validation failure.
    pub fn start_battle(&mut self, red: &[CellPos], blue: &[CellPos]) -> Result<(), String> {
        let deployment = Deployment::from_lists(red, blue)
            .map_err(|e| format!("invalid deployment: {}", e))?;
        match TurnController::new(&deployment) {
            Ok(ctrl) => {
                self.battle = Some(ctrl);
                Ok(())
            }
            Err(e) => Err(format!("invalid deployment: {}", e)),
        }
    }

    /// Sets the battle position from an SFEN string.
    /// Returns an error message on failure.
    pub fn set_position(&mut self, sfen: &str) -> Result<(), String> {
        match parse_sfen(sfen) {
            Ok(ctrl) => {
                self.battle = Some(ctrl);
                Ok(())
            }
            Err(e) => Err(format!("failed to parse SFEN: {}", e)),
        }
    }

    /// Handles the SBI handshake: writes id, protocol_version, and sbiok.
    pub fn handle_sbi<W: Write>(&self, out: &mut W) {
        writeln!(out, "id name depthcharge").unwrap();
        writeln!(out, "id author depthcharge").unwrap();
        writeln!(out, "protocol_version 1").unwrap();
        writeln!(out, "sbiok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) {
        writeln!(out, "readyok").unwrap();
        out.flush().unwrap();
    }

    /// Handles `op attack|move`. Illegal at the current phase: silent.
    pub fn handle_op(&mut self, kind: OpKind) {
        if let Some(ctrl) = &mut self.battle {
            ctrl.select_op(kind);
        }
    }

    /// Handles `cell <row> <col>`. Illegal selections: silent.
    pub fn handle_cell(&mut self, pos: CellPos) {
        if let Some(ctrl) = &mut self.battle {
            ctrl.select_cell(pos);
        }
    }

    /// Handles `apply`: commits the pending selection and echoes the
    /// committed action. Nothing is written when there is nothing to
    /// commit.
    pub fn handle_apply<W: Write>(&mut self, out: &mut W) {
        let ctrl = match &mut self.battle {
            Some(c) => c,
            None => {
                eprintln!("apply: no battle in progress");
                return;
            }
        };
        match ctrl.apply() {
            Some(Action::Attack { target, outcome }) => {
                writeln!(out, "applied attack {} {}", format_cell(target), outcome.name())
                    .unwrap();
                out.flush().unwrap();
            }
            Some(Action::Move { from, to }) => {
                writeln!(out, "applied move {} {}", format_cell(from), format_cell(to)).unwrap();
                out.flush().unwrap();
            }
            None => {}
        }
    }

    /// Handles `back`: abandons the pending selection.
    pub fn handle_back(&mut self) {
        if let Some(ctrl) = &mut self.battle {
            ctrl.cancel();
        }
    }

    /// Handles `ack`: performs the deferred turn handoff and reports the
    /// new turn, or the winner once a fleet is eliminated. Nothing is
    /// written when no commit is awaiting acknowledgement.
    pub fn handle_ack<W: Write>(&mut self, out: &mut W) {
        let ctrl = match &mut self.battle {
            Some(c) => c,
            None => {
                eprintln!("ack: no battle in progress");
                return;
            }
        };
        if !ctrl.acknowledge() {
            return;
        }
        match ctrl.winner() {
            Some(team) => writeln!(out, "winner {}", team.name()).unwrap(),
            None => writeln!(
                out,
                "turn {} {}",
                ctrl.turn_number(),
                ctrl.current_team().name()
            )
            .unwrap(),
        }
        out.flush().unwrap();
    }

    /// Handles `state`: reports the SFEN position and the current phase.
    pub fn handle_state<W: Write>(&self, out: &mut W) {
        let ctrl = match &self.battle {
            Some(c) => c,
            None => {
                eprintln!("state: no battle in progress");
                return;
            }
        };
        writeln!(out, "sfen {}", encode_sfen(ctrl)).unwrap();
        writeln!(out, "phase {}", ctrl.phase().name()).unwrap();
        out.flush().unwrap();
    }

    /// Handles `legal`: reports the cells that may be selected right now,
    /// for highlighting. Attack targets while one is being chosen, the
    /// side's own boats while the mover is being picked, destinations once
    /// a mover is chosen, nothing otherwise.
    pub fn handle_legal<W: Write>(&self, out: &mut W) {
        let ctrl = match &self.battle {
            Some(c) => c,
            None => {
                eprintln!("legal: no battle in progress");
                return;
            }
        };
        let cells: Vec<String> = match ctrl.phase() {
            Phase::AttackTarget => ctrl.attackable().iter().map(|&p| format_cell(p)).collect(),
            Phase::MoveActor => {
                let mut boats: Vec<CellPos> = ctrl
                    .roster()
                    .units(ctrl.current_team())
                    .iter()
                    .map(|u| u.pos)
                    .collect();
                boats.sort();
                boats.into_iter().map(format_cell).collect()
            }
            Phase::MoveDest => ctrl.movable().iter().map(|&p| format_cell(p)).collect(),
            Phase::OpSelect | Phase::Resolving | Phase::Finished => Vec::new(),
        };
        if cells.is_empty() {
            writeln!(out, "cells -").unwrap();
        } else {
            writeln!(out, "cells {}", cells.join(" ")).unwrap();
        }
        out.flush().unwrap();
    }
}
