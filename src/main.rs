//! Depthcharge -- a submarine duel engine implementing the SBI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! following the SBI (Submarine Battle Interface) convention. The
//! presentation layer drives the battle through it: select an operation,
//! select cells, apply, acknowledge.

use std::io::{self, BufRead};

use depthcharge::engine::Engine;
use depthcharge::protocol::parser::{parse_command, Command};

/// Runs the main SBI protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Sbi => {
                engine.handle_sbi(&mut out);
            }
            Command::IsReady => {
                engine.handle_isready(&mut out);
            }
            Command::NewGame => {
                engine.new_game();
            }
            Command::Start { red, blue } => {
                if let Err(e) = engine.start_battle(&red, &blue) {
                    eprintln!("{}", e);
                }
            }
            Command::Position { sfen } => {
                if let Err(e) = engine.set_position(&sfen) {
                    eprintln!("{}", e);
                }
            }
            Command::Op { kind } => {
                engine.handle_op(kind);
            }
            Command::Cell { pos } => {
                engine.handle_cell(pos);
            }
            Command::Apply => {
                engine.handle_apply(&mut out);
            }
            Command::Back => {
                engine.handle_back();
            }
            Command::Ack => {
                engine.handle_ack(&mut out);
            }
            Command::State => {
                engine.handle_state(&mut out);
            }
            Command::Legal => {
                engine.handle_legal(&mut out);
            }
            Command::Quit => {
                break;
            }
        }
    }
}
