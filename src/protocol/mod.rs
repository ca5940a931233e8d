//! SBI protocol handling.
//!
//! This module implements parsing and serialization for the SBI (Submarine
//! Battle Interface) protocol: SFEN position encoding and the command
//! parser for the main loop. The presentation layer speaks SBI over
//! stdin/stdout; the engine core itself never depends on it.

pub mod parser;
pub mod sfen;

pub use parser::{parse_command, Command};
pub use sfen::{encode_sfen, format_cell, parse_cell, parse_sfen, SfenError};
