//! Depthcharge engine library.
//!
//! Exposes the board representation, battle rules, turn state machine,
//! and protocol modules for use by integration tests and the binary
//! entry points.

pub mod board;
pub mod engine;
pub mod protocol;
pub mod rules;
pub mod selfplay;
pub mod turn;
