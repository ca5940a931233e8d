//! Turn sequencing.
//!
//! The state machine that turns a side's selections into committed board
//! mutations and hands the turn over once the presentation layer has
//! acknowledged the result.

pub mod controller;

pub use controller::{Action, OpKind, Phase, TurnController};
