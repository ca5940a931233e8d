//! Battle rules.
//!
//! Stateless legality calculators and the attack-outcome classifier,
//! all pure functions over roster snapshots. The turn controller calls
//! these to validate selections and to classify commits; the presentation
//! layer calls them for cell highlighting.

pub mod attack;
pub mod movement;

pub use attack::{attackable_cells, classify_attack, Outcome};
pub use movement::movable_cells;
