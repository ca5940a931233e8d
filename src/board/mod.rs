//! Board representation.
//!
//! Contains the core data structures for the battle grid, teams, units,
//! the living-unit roster, and deployment-phase validation.

pub mod deploy;
pub mod grid;
pub mod roster;
pub mod unit;

pub use deploy::{DeployError, Deployment, FLEET_SIZE};
pub use grid::{
    all_cells, cardinal_reach, chebyshev, in_bounds, neighborhood, CellPos, CARDINAL_DIRS,
    CELL_COUNT, GRID_SIZE,
};
pub use roster::{DamageResult, Roster};
pub use unit::{Team, Unit, ALL_TEAMS, MAX_HP};
