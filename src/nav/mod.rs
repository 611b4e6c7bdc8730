//! Grid navigation - occupancy grid, A* search, path smoothing
//!
//! The grid is the only structure shared across agents. The placement
//! layer writes it between ticks; searches read it during a tick, so
//! every agent observes one unchanging snapshot per tick.

pub mod grid;
pub mod pathfinding;
pub mod smoothing;

pub use grid::NavGrid;
pub use pathfinding::find_path;
pub use smoothing::{has_line_of_sight, smooth_path};
