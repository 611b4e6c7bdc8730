//! Navigation and steering constants - all tunable values in one place
//!
//! Distances are world units, times are seconds unless noted.

// Grid / search
/// Hard cap on A* frontier expansions so a search always returns
/// within a single simulation tick, even on pathological maps.
pub const MAX_SEARCH_ITERATIONS: u32 = 5000;
/// Cost of a diagonal step on the 8-connected grid (sqrt(2)).
pub const DIAGONAL_STEP_COST: f32 = 1.41421356;

// Steering
pub const BASE_MOVE_SPEED: f32 = 5.0;
pub const MAX_STEER_FORCE: f32 = 20.0;
pub const TURN_SPEED: f32 = 5.0; // radians per second
/// An agent within this distance of its current waypoint advances to
/// the next one.
pub const WAYPOINT_RADIUS: f32 = 1.0;
pub const SEEK_WEIGHT: f32 = 2.0;
/// Separation outweighs seek: local collision avoidance dominates
/// long-range intent.
pub const SEPARATION_WEIGHT: f32 = 4.0;
pub const SEPARATION_RADIUS: f32 = 3.5;
/// Velocity-proportional braking applied while no path is active.
pub const IDLE_FRICTION: f32 = 5.0;
/// Squared speed below which an agent keeps its current facing.
pub const TURN_EPSILON_SQ: f32 = 0.5;

// Worker defaults
pub const WORKER_CARRY_CAPACITY: f32 = 10.0;
pub const WORKER_GATHER_SPEED: f32 = 5.0; // resources per second
pub const WORKER_GATHER_RANGE: f32 = 2.0;
pub const WORKER_DROPOFF_RANGE: f32 = 3.0;
