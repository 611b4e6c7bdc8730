//! Scrap Frontier - navigation and agent-motion core
//!
//! Grid-based pathfinding (A* with line-of-sight smoothing), steering
//! locomotion with local avoidance, and the worker harvest cycle that
//! drives repeated path requests. Presentation, input and resource
//! accounting live outside this crate and talk to it through the
//! obstacle/path interfaces in [`nav`] and the handles in [`unit`].

pub mod core;
pub mod nav;
pub mod sim;
pub mod unit;
