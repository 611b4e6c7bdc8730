//! Synchronous simulation orchestration

pub mod world;

pub use world::HarvestWorld;
