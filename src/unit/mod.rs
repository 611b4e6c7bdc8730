//! Units - steering agents and the worker harvest cycle

pub mod agent;
pub mod resources;
pub mod structures;
pub mod target;
pub mod worker;

pub use agent::{Agent, Neighbor};
pub use resources::{ResourceDeposit, ResourceKind};
pub use structures::Structure;
pub use target::Target;
pub use worker::{Worker, WorkerState};
