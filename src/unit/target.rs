//! Command targets - what a right-click or task assignment resolved to
//!
//! A tagged union over the kinds of things a command can reference.
//! Command routing matches on this exhaustively instead of probing
//! properties on a scene object.

use crate::core::types::{AgentId, DepositId, StructureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Agent(AgentId),
    Structure(StructureId),
    Deposit(DepositId),
}
