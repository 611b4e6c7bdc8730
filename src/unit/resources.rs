//! Harvestable resource deposits

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::DepositId;

/// What a deposit yields when harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Metal,
    Energy,
}

/// A finite deposit workers harvest from. Depletes, never refills.
#[derive(Debug, Clone)]
pub struct ResourceDeposit {
    pub id: DepositId,
    pub kind: ResourceKind,
    pub position: Vec3,
    amount: f32,
    max_amount: f32,
}

impl ResourceDeposit {
    pub fn new(kind: ResourceKind, position: Vec3, amount: f32) -> Self {
        Self {
            id: DepositId::new(),
            kind,
            position,
            amount,
            max_amount: amount,
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn is_depleted(&self) -> bool {
        self.amount <= 0.0
    }

    /// Extract up to `amount`, returning what actually came out.
    pub fn harvest(&mut self, amount: f32) -> f32 {
        let harvested = amount.min(self.amount);
        self.amount -= harvested;
        harvested
    }

    /// Remaining fraction in [0, 1], for presentation layers that
    /// shrink the deposit's visual as it empties.
    pub fn fraction_remaining(&self) -> f32 {
        if self.max_amount <= 0.0 {
            0.0
        } else {
            (self.amount / self.max_amount).max(0.0)
        }
    }
}
