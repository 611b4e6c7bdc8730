//! Worker harvest cycle - gather, return, deposit, repeat
//!
//! A finite-state controller layered on one agent. It asks for a new
//! path only when it has none, so a worker already en route issues no
//! further search requests. The path planner and the deposit sink are
//! injected at construction, keeping this module free of direct
//! dependencies on the path finder and on resource accounting.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::core::constants::{
    WORKER_CARRY_CAPACITY, WORKER_DROPOFF_RANGE, WORKER_GATHER_RANGE, WORKER_GATHER_SPEED,
};
use crate::unit::agent::{Agent, Neighbor};
use crate::unit::resources::{ResourceDeposit, ResourceKind};
use crate::unit::structures::Structure;

/// Injected strategy that plans a path between two world points.
/// An empty result means no route.
pub type PathRequest = Box<dyn FnMut(Vec3, Vec3) -> Vec<Vec3>>;

/// Injected strategy notified when a load is deposited.
pub type DepositNotify = Box<dyn FnMut(f32, ResourceKind)>;

/// Task phase of a worker. Deposit and depleted-source handling are
/// transition actions, not states of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Gathering,
    ReturningToDropoff,
}

pub struct Worker {
    pub agent: Agent,
    state: WorkerState,
    pub carry_capacity: f32,
    current_load: f32,
    carried_kind: Option<ResourceKind>,
    pub gather_speed: f32,
    pub gather_range: f32,
    pub dropoff_range: f32,
    gather_target: Option<Rc<RefCell<ResourceDeposit>>>,
    dropoff_target: Option<Rc<Structure>>,
    find_path: PathRequest,
    on_deposit: DepositNotify,
}

impl Worker {
    pub fn new(position: Vec3, find_path: PathRequest, on_deposit: DepositNotify) -> Self {
        Self {
            agent: Agent::new(position),
            state: WorkerState::Idle,
            carry_capacity: WORKER_CARRY_CAPACITY,
            current_load: 0.0,
            carried_kind: None,
            gather_speed: WORKER_GATHER_SPEED,
            gather_range: WORKER_GATHER_RANGE,
            dropoff_range: WORKER_DROPOFF_RANGE,
            gather_target: None,
            dropoff_target: None,
            find_path,
            on_deposit,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn current_load(&self) -> f32 {
        self.current_load
    }

    pub fn carried_kind(&self) -> Option<ResourceKind> {
        self.carried_kind
    }

    /// Begin the harvest cycle against a deposit and a dropoff.
    /// Clears any active path so the next tick plans a fresh route.
    pub fn start_gathering(
        &mut self,
        deposit: Rc<RefCell<ResourceDeposit>>,
        dropoff: Rc<Structure>,
    ) {
        self.gather_target = Some(deposit);
        self.dropoff_target = Some(dropoff);
        self.state = WorkerState::Gathering;
        self.agent.clear_path();
    }

    /// Direct move order. Cancels the harvest task.
    pub fn order_move(&mut self, path: Vec<Vec3>) {
        self.state = WorkerState::Idle;
        self.agent.set_path(path);
    }

    /// Run the task state machine, then advance the agent one step.
    pub fn update(&mut self, dt: f32, neighbors: &[Neighbor]) {
        match self.state {
            WorkerState::Idle => {}
            WorkerState::Gathering => self.update_gathering(dt),
            WorkerState::ReturningToDropoff => self.update_returning(),
        }
        self.agent.update(dt, neighbors);
    }

    fn update_gathering(&mut self, dt: f32) {
        if self.current_load >= self.carry_capacity {
            self.state = WorkerState::ReturningToDropoff;
            self.agent.clear_path();
            return;
        }

        let Some(target) = self.gather_target.clone() else {
            self.state = WorkerState::Idle;
            return;
        };
        if target.borrow().is_depleted() {
            self.state = WorkerState::Idle;
            self.gather_target = None;
            return;
        }

        let target_pos = target.borrow().position;
        if self.agent.position().distance(target_pos) <= self.gather_range {
            let want = (self.gather_speed * dt).min(self.carry_capacity - self.current_load);
            let gathered = target.borrow_mut().harvest(want);
            self.current_load += gathered;
            self.carried_kind = Some(target.borrow().kind);
        } else if !self.agent.has_path() {
            let path = (self.find_path)(self.agent.position(), target_pos);
            if !path.is_empty() {
                self.agent.set_path(path);
            }
        }
    }

    fn update_returning(&mut self) {
        if self.current_load <= 0.0 {
            // Empty-handed: resume harvesting the same source.
            self.state = WorkerState::Gathering;
            self.agent.clear_path();
            return;
        }

        let Some(dropoff) = self.dropoff_target.clone() else {
            self.state = WorkerState::Idle;
            return;
        };

        if self.agent.position().distance(dropoff.position) <= self.dropoff_range {
            // Instantaneous transfer of the whole load.
            if let Some(kind) = self.carried_kind.take() {
                (self.on_deposit)(self.current_load, kind);
                self.current_load = 0.0;
            }
        } else if !self.agent.has_path() {
            let path = (self.find_path)(self.agent.position(), dropoff.position);
            if !path.is_empty() {
                self.agent.set_path(path);
            }
        }
    }
}
