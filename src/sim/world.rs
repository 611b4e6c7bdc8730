//! World tick orchestration
//!
//! Single-threaded cooperative stepping: queued obstacle mutations are
//! applied first, then every worker advances against one unchanging
//! grid snapshot. Nothing here suspends or blocks; a path search is
//! bounded by its iteration ceiling and always returns within a tick.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use glam::Vec3;

use crate::core::error::Result;
use crate::core::types::Tick;
use crate::nav::grid::NavGrid;
use crate::nav::pathfinding::find_path;
use crate::unit::agent::Neighbor;
use crate::unit::resources::{ResourceDeposit, ResourceKind};
use crate::unit::structures::Structure;
use crate::unit::target::Target;
use crate::unit::worker::Worker;

/// Ledger of everything deposited so far, keyed by resource kind.
pub type Stockpile = AHashMap<ResourceKind, f32>;

pub struct HarvestWorld {
    grid: Rc<RefCell<NavGrid>>,
    stockpile: Rc<RefCell<Stockpile>>,
    deposits: Vec<Rc<RefCell<ResourceDeposit>>>,
    structures: Vec<Rc<Structure>>,
    workers: Vec<Worker>,
    pending_obstacles: Vec<(f32, f32, bool)>,
    tick: Tick,
}

impl HarvestWorld {
    pub fn new(map_size: f32, cell_size: f32) -> Result<Self> {
        Ok(Self {
            grid: Rc::new(RefCell::new(NavGrid::new(map_size, cell_size)?)),
            stockpile: Rc::new(RefCell::new(Stockpile::default())),
            deposits: Vec::new(),
            structures: Vec::new(),
            workers: Vec::new(),
            pending_obstacles: Vec::new(),
            tick: 0,
        })
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn grid(&self) -> Rc<RefCell<NavGrid>> {
        Rc::clone(&self.grid)
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn worker_mut(&mut self, index: usize) -> Option<&mut Worker> {
        self.workers.get_mut(index)
    }

    pub fn deposits(&self) -> &[Rc<RefCell<ResourceDeposit>>] {
        &self.deposits
    }

    pub fn stockpile_total(&self, kind: ResourceKind) -> f32 {
        self.stockpile.borrow().get(&kind).copied().unwrap_or(0.0)
    }

    /// Buffer an obstacle mutation. It lands at the top of the next
    /// tick, so every agent within one tick sees the same grid.
    pub fn queue_obstacle(&mut self, x: f32, z: f32, walkable: bool) {
        self.pending_obstacles.push((x, z, walkable));
    }

    pub fn add_deposit(
        &mut self,
        kind: ResourceKind,
        position: Vec3,
        amount: f32,
    ) -> Rc<RefCell<ResourceDeposit>> {
        let deposit = Rc::new(RefCell::new(ResourceDeposit::new(kind, position, amount)));
        self.deposits.push(Rc::clone(&deposit));
        deposit
    }

    /// Register a structure. Whether its footprint blocks the grid is
    /// the placement layer's call; see [`Self::queue_structure_footprint`].
    pub fn place_structure(
        &mut self,
        position: Vec3,
        is_dropoff: bool,
        footprint: f32,
    ) -> Rc<Structure> {
        let structure = Rc::new(Structure::new(position, is_dropoff, footprint));
        self.structures.push(Rc::clone(&structure));
        structure
    }

    /// Queue a structure's footprint to be painted blocked (or cleared
    /// again on demolition) at the next tick boundary. Note that a
    /// painted dropoff is unroutable as a path goal: the search refuses
    /// blocked destinations, so harvest scenarios leave their dropoff
    /// unpainted and let the deposit range absorb the approach.
    pub fn queue_structure_footprint(&mut self, structure: &Structure, walkable: bool) {
        let cell_size = self.grid.borrow().cell_size();
        for (x, z) in structure.footprint_samples(cell_size) {
            self.pending_obstacles.push((x, z, walkable));
        }
    }

    /// Spawn a worker wired to this world's grid and stockpile.
    ///
    /// Returns the worker's index for command issuing.
    pub fn spawn_worker(&mut self, position: Vec3) -> usize {
        let grid = Rc::clone(&self.grid);
        let plan = Box::new(move |start: Vec3, end: Vec3| find_path(&grid.borrow(), start, end));

        let stockpile = Rc::clone(&self.stockpile);
        let bank = Box::new(move |amount: f32, kind: ResourceKind| {
            *stockpile.borrow_mut().entry(kind).or_insert(0.0) += amount;
        });

        self.workers.push(Worker::new(position, plan, bank));
        self.workers.len() - 1
    }

    /// Route a command to a worker, switching on what was targeted.
    pub fn issue_command(&mut self, worker_index: usize, target: Target) {
        let destination = match target {
            Target::Deposit(id) => {
                let Some(deposit) = self
                    .deposits
                    .iter()
                    .find(|d| d.borrow().id == id)
                    .cloned()
                else {
                    return;
                };
                let deposit_pos = deposit.borrow().position;
                let Some(dropoff) = self.nearest_dropoff(deposit_pos) else {
                    return;
                };
                if let Some(worker) = self.workers.get_mut(worker_index) {
                    worker.start_gathering(deposit, dropoff);
                }
                return;
            }
            Target::Structure(id) => self
                .structures
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.position),
            Target::Agent(id) => self
                .workers
                .iter()
                .find(|w| w.agent.id == id)
                .map(|w| w.agent.position()),
        };

        let Some(destination) = destination else {
            return;
        };
        let Some(worker) = self.workers.get_mut(worker_index) else {
            return;
        };
        let path = find_path(&self.grid.borrow(), worker.agent.position(), destination);
        if !path.is_empty() {
            worker.order_move(path);
        }
    }

    /// Advance the world one step.
    pub fn tick(&mut self, dt: f32) {
        {
            let mut grid = self.grid.borrow_mut();
            for (x, z, walkable) in self.pending_obstacles.drain(..) {
                grid.set_obstacle(x, z, walkable);
            }
        }

        // One snapshot for the whole tick; agents skip themselves by id.
        let snapshot: Vec<Neighbor> = self
            .workers
            .iter()
            .map(|w| Neighbor {
                id: w.agent.id,
                position: w.agent.position(),
            })
            .collect();

        for worker in &mut self.workers {
            worker.update(dt, &snapshot);
        }

        self.tick += 1;
    }

    fn nearest_dropoff(&self, position: Vec3) -> Option<Rc<Structure>> {
        self.structures
            .iter()
            .filter(|s| s.is_dropoff)
            .min_by(|a, b| {
                let da = a.position.distance_squared(position);
                let db = b.position.distance_squared(position);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
    }
}
