//! Headless harvest simulation runner
//!
//! Walls off part of the map, scatters deposits, spawns workers around
//! a dropoff and runs a fixed-dt tick loop, printing a JSON report of
//! what was banked.

use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use scrap_frontier::core::error::Result;
use scrap_frontier::sim::world::HarvestWorld;
use scrap_frontier::unit::resources::ResourceKind;
use scrap_frontier::unit::target::Target;

#[derive(Parser, Debug)]
#[command(name = "harvest_sim", about = "Headless worker harvest simulation")]
struct Args {
    /// World size, world units per side
    #[arg(long, default_value_t = 60.0)]
    map_size: f32,

    /// Number of workers to spawn
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Simulation ticks to run
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    /// Seconds of simulated time per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// RNG seed for scenario generation
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

#[derive(Serialize)]
struct RunReport {
    ticks: u64,
    workers: usize,
    metal_banked: f32,
    energy_banked: f32,
    deposits_remaining: Vec<f32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("scrap_frontier=info")
        .init();

    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut world = HarvestWorld::new(args.map_size, 1.0)?;

    // Dropoff at the origin (left unpainted so it stays routable), a
    // derelict hull to the east so routes have something to bend
    // around, plus a loose wall segment.
    world.place_structure(Vec3::ZERO, true, 1.5);
    let hull = world.place_structure(Vec3::new(10.0, 0.0, 3.0), false, 2.0);
    world.queue_structure_footprint(&hull, false);
    for i in -6..=6 {
        world.queue_obstacle(6.0, i as f32, false);
    }

    let half = args.map_size / 2.0 - 4.0;
    let mut deposit_ids = Vec::new();
    for _ in 0..6 {
        let kind = if rng.gen_bool(0.5) {
            ResourceKind::Metal
        } else {
            ResourceKind::Energy
        };
        let position = Vec3::new(rng.gen_range(-half..half), 0.0, rng.gen_range(-half..half));
        let deposit = world.add_deposit(kind, position, 200.0);
        deposit_ids.push(deposit.borrow().id);
    }

    for w in 0..args.workers {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = rng.gen_range(4.0..6.0);
        let position = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
        let index = world.spawn_worker(position);
        world.issue_command(index, Target::Deposit(deposit_ids[w % deposit_ids.len()]));
    }

    tracing::info!(
        workers = args.workers,
        ticks = args.ticks,
        "harvest simulation starting"
    );
    for _ in 0..args.ticks {
        world.tick(args.dt);
    }

    let report = RunReport {
        ticks: args.ticks,
        workers: args.workers,
        metal_banked: world.stockpile_total(ResourceKind::Metal),
        energy_banked: world.stockpile_total(ResourceKind::Energy),
        deposits_remaining: world.deposits().iter().map(|d| d.borrow().amount()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
