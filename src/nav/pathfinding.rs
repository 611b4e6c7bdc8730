//! A* pathfinding over the walkability grid
//!
//! 8-connected search with corner-cut prevention, a Manhattan heuristic
//! and a hard iteration ceiling. Raw cell paths are smoothed before
//! being returned (see [`crate::nav::smoothing`]).

use ahash::AHashSet;
use glam::Vec3;

use crate::core::constants::{DIAGONAL_STEP_COST, MAX_SEARCH_ITERATIONS};
use crate::nav::grid::NavGrid;
use crate::nav::smoothing::smooth_path;

/// Search node in the per-search arena. Parents are arena indices, so
/// the whole search is discarded in one free.
#[derive(Debug, Clone, Copy)]
struct PathNode {
    cell: (i32, i32),
    g: f32,
    h: f32,
    f: f32,
    parent: Option<usize>,
}

/// Fixed expansion order for the eight neighbors, so equal-f frontier
/// ties resolve identically on every run.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Frontier bookkeeping recorded during a search. Tests read these to
/// check that a cell closes at most once and that a relaxation only
/// ever lowers a node's cost-so-far.
#[derive(Debug)]
pub(crate) struct SearchStats {
    pub(crate) expansions: u32,
    pub(crate) reclosed_cells: u32,
    pub(crate) relaxations: u32,
    pub(crate) worst_relax_delta: f32,
}

impl Default for SearchStats {
    fn default() -> Self {
        Self {
            expansions: 0,
            reclosed_cells: 0,
            relaxations: 0,
            worst_relax_delta: f32::NEG_INFINITY,
        }
    }
}

/// Find a walkable path between two world positions.
///
/// Returns cell-center waypoints from start to goal, already smoothed.
/// An empty vec means no route: endpoint off the map, goal cell
/// blocked, frontier exhausted, or the iteration ceiling was hit.
/// Callers treat empty as "no route found", never as an error.
pub fn find_path(grid: &NavGrid, start: Vec3, end: Vec3) -> Vec<Vec3> {
    let start_cell = grid.world_to_cell(start.x, start.z);
    let goal_cell = grid.world_to_cell(end.x, end.z);

    let mut stats = SearchStats::default();
    let raw: Vec<Vec3> = search_cells(grid, start_cell, goal_cell, &mut stats)
        .into_iter()
        .map(|(cx, cz)| grid.cell_center(cx, cz))
        .collect();
    smooth_path(grid, raw)
}

/// A* over grid cells. Returns the raw (unsmoothed) cell path from
/// start to goal, or empty when no route exists.
pub(crate) fn search_cells(
    grid: &NavGrid,
    start_cell: (i32, i32),
    goal_cell: (i32, i32),
    stats: &mut SearchStats,
) -> Vec<(i32, i32)> {
    if !grid.in_bounds(start_cell.0, start_cell.1) || !grid.in_bounds(goal_cell.0, goal_cell.1) {
        return Vec::new();
    }
    // A blocked destination is "no route", not "route to the nearest
    // open cell".
    if grid.is_blocked(goal_cell.0, goal_cell.1) {
        return Vec::new();
    }

    let start_h = heuristic(start_cell, goal_cell);
    let mut arena = vec![PathNode {
        cell: start_cell,
        g: 0.0,
        h: start_h,
        f: start_h,
        parent: None,
    }];
    // Arena indices still on the frontier, in insertion order.
    let mut open: Vec<usize> = vec![0];
    let mut closed: AHashSet<(i32, i32)> = AHashSet::new();

    while !open.is_empty() {
        stats.expansions += 1;
        if stats.expansions > MAX_SEARCH_ITERATIONS {
            tracing::warn!(?start_cell, ?goal_cell, "path search hit iteration ceiling");
            return Vec::new();
        }

        // Linear scan with strict < keeps first-found tie order, which
        // keeps paths deterministic. Open lists stay small enough that
        // this beats maintaining a heap with stable tie-breaks.
        let mut best = 0;
        for i in 1..open.len() {
            if arena[open[i]].f < arena[open[best]].f {
                best = i;
            }
        }
        let current_idx = open.remove(best);
        let current = arena[current_idx];

        if !closed.insert(current.cell) {
            stats.reclosed_cells += 1;
        }

        if current.cell == goal_cell {
            return reconstruct_cells(&arena, current_idx);
        }

        for (dx, dz) in NEIGHBOR_OFFSETS {
            let nx = current.cell.0 + dx;
            let nz = current.cell.1 + dz;
            if !grid.in_bounds(nx, nz) || grid.is_blocked(nx, nz) || closed.contains(&(nx, nz)) {
                continue;
            }
            // A diagonal move may not cut a blocked corner: both
            // orthogonal cells adjacent to the move must be open.
            if dx != 0
                && dz != 0
                && (grid.is_blocked(nx, current.cell.1) || grid.is_blocked(current.cell.0, nz))
            {
                continue;
            }

            let step = if dx == 0 || dz == 0 {
                1.0
            } else {
                DIAGONAL_STEP_COST
            };
            let tentative_g = current.g + step;

            if let Some(idx) = open.iter().copied().find(|&i| arena[i].cell == (nx, nz)) {
                // Relax: only a strictly lower g re-parents a frontier node.
                if tentative_g < arena[idx].g {
                    let node = &mut arena[idx];
                    stats.relaxations += 1;
                    stats.worst_relax_delta = stats.worst_relax_delta.max(tentative_g - node.g);
                    node.g = tentative_g;
                    node.f = tentative_g + node.h;
                    node.parent = Some(current_idx);
                }
            } else {
                let h = heuristic((nx, nz), goal_cell);
                arena.push(PathNode {
                    cell: (nx, nz),
                    g: tentative_g,
                    h,
                    f: tentative_g + h,
                    parent: Some(current_idx),
                });
                open.push(arena.len() - 1);
            }
        }
    }

    Vec::new()
}

/// Manhattan distance between cells. Admissible for 8-way movement but
/// not consistent; minor path suboptimality is accepted for speed.
fn heuristic(a: (i32, i32), b: (i32, i32)) -> f32 {
    ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f32
}

/// Walk parent indices back to the start.
fn reconstruct_cells(arena: &[PathNode], goal_idx: usize) -> Vec<(i32, i32)> {
    let mut cells = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        cells.push(arena[idx].cell);
        cursor = arena[idx].parent;
    }
    cells.reverse();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open_grid() -> NavGrid {
        NavGrid::new(10.0, 1.0).unwrap()
    }

    #[test]
    fn test_straight_path_snaps_to_cell_centers() {
        let grid = open_grid();
        let path = find_path(&grid, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));

        assert!(!path.is_empty());
        let last = path.last().unwrap();
        // World x=2 is cell 7, whose center is 2.5; z=0 is cell 5,
        // center 0.5.
        assert!((last.x - 2.5).abs() < 1e-5);
        assert!((last.z - 0.5).abs() < 1e-5);
        assert_eq!(last.y, 0.0);
    }

    #[test]
    fn test_routes_around_obstacle() {
        let mut grid = open_grid();
        grid.set_obstacle(1.0, 0.0, false);

        let path = find_path(&grid, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        assert!(!path.is_empty());

        let blocked = grid.world_to_cell(1.0, 0.0);
        for p in &path {
            assert_ne!(grid.world_to_cell(p.x, p.z), blocked);
        }
    }

    #[test]
    fn test_out_of_bounds_endpoints_yield_empty() {
        let grid = open_grid();
        assert!(find_path(&grid, Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)).is_empty());
        assert!(find_path(&grid, Vec3::new(-50.0, 0.0, 0.0), Vec3::ZERO).is_empty());
    }

    #[test]
    fn test_blocked_goal_yields_empty() {
        let mut grid = open_grid();
        grid.set_obstacle(2.0, 0.0, false);
        assert!(find_path(&grid, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_unreachable_goal_exhausts_frontier() {
        let mut grid = open_grid();
        // Ring of obstacles around the goal cell, goal itself open.
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx != 0 || dz != 0 {
                    grid.set_obstacle(3.0 + dx as f32, 3.0 + dz as f32, false);
                }
            }
        }
        assert!(find_path(&grid, Vec3::ZERO, Vec3::new(3.0, 0.0, 3.0)).is_empty());
    }

    #[test]
    fn test_deterministic_for_fixed_grid() {
        let mut grid = open_grid();
        grid.set_obstacle(1.0, 1.0, false);
        grid.set_obstacle(0.0, 2.0, false);

        let a = find_path(&grid, Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 4.0));
        let b = find_path(&grid, Vec3::new(-4.0, 0.0, -4.0), Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_corner_cutting() {
        let mut grid = open_grid();
        // Wall corner at (1,0)-(0,1): the diagonal (0,0)->(1,1) would
        // slip between them.
        grid.set_obstacle(1.5, 0.5, false);
        grid.set_obstacle(0.5, 1.5, false);

        let path = find_path(
            &grid,
            Vec3::new(0.5, 0.0, 0.5),
            Vec3::new(3.5, 0.0, 3.5),
        );
        assert!(!path.is_empty());
        for pair in path.windows(2) {
            assert!(crate::nav::smoothing::has_line_of_sight(
                &grid, pair[0], pair[1]
            ));
        }
    }

    #[test]
    fn test_same_cell_degenerates_to_single_waypoint() {
        let grid = open_grid();
        let path = find_path(&grid, Vec3::new(0.2, 0.0, 0.2), Vec3::new(0.8, 0.0, 0.8));
        assert_eq!(path.len(), 1);
        assert_eq!(path[0], grid.cell_center(5, 5));
    }

    /// Cost of a raw cell path under the grid's step costs.
    fn path_cost(cells: &[(i32, i32)]) -> f32 {
        cells
            .windows(2)
            .map(|w| {
                if w[0].0 == w[1].0 || w[0].1 == w[1].1 {
                    1.0
                } else {
                    DIAGONAL_STEP_COST
                }
            })
            .sum()
    }

    /// Brute-force Dijkstra reference over the same neighbor rule,
    /// returning the optimal cost to the goal if one exists.
    fn dijkstra_cost(grid: &NavGrid, start: (i32, i32), goal: (i32, i32)) -> Option<f32> {
        let mut dist: ahash::AHashMap<(i32, i32), f32> = ahash::AHashMap::new();
        let mut done: AHashSet<(i32, i32)> = AHashSet::new();
        dist.insert(start, 0.0);

        loop {
            let Some((&cell, &d)) = dist
                .iter()
                .filter(|(c, _)| !done.contains(*c))
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            else {
                return None;
            };
            if cell == goal {
                return Some(d);
            }
            done.insert(cell);

            for (dx, dz) in NEIGHBOR_OFFSETS {
                let n = (cell.0 + dx, cell.1 + dz);
                if !grid.in_bounds(n.0, n.1) || grid.is_blocked(n.0, n.1) || done.contains(&n) {
                    continue;
                }
                if dx != 0
                    && dz != 0
                    && (grid.is_blocked(n.0, cell.1) || grid.is_blocked(cell.0, n.1))
                {
                    continue;
                }
                let step = if dx == 0 || dz == 0 {
                    1.0
                } else {
                    DIAGONAL_STEP_COST
                };
                let entry = dist.entry(n).or_insert(f32::INFINITY);
                if d + step < *entry {
                    *entry = d + step;
                }
            }
        }
    }

    #[test]
    fn test_search_closes_each_cell_once() {
        let mut grid = NavGrid::new(20.0, 1.0).unwrap();
        // Wall with a detour so the frontier fans out and relaxes.
        for x in -6..4 {
            grid.set_obstacle(x as f32 + 0.5, 0.5, false);
        }

        let mut stats = SearchStats::default();
        let cells = search_cells(
            &grid,
            grid.world_to_cell(-8.0, -8.0),
            grid.world_to_cell(8.0, 8.0),
            &mut stats,
        );

        assert!(!cells.is_empty());
        assert!(stats.expansions > 0);
        assert_eq!(stats.reclosed_cells, 0);
        // Any relaxation strictly lowered the node's cost-so-far.
        assert!(stats.worst_relax_delta < 0.0);
    }

    proptest! {
        /// Search agrees with a Dijkstra reference on reachability over
        /// random obstacle fields, never beats its optimal cost, and
        /// keeps its frontier discipline: no cell closes twice, no
        /// relaxation raises g.
        #[test]
        fn prop_search_matches_dijkstra_reference(
            obstacles in prop::collection::vec((0..12i32, 0..12i32), 0..50),
        ) {
            let mut grid = NavGrid::new(12.0, 1.0).unwrap();
            let start = (1, 1);
            let goal = (10, 10);
            for (ox, oz) in obstacles {
                if (ox, oz) != start && (ox, oz) != goal {
                    let c = grid.cell_center(ox, oz);
                    grid.set_obstacle(c.x, c.z, false);
                }
            }

            let mut stats = SearchStats::default();
            let cells = search_cells(&grid, start, goal, &mut stats);
            let reference = dijkstra_cost(&grid, start, goal);

            prop_assert_eq!(cells.is_empty(), reference.is_none());
            prop_assert_eq!(stats.reclosed_cells, 0);
            prop_assert!(stats.worst_relax_delta < 0.0);
            if let Some(best) = reference {
                prop_assert!(path_cost(&cells) >= best - 1e-3);
            }
        }
    }
}
