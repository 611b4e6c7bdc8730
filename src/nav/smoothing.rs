//! Line-of-sight path smoothing
//!
//! Greedy shortcutting over the raw 8-directional cell path: from each
//! kept point, jump to the farthest remaining point that still has a
//! clear rasterized line. The result is always collision-free and
//! never longer than the raw path, though not globally shortest.

use glam::Vec3;

use crate::nav::grid::NavGrid;

/// Drop interior waypoints that a straight line can skip.
///
/// Endpoints are preserved; paths of two or fewer points are returned
/// unchanged.
pub fn smooth_path(grid: &NavGrid, path: Vec<Vec3>) -> Vec<Vec3> {
    if path.len() <= 2 {
        return path;
    }

    let mut smooth = vec![path[0]];
    let mut current = 0;
    while current < path.len() - 1 {
        let mut next = current + 1;
        // Farthest-first scan: the first point with clear sight gives
        // the longest safe hop.
        for i in (current + 2..path.len()).rev() {
            if has_line_of_sight(grid, path[current], path[i]) {
                next = i;
                break;
            }
        }
        smooth.push(path[next]);
        current = next;
    }
    smooth
}

/// Bresenham walk between the cells containing `from` and `to`.
///
/// Any blocked or out-of-map cell along the line, endpoints included,
/// breaks sight.
pub fn has_line_of_sight(grid: &NavGrid, from: Vec3, to: Vec3) -> bool {
    let (mut x0, mut z0) = grid.world_to_cell(from.x, from.z);
    let (x1, z1) = grid.world_to_cell(to.x, to.z);

    let dx = (x1 - x0).abs();
    let dz = (z1 - z0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sz = if z0 < z1 { 1 } else { -1 };
    let mut err = dx - dz;

    loop {
        if !grid.in_bounds(x0, z0) || grid.is_blocked(x0, z0) {
            return false;
        }
        if x0 == x1 && z0 == z1 {
            return true;
        }
        let e2 = 2 * err;
        if e2 > -dz {
            err -= dz;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            z0 += sz;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centers(grid: &NavGrid, cells: &[(i32, i32)]) -> Vec<Vec3> {
        cells.iter().map(|&(x, z)| grid.cell_center(x, z)).collect()
    }

    #[test]
    fn test_short_paths_unchanged() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        let two = centers(&grid, &[(0, 0), (1, 1)]);
        assert_eq!(smooth_path(&grid, two.clone()), two);
        assert!(smooth_path(&grid, Vec::new()).is_empty());
    }

    #[test]
    fn test_open_corridor_collapses_to_endpoints() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        let raw = centers(&grid, &[(0, 5), (1, 5), (2, 5), (3, 5), (4, 5)]);
        let smoothed = smooth_path(&grid, raw.clone());
        assert_eq!(smoothed.len(), 2);
        assert_eq!(smoothed[0], raw[0]);
        assert_eq!(*smoothed.last().unwrap(), *raw.last().unwrap());
    }

    #[test]
    fn test_wall_keeps_interior_point() {
        let mut grid = NavGrid::new(10.0, 1.0).unwrap();
        // Wall between the dog-leg's corner cut.
        grid.set_obstacle(grid.cell_center(2, 4).x, grid.cell_center(2, 4).z, false);

        let raw = centers(&grid, &[(0, 5), (1, 5), (2, 5), (3, 4), (4, 3), (4, 2)]);
        let smoothed = smooth_path(&grid, raw.clone());

        assert_eq!(smoothed[0], raw[0]);
        assert_eq!(*smoothed.last().unwrap(), *raw.last().unwrap());
        for pair in smoothed.windows(2) {
            assert!(has_line_of_sight(&grid, pair[0], pair[1]));
        }
    }

    #[test]
    fn test_los_blocked_by_obstacle() {
        let mut grid = NavGrid::new(10.0, 1.0).unwrap();
        let a = grid.cell_center(2, 5);
        let b = grid.cell_center(8, 5);
        assert!(has_line_of_sight(&grid, a, b));

        let mid = grid.cell_center(5, 5);
        grid.set_obstacle(mid.x, mid.z, false);
        assert!(!has_line_of_sight(&grid, a, b));
    }

    #[test]
    fn test_los_false_outside_map() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        let inside = grid.cell_center(5, 5);
        let outside = Vec3::new(50.0, 0.0, 0.0);
        assert!(!has_line_of_sight(&grid, inside, outside));
    }
}
