//! Dense walkability grid over a bounded square world
//!
//! Cells are addressed `row * width + col` and the grid is centered on
//! the world origin, so world (0, 0) falls in cell (width/2, height/2).
//! Allocated once at world-size-known time, never resized.

use glam::Vec3;

use crate::core::error::{Result, SimError};

/// Dense 2D walkability map.
#[derive(Debug, Clone)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    walkable: Vec<bool>,
}

impl NavGrid {
    /// Create an all-walkable grid covering `map_size` world units per
    /// side, `cell_size` world units per cell.
    pub fn new(map_size: f32, cell_size: f32) -> Result<Self> {
        if map_size <= 0.0 || cell_size <= 0.0 {
            return Err(SimError::InvalidGrid(format!(
                "map_size {map_size} and cell_size {cell_size} must be positive"
            )));
        }
        let dim = (map_size / cell_size).ceil() as i32;
        Ok(Self {
            width: dim,
            height: dim,
            cell_size,
            walkable: vec![true; (dim * dim) as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Mark the cell containing a world position walkable or blocked.
    ///
    /// Out-of-bounds writes are silently ignored so callers can paint
    /// footprints that overlap the map edge.
    pub fn set_obstacle(&mut self, world_x: f32, world_z: f32, walkable: bool) {
        let (cx, cz) = self.world_to_cell(world_x, world_z);
        if self.in_bounds(cx, cz) {
            self.walkable[(cz * self.width + cx) as usize] = walkable;
        }
    }

    /// Whether the cell containing a world position can be walked on.
    /// Everything beyond the map edge is impassable.
    pub fn is_walkable(&self, world_x: f32, world_z: f32) -> bool {
        let (cx, cz) = self.world_to_cell(world_x, world_z);
        self.in_bounds(cx, cz) && !self.is_blocked(cx, cz)
    }

    /// World position to the cell containing it. May be out of bounds;
    /// write and read paths share this single conversion.
    pub fn world_to_cell(&self, world_x: f32, world_z: f32) -> (i32, i32) {
        (
            (world_x / self.cell_size + self.width as f32 / 2.0).floor() as i32,
            (world_z / self.cell_size + self.height as f32 / 2.0).floor() as i32,
        )
    }

    /// Center of a cell in world coordinates, on the ground plane.
    pub fn cell_center(&self, cx: i32, cz: i32) -> Vec3 {
        Vec3::new(
            (cx as f32 - self.width as f32 / 2.0) * self.cell_size + self.cell_size / 2.0,
            0.0,
            (cz as f32 - self.height as f32 / 2.0) * self.cell_size + self.cell_size / 2.0,
        )
    }

    pub fn in_bounds(&self, cx: i32, cz: i32) -> bool {
        cx >= 0 && cx < self.width && cz >= 0 && cz < self.height
    }

    /// Cell-level blocked check. Callers bounds-check first.
    pub(crate) fn is_blocked(&self, cx: i32, cz: i32) -> bool {
        !self.walkable[(cz * self.width + cx) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(NavGrid::new(0.0, 1.0).is_err());
        assert!(NavGrid::new(10.0, -1.0).is_err());
    }

    #[test]
    fn test_write_read_conversion_agrees() {
        let mut grid = NavGrid::new(10.0, 1.0).unwrap();
        assert!(grid.is_walkable(1.0, 0.0));
        grid.set_obstacle(1.0, 0.0, false);
        assert!(!grid.is_walkable(1.0, 0.0));
        grid.set_obstacle(1.0, 0.0, true);
        assert!(grid.is_walkable(1.0, 0.0));
    }

    #[test]
    fn test_out_of_bounds_is_impassable() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        assert!(!grid.is_walkable(100.0, 0.0));
        assert!(!grid.is_walkable(0.0, -6.0));
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut grid = NavGrid::new(10.0, 1.0).unwrap();
        grid.set_obstacle(100.0, 100.0, false);
        // Nothing inside the map changed.
        for cx in 0..grid.width() {
            for cz in 0..grid.height() {
                assert!(!grid.is_blocked(cx, cz));
            }
        }
    }

    #[test]
    fn test_cell_center_round_trips() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        let center = grid.cell_center(7, 5);
        assert_eq!(center.x, 2.5);
        assert_eq!(center.y, 0.0);
        assert_eq!(center.z, 0.5);
        assert_eq!(grid.world_to_cell(center.x, center.z), (7, 5));
    }

    #[test]
    fn test_centered_on_origin() {
        let grid = NavGrid::new(10.0, 1.0).unwrap();
        assert_eq!(grid.world_to_cell(0.0, 0.0), (5, 5));
        assert_eq!(grid.world_to_cell(-5.0, -5.0), (0, 0));
        assert_eq!(grid.world_to_cell(4.9, 4.9), (9, 9));
    }
}
