//! Static structures - dropoff points and obstacles on the grid

use glam::Vec3;

use crate::core::types::StructureId;

/// A placed building. The navigation core only cares about where it
/// stands, how much ground it blocks, and whether workers can deposit
/// here.
#[derive(Debug, Clone)]
pub struct Structure {
    pub id: StructureId,
    pub position: Vec3,
    pub is_dropoff: bool,
    /// Half-extent of the square footprint, world units.
    pub footprint: f32,
}

impl Structure {
    pub fn new(position: Vec3, is_dropoff: bool, footprint: f32) -> Self {
        Self {
            id: StructureId::new(),
            position,
            is_dropoff,
            footprint,
        }
    }

    /// World-space sample points covering the footprint, one per grid
    /// cell step. The placement layer paints these into the grid;
    /// points past the map edge are ignored by the grid itself.
    pub fn footprint_samples(&self, cell_size: f32) -> Vec<(f32, f32)> {
        let mut samples = Vec::new();
        let mut x = self.position.x - self.footprint;
        while x <= self.position.x + self.footprint {
            let mut z = self.position.z - self.footprint;
            while z <= self.position.z + self.footprint {
                samples.push((x, z));
                z += cell_size;
            }
            x += cell_size;
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::grid::NavGrid;

    #[test]
    fn test_footprint_blocks_and_clears_cells() {
        let mut grid = NavGrid::new(20.0, 1.0).unwrap();
        let structure = Structure::new(Vec3::ZERO, true, 1.5);

        for (x, z) in structure.footprint_samples(grid.cell_size()) {
            grid.set_obstacle(x, z, false);
        }
        assert!(!grid.is_walkable(0.0, 0.0));
        assert!(!grid.is_walkable(-1.5, 1.5));
        assert!(grid.is_walkable(3.0, 0.0));

        for (x, z) in structure.footprint_samples(grid.cell_size()) {
            grid.set_obstacle(x, z, true);
        }
        assert!(grid.is_walkable(0.0, 0.0));
    }
}
