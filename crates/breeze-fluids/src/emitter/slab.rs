use glam::{IVec3, Vec3};

use crate::grid::Grid;

use super::{Emitter, Forcing};

/// The same forcing in every cell of an axis-aligned box, `min` inclusive and `max` exclusive.
///
/// The box is clipped to the grid, so a slab may be larger than the domain.
#[derive(Debug, Clone, Copy)]
pub struct Slab {
    pub min: IVec3,
    pub max: IVec3,
    pub velocity: Vec3,
    pub density: f32,
}

impl Slab {
    pub fn new(min: IVec3, max: IVec3, velocity: Vec3, density: f32) -> Self {
        Slab {
            min,
            max,
            velocity,
            density,
        }
    }

    /// A one-cell-thick wall spanning the whole grid at `x`.
    pub fn wall_x(x: i32, velocity: Vec3) -> Self {
        Slab::new(
            IVec3::new(x, i32::MIN, i32::MIN),
            IVec3::new(x.saturating_add(1), i32::MAX, i32::MAX),
            velocity,
            0.0,
        )
    }

    /// A one-cell-thick wall spanning the whole grid at `z`.
    pub fn wall_z(z: i32, velocity: Vec3) -> Self {
        Slab::new(
            IVec3::new(i32::MIN, i32::MIN, z),
            IVec3::new(i32::MAX, i32::MAX, z.saturating_add(1)),
            velocity,
            0.0,
        )
    }
}

impl Emitter for Slab {
    fn forcing(&self, grid: &Grid) -> Vec<Forcing> {
        let min = self.min.max(IVec3::ZERO);
        let max = self.max.min(grid.size.as_ivec3());

        let mut forcing = Vec::new();

        for k in min.z..max.z {
            for j in min.y..max.y {
                for i in min.x..max.x {
                    forcing.push(Forcing::new(IVec3::new(i, j, k), self.velocity, self.density));
                }
            }
        }

        forcing
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec3;

    use crate::grid::IndexLayout;

    use super::*;

    #[test]
    fn wall_covers_one_face() {
        let grid = Grid::new(UVec3::new(5, 4, 3), IndexLayout::Linear).unwrap();
        let forcing = Slab::wall_x(0, Vec3::X).forcing(&grid);

        assert_eq!(forcing.len(), 4 * 3);
        assert!(forcing.iter().all(|f| f.cell.x == 0 && f.velocity == Vec3::X));
        assert!(forcing.iter().all(|f| grid.index(f.cell.x, f.cell.y, f.cell.z).is_ok()));
    }

    #[test]
    fn slab_is_clipped_to_grid() {
        let grid = Grid::new(UVec3::new(4, 4, 4), IndexLayout::Linear).unwrap();
        let slab = Slab::new(IVec3::new(-2, 2, 3), IVec3::new(2, 9, 4), Vec3::Y, 1.0);

        let forcing = slab.forcing(&grid);
        assert_eq!(forcing.len(), 2 * 2);

        let outside = Slab::new(IVec3::splat(5), IVec3::splat(8), Vec3::Y, 1.0);
        assert!(outside.forcing(&grid).is_empty());
    }
}
