use glam::Vec3;

use crate::{field::FieldValue, grid::Grid};

/// Semi-Lagrangian transport of `prev` through `vels` over one timestep.
///
/// Each cell is traced backwards by `dt * max_dim * velocity` cells and `prev` is resampled
/// there, wrapping around the domain.
pub fn advect<T: FieldValue>(grid: &Grid, out: &mut [T], prev: &[T], vels: &[Vec3], dt: f32) {
    let dt_adj = dt * grid.max_dim() as f32;

    for (idx, c) in grid.cells() {
        let prev_pos = c.as_vec3() - dt_adj * vels[idx];
        out[idx] = grid.sample_trilinear(prev, prev_pos);
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec3;

    use crate::grid::IndexLayout;

    use super::*;

    fn ramp(grid: &Grid) -> Vec<f32> {
        grid.cells().map(|(_, c)| (c.x * 100 + c.y * 10 + c.z) as f32).collect()
    }

    #[test]
    fn whole_cell_shift_translates_with_wrap() {
        let grid = Grid::new(UVec3::new(8, 4, 4), IndexLayout::Linear).unwrap();
        let prev = ramp(&grid);
        // 0.5 * 8 * 0.25 = exactly one cell along +x.
        let vels = vec![Vec3::new(0.25, 0.0, 0.0); grid.len()];

        let mut out = vec![0.0; grid.len()];
        advect(&grid, &mut out, &prev, &vels, 0.5);

        for (idx, c) in grid.cells() {
            let src = grid.wrapped_index(c.x - 1, c.y, c.z);
            assert_eq!(out[idx], prev[src], "cell {c}");
        }
    }

    #[test]
    fn half_cell_shift_averages_neighbours() {
        let grid = Grid::new(UVec3::new(4, 4, 4), IndexLayout::Linear).unwrap();
        let prev = ramp(&grid);
        // 0.125 * 4 * -1 = half a cell along -y, so each cell reads halfway to y + 1.
        let vels = vec![Vec3::new(0.0, -1.0, 0.0); grid.len()];

        let mut out = vec![0.0; grid.len()];
        advect(&grid, &mut out, &prev, &vels, 0.125);

        for (idx, c) in grid.cells() {
            let a = prev[grid.wrapped_index(c.x, c.y, c.z)];
            let b = prev[grid.wrapped_index(c.x, c.y + 1, c.z)];
            assert!((out[idx] - 0.5 * (a + b)).abs() < 1e-4, "cell {c}");
        }
    }

    #[test]
    fn still_air_is_identity() {
        let grid = Grid::new(UVec3::new(3, 5, 2), IndexLayout::Linear).unwrap();
        let prev: Vec<Vec3> = grid.cells().map(|(_, c)| c.as_vec3()).collect();
        let vels = vec![Vec3::ZERO; grid.len()];

        let mut out = vec![Vec3::ZERO; grid.len()];
        advect(&grid, &mut out, &prev, &vels, 1.0);

        assert_eq!(out, prev);
    }
}
