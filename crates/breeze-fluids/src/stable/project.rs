use glam::Vec3;

use crate::grid::Grid;

/// Scratch buffers for the pressure solve, kept across steps to avoid reallocating every frame.
#[derive(Debug, Clone, Default)]
pub struct PressureSolver {
    /// Divergence of the velocity field being projected.
    pub divergence: Vec<f32>,
    /// Pressure of the grid.
    pub pressure: Vec<f32>,
    /// Pressure sweep being written.
    pressure_next: Vec<f32>,
}

impl PressureSolver {
    pub fn new(n: usize) -> Self {
        Self {
            divergence: vec![0.0; n],
            pressure: vec![0.0; n],
            pressure_next: vec![0.0; n],
        }
    }

    /// Removes (most of) the divergence from `vels` in place.
    pub fn project(&mut self, grid: &Grid, vels: &mut [Vec3], num_iters: usize) {
        let n = grid.len();
        self.divergence.resize(n, 0.0);
        divergence(grid, vels, &mut self.divergence);

        self.solve_pressure(grid, num_iters);
        self.subtract_gradient(grid, vels);
    }

    fn solve_pressure(&mut self, grid: &Grid, num_iters: usize) {
        let n = grid.len();
        self.pressure.clear();
        self.pressure.resize(n, 0.0);
        self.pressure_next.clear();
        self.pressure_next.resize(n, 0.0);

        for _iter in 0..num_iters {
            for (idx, c) in grid.cells() {
                let neighbor_sum = grid.neighbor_sum(&self.pressure, c);
                self.pressure_next[idx] = (self.divergence[idx] + neighbor_sum) / 6.0;
            }

            std::mem::swap(&mut self.pressure, &mut self.pressure_next);
        }
    }

    fn subtract_gradient(&self, grid: &Grid, vels: &mut [Vec3]) {
        let p = &self.pressure;
        let scale = grid.size.as_vec3();

        for (idx, c) in grid.cells() {
            let gradient = Vec3::new(
                p[grid.wrapped_index(c.x + 1, c.y, c.z)] - p[grid.wrapped_index(c.x - 1, c.y, c.z)],
                p[grid.wrapped_index(c.x, c.y + 1, c.z)] - p[grid.wrapped_index(c.x, c.y - 1, c.z)],
                p[grid.wrapped_index(c.x, c.y, c.z + 1)] - p[grid.wrapped_index(c.x, c.y, c.z - 1)],
            );

            vels[idx] -= 0.5 * gradient * scale;
        }
    }
}

/// Central-difference divergence of `vels`, each axis normalised by its dimension, written into
/// `out` with the negative half-sum convention of the pressure solve.
pub fn divergence(grid: &Grid, vels: &[Vec3], out: &mut [f32]) {
    let inv_size = grid.size.as_vec3().recip();

    for (idx, c) in grid.cells() {
        let du = vels[grid.wrapped_index(c.x + 1, c.y, c.z)].x - vels[grid.wrapped_index(c.x - 1, c.y, c.z)].x;
        let dv = vels[grid.wrapped_index(c.x, c.y + 1, c.z)].y - vels[grid.wrapped_index(c.x, c.y - 1, c.z)].y;
        let dw = vels[grid.wrapped_index(c.x, c.y, c.z + 1)].z - vels[grid.wrapped_index(c.x, c.y, c.z - 1)].z;

        out[idx] = -0.5 * (du * inv_size.x + dv * inv_size.y + dw * inv_size.z);
    }
}
