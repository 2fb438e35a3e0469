use glam::Vec3;

use crate::{grid::Grid, stable::project::divergence};

/// Summary of a wind field, for logging and inspection of recordings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldStats {
    /// Largest velocity magnitude in any cell.
    pub max_speed: f32,
    /// Cell-averaged kinetic energy, `0.5 * <|v|²>`.
    pub kinetic_energy: f32,
    /// Sum of all densities.
    pub total_density: f32,
    /// Largest absolute divergence, as estimated by the pressure solve.
    pub max_abs_divergence: f32,
}

impl FieldStats {
    pub fn from_fields(grid: &Grid, velocities: &[Vec3], densities: &[f32]) -> Self {
        let mut div = vec![0.0; grid.len()];
        divergence(grid, velocities, &mut div);

        let mut max_speed: f32 = 0.0;
        let mut energy = 0.0;
        let mut total_density = 0.0;
        let mut max_abs_divergence: f32 = 0.0;

        for (idx, _) in grid.cells() {
            let v = velocities[idx];
            max_speed = max_speed.max(v.length());
            energy += v.length_squared();
            total_density += densities[idx];
            max_abs_divergence = max_abs_divergence.max(div[idx].abs());
        }

        Self {
            max_speed,
            kinetic_energy: 0.5 * energy / grid.len() as f32,
            total_density,
            max_abs_divergence,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.max_speed.is_finite()
            && self.kinetic_energy.is_finite()
            && self.total_density.is_finite()
            && self.max_abs_divergence.is_finite()
    }
}
