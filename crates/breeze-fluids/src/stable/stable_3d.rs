use glam::{UVec3, Vec3};
use ndarray::Array3;

use crate::{
    diagnostics::FieldStats,
    grid::{Grid, GridError, IndexLayout},
    Fluid,
};

use super::{advect::advect, diffuse::diffuse, project::PressureSolver, sources::add_sources};

/// A stable-fluids velocity and density field on a periodic 3D lattice.
#[derive(Debug, Clone)]
pub struct StableFluid3D {
    grid: Grid,
    params: StableFluid3DParams,

    /// Grid velocities.
    velocities: Vec<Vec3>,
    /// Grid densities.
    densities: Vec<f32>,
    /// Persistent velocity forcing, drained into `velocities` every step.
    velocity_sources: Vec<Vec3>,
    /// Persistent density forcing, drained into `densities` every step.
    density_sources: Vec<f32>,

    /// Intermediate diffused velocities.
    diffused_velocities: Vec<Vec3>,
    /// Intermediate diffused densities.
    diffused_densities: Vec<f32>,
    velocity_scratch: Vec<Vec3>,
    density_scratch: Vec<f32>,
    pressure: PressureSolver,
}

impl StableFluid3D {
    pub fn new(size: UVec3) -> Result<Self, GridError> {
        Self::with_params(size, StableFluid3DParams::default())
    }

    pub fn with_params(size: UVec3, params: StableFluid3DParams) -> Result<Self, GridError> {
        let grid = Grid::new(size, params.layout)?;
        let n = grid.len();

        log::debug!("allocated {size} wind grid ({n} cells, {:?} layout)", params.layout);

        Ok(Self {
            grid,
            params,
            velocities: vec![Vec3::ZERO; n],
            densities: vec![0.0; n],
            velocity_sources: vec![Vec3::ZERO; n],
            density_sources: vec![0.0; n],
            diffused_velocities: vec![Vec3::ZERO; n],
            diffused_densities: vec![0.0; n],
            velocity_scratch: vec![Vec3::ZERO; n],
            density_scratch: vec![0.0; n],
            pressure: PressureSolver::new(n),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> UVec3 {
        self.grid.size
    }

    pub fn params(&self) -> &StableFluid3DParams {
        &self.params
    }

    /// Adds `v` to the velocity forcing of a cell. The forcing persists until cancelled.
    pub fn add_velocity_source(&mut self, x: i32, y: i32, z: i32, v: Vec3) -> Result<(), GridError> {
        let idx = self.grid.index(x, y, z)?;
        self.velocity_sources[idx] += v;
        Ok(())
    }

    /// Adds `amount` to the density forcing of a cell. The forcing persists until cancelled.
    pub fn add_density_source(&mut self, x: i32, y: i32, z: i32, amount: f32) -> Result<(), GridError> {
        let idx = self.grid.index(x, y, z)?;
        self.density_sources[idx] += amount;
        Ok(())
    }

    /// Drops every velocity and density forcing at once.
    pub fn clear_sources(&mut self) {
        self.velocity_sources.fill(Vec3::ZERO);
        self.density_sources.fill(0.0);
    }

    pub fn velocity_at(&self, x: i32, y: i32, z: i32) -> Result<Vec3, GridError> {
        Ok(self.velocities[self.grid.index(x, y, z)?])
    }

    pub fn density_at(&self, x: i32, y: i32, z: i32) -> Result<f32, GridError> {
        Ok(self.densities[self.grid.index(x, y, z)?])
    }

    /// Wind at a continuous position, in cell units. Positions outside the lattice wrap.
    pub fn sample_velocity(&self, pos: Vec3) -> Vec3 {
        self.grid.sample_trilinear(&self.velocities, pos)
    }

    pub fn sample_density(&self, pos: Vec3) -> f32 {
        self.grid.sample_trilinear(&self.densities, pos)
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn densities(&self) -> &[f32] {
        &self.densities
    }

    pub fn velocity_sources(&self) -> &[Vec3] {
        &self.velocity_sources
    }

    pub fn density_sources(&self) -> &[f32] {
        &self.density_sources
    }

    /// Velocities indexed by `[(x, y, z)]`.
    pub fn velocity_array(&self) -> Array3<Vec3> {
        self.grid.to_array(&self.velocities)
    }

    /// Densities indexed by `[(x, y, z)]`.
    pub fn density_array(&self) -> Array3<f32> {
        self.grid.to_array(&self.densities)
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::from_fields(&self.grid, &self.velocities, &self.densities)
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() {
            log::warn!("ignoring wind step with non-finite dt {dt}");
            return;
        }

        self.step_velocity(dt);
        self.step_density(dt);

        log::trace!("stepped wind field by {dt}s");
    }

    fn step_velocity(&mut self, dt: f32) {
        let grid = self.grid;

        add_sources(&mut self.velocities, &self.velocity_sources, dt);

        diffuse(
            &grid,
            &mut self.diffused_velocities,
            &mut self.velocity_scratch,
            &self.velocities,
            dt,
            self.params.diffusion_rate,
            self.params.num_diffusion_iters,
        );
        self.pressure.project(&grid, &mut self.diffused_velocities, self.params.num_pressure_iters);

        advect(&grid, &mut self.velocities, &self.diffused_velocities, &self.diffused_velocities, dt);
        self.pressure.project(&grid, &mut self.velocities, self.params.num_pressure_iters);
    }

    fn step_density(&mut self, dt: f32) {
        let grid = self.grid;

        add_sources(&mut self.densities, &self.density_sources, dt);

        diffuse(
            &grid,
            &mut self.diffused_densities,
            &mut self.density_scratch,
            &self.densities,
            dt,
            self.params.diffusion_rate,
            self.params.num_diffusion_iters,
        );

        advect(&grid, &mut self.densities, &self.diffused_densities, &self.velocities, dt);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StableFluid3DParams {
    pub diffusion_rate: f32,
    pub num_diffusion_iters: usize,
    pub num_pressure_iters: usize,
    pub layout: IndexLayout,
}

impl Default for StableFluid3DParams {
    fn default() -> Self {
        Self {
            diffusion_rate: 0.5,
            num_diffusion_iters: 20,
            num_pressure_iters: 20,
            layout: IndexLayout::Linear,
        }
    }
}

impl Fluid for StableFluid3D {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn step(&mut self, dt: f32) {
        StableFluid3D::step(self, dt);
    }

    fn add_velocity_source(&mut self, x: i32, y: i32, z: i32, v: Vec3) -> Result<(), GridError> {
        StableFluid3D::add_velocity_source(self, x, y, z, v)
    }

    fn add_density_source(&mut self, x: i32, y: i32, z: i32, amount: f32) -> Result<(), GridError> {
        StableFluid3D::add_density_source(self, x, y, z, amount)
    }

    fn sample_velocity(&self, pos: Vec3) -> Vec3 {
        StableFluid3D::sample_velocity(self, pos)
    }
}
