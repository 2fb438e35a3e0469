use glam::Vec3;
use grid::{Grid, GridError};

pub mod diagnostics;
pub mod emitter;
pub mod field;
pub mod grid;
pub mod scene;
pub mod stable;

/// A wind field that can be forced, stepped and sampled.
pub trait Fluid {
    fn grid(&self) -> &Grid;

    fn step(&mut self, dt: f32);

    fn add_velocity_source(&mut self, x: i32, y: i32, z: i32, v: Vec3) -> Result<(), GridError>;

    fn add_density_source(&mut self, x: i32, y: i32, z: i32, amount: f32) -> Result<(), GridError>;

    fn sample_velocity(&self, pos: Vec3) -> Vec3;
}
