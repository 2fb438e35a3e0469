use glam::{IVec3, Vec3};

use crate::grid::Grid;

use super::{Emitter, Forcing};

/// Forcing concentrated in a single cell.
#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub cell: IVec3,
    pub velocity: Vec3,
    pub density: f32,
}

impl Point {
    pub fn new(cell: IVec3, velocity: Vec3, density: f32) -> Self {
        Point {
            cell,
            velocity,
            density,
        }
    }

    /// Moves the emitter. Takes effect when it is next inserted into a scene.
    pub fn set_cell(&mut self, cell: IVec3) {
        self.cell = cell;
    }
}

impl Emitter for Point {
    fn forcing(&self, _grid: &Grid) -> Vec<Forcing> {
        vec![Forcing::new(self.cell, self.velocity, self.density)]
    }
}
