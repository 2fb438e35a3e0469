use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::grid::Grid;

pub mod point;
pub mod slab;

/// A persistent source of wind and density for a fluid.
pub trait Emitter {
    /// The per-cell forcing this emitter contributes to a grid.
    fn forcing(&self, grid: &Grid) -> Vec<Forcing>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Forcing {
    pub cell: IVec3,
    pub velocity: Vec3,
    pub density: f32,
}

impl Forcing {
    pub fn new(cell: IVec3, velocity: Vec3, density: f32) -> Forcing {
        Forcing { cell, velocity, density }
    }

    /// The forcing that cancels this one.
    pub fn negated(self) -> Forcing {
        Forcing {
            cell: self.cell,
            velocity: -self.velocity,
            density: -self.density,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmitterId(pub usize);

/// The forcing currently applied on behalf of each emitter, so it can be cancelled exactly.
#[derive(Debug, Default)]
pub struct EmitterSet {
    pub applied: HashMap<usize, Vec<Forcing>>,
}
