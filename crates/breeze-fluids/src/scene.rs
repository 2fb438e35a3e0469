use glam::Vec3;
use thiserror::Error;

use super::{
    emitter::{Emitter, EmitterId, EmitterSet, Forcing},
    grid::GridError,
    Fluid,
};

/// A fluid together with the emitters currently forcing it.
///
/// Sources on a fluid persist until cancelled, so the scene remembers what each emitter applied
/// and removes it again with the equal-and-opposite forcing.
pub struct Scene<F> {
    /// The fluid for this scene.
    fluid: F,
    /// The forcing applied by each emitter in this scene.
    emitters: EmitterSet,
    /// The number of emitters ever added (used for IDs).
    n_emitters: usize,
}

impl<F: Fluid> Scene<F> {
    #[inline(always)]
    pub fn new(fluid: F) -> Self {
        Self {
            fluid,
            emitters: EmitterSet::default(),
            n_emitters: 0,
        }
    }

    #[inline(always)]
    pub fn fluid(&self) -> &F {
        &self.fluid
    }

    /// Mutable access to the fluid. Sources added through it are not tracked by the scene.
    #[inline(always)]
    pub fn fluid_mut(&mut self) -> &mut F {
        &mut self.fluid
    }

    #[inline(always)]
    pub fn emitters(&self) -> &EmitterSet {
        &self.emitters
    }

    /// Applies an emitter's forcing to the fluid, returning its ID.
    pub fn add_emitter<T: Emitter>(&mut self, emitter: T) -> Result<EmitterId, SceneError> {
        let i = self.n_emitters;
        let next = i.checked_add(1).ok_or(SceneError::IdOverflow)?;

        let forcing = emitter.forcing(self.fluid.grid());
        self.apply(&forcing)?;
        self.n_emitters = next;

        log::debug!("added emitter {i} over {} cells", forcing.len());
        self.emitters.applied.insert(i, forcing);

        Ok(EmitterId(i))
    }

    /// Cancels an emitter's forcing, given its ID. Returns `false` if it was not in the scene.
    pub fn remove_emitter(&mut self, id: EmitterId) -> Result<bool, SceneError> {
        let Some(forcing) = self.emitters.applied.remove(&id.0) else {
            return Ok(false);
        };

        let negated: Vec<_> = forcing.iter().map(|f| f.negated()).collect();
        self.apply(&negated)?;

        log::debug!("removed emitter {}", id.0);
        Ok(true)
    }

    /// Replaces the emitter at the given ID, returning whether one was previously there.
    ///
    /// The ID and the new forcing are validated before the old one is cancelled, so a failed
    /// insert leaves the scene untouched.
    pub fn insert_emitter<T: Emitter>(&mut self, id: EmitterId, emitter: T) -> Result<bool, SceneError> {
        let next = id.0.checked_add(1).ok_or(SceneError::IdOverflow)?;

        let forcing = emitter.forcing(self.fluid.grid());
        self.validate(&forcing)?;

        let replaced = self.remove_emitter(id)?;
        self.apply(&forcing)?;
        self.emitters.applied.insert(id.0, forcing);
        self.n_emitters = self.n_emitters.max(next);

        Ok(replaced)
    }

    pub fn step(&mut self, dt: f32) {
        self.fluid.step(dt);
    }

    pub fn sample_velocity(&self, pos: Vec3) -> Vec3 {
        self.fluid.sample_velocity(pos)
    }

    /// Wind at each of `points`, e.g. one per grass blade tip.
    pub fn sample_velocities(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|&p| self.fluid.sample_velocity(p)).collect()
    }

    fn validate(&self, forcing: &[Forcing]) -> Result<(), GridError> {
        let grid = self.fluid.grid();
        forcing
            .iter()
            .try_for_each(|f| grid.index(f.cell.x, f.cell.y, f.cell.z).map(|_| ()))
    }

    fn apply(&mut self, forcing: &[Forcing]) -> Result<(), GridError> {
        self.validate(forcing)?;

        for f in forcing {
            if f.velocity != Vec3::ZERO {
                self.fluid.add_velocity_source(f.cell.x, f.cell.y, f.cell.z, f.velocity)?;
            }

            if f.density != 0.0 {
                self.fluid.add_density_source(f.cell.x, f.cell.y, f.cell.z, f.density)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no emitter IDs left")]
    IdOverflow,
}

#[cfg(test)]
mod tests {
    use glam::{IVec3, UVec3};

    use crate::{
        emitter::{point::Point, slab::Slab},
        stable::StableFluid3D,
    };

    use super::*;

    fn scene() -> Scene<StableFluid3D> {
        Scene::new(StableFluid3D::new(UVec3::new(4, 4, 4)).unwrap())
    }

    fn source_totals(scene: &Scene<StableFluid3D>) -> (Vec3, f32) {
        (
            scene.fluid().velocity_sources().iter().copied().sum(),
            scene.fluid().density_sources().iter().sum(),
        )
    }

    #[test]
    fn removing_an_emitter_cancels_its_forcing() {
        let mut scene = scene();
        let id = scene.add_emitter(Point::new(IVec3::new(1, 2, 3), Vec3::new(0.5, 0.0, -1.0), 2.0)).unwrap();
        assert_eq!(source_totals(&scene), (Vec3::new(0.5, 0.0, -1.0), 2.0));

        scene.step(0.1);

        assert_eq!(scene.remove_emitter(id), Ok(true));
        assert_eq!(source_totals(&scene), (Vec3::ZERO, 0.0));
        assert_eq!(scene.remove_emitter(id), Ok(false));
    }

    #[test]
    fn ids_are_unique() {
        let mut scene = scene();
        let a = scene.add_emitter(Point::new(IVec3::ZERO, Vec3::X, 0.0)).unwrap();
        let b = scene.add_emitter(Point::new(IVec3::ZERO, Vec3::X, 0.0)).unwrap();

        assert_ne!(a, b);
        assert_eq!(scene.emitters().applied.len(), 2);
        assert_eq!(source_totals(&scene).0, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn insert_replaces_previous_forcing() {
        let mut scene = scene();
        let mut point = Point::new(IVec3::ZERO, Vec3::Y, 1.0);
        let id = scene.add_emitter(point).unwrap();

        point.set_cell(IVec3::new(3, 3, 3));
        assert_eq!(scene.insert_emitter(id, point), Ok(true));

        let grid = *scene.fluid().grid();
        let old = grid.index(0, 0, 0).unwrap();
        let new = grid.index(3, 3, 3).unwrap();
        assert_eq!(scene.fluid().velocity_sources()[old], Vec3::ZERO);
        assert_eq!(scene.fluid().density_sources()[old], 0.0);
        assert_eq!(scene.fluid().velocity_sources()[new], Vec3::Y);
        assert_eq!(scene.fluid().density_sources()[new], 1.0);

        let fresh = scene.insert_emitter(EmitterId(9), Point::new(IVec3::ONE, Vec3::Z, 0.0));
        assert_eq!(fresh, Ok(false));
        assert_eq!(scene.add_emitter(Point::new(IVec3::ONE, Vec3::Z, 0.0)), Ok(EmitterId(10)));
    }

    #[test]
    fn out_of_range_emitter_leaves_scene_untouched() {
        let mut scene = scene();
        let id = scene.add_emitter(Point::new(IVec3::ZERO, Vec3::X, 1.0)).unwrap();

        let err = scene.add_emitter(Point::new(IVec3::new(4, 0, 0), Vec3::X, 1.0));
        assert!(matches!(err, Err(SceneError::Grid(GridError::OutOfRange { x: 4, .. }))));

        let err = scene.insert_emitter(id, Point::new(IVec3::new(0, -1, 0), Vec3::X, 1.0));
        assert!(err.is_err());

        assert_eq!(source_totals(&scene), (Vec3::X, 1.0));
        assert_eq!(scene.emitters().applied.len(), 1);
    }

    #[test]
    fn wall_drives_wind_through_the_domain() {
        let mut scene = scene();
        scene.add_emitter(Slab::wall_x(0, Vec3::X)).unwrap();

        for _ in 0..5 {
            scene.step(0.05);
        }

        let tips = [Vec3::new(0.0, 1.0, 1.0), Vec3::new(2.5, 2.5, 0.5), Vec3::new(-1.0, 7.0, 3.2)];
        let winds = scene.sample_velocities(&tips);

        assert_eq!(winds.len(), tips.len());
        for (wind, &tip) in winds.iter().zip(tips.iter()) {
            assert_eq!(*wind, scene.sample_velocity(tip));
            assert!(wind.x > 0.0, "wind at {tip} = {wind}");
        }
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let mut scene = scene();

        let err = scene.insert_emitter(EmitterId(usize::MAX), Point::new(IVec3::ZERO, Vec3::X, 1.0));
        assert_eq!(err, Err(SceneError::IdOverflow));
        assert_eq!(source_totals(&scene), (Vec3::ZERO, 0.0));
        assert!(scene.emitters().applied.is_empty());

        let last = EmitterId(usize::MAX - 1);
        assert_eq!(scene.insert_emitter(last, Point::new(IVec3::ZERO, Vec3::X, 1.0)), Ok(false));
        assert_eq!(scene.add_emitter(Point::new(IVec3::ONE, Vec3::Y, 1.0)), Err(SceneError::IdOverflow));
        assert_eq!(source_totals(&scene), (Vec3::X, 1.0));

        assert_eq!(scene.remove_emitter(last), Ok(true));
        assert_eq!(source_totals(&scene), (Vec3::ZERO, 0.0));
    }

    #[test]
    fn stepping_the_fluid_directly_matches_the_scene() {
        let mut a = scene();
        let mut b = scene();
        a.add_emitter(Slab::wall_z(0, Vec3::Z)).unwrap();
        b.add_emitter(Slab::wall_z(0, Vec3::Z)).unwrap();

        a.step(0.1);
        b.fluid_mut().step(0.1);

        assert_eq!(a.fluid().velocities(), b.fluid().velocities());
        assert_eq!(a.fluid().densities(), b.fluid().densities());
    }
}
