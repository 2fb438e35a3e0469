pub mod advect;
pub mod diffuse;
pub mod project;
pub mod sources;
pub mod stable_3d;

pub use stable_3d::{StableFluid3D, StableFluid3DParams};
