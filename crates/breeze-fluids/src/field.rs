use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use glam::Vec3;

/// A value stored per grid cell.
///
/// The numeric passes (source draining, diffusion, advection) are written once against this
/// trait and instantiated for both the scalar density field (`f32`) and the vector velocity
/// field (`Vec3`).
pub trait FieldValue:
    Copy
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + AddAssign
    + SubAssign
{
}

impl<T> FieldValue for T
where
    T: Copy
        + Default
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<f32, Output = T>
        + Div<f32, Output = T>
        + AddAssign
        + SubAssign,
{
}

#[inline]
pub fn lerp<T: FieldValue>(v0: T, v1: T, t: f32) -> T {
    v0 + (v1 - v0) * t
}

/// Interpolates the 8 corners of a unit cell, along x, then y, then z.
///
/// Corners are named `vXYZ` by their offset along each axis.
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn trilerp<T: FieldValue>(
    v000: T,
    v001: T,
    v010: T,
    v011: T,
    v100: T,
    v101: T,
    v110: T,
    v111: T,
    t: Vec3,
) -> T {
    let v00 = lerp(v000, v100, t.x);
    let v01 = lerp(v001, v101, t.x);
    let v10 = lerp(v010, v110, t.x);
    let v11 = lerp(v011, v111, t.x);

    let v0 = lerp(v00, v10, t.y);
    let v1 = lerp(v01, v11, t.y);

    lerp(v0, v1, t.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0f32, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0f32, 6.0, 1.0), 6.0);
        assert_eq!(lerp(Vec3::ZERO, Vec3::new(2.0, 4.0, -2.0), 0.5), Vec3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn trilerp_blends_x_first() {
        // Only the corners with x = 1 are set, so the result is the x fraction alone.
        let v = trilerp(0.0f32, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, Vec3::new(0.25, 0.9, 0.3));
        assert!((v - 0.25).abs() < 1e-6);

        let v = trilerp(0.0f32, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, Vec3::new(0.7, 0.2, 0.6));
        assert!((v - 0.6).abs() < 1e-6);
    }
}
