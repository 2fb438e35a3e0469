use crate::field::FieldValue;

/// Drains `sources` into `field`, scaled by the timestep. The sources are left untouched, so a
/// forcing keeps contributing every step until it is cancelled.
pub fn add_sources<T: FieldValue>(field: &mut [T], sources: &[T], dt: f32) {
    field.iter_mut().zip(sources.iter()).for_each(|(f, &s)| {
        *f += s * dt;
    });
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn sources_are_scaled_and_kept() {
        let mut field = vec![Vec3::ZERO, Vec3::ONE];
        let sources = vec![Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO];

        add_sources(&mut field, &sources, 0.5);
        add_sources(&mut field, &sources, 0.5);

        assert_eq!(field, vec![Vec3::new(2.0, 0.0, 0.0), Vec3::ONE]);
        assert_eq!(sources, vec![Vec3::new(2.0, 0.0, 0.0), Vec3::ZERO]);
    }
}
