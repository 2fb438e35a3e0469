use glam::Vec3;

/// Fixed-size little-endian encoding of a recorded value.
pub trait AsBytes<const N: usize> {
    fn from_bytes(b: [u8; N]) -> Self;

    fn to_bytes(self) -> [u8; N];
}

impl AsBytes<1> for u8 {
    fn from_bytes(b: [u8; 1]) -> Self {
        b[0]
    }

    fn to_bytes(self) -> [u8; 1] {
        [self]
    }
}

impl AsBytes<4> for u32 {
    fn from_bytes(b: [u8; 4]) -> Self {
        u32::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

impl AsBytes<8> for u64 {
    fn from_bytes(b: [u8; 8]) -> Self {
        u64::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 8] {
        self.to_le_bytes()
    }
}

impl AsBytes<4> for f32 {
    fn from_bytes(b: [u8; 4]) -> Self {
        f32::from_le_bytes(b)
    }

    fn to_bytes(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

impl AsBytes<12> for Vec3 {
    fn from_bytes(b: [u8; 12]) -> Self {
        Vec3::new(
            f32::from_bytes([b[0], b[1], b[2], b[3]]),
            f32::from_bytes([b[4], b[5], b[6], b[7]]),
            f32::from_bytes([b[8], b[9], b[10], b[11]]),
        )
    }

    fn to_bytes(self) -> [u8; 12] {
        let mut b = [0; 12];
        b[0..4].copy_from_slice(&self.x.to_bytes());
        b[4..8].copy_from_slice(&self.y.to_bytes());
        b[8..12].copy_from_slice(&self.z.to_bytes());
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_components_are_little_endian_in_order() {
        let b = Vec3::new(1.0, -2.0, 0.5).to_bytes();

        assert_eq!(&b[0..4], &1.0f32.to_le_bytes());
        assert_eq!(&b[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(&b[8..12], &0.5f32.to_le_bytes());
        assert_eq!(Vec3::from_bytes(b), Vec3::new(1.0, -2.0, 0.5));
    }
}
