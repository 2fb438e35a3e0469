use std::{io::Write, path::{Path, PathBuf}};

use breeze_fluids::{stable::StableFluid3D, Fluid};
use encode::{EncodingError, FluidFrameEncoder};

pub mod as_bytes;
pub mod decode;
pub mod encode;

pub trait EncodeFluid: Fluid {
    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError>;
}

impl EncodeFluid for StableFluid3D {
    fn encode_state<W: Write>(&self, encoder: &mut FluidFrameEncoder<W>) -> Result<(), EncodingError> {
        encoder.encode_section(self.velocities().len(), self.velocities().iter().copied())?;
        encoder.encode_section(self.densities().len(), self.densities().iter().copied())?;

        Ok(())
    }
}

/// Frame files are zero-padded so they sort in playback order.
pub(crate) fn frame_path(dir: &Path, num_frames: u64, frame: u64) -> PathBuf {
    let max_digits = num_frames.saturating_sub(1).checked_ilog10().unwrap_or(0) + 1;
    let digits = frame.checked_ilog10().unwrap_or(0) + 1;
    let zeros = max_digits.saturating_sub(digits);

    dir.join(format!("{}{frame}.dat", "0".repeat(zeros as usize)))
}
