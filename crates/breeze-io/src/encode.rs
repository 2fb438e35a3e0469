use std::{fs::File, io::{BufWriter, Write}, path::PathBuf};

use thiserror::Error;

use breeze_fluids::{scene::Scene, Fluid};

use crate::{frame_path, EncodeFluid};

use super::as_bytes::AsBytes;

pub struct WindDataEncoder {
    /// The path to the directory into which the wind data will be placed.
    path: PathBuf,
    num_frames: u64,
    fps: u32,
    current_frame: u64,
}

impl WindDataEncoder {
    pub fn new(path: PathBuf, num_frames: u64, fps: u32) -> Result<WindDataEncoder, EncodingError> {
        std::fs::create_dir_all(&path)?;
        log::debug!("recording {num_frames} frames at {fps} fps into {}", path.display());

        Ok(Self {
            path,
            num_frames,
            fps,
            current_frame: 0,
        })
    }

    pub fn encode_metadata<F: Fluid>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError> {
        let grid = scene.fluid().grid();
        let path = self.path.join("_meta");
        let mut writer = BufWriter::new(File::create(path)?);

        writer.write_all(&self.fps.to_bytes())?;
        writer.write_all(&self.num_frames.to_bytes())?;

        for n in grid.size.to_array() {
            writer.write_all(&n.to_bytes())?;
        }

        writer.write_all(&grid.layout().to_byte().to_bytes())?;
        writer.flush()?;

        Ok(())
    }

    pub fn encode_frame<F: EncodeFluid>(&mut self, scene: &Scene<F>) -> Result<(), EncodingError> {
        if self.current_frame >= self.num_frames {
            return Err(EncodingError::TooManyFrames(self.num_frames));
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let mut encoder = FluidFrameEncoder {
            writer: BufWriter::new(File::create(path)?),
        };

        scene.fluid().encode_state(&mut encoder)?;
        encoder.writer.flush()?;

        self.current_frame += 1;

        Ok(())
    }
}

pub struct FluidFrameEncoder<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FluidFrameEncoder<W> {
    pub fn encode_section<const N: usize, T, I>(&mut self, len: usize, values: I) -> Result<(), EncodingError>
    where
        I: Iterator<Item = T>,
        T: AsBytes<N>,
    {
        self.writer.write_all(&(len as u64).to_bytes())?;

        let bytes: Vec<_> = values.flat_map(|v| v.to_bytes()).collect();
        self.writer.write_all(&bytes)?;

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("recording already holds all {0} frames")]
    TooManyFrames(u64),
}
