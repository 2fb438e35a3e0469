use std::{fs::File, io::{BufReader, Read}, path::PathBuf};

use glam::{UVec3, Vec3};
use ndarray::Array3;
use thiserror::Error;

use breeze_fluids::{
    diagnostics::FieldStats,
    grid::{Grid, GridError, IndexLayout},
};

use crate::frame_path;

use super::as_bytes::AsBytes;

pub struct WindDataDecoder {
    /// The path to the directory in which the wind data resides.
    path: PathBuf,
    grid: Option<Grid>,
    num_frames: u64,
    current_frame: u64,
}

impl WindDataDecoder {
    pub fn new(path: PathBuf) -> WindDataDecoder {
        Self {
            path,
            grid: None,
            num_frames: 0,
            current_frame: 0,
        }
    }

    fn read_value<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R) -> Result<T, DecodingError> {
        let mut bytes = [0; N];
        reader.read_exact(&mut bytes)?;

        Ok(T::from_bytes(bytes))
    }

    fn read_section<const N: usize, T: AsBytes<N>, R: Read>(reader: &mut R, expected: usize) -> Result<Vec<T>, DecodingError> {
        let len = Self::read_value::<8, u64, _>(reader)?;
        if len != expected as u64 {
            return Err(DecodingError::SectionLength { expected, found: len });
        }

        let mut bytes = vec![0; N * expected];
        reader.read_exact(&mut bytes)?;

        Ok(bytes
            .chunks_exact(N)
            .map(|b| {
                let mut v = [0; N];
                v.copy_from_slice(b);
                T::from_bytes(v)
            })
            .collect())
    }

    pub fn decode_metadata(&mut self) -> Result<WindMetadata, DecodingError> {
        let path = self.path.join("_meta");
        let mut reader = BufReader::new(File::open(path)?);

        let fps = Self::read_value::<4, u32, _>(&mut reader)?;
        let num_frames = Self::read_value::<8, u64, _>(&mut reader)?;
        let size = UVec3::new(
            Self::read_value::<4, u32, _>(&mut reader)?,
            Self::read_value::<4, u32, _>(&mut reader)?,
            Self::read_value::<4, u32, _>(&mut reader)?,
        );
        let layout_byte = Self::read_value::<1, u8, _>(&mut reader)?;
        let layout = IndexLayout::from_byte(layout_byte).ok_or(DecodingError::UnknownLayout(layout_byte))?;

        self.grid = Some(Grid::new(size, layout)?);
        log::debug!("opened {size} recording with {num_frames} frames at {fps} fps");
        self.num_frames = num_frames;

        Ok(WindMetadata {
            fps,
            num_frames,
            size,
            layout,
        })
    }

    /// Reads the next frame, or `None` once every frame has been read. Metadata must be decoded
    /// first.
    pub fn decode_frame(&mut self) -> Result<Option<WindFrameData>, DecodingError> {
        let Some(grid) = self.grid else {
            return Err(DecodingError::MissingMetadata);
        };

        if self.current_frame >= self.num_frames {
            return Ok(None);
        }

        let path = frame_path(&self.path, self.num_frames, self.current_frame);
        let mut reader = BufReader::new(File::open(path)?);

        let velocities = Self::read_section::<12, Vec3, _>(&mut reader, grid.len())?;
        let densities = Self::read_section::<4, f32, _>(&mut reader, grid.len())?;

        self.current_frame += 1;

        Ok(Some(WindFrameData {
            grid,
            velocities,
            densities,
        }))
    }

    pub fn reset(&mut self) {
        self.current_frame = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindMetadata {
    pub fps: u32,
    pub num_frames: u64,
    pub size: UVec3,
    pub layout: IndexLayout,
}

pub struct WindFrameData {
    pub grid: Grid,
    /// Velocities in buffer order.
    pub velocities: Vec<Vec3>,
    /// Densities in buffer order.
    pub densities: Vec<f32>,
}

impl WindFrameData {
    pub fn velocity_array(&self) -> Array3<Vec3> {
        self.grid.to_array(&self.velocities)
    }

    pub fn density_array(&self) -> Array3<f32> {
        self.grid.to_array(&self.densities)
    }

    /// Trilinear, periodic wind sample, as the live solver would report it.
    pub fn sample_velocity(&self, pos: Vec3) -> Vec3 {
        self.grid.sample_trilinear(&self.velocities, pos)
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::from_fields(&self.grid, &self.velocities, &self.densities)
    }
}

#[derive(Debug, Error)]
pub enum DecodingError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("unknown index layout {0}")]
    UnknownLayout(u8),
    #[error("section holds {found} values, expected {expected}")]
    SectionLength { expected: usize, found: u64 },
    #[error("frame requested before metadata was decoded")]
    MissingMetadata,
}
