use glam::{IVec3, UVec3, Vec3};
use ndarray::Array3;
use thiserror::Error;

use crate::field::{trilerp, FieldValue};

/// How a cell coordinate is flattened into a buffer offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndexLayout {
    /// `x + y * nx + z * nx * ny`.
    #[default]
    Linear,
    /// `x + y * nx + z * (nx + ny)`.
    ///
    /// Matches recordings produced by older builds bit for bit. With more than one layer and
    /// `nx + ny < nx * ny`, distinct cells share an offset and part of each buffer is never
    /// addressed.
    Aliased,
}

impl IndexLayout {
    pub fn to_byte(self) -> u8 {
        match self {
            IndexLayout::Linear => 0,
            IndexLayout::Aliased => 1,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(IndexLayout::Linear),
            1 => Some(IndexLayout::Aliased),
            _ => None,
        }
    }
}

/// A fixed-size periodic lattice and its coordinate-to-offset mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Size of the grid, in cells.
    pub size: UVec3,
    /// Number of cells in the X direction.
    pub nx: usize,
    /// Number of cells in the Y direction.
    pub ny: usize,
    /// Number of cells in the Z direction.
    pub nz: usize,
    layout: IndexLayout,
}

impl Grid {
    pub fn new(size: UVec3, layout: IndexLayout) -> Result<Self, GridError> {
        if size.min_element() == 0 {
            return Err(GridError::EmptyDimension { size });
        }

        // Offsets must stay addressable as `isize`, including the aliased layout's tail.
        let too_large = (size.x as usize)
            .checked_mul(size.y as usize)
            .and_then(|n| n.checked_mul(size.z as usize))
            .and_then(|n| n.checked_add(size.z as usize))
            .map_or(true, |n| n > isize::MAX as usize);
        if too_large {
            return Err(GridError::TooLarge { size });
        }

        let grid = Self {
            size,
            nx: size.x as usize,
            ny: size.y as usize,
            nz: size.z as usize,
            layout,
        };

        if grid.offset(grid.nx - 1, grid.ny - 1, grid.nz - 1) >= grid.len() {
            return Err(GridError::AliasedOverflow { size });
        }

        Ok(grid)
    }

    #[inline]
    pub fn layout(&self) -> IndexLayout {
        self.layout
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The largest of the three dimensions.
    #[inline]
    pub fn max_dim(&self) -> usize {
        self.nx.max(self.ny).max(self.nz)
    }

    /// Offset of an in-range cell. Callers guarantee `x < nx`, `y < ny` and `z < nz`.
    #[inline]
    pub(crate) fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);

        match self.layout {
            IndexLayout::Linear => x + self.nx * (y + self.ny * z),
            IndexLayout::Aliased => x + y * self.nx + z * (self.nx + self.ny),
        }
    }

    /// Bounds-checked offset of the cell at `(x, y, z)`.
    pub fn index(&self, x: i32, y: i32, z: i32) -> Result<usize, GridError> {
        let inside = |v: i32, n: usize| v >= 0 && (v as usize) < n;

        if inside(x, self.nx) && inside(y, self.ny) && inside(z, self.nz) {
            Ok(self.offset(x as usize, y as usize, z as usize))
        } else {
            Err(GridError::OutOfRange { x, y, z, size: self.size })
        }
    }

    /// Offset of the cell at `(x, y, z)` with every axis wrapped around the torus.
    #[inline]
    pub fn wrapped_index(&self, x: i32, y: i32, z: i32) -> usize {
        self.offset(
            wrap(x as i64, self.nx),
            wrap(y as i64, self.ny),
            wrap(z as i64, self.nz),
        )
    }

    /// Every cell as `(offset, coordinate)`, x fastest.
    pub fn cells(&self) -> impl Iterator<Item = (usize, IVec3)> {
        let grid = *self;

        (0..grid.nz).flat_map(move |k| {
            (0..grid.ny).flat_map(move |j| {
                (0..grid.nx).map(move |i| {
                    (grid.offset(i, j, k), IVec3::new(i as i32, j as i32, k as i32))
                })
            })
        })
    }

    /// Copies a flat field into an array indexed by `[(x, y, z)]`.
    pub fn to_array<T: Copy>(&self, field: &[T]) -> Array3<T> {
        Array3::from_shape_fn((self.nx, self.ny, self.nz), |(x, y, z)| field[self.offset(x, y, z)])
    }

    /// Sum of the six axis-aligned periodic neighbours of `c`.
    #[inline]
    pub fn neighbor_sum<T: FieldValue>(&self, field: &[T], c: IVec3) -> T {
        field[self.wrapped_index(c.x + 1, c.y, c.z)]
            + field[self.wrapped_index(c.x - 1, c.y, c.z)]
            + field[self.wrapped_index(c.x, c.y + 1, c.z)]
            + field[self.wrapped_index(c.x, c.y - 1, c.z)]
            + field[self.wrapped_index(c.x, c.y, c.z + 1)]
            + field[self.wrapped_index(c.x, c.y, c.z - 1)]
    }

    /// Samples `field` at a continuous position, in cell units, with periodic wrap-around.
    pub fn sample_trilinear<T: FieldValue>(&self, field: &[T], pos: Vec3) -> T {
        let base = pos.floor();
        let t = pos - base;

        let x0 = wrap_float(base.x, self.nx);
        let y0 = wrap_float(base.y, self.ny);
        let z0 = wrap_float(base.z, self.nz);
        let x1 = (x0 + 1) % self.nx;
        let y1 = (y0 + 1) % self.ny;
        let z1 = (z0 + 1) % self.nz;

        trilerp(
            field[self.offset(x0, y0, z0)],
            field[self.offset(x0, y0, z1)],
            field[self.offset(x0, y1, z0)],
            field[self.offset(x0, y1, z1)],
            field[self.offset(x1, y0, z0)],
            field[self.offset(x1, y0, z1)],
            field[self.offset(x1, y1, z0)],
            field[self.offset(x1, y1, z1)],
            t,
        )
    }
}

#[inline]
fn wrap(v: i64, n: usize) -> usize {
    v.rem_euclid(n as i64) as usize
}

/// Float casts saturate (and NaN becomes 0), so any position maps to some cell.
#[inline]
fn wrap_float(v: f32, n: usize) -> usize {
    wrap(v as i64, n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}, {z}) is outside a grid of size {size}")]
    OutOfRange { x: i32, y: i32, z: i32, size: UVec3 },
    #[error("grid size {size} has an empty dimension")]
    EmptyDimension { size: UVec3 },
    #[error("aliased indexing does not fit a grid of size {size}")]
    AliasedOverflow { size: UVec3 },
    #[error("grid size {size} has too many cells")]
    TooLarge { size: UVec3 },
}
