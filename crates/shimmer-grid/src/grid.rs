//! Uniform square grid with domain mapping and stencil helpers.

use smallvec::SmallVec;

use crate::edge::EdgeBehavior;
use crate::error::GridError;

/// A uniform N×N grid covering the physical domain `[-scale, scale]²`.
///
/// Rows index the y axis (row 0 at the bottom edge, y increasing
/// upward), columns index x. Cell `(row, col)` is centered at
/// `(-scale + (col + 0.5)·h, -scale + (row + 0.5)·h)` with
/// `h = 2·scale / resolution`.
///
/// Enlarging `scale` beyond the visible window is the sanctioned way of
/// approximating an open boundary: disturbances dissipate into the
/// off-screen margin before the edge reflection becomes visible. The
/// grid itself always uses the configured [`EdgeBehavior`] for stencil
/// samples at the border.
#[derive(Debug, Clone)]
pub struct Grid {
    resolution: u32,
    scale: f64,
    edge: EdgeBehavior,
}

impl Grid {
    /// Maximum resolution: keeps `resolution²` within `u32` cell indices.
    pub const MAX_RESOLUTION: u32 = u16::MAX as u32;

    /// Create a grid with the given resolution, physical scale, and edge
    /// behavior.
    ///
    /// Returns `Err(GridError::EmptyGrid)` for zero resolution,
    /// `Err(GridError::DimensionTooLarge)` above
    /// [`Grid::MAX_RESOLUTION`], and `Err(GridError::InvalidScale)` when
    /// `scale` is not finite and positive.
    pub fn new(resolution: u32, scale: f64, edge: EdgeBehavior) -> Result<Self, GridError> {
        if resolution == 0 {
            return Err(GridError::EmptyGrid);
        }
        if resolution > Self::MAX_RESOLUTION {
            return Err(GridError::DimensionTooLarge {
                resolution,
                max: Self::MAX_RESOLUTION,
            });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GridError::invalid_scale(scale));
        }
        Ok(Self {
            resolution,
            scale,
            edge,
        })
    }

    /// Grid resolution (cells per axis).
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Half-extent of the physical domain.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Edge behavior used for stencil samples at the border.
    pub fn edge_behavior(&self) -> EdgeBehavior {
        self.edge
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }

    /// Physical side length of one cell.
    pub fn cell_size(&self) -> f64 {
        2.0 * self.scale / f64::from(self.resolution)
    }

    /// Flat index of cell `(row, col)`. Both must be in range.
    pub fn index(&self, row: u32, col: u32) -> usize {
        debug_assert!(row < self.resolution && col < self.resolution);
        row as usize * self.resolution as usize + col as usize
    }

    /// Physical center of cell `(row, col)`.
    pub fn cell_center(&self, row: u32, col: u32) -> (f64, f64) {
        let h = self.cell_size();
        (
            -self.scale + (f64::from(col) + 0.5) * h,
            -self.scale + (f64::from(row) + 0.5) * h,
        )
    }

    /// Resolve a possibly out-of-bounds axis value per the edge behavior.
    ///
    /// With only clamping and wrapping topologies, every input resolves
    /// to a valid index.
    pub fn resolve_axis(&self, v: i32) -> u32 {
        let n = self.resolution as i32;
        let r = match self.edge {
            EdgeBehavior::Clamp => v.clamp(0, n - 1),
            EdgeBehavior::Wrap => ((v % n) + n) % n,
        };
        r as u32
    }

    /// Edge-resolved sample of a channel plane at `(row, col)`.
    pub fn sample(&self, plane: &[f32], row: i32, col: i32) -> f32 {
        plane[self.index(self.resolve_axis(row), self.resolve_axis(col))]
    }

    /// Flat indices of the 4-connected stencil neighbours of `(row, col)`,
    /// edge-resolved. With `Clamp` edges, border cells self-loop on the
    /// boundary axis, so the list always has four entries.
    pub fn stencil4(&self, row: i32, col: i32) -> SmallVec<[usize; 4]> {
        let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        let mut result = SmallVec::new();
        for (dr, dc) in offsets {
            result.push(self.index(self.resolve_axis(row + dr), self.resolve_axis(col + dc)));
        }
        result
    }

    /// Edge-resolved sample at a fractional row position, linearly
    /// interpolated between the two straddled rows. Used by the
    /// semi-Lagrangian advection step, which only offsets along y.
    pub fn sample_row_linear(&self, plane: &[f32], row: f64, col: i32) -> f32 {
        let base = row.floor();
        let frac = (row - base) as f32;
        let r0 = base as i32;
        let v0 = self.sample(plane, r0, col);
        let v1 = self.sample(plane, r0 + 1, col);
        v0 + (v1 - v0) * frac
    }

    /// Inclusive index range of cells whose centers may lie within
    /// `radius` of `center` along one axis, clamped to the grid.
    /// `None` when the interval misses the grid entirely.
    pub fn axis_range(&self, center: f64, radius: f64) -> Option<(u32, u32)> {
        let h = self.cell_size();
        let last = f64::from(self.resolution - 1);
        let lo = ((center - radius + self.scale) / h - 0.5).floor();
        let hi = ((center + radius + self.scale) / h - 0.5).ceil();
        if hi < 0.0 || lo > last {
            return None;
        }
        Some((lo.max(0.0) as u32, hi.min(last) as u32))
    }
}
