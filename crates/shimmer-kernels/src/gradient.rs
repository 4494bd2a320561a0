//! Forward-difference gradient extraction.
//!
//! Reads one channel plane and produces a 2-component gradient per cell
//! (`value[right] − value[center]`, `value[up] − value[center]`), the
//! quantity rendering collaborators use for surface normals and flow
//! arrows. A pure function of one read view: never mutates simulation
//! state, never swaps, safe to call any number of times between steps.

use shimmer_core::{ChannelId, KernelError};
use shimmer_grid::{FieldView, Grid};

/// A per-cell 2D gradient field, stored as interleaved `(gx, gy)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientField {
    resolution: u32,
    data: Vec<f32>,
}

impl GradientField {
    /// Grid resolution the gradients were computed on.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// The gradient at cell `(row, col)`.
    pub fn gradient(&self, row: u32, col: u32) -> (f32, f32) {
        let i = (row as usize * self.resolution as usize + col as usize) * 2;
        (self.data[i], self.data[i + 1])
    }

    /// The raw interleaved `(gx, gy)` buffer, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Computes forward-difference gradients of one channel plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientExtractor {
    display_scale: Option<f32>,
}

impl GradientExtractor {
    /// An extractor producing raw, unscaled gradients.
    pub fn new() -> Self {
        Self::default()
    }

    /// An extractor scaling gradients uniformly for display.
    pub fn with_display_scale(scale: f32) -> Self {
        Self {
            display_scale: Some(scale),
        }
    }

    /// Extract the gradient field of `channel` from `view`.
    pub fn extract(
        &self,
        grid: &Grid,
        view: &FieldView<'_>,
        channel: ChannelId,
    ) -> Result<GradientField, KernelError> {
        let plane = view
            .plane(channel)
            .ok_or(KernelError::ChannelUnavailable { channel })?;

        let res = grid.resolution() as i32;
        let mut data = vec![0.0f32; grid.cell_count() * 2];

        for r in 0..res {
            for c in 0..res {
                let i = grid.index(r as u32, c as u32);
                let center = plane[i];
                let right = grid.sample(plane, r, c + 1);
                let up = grid.sample(plane, r + 1, c);
                let (mut gx, mut gy) = (right - center, up - center);
                if let Some(scale) = self.display_scale {
                    gx *= scale;
                    gy *= scale;
                }
                data[i * 2] = gx;
                data[i * 2 + 1] = gy;
            }
        }

        Ok(GradientField {
            resolution: grid.resolution(),
            data,
        })
    }
}
