//! Channel-plane field storage and its read/write views.
//!
//! A [`FieldBuffer`] stores one `f32` plane per channel, planes laid out
//! contiguously (structure-of-arrays). Buffers are only ever handed out
//! wrapped in a [`FieldView`] (read-only) or [`FieldViewMut`]
//! (write-only), which is what makes the read-previous / write-next
//! discipline of the swap controller structurally enforceable.

use shimmer_core::ChannelId;

use crate::error::GridError;

/// Fixed-size per-cell state storage: `channels` planes of `cell_count`
/// `f32` values each.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBuffer {
    cell_count: usize,
    channels: usize,
    data: Vec<f32>,
}

impl FieldBuffer {
    /// Allocate a buffer of `cell_count` cells with one plane per entry
    /// of `rest`, each plane filled with its rest value.
    ///
    /// Allocation failure is surfaced as `Err` rather than aborting —
    /// an engine cannot operate without its buffers, so the caller
    /// treats this as a fatal constructor error.
    pub fn new(cell_count: usize, rest: &[f32]) -> Result<Self, GridError> {
        let channels = rest.len();
        if channels == 0 {
            return Err(GridError::NoChannels);
        }
        let total = cell_count
            .checked_mul(channels)
            .ok_or(GridError::CapacityExceeded {
                cells: cell_count,
                channels,
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| GridError::AllocationFailed { slots: total })?;
        for &value in rest {
            data.extend(std::iter::repeat(value).take(cell_count));
        }
        Ok(Self {
            cell_count,
            channels,
            data,
        })
    }

    /// Number of cells per plane.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Read access to one channel plane.
    pub fn plane(&self, channel: ChannelId) -> Option<&[f32]> {
        let c = channel.0 as usize;
        if c >= self.channels {
            return None;
        }
        let start = c * self.cell_count;
        Some(&self.data[start..start + self.cell_count])
    }

    /// Write access to one channel plane.
    pub fn plane_mut(&mut self, channel: ChannelId) -> Option<&mut [f32]> {
        let c = channel.0 as usize;
        if c >= self.channels {
            return None;
        }
        let start = c * self.cell_count;
        Some(&mut self.data[start..start + self.cell_count])
    }

    fn copy_from(&mut self, other: &FieldBuffer) {
        debug_assert_eq!(self.cell_count, other.cell_count);
        debug_assert_eq!(self.channels, other.channels);
        self.data.copy_from_slice(&other.data);
    }
}

/// Read-only view of a [`FieldBuffer`].
///
/// Planes borrow the underlying buffer directly, so they may outlive
/// the view value itself (but not the buffer).
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    buffer: &'a FieldBuffer,
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(buffer: &'a FieldBuffer) -> Self {
        Self { buffer }
    }

    /// Number of cells per plane.
    pub fn cell_count(&self) -> usize {
        self.buffer.cell_count
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.buffer.channels
    }

    /// Read one channel plane.
    pub fn plane(&self, channel: ChannelId) -> Option<&'a [f32]> {
        self.buffer.plane(channel)
    }
}

/// Write-only view of a [`FieldBuffer`].
///
/// Deliberately exposes no read access to its own planes: stencil reads
/// must come from the paired [`FieldView`] of the previous generation.
#[derive(Debug)]
pub struct FieldViewMut<'a> {
    buffer: &'a mut FieldBuffer,
}

impl<'a> FieldViewMut<'a> {
    pub(crate) fn new(buffer: &'a mut FieldBuffer) -> Self {
        Self { buffer }
    }

    /// Number of cells per plane.
    pub fn cell_count(&self) -> usize {
        self.buffer.cell_count
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.buffer.channels
    }

    /// Write one channel plane.
    pub fn plane_mut(&mut self, channel: ChannelId) -> Option<&mut [f32]> {
        self.buffer.plane_mut(channel)
    }

    /// Overwrite every plane with the contents of `source`.
    ///
    /// Both views come from the same [`DoubleBuffer`](crate::DoubleBuffer),
    /// so the shapes always agree.
    pub fn copy_from(&mut self, source: &FieldView<'_>) {
        self.buffer.copy_from(source.buffer);
    }
}
