//! The ping-pong swap controller.
//!
//! [`DoubleBuffer`] owns both field buffers and alternates their
//! published/staging roles. A write phase is opened with [`split`],
//! which hands out a read view of the published buffer together with a
//! write view of the staging buffer; [`swap`] then exchanges the roles.
//! Calling `swap()` without an intervening `split()` is an ordering
//! violation and is rejected.
//!
//! [`split`]: DoubleBuffer::split
//! [`swap`]: DoubleBuffer::swap

use crate::buffer::{FieldBuffer, FieldView, FieldViewMut};
use crate::error::GridError;

/// Double-buffered field storage with an explicit swap.
///
/// The borrow checker enforces the hard ordering invariant: the views
/// returned by [`DoubleBuffer::split`] borrow the controller, so no
/// swap can happen until every read and write of the step is finished
/// and the views are dropped. The `write_open` flag additionally
/// rejects a swap that was never preceded by a write phase.
#[derive(Debug)]
pub struct DoubleBuffer {
    a: FieldBuffer,
    b: FieldBuffer,
    /// Which buffer is currently staging (true = B staging, A published).
    b_is_staging: bool,
    /// Whether a write phase has been opened since the last swap.
    write_open: bool,
}

impl DoubleBuffer {
    /// Allocate both buffers, each plane initialized to its rest value.
    pub fn new(cell_count: usize, rest: &[f32]) -> Result<Self, GridError> {
        Ok(Self {
            a: FieldBuffer::new(cell_count, rest)?,
            b: FieldBuffer::new(cell_count, rest)?,
            b_is_staging: true,
            write_open: false,
        })
    }

    /// Number of cells per plane.
    pub fn cell_count(&self) -> usize {
        self.a.cell_count()
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.a.channels()
    }

    /// Read view of the published buffer.
    pub fn current(&self) -> FieldView<'_> {
        FieldView::new(if self.b_is_staging { &self.a } else { &self.b })
    }

    /// Open a write phase: returns the published buffer read-only and
    /// the staging buffer write-only.
    pub fn split(&mut self) -> (FieldView<'_>, FieldViewMut<'_>) {
        self.write_open = true;
        if self.b_is_staging {
            (FieldView::new(&self.a), FieldViewMut::new(&mut self.b))
        } else {
            (FieldView::new(&self.b), FieldViewMut::new(&mut self.a))
        }
    }

    /// Exchange the published and staging roles.
    ///
    /// Returns `Err(GridError::SwapWithoutWrite)` if no write phase was
    /// opened since the last swap — swapping in unwritten staging data
    /// would publish a stale generation.
    pub fn swap(&mut self) -> Result<(), GridError> {
        if !self.write_open {
            return Err(GridError::SwapWithoutWrite);
        }
        self.write_open = false;
        self.b_is_staging = !self.b_is_staging;
        Ok(())
    }
}
