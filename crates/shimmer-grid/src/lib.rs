//! Grid topology and field storage for the Shimmer simulation engine.
//!
//! Provides the square [`Grid`] (resolution, physical scale, edge
//! behavior, domain↔cell mapping), the channel-plane [`FieldBuffer`],
//! and the ping-pong [`DoubleBuffer`] that enforces the read-previous /
//! write-next discipline every stencil update relies on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod double;
pub mod edge;
pub mod error;
pub mod grid;

pub use buffer::{FieldBuffer, FieldView, FieldViewMut};
pub use double::DoubleBuffer;
pub use edge::EdgeBehavior;
pub use error::GridError;
pub use grid::Grid;
