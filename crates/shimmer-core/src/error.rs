//! Error types shared across the workspace.
//!
//! Each subsystem owns its error enum; this crate defines only the one
//! that crosses the kernel boundary. Grid and engine errors live next to
//! the code that produces them and wrap upward via `From`.

use std::error::Error;
use std::fmt;

use crate::id::ChannelId;

/// Errors from an update kernel's `step()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// A channel plane required by the kernel was missing from the buffer.
    ChannelUnavailable {
        /// The channel that could not be read or written.
        channel: ChannelId,
    },
    /// The kernel's step function failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelUnavailable { channel } => {
                write!(f, "channel {channel} not available in buffer")
            }
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
        }
    }
}

impl Error for KernelError {}
