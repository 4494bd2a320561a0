//! Channel definitions.
//!
//! A channel is one scalar plane of per-cell state (temperature, height,
//! velocity, ...). Each physical model declares its channel layout as a
//! static slice of [`ChannelDef`]; `ChannelId(n)` indexes into it.

/// Definition of one channel plane in a field buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelDef {
    /// Human-readable name for debugging and diagnostics.
    pub name: &'static str,
    /// Optional unit annotation (e.g., `"°C"`).
    pub units: Option<&'static str>,
    /// Optional `(min, max)` clamp bounds enforced after each update.
    pub bounds: Option<(f32, f32)>,
}

impl ChannelDef {
    /// A bare scalar channel with no units and no bounds.
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            units: None,
            bounds: None,
        }
    }

    /// Returns `true` if `value` lies within the declared bounds
    /// (always `true` for unbounded channels).
    pub fn in_bounds(&self, value: f32) -> bool {
        match self.bounds {
            Some((lo, hi)) => value >= lo && value <= hi,
            None => true,
        }
    }
}
