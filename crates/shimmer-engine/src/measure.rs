//! Field measurement and the bounded diagnostics history.
//!
//! One pass over the primary channel reduces the field to
//! `{mean, min, max}`; for the thermal model the temperature span then
//! yields the Rayleigh and Nusselt numbers. Every measurement is
//! appended to a fixed-capacity history, oldest record evicted first.
//!
//! Non-finite field values are propagated into the record and flagged,
//! never silently replaced — diagnosing instability is the caller's
//! job, and hiding it would make that impossible.

use std::collections::VecDeque;

use shimmer_core::StepId;

/// Critical Rayleigh number for onset of convection in an idealized
/// layer; below it heat transport is conduction only.
pub const CRITICAL_RAYLEIGH: f64 = 1708.0;

/// Kinematic viscosity ν used in the Rayleigh number (fixed).
const KINEMATIC_VISCOSITY: f64 = 1e-6;
/// Thermal expansion coefficient β (fixed).
const THERMAL_EXPANSION: f64 = 1e-3;
/// Characteristic length L (fixed).
const CHARACTERISTIC_LENGTH: f64 = 1.0;

/// Dimensionless numbers characterizing the convection regime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionlessNumbers {
    /// Rayleigh number `Ra = g·β·ΔT·L³ / (ν·α)`.
    pub rayleigh: f64,
    /// Nusselt number: 1.0 in the conduction regime, `0.54·Ra^0.25`
    /// once `Ra` exceeds [`CRITICAL_RAYLEIGH`].
    pub nusselt: f64,
}

impl DimensionlessNumbers {
    /// Compute both numbers from the measured temperature span and the
    /// current gravity factor and diffusivity.
    pub fn from_span(delta_t: f64, gravity: f64, diffusivity: f64) -> Self {
        let rayleigh = gravity * THERMAL_EXPANSION * delta_t * CHARACTERISTIC_LENGTH.powi(3)
            / (KINEMATIC_VISCOSITY * diffusivity);
        let nusselt = if rayleigh > CRITICAL_RAYLEIGH {
            0.54 * rayleigh.powf(0.25)
        } else {
            1.0
        };
        Self { rayleigh, nusselt }
    }
}

/// Instability indicators attached to a measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstabilityFlags {
    /// The field contained NaN or infinite values.
    pub non_finite: bool,
    /// The measured extremes escaped the channel's clamp bounds.
    pub out_of_range: bool,
}

impl InstabilityFlags {
    /// Returns `true` if any flag is raised.
    pub fn any(&self) -> bool {
        self.non_finite || self.out_of_range
    }
}

/// One time-stamped reduction of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasurementRecord {
    /// Seconds since engine construction.
    pub timestamp: f64,
    /// Step counter at measurement time.
    pub step: StepId,
    /// Mean of the primary channel.
    pub mean: f64,
    /// Minimum of the primary channel.
    pub min: f32,
    /// Maximum of the primary channel.
    pub max: f32,
    /// Rayleigh/Nusselt numbers; `None` for models without them.
    pub dimensionless: Option<DimensionlessNumbers>,
    /// Instability indicators for this measurement.
    pub flags: InstabilityFlags,
}

/// Reduces field planes to records and keeps a bounded history.
#[derive(Debug)]
pub struct MeasurementEngine {
    history: VecDeque<MeasurementRecord>,
    capacity: usize,
}

impl MeasurementEngine {
    /// Create a measurement engine retaining at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no measurements have been taken yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Records, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.history.iter()
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&MeasurementRecord> {
        self.history.back()
    }

    /// Reduce `plane` to a record, append it to the history, and return
    /// it. `bounds` are the channel's clamp bounds (for the
    /// out-of-range flag); `thermal` carries `(gravity, diffusivity)`
    /// when the model has dimensionless numbers.
    pub fn measure(
        &mut self,
        plane: &[f32],
        bounds: Option<(f32, f32)>,
        thermal: Option<(f64, f64)>,
        timestamp: f64,
        step: StepId,
    ) -> MeasurementRecord {
        let mut sum = 0.0f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut non_finite = false;
        let mut saw_nan = false;

        for &v in plane {
            sum += f64::from(v);
            if !v.is_finite() {
                non_finite = true;
                if v.is_nan() {
                    saw_nan = true;
                }
            }
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        // NaN never wins a comparison, so propagate it explicitly.
        if saw_nan {
            min = f32::NAN;
            max = f32::NAN;
        }

        let mean = sum / plane.len() as f64;
        let out_of_range = match bounds {
            Some((lo, hi)) => min < lo || max > hi,
            None => false,
        };
        let dimensionless = thermal.map(|(gravity, diffusivity)| {
            DimensionlessNumbers::from_span(f64::from(max) - f64::from(min), gravity, diffusivity)
        });

        let record = MeasurementRecord {
            timestamp,
            step,
            mean,
            min,
            max,
            dimensionless,
            flags: InstabilityFlags {
                non_finite,
                out_of_range,
            },
        };
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(record);
        record
    }
}
