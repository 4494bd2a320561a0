//! Localized source/sink injection.
//!
//! A disturbance is a smooth radial write into one channel: every cell
//! within `radius` of the center receives a contribution weighted by
//! the linear falloff `max(0, 1 - dist/radius)`. A negative strength
//! turns the source into a sink — same code path, only the sign flips.
//!
//! Injection reads the source buffer and writes the target buffer; the
//! caller performs the swap afterwards.

use shimmer_core::{ChannelId, KernelError};
use shimmer_grid::{FieldView, FieldViewMut, Grid};

/// How a disturbance combines with the existing channel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InjectionProfile {
    /// Pull toward the target value: `new = old + w·s·(value − old)`.
    /// Used by the thermal model, where `value` is the source temperature.
    Blend,
    /// Add directly: `new = old + w·s·value`. Used by the wave model,
    /// where `value` is the drop amplitude.
    Additive,
}

/// A single localized disturbance in domain coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disturbance {
    /// Center `(x, y)` in domain coordinates.
    pub center: (f64, f64),
    /// Falloff radius in domain units. Non-positive radius is a no-op.
    pub radius: f64,
    /// Blend strength; negative for sinks.
    pub strength: f32,
    /// Target value (thermal) or amplitude (wave).
    pub value: f32,
}

/// Writes disturbances into a target buffer with a smooth radial falloff.
#[derive(Clone, Copy, Debug)]
pub struct SourceInjector {
    profile: InjectionProfile,
}

impl SourceInjector {
    /// Create an injector with the given blend profile.
    pub fn new(profile: InjectionProfile) -> Self {
        Self { profile }
    }

    /// The configured blend profile.
    pub fn profile(&self) -> InjectionProfile {
        self.profile
    }

    /// Copy `source` into `target`, then blend `disturbance` into
    /// `channel`.
    ///
    /// Degenerate disturbances (non-positive or non-finite radius,
    /// non-finite center, zero strength) leave the target an exact copy
    /// of the source.
    pub fn inject(
        &self,
        grid: &Grid,
        source: &FieldView<'_>,
        target: &mut FieldViewMut<'_>,
        channel: ChannelId,
        disturbance: &Disturbance,
    ) -> Result<(), KernelError> {
        target.copy_from(source);

        let Disturbance {
            center: (cx, cy),
            radius,
            strength,
            value,
        } = *disturbance;

        if !(radius > 0.0) || !radius.is_finite() || !cx.is_finite() || !cy.is_finite() {
            return Ok(());
        }
        if strength == 0.0 {
            return Ok(());
        }

        let input = source
            .plane(channel)
            .ok_or(KernelError::ChannelUnavailable { channel })?;
        let output = target
            .plane_mut(channel)
            .ok_or(KernelError::ChannelUnavailable { channel })?;

        let (Some((c0, c1)), Some((r0, r1))) =
            (grid.axis_range(cx, radius), grid.axis_range(cy, radius))
        else {
            return Ok(());
        };

        for row in r0..=r1 {
            for col in c0..=c1 {
                let (x, y) = grid.cell_center(row, col);
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if dist >= radius {
                    continue;
                }
                let falloff = (1.0 - dist / radius) as f32;
                let i = grid.index(row, col);
                let old = input[i];
                output[i] = match self.profile {
                    InjectionProfile::Blend => old + falloff * strength * (value - old),
                    InjectionProfile::Additive => old + falloff * strength * value,
                };
            }
        }
        Ok(())
    }
}
