//! Damped height-field wave kernel.
//!
//! Evolves `∂²h/∂t² = c²∇²h` with multiplicative velocity damping,
//! using the mean-of-neighbours stencil form:
//!
//! ```text
//! mean[i] = average of the 4-neighbour heights
//! v[i]    = (v[i] + (mean[i] − h[i]) · speed · dt) · damping
//! h[i]    = h[i] + v[i] · dt
//! ```
//!
//! `speed` plays the role of `c²` with the spatial step folded in, so
//! the default unit `dt` reproduces the familiar interactive water
//! look. The engine runs this kernel twice per step for a finer
//! effective timestep.
//!
//! Constructed via the builder pattern: [`WaveKernel::builder`].

use std::any::Any;

use shimmer_core::{ChannelDef, ChannelId, KernelError, Parameter, StepDiagnostics};
use shimmer_grid::{FieldView, FieldViewMut, Grid};

use crate::inject::InjectionProfile;
use crate::kernel::UpdateKernel;

/// Height (displacement) channel.
pub const HEIGHT: ChannelId = ChannelId(0);
/// Vertical velocity channel.
pub const VELOCITY: ChannelId = ChannelId(1);

static CHANNELS: &[ChannelDef] = &[ChannelDef::scalar("height"), ChannelDef::scalar("velocity")];

/// The damped wave kernel.
///
/// Tunables (clamped silently at set time): `waveSpeed` `[0.1, 5.0]`,
/// `damping` `[0.9, 0.999]`.
#[derive(Debug)]
pub struct WaveKernel {
    wave_speed: f64,
    damping: f64,
}

/// Builder for [`WaveKernel`].
pub struct WaveKernelBuilder {
    wave_speed: f64,
    damping: f64,
}

impl WaveKernel {
    /// Create a new builder with default parameters.
    pub fn builder() -> WaveKernelBuilder {
        WaveKernelBuilder {
            wave_speed: Parameter::WaveSpeed.default_value(),
            damping: Parameter::Damping.default_value(),
        }
    }
}

impl WaveKernelBuilder {
    /// Set the wave speed (clamped to `[0.1, 5.0]`).
    pub fn wave_speed(mut self, value: f64) -> Self {
        self.wave_speed = Parameter::WaveSpeed.clamp(value);
        self
    }

    /// Set the damping factor (clamped to `[0.9, 0.999]`).
    pub fn damping(mut self, value: f64) -> Self {
        self.damping = Parameter::Damping.clamp(value);
        self
    }

    /// Build the kernel. Tunables are already clamped, so construction
    /// cannot fail; the `Result` keeps the signature uniform across
    /// kernels.
    pub fn build(self) -> Result<WaveKernel, String> {
        Ok(WaveKernel {
            wave_speed: self.wave_speed,
            damping: self.damping,
        })
    }
}

impl UpdateKernel for WaveKernel {
    fn name(&self) -> &str {
        "DampedWave"
    }

    fn channels(&self) -> &'static [ChannelDef] {
        CHANNELS
    }

    fn rest_state(&self) -> Vec<f32> {
        vec![0.0, 0.0]
    }

    fn substeps(&self) -> u32 {
        2
    }

    fn injection_profile(&self) -> InjectionProfile {
        InjectionProfile::Additive
    }

    fn max_dt(&self) -> Option<f64> {
        // The mean-form stencil stays stable up to speed·dt = 2 in 2D.
        Some(2.0 / self.wave_speed)
    }

    fn parameter(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::WaveSpeed => Some(self.wave_speed),
            Parameter::Damping => Some(self.damping),
            _ => None,
        }
    }

    fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Option<f64> {
        let clamped = parameter.clamp(value);
        match parameter {
            Parameter::WaveSpeed => self.wave_speed = clamped,
            Parameter::Damping => self.damping = clamped,
            _ => return None,
        }
        Some(clamped)
    }

    fn step(
        &self,
        grid: &Grid,
        prev: &FieldView<'_>,
        next: &mut FieldViewMut<'_>,
        dt: f64,
    ) -> Result<StepDiagnostics, KernelError> {
        let height = prev
            .plane(HEIGHT)
            .ok_or(KernelError::ChannelUnavailable { channel: HEIGHT })?;
        let velocity = prev
            .plane(VELOCITY)
            .ok_or(KernelError::ChannelUnavailable { channel: VELOCITY })?;

        let res = grid.resolution() as i32;
        let n = grid.cell_count();
        let speed_dt = (self.wave_speed * dt) as f32;
        let damping = self.damping as f32;
        let dt_f32 = dt as f32;

        let mut new_h = vec![0.0f32; n];
        let mut new_v = vec![0.0f32; n];
        let mut diag = StepDiagnostics::default();

        for r in 0..res {
            for c in 0..res {
                let i = grid.index(r as u32, c as u32);
                let h = height[i];

                let stencil = grid.stencil4(r, c);
                let mean: f32 = stencil.iter().map(|&ni| height[ni]).sum::<f32>() / 4.0;

                let v = (velocity[i] + (mean - h) * speed_dt) * damping;
                let h_next = h + v * dt_f32;

                if !h_next.is_finite() || !v.is_finite() {
                    diag.non_finite_cells += 1;
                }
                new_v[i] = v;
                new_h[i] = h_next;
            }
        }

        let out_h = next
            .plane_mut(HEIGHT)
            .ok_or(KernelError::ChannelUnavailable { channel: HEIGHT })?;
        out_h.copy_from_slice(&new_h);
        let out_v = next
            .plane_mut(VELOCITY)
            .ok_or(KernelError::ChannelUnavailable { channel: VELOCITY })?;
        out_v.copy_from_slice(&new_v);

        Ok(diag)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
