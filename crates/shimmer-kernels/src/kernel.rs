//! The [`UpdateKernel`] trait.
//!
//! Kernels are the per-model update strategies selected at engine
//! construction. They declare their channel layout and rest state, and
//! advance the field one substep at a time under the double-buffer
//! contract: all reads come from the frozen previous generation, all
//! writes land in the staging buffer.

use std::any::Any;

use shimmer_core::{ChannelDef, ChannelId, KernelError, Parameter, StepDiagnostics};
use shimmer_grid::{FieldView, FieldViewMut, Grid};

use crate::inject::InjectionProfile;

/// A per-model field update strategy.
///
/// # Contract
///
/// - `step()` MUST be deterministic: same inputs produce identical outputs.
/// - `step()` reads only `prev` and writes every cell of its declared
///   channels into `next` — partial writes would publish stale state on
///   the subsequent swap.
/// - Parameter setters clamp silently to the documented range and
///   return the effective value; they never fail. `set_parameter`
///   returns `None` only for parameters the model does not own.
///
/// # Object safety
///
/// This trait is object-safe; the engine stores its kernel as
/// `Box<dyn UpdateKernel>`.
///
/// # Examples
///
/// A minimal kernel that decays a single channel toward zero:
///
/// ```
/// use shimmer_core::{ChannelDef, ChannelId, KernelError, Parameter, StepDiagnostics};
/// use shimmer_grid::{FieldView, FieldViewMut, Grid};
/// use shimmer_kernels::{InjectionProfile, UpdateKernel};
///
/// struct Decay;
///
/// static CHANNELS: &[ChannelDef] = &[ChannelDef::scalar("value")];
///
/// impl UpdateKernel for Decay {
///     fn name(&self) -> &str { "Decay" }
///     fn channels(&self) -> &'static [ChannelDef] { CHANNELS }
///     fn rest_state(&self) -> Vec<f32> { vec![0.0] }
///     fn injection_profile(&self) -> InjectionProfile { InjectionProfile::Additive }
///     fn parameter(&self, _: Parameter) -> Option<f64> { None }
///     fn set_parameter(&mut self, _: Parameter, _: f64) -> Option<f64> { None }
///
///     fn step(
///         &self,
///         _grid: &Grid,
///         prev: &FieldView<'_>,
///         next: &mut FieldViewMut<'_>,
///         dt: f64,
///     ) -> Result<StepDiagnostics, KernelError> {
///         let channel = ChannelId(0);
///         let input = prev
///             .plane(channel)
///             .ok_or(KernelError::ChannelUnavailable { channel })?;
///         let output = next
///             .plane_mut(channel)
///             .ok_or(KernelError::ChannelUnavailable { channel })?;
///         let keep = 1.0 - dt as f32;
///         for (out, &v) in output.iter_mut().zip(input) {
///             *out = v * keep;
///         }
///         Ok(StepDiagnostics::default())
///     }
///
///     fn as_any(&self) -> &dyn std::any::Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
/// }
///
/// let kernel = Decay;
/// assert_eq!(kernel.name(), "Decay");
/// assert_eq!(kernel.substeps(), 1);
/// ```
pub trait UpdateKernel: Send + 'static {
    /// Human-readable model name for error reporting and telemetry.
    fn name(&self) -> &str;

    /// The channel layout this model evolves. `ChannelId(n)` indexes it.
    fn channels(&self) -> &'static [ChannelDef];

    /// The channel that disturbances, gradients, and measurements target.
    fn primary_channel(&self) -> ChannelId {
        ChannelId(0)
    }

    /// Per-channel rest values the field is initialized to.
    fn rest_state(&self) -> Vec<f32>;

    /// How many substeps one engine step runs. A per-model constant:
    /// the wave model halves its effective timestep by stepping twice.
    fn substeps(&self) -> u32 {
        1
    }

    /// How disturbances blend into this model's primary channel.
    fn injection_profile(&self) -> InjectionProfile;

    /// Maximum stable timestep, if the model has one (CFL-style bound).
    ///
    /// Exceeding it is reported through
    /// [`StepDiagnostics::dt_exceeds_stable_bound`], never an error.
    fn max_dt(&self) -> Option<f64> {
        None
    }

    /// Current value of a tunable parameter, or `None` if this model
    /// does not own it.
    fn parameter(&self, parameter: Parameter) -> Option<f64>;

    /// Set a tunable parameter, clamping silently to its documented
    /// range. Returns the effective (clamped) value, or `None` if this
    /// model does not own the parameter.
    fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Option<f64>;

    /// Advance the field one substep.
    fn step(
        &self,
        grid: &Grid,
        prev: &FieldView<'_>,
        next: &mut FieldViewMut<'_>,
        dt: f64,
    ) -> Result<StepDiagnostics, KernelError>;

    /// Upcast for model-specific access (e.g., thermal wall controls).
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for model-specific access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
