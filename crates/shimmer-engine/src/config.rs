//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the single input to [`Engine::new`]. It is
//! validated structurally up front; tunable physics values inside the
//! model parameters are *not* validated — kernels clamp them silently
//! to their documented ranges, matching the runtime setter policy.
//!
//! [`Engine::new`]: crate::Engine::new

use std::error::Error;
use std::fmt;

use shimmer_core::Parameter;
use shimmer_grid::{EdgeBehavior, GridError};

// ── Model parameters ───────────────────────────────────────────────

/// Construction-time parameters for the wave model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    /// Wave speed, clamped to `[0.1, 5.0]`.
    pub wave_speed: f64,
    /// Velocity damping, clamped to `[0.9, 0.999]`.
    pub damping: f64,
    /// Substep timestep. The default unit step folds the timestep into
    /// the speed coefficient, reproducing the interactive water look.
    pub dt: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            wave_speed: Parameter::WaveSpeed.default_value(),
            damping: Parameter::Damping.default_value(),
            dt: 1.0,
        }
    }
}

/// Construction-time parameters for the thermal model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalParams {
    /// Thermal diffusivity, clamped to `[0.01, 2.0]`.
    pub diffusivity: f64,
    /// Heat retention, clamped to `[0.9, 0.999]`.
    pub retention: f64,
    /// Buoyancy gravity factor, clamped to `[0.0, 1.0]`.
    pub gravity: f64,
    /// Ambient temperature in °C; also the rest value of the field.
    pub ambient: f64,
    /// Substep timestep in seconds.
    pub dt: f64,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            diffusivity: Parameter::Diffusivity.default_value(),
            retention: Parameter::Retention.default_value(),
            gravity: Parameter::Gravity.default_value(),
            ambient: 20.0,
            dt: 0.016,
        }
    }
}

/// Which physical model the engine runs, with its parameters.
///
/// The model is a construction-time strategy choice; it cannot be
/// changed on a live engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModelConfig {
    /// Damped height-field waves.
    Wave(WaveParams),
    /// Diffusion–convection thermal gas.
    Thermal(ThermalParams),
}

impl ModelConfig {
    /// The configured substep timestep.
    pub fn dt(&self) -> f64 {
        match self {
            Self::Wave(p) => p.dt,
            Self::Thermal(p) => p.dt,
        }
    }
}

// ── Initial disturbances ───────────────────────────────────────────

/// Seeded random disturbances applied once at engine construction,
/// alternating source and sink, so a fresh surface is not dead flat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialDisturbances {
    /// Number of disturbances.
    pub count: u32,
    /// RNG seed; identical seeds produce identical fields.
    pub seed: u64,
    /// Falloff radius of each disturbance, in domain units.
    pub radius: f64,
    /// Blend strength; the sign alternates per disturbance.
    pub strength: f32,
    /// Target value (thermal) or amplitude (wave).
    pub value: f32,
}

impl Default for InitialDisturbances {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 0,
            radius: 0.03,
            strength: 1.0,
            value: 0.01,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected at engine construction or parameter routing.
///
/// Every variant fails fast and leaves the engine in its previous
/// valid state (for `new`, no engine at all).
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Resolution is zero.
    ZeroResolution,
    /// Scale is not finite and positive.
    InvalidScale {
        /// The offending value.
        value: f64,
    },
    /// The substep timestep is not finite and positive.
    InvalidTimestep {
        /// The offending value.
        value: f64,
    },
    /// The measurement history capacity is zero.
    ZeroHistoryCapacity,
    /// `set_parameter` was called with an unregistered name.
    UnknownParameter {
        /// The rejected name.
        name: String,
    },
    /// The parameter exists but the active model does not own it.
    UnsupportedParameter {
        /// The rejected parameter.
        parameter: Parameter,
        /// The active model's name.
        model: String,
    },
    /// Kernel construction rejected its fixed configuration.
    InvalidKernel {
        /// Description of the rejection.
        reason: String,
    },
    /// Grid or buffer construction failed. Allocation failure is fatal:
    /// the engine cannot operate without its buffers.
    Grid(GridError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroResolution => write!(f, "resolution must be at least 1"),
            Self::InvalidScale { value } => {
                write!(f, "scale must be finite and positive, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::ZeroHistoryCapacity => write!(f, "history capacity must be at least 1"),
            Self::UnknownParameter { name } => write!(f, "unknown parameter '{name}'"),
            Self::UnsupportedParameter { parameter, model } => {
                write!(f, "parameter '{parameter}' is not owned by model {model}")
            }
            Self::InvalidKernel { reason } => write!(f, "invalid kernel config: {reason}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing an [`Engine`].
///
/// All inputs the core needs arrive here explicitly; the engine reads
/// no ambient or global state.
///
/// [`Engine`]: crate::Engine
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Cells per axis. Powers of two (256–512) are typical.
    pub resolution: u32,
    /// Half-extent of the physical domain `[-scale, scale]²`. Enlarging
    /// it reserves off-screen margin that approximates an open boundary.
    pub scale: f64,
    /// Stencil edge behavior.
    pub edge: EdgeBehavior,
    /// The physical model and its construction-time parameters.
    pub model: ModelConfig,
    /// Measurement history capacity (records, oldest evicted first).
    pub history_capacity: usize,
    /// Uniform scale applied to extracted gradients for display;
    /// `None` yields raw gradients.
    pub gradient_display_scale: Option<f32>,
    /// Optional seeded disturbance scatter applied at construction.
    pub initial_disturbances: Option<InitialDisturbances>,
}

impl EngineConfig {
    /// A wave engine with default parameters.
    pub fn wave(resolution: u32, scale: f64) -> Self {
        Self {
            resolution,
            scale,
            edge: EdgeBehavior::Clamp,
            model: ModelConfig::Wave(WaveParams::default()),
            history_capacity: 1000,
            gradient_display_scale: Some(0.1),
            initial_disturbances: None,
        }
    }

    /// A thermal engine with default parameters.
    pub fn thermal(resolution: u32, scale: f64) -> Self {
        Self {
            model: ModelConfig::Thermal(ThermalParams::default()),
            ..Self::wave(resolution, scale)
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale { value: self.scale });
        }
        let dt = self.model.dt();
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep { value: dt });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }
}
