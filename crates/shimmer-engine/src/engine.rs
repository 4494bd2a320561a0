//! The engine facade.
//!
//! Owns every moving part of one simulation instance and exposes the
//! operations external collaborators consume. Mutation of the field
//! only ever flows through the injector or the kernel, each writing the
//! staging buffer and swapping afterwards; rendering collaborators read
//! back through [`Engine::current`] and never touch engine memory.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use shimmer_core::{KernelError, Parameter, StepDiagnostics, StepId};
use shimmer_grid::{DoubleBuffer, FieldView, Grid, GridError};
use shimmer_kernels::{
    Disturbance, GradientExtractor, GradientField, SourceInjector, ThermalKernel, UpdateKernel,
    Wall, WaveKernel,
};

use crate::config::{ConfigError, EngineConfig, InitialDisturbances, ModelConfig};
use crate::measure::{MeasurementEngine, MeasurementRecord};

// ── StepError ──────────────────────────────────────────────────────

/// Errors from engine operations after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepError {
    /// A kernel or field operator failed.
    KernelFailed {
        /// Name of the failing component.
        name: String,
        /// The underlying error.
        reason: KernelError,
    },
    /// A buffer-order violation surfaced from the swap controller.
    Grid(GridError),
    /// The operation requires a model the engine is not running.
    WrongModel {
        /// The rejected operation.
        operation: &'static str,
        /// The active model's name.
        model: String,
    },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelFailed { name, reason } => write!(f, "'{name}' failed: {reason}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::WrongModel { operation, model } => {
                write!(f, "{operation} is not supported by model {model}")
            }
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KernelFailed { reason, .. } => Some(reason),
            Self::Grid(e) => Some(e),
            Self::WrongModel { .. } => None,
        }
    }
}

impl From<GridError> for StepError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ── Engine ─────────────────────────────────────────────────────────

/// One simulation instance: grid, buffers, kernel, operators, history.
pub struct Engine {
    grid: Grid,
    buffers: DoubleBuffer,
    kernel: Box<dyn UpdateKernel>,
    injector: SourceInjector,
    extractor: GradientExtractor,
    measurements: MeasurementEngine,
    dt: f64,
    step_id: StepId,
    epoch: Instant,
}

impl Engine {
    /// Construct an engine from a validated configuration.
    ///
    /// The field starts uniformly at the model's rest state (ambient
    /// temperature, or a flat surface), optionally perturbed by the
    /// seeded disturbance scatter.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.resolution, config.scale, config.edge)?;
        let kernel: Box<dyn UpdateKernel> = match &config.model {
            ModelConfig::Thermal(p) => Box::new(
                ThermalKernel::builder()
                    .diffusivity(p.diffusivity)
                    .retention(p.retention)
                    .gravity(p.gravity)
                    .ambient(p.ambient)
                    .build()
                    .map_err(|reason| ConfigError::InvalidKernel { reason })?,
            ),
            ModelConfig::Wave(p) => Box::new(
                WaveKernel::builder()
                    .wave_speed(p.wave_speed)
                    .damping(p.damping)
                    .build()
                    .map_err(|reason| ConfigError::InvalidKernel { reason })?,
            ),
        };

        let buffers = DoubleBuffer::new(grid.cell_count(), &kernel.rest_state())?;
        let injector = SourceInjector::new(kernel.injection_profile());
        let extractor = match config.gradient_display_scale {
            Some(scale) => GradientExtractor::with_display_scale(scale),
            None => GradientExtractor::new(),
        };

        let mut engine = Self {
            grid,
            buffers,
            kernel,
            injector,
            extractor,
            measurements: MeasurementEngine::new(config.history_capacity),
            dt: config.model.dt(),
            step_id: StepId(0),
            epoch: Instant::now(),
        };

        if let Some(init) = &config.initial_disturbances {
            engine
                .scatter(init)
                .map_err(|e| ConfigError::InvalidKernel {
                    reason: e.to_string(),
                })?;
        }
        Ok(engine)
    }

    /// The simulation grid (for coordinate mapping in collaborators).
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The active model's name.
    pub fn model(&self) -> &str {
        self.kernel.name()
    }

    /// The configured substep timestep.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Steps taken so far.
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// Read-only view of the current field, for rendering.
    pub fn current(&self) -> FieldView<'_> {
        self.buffers.current()
    }

    /// The measurement history, oldest record first.
    pub fn history(&self) -> impl Iterator<Item = &MeasurementRecord> {
        self.measurements.history()
    }

    /// The measurement subsystem (capacity, latest record, ...).
    pub fn measurements(&self) -> &MeasurementEngine {
        &self.measurements
    }

    /// Write a localized disturbance into the primary channel at
    /// `(x, y)` domain coordinates. Negative `strength` is a sink.
    pub fn inject_disturbance(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        value: f32,
        strength: f32,
    ) -> Result<(), StepError> {
        let disturbance = Disturbance {
            center: (x, y),
            radius,
            strength,
            value,
        };
        let channel = self.kernel.primary_channel();
        {
            let (prev, mut next) = self.buffers.split();
            self.injector
                .inject(&self.grid, &prev, &mut next, channel, &disturbance)
                .map_err(|reason| StepError::KernelFailed {
                    name: "SourceInjector".into(),
                    reason,
                })?;
        }
        self.buffers.swap()?;
        Ok(())
    }

    /// Thermal-flavored convenience for [`Engine::inject_disturbance`].
    pub fn add_heat_source(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        temperature: f32,
        intensity: f32,
    ) -> Result<(), StepError> {
        self.inject_disturbance(x, y, radius, temperature, intensity)
    }

    /// A cooling sink: the same write with the intensity sign flipped.
    pub fn add_cold_source(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        temperature: f32,
        intensity: f32,
    ) -> Result<(), StepError> {
        self.inject_disturbance(x, y, radius, temperature, -intensity)
    }

    /// Advance the simulation one step (the model's substep count).
    ///
    /// Numerical trouble is reported through the returned diagnostics
    /// (and the `tracing` facade), never as an error — the engine's job
    /// is to keep producing frames.
    pub fn step(&mut self) -> Result<StepDiagnostics, StepError> {
        let mut diag = StepDiagnostics::default();
        if let Some(max_dt) = self.kernel.max_dt() {
            if self.dt > max_dt {
                diag.dt_exceeds_stable_bound = true;
            }
        }
        for _ in 0..self.kernel.substeps() {
            let sub = {
                let (prev, mut next) = self.buffers.split();
                self.kernel
                    .step(&self.grid, &prev, &mut next, self.dt)
                    .map_err(|reason| StepError::KernelFailed {
                        name: self.kernel.name().to_string(),
                        reason,
                    })?
            };
            self.buffers.swap()?;
            diag.merge(&sub);
        }
        self.step_id.0 += 1;

        if diag.non_finite_cells > 0 {
            warn!(
                cells = diag.non_finite_cells,
                step = self.step_id.0,
                "step produced non-finite values"
            );
        }
        if diag.dt_exceeds_stable_bound {
            warn!(
                dt = self.dt,
                step = self.step_id.0,
                "timestep exceeds the kernel's stable bound"
            );
        }
        Ok(diag)
    }

    /// Extract the gradient field of the primary channel.
    ///
    /// Pure read of the current buffer; callable any number of times
    /// between steps.
    pub fn compute_derivatives(&self) -> Result<GradientField, StepError> {
        self.extractor
            .extract(&self.grid, &self.buffers.current(), self.kernel.primary_channel())
            .map_err(|reason| StepError::KernelFailed {
                name: "GradientExtractor".into(),
                reason,
            })
    }

    /// Reduce the current field to a time-stamped record and append it
    /// to the bounded history.
    pub fn measure(&mut self) -> Result<MeasurementRecord, StepError> {
        let channel = self.kernel.primary_channel();
        let bounds = self
            .kernel
            .channels()
            .get(channel.0 as usize)
            .and_then(|def| def.bounds);
        let thermal = match (
            self.kernel.parameter(Parameter::Gravity),
            self.kernel.parameter(Parameter::Diffusivity),
        ) {
            (Some(gravity), Some(diffusivity)) => Some((gravity, diffusivity)),
            _ => None,
        };
        let timestamp = self.epoch.elapsed().as_secs_f64();

        let view = self.buffers.current();
        let plane = view.plane(channel).ok_or_else(|| StepError::KernelFailed {
            name: self.kernel.name().to_string(),
            reason: KernelError::ChannelUnavailable { channel },
        })?;
        let record = self
            .measurements
            .measure(plane, bounds, thermal, timestamp, self.step_id);

        if record.flags.non_finite {
            warn!(step = self.step_id.0, "measurement saw non-finite values");
        }
        if record.flags.out_of_range {
            warn!(
                step = self.step_id.0,
                min = f64::from(record.min),
                max = f64::from(record.max),
                "measurement saw values outside the clamp range"
            );
        }
        Ok(record)
    }

    /// Route a named tunable to the owning kernel's clamped setter.
    ///
    /// Returns the effective (clamped) value. Unknown names and names
    /// the active model does not own fail fast; the engine state is
    /// unchanged in both cases.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<f64, ConfigError> {
        let parameter =
            Parameter::from_name(name).ok_or_else(|| ConfigError::UnknownParameter {
                name: name.to_string(),
            })?;
        self.kernel
            .set_parameter(parameter, value)
            .ok_or_else(|| ConfigError::UnsupportedParameter {
                parameter,
                model: self.kernel.name().to_string(),
            })
    }

    /// Pin (or release) a fixed wall temperature. Thermal model only.
    pub fn set_wall_temperature(
        &mut self,
        wall: Wall,
        temperature: Option<f32>,
    ) -> Result<(), StepError> {
        let model = self.kernel.name().to_string();
        match self.kernel.as_any_mut().downcast_mut::<ThermalKernel>() {
            Some(kernel) => {
                kernel.set_wall_temperature(wall, temperature);
                Ok(())
            }
            None => Err(StepError::WrongModel {
                operation: "set_wall_temperature",
                model,
            }),
        }
    }

    /// Hot left wall against a cold right wall: a Fourier conduction
    /// setup. Thermal model only.
    pub fn start_conduction_experiment(&mut self) -> Result<(), StepError> {
        self.set_wall_temperature(Wall::Left, Some(80.0))?;
        self.set_wall_temperature(Wall::Right, Some(20.0))
    }

    /// A heat source at the base of the domain, driving a convection
    /// plume. Thermal model only.
    pub fn start_convection_experiment(&mut self) -> Result<(), StepError> {
        self.require_thermal("start_convection_experiment")?;
        let y = -0.8 * self.grid.scale();
        self.inject_disturbance(0.0, y, 0.3, 80.0, 0.2)
    }

    /// A point source at the domain center, spreading by diffusion
    /// alone. Thermal model only.
    pub fn start_diffusion_experiment(&mut self) -> Result<(), StepError> {
        self.require_thermal("start_diffusion_experiment")?;
        self.inject_disturbance(0.0, 0.0, 0.1, 100.0, 0.5)
    }

    fn require_thermal(&self, operation: &'static str) -> Result<(), StepError> {
        if self.kernel.as_any().downcast_ref::<ThermalKernel>().is_some() {
            Ok(())
        } else {
            Err(StepError::WrongModel {
                operation,
                model: self.kernel.name().to_string(),
            })
        }
    }

    fn scatter(&mut self, init: &InitialDisturbances) -> Result<(), StepError> {
        let mut rng = ChaCha8Rng::seed_from_u64(init.seed);
        let scale = self.grid.scale();
        for i in 0..init.count {
            let x = rng.random_range(-1.0..1.0) * scale;
            let y = rng.random_range(-1.0..1.0) * scale;
            // Alternate source and sink so the surface stays centered.
            let strength = if i % 2 == 0 {
                init.strength
            } else {
                -init.strength
            };
            self.inject_disturbance(x, y, init.radius, init.value, strength)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ThermalParams, WaveParams};
    use crate::measure::CRITICAL_RAYLEIGH;
    use approx::assert_relative_eq;
    use shimmer_core::ChannelId;

    const TEMPERATURE: ChannelId = ChannelId(0);
    const HEIGHT: ChannelId = ChannelId(0);

    fn thermal_engine(resolution: u32) -> Engine {
        Engine::new(EngineConfig::thermal(resolution, 1.0)).unwrap()
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn construction_rejects_invalid_config() {
        assert!(matches!(
            Engine::new(EngineConfig::thermal(0, 1.0)),
            Err(ConfigError::ZeroResolution)
        ));
        assert!(matches!(
            Engine::new(EngineConfig::wave(64, -1.0)),
            Err(ConfigError::InvalidScale { .. })
        ));
    }

    #[test]
    fn thermal_field_starts_at_ambient() {
        let engine = thermal_engine(16);
        let view = engine.current();
        assert!(view.plane(TEMPERATURE).unwrap().iter().all(|&t| t == 20.0));
        assert_eq!(engine.model(), "ThermalConvection");
        assert_eq!(engine.step_id(), shimmer_core::StepId(0));
    }

    #[test]
    fn wave_field_starts_flat() {
        let engine = Engine::new(EngineConfig::wave(16, 1.0)).unwrap();
        assert!(engine
            .current()
            .plane(HEIGHT)
            .unwrap()
            .iter()
            .all(|&h| h == 0.0));
    }

    #[test]
    fn initial_disturbances_are_deterministic() {
        let config = |seed: u64| {
            let mut c = EngineConfig::wave(32, 1.0);
            c.initial_disturbances = Some(InitialDisturbances {
                seed,
                radius: 0.1,
                ..InitialDisturbances::default()
            });
            c
        };
        let a = Engine::new(config(7)).unwrap();
        let b = Engine::new(config(7)).unwrap();
        let c = Engine::new(config(8)).unwrap();

        let plane = |e: &Engine| e.current().plane(HEIGHT).unwrap().to_vec();
        assert_eq!(plane(&a), plane(&b));
        assert_ne!(plane(&a), plane(&c));
        // The scatter actually disturbed the surface.
        assert!(plane(&a).iter().any(|&h| h != 0.0));
    }

    // ── Parameter routing ───────────────────────────────────────

    #[test]
    fn set_parameter_clamps_and_returns_effective_value() {
        let mut engine = thermal_engine(8);
        assert_eq!(engine.set_parameter("diffusivity", 99.0), Ok(2.0));
        assert_eq!(engine.set_parameter("diffusivity", -1.0), Ok(0.01));
        assert_eq!(engine.set_parameter("retention", 0.95), Ok(0.95));
        assert_eq!(engine.set_parameter("gravity", f64::NAN), Ok(0.0));
    }

    #[test]
    fn set_parameter_rejects_unknown_names() {
        let mut engine = thermal_engine(8);
        assert!(matches!(
            engine.set_parameter("viscosity", 1.0),
            Err(ConfigError::UnknownParameter { .. })
        ));
        // The engine keeps working afterwards.
        assert!(engine.step().is_ok());
    }

    #[test]
    fn set_parameter_rejects_foreign_model_parameters() {
        let mut engine = thermal_engine(8);
        assert!(matches!(
            engine.set_parameter("waveSpeed", 1.0),
            Err(ConfigError::UnsupportedParameter { .. })
        ));
        let mut engine = Engine::new(EngineConfig::wave(8, 1.0)).unwrap();
        assert!(matches!(
            engine.set_parameter("gravity", 0.5),
            Err(ConfigError::UnsupportedParameter { .. })
        ));
        assert_eq!(engine.set_parameter("damping", 0.91), Ok(0.91));
    }

    // ── End-to-end thermal scenario ─────────────────────────────

    #[test]
    fn heat_source_blends_and_stays_local_for_one_step() {
        let mut engine = Engine::new(EngineConfig {
            model: ModelConfig::Thermal(ThermalParams {
                diffusivity: 0.1,
                retention: 0.995,
                gravity: 0.1,
                ..ThermalParams::default()
            }),
            ..EngineConfig::thermal(64, 1.0)
        })
        .unwrap();

        engine.add_heat_source(0.0, 0.0, 0.1, 100.0, 0.5).unwrap();
        engine.step().unwrap();

        let grid = engine.grid().clone();
        let view = engine.current();
        let t = view.plane(TEMPERATURE).unwrap();

        // The cell nearest the center warmed, but only by a partial blend.
        let center = t[grid.index(32, 32)];
        assert!(center > 20.0, "center should warm, got {center}");
        assert!(center < 100.0, "blend must not overwrite, got {center}");

        // Beyond the falloff radius nothing has happened yet: the
        // falloff is zero there and diffusion needs more than one step.
        for row in 0..64u32 {
            for col in 0..64u32 {
                let (x, y) = grid.cell_center(row, col);
                if (x * x + y * y).sqrt() > 0.2 {
                    let v = t[grid.index(row, col)];
                    assert!(
                        (v - 20.0).abs() < 1e-4,
                        "cell ({row},{col}) at distance > 0.2 moved to {v}"
                    );
                }
            }
        }
    }

    #[test]
    fn thermal_clamp_invariant_survives_extreme_input() {
        let mut engine = thermal_engine(16);
        engine.inject_disturbance(0.0, 0.0, 0.5, 1.0e4, 0.9).unwrap();
        let diag = engine.step().unwrap();
        assert!(diag.clamped_cells > 0);
        for _ in 0..20 {
            engine.step().unwrap();
            let view = engine.current();
            assert!(view
                .plane(TEMPERATURE)
                .unwrap()
                .iter()
                .all(|&t| (0.0..=120.0).contains(&t)));
        }
    }

    #[test]
    fn symmetric_sources_stay_symmetric_across_steps() {
        let mut engine = thermal_engine(32);
        for sign in [-1.0f64, 1.0] {
            engine
                .inject_disturbance(sign * 0.4, -0.2, 0.25, 90.0, 0.6)
                .unwrap();
        }
        for _ in 0..10 {
            engine.step().unwrap();
        }
        let grid = engine.grid().clone();
        let view = engine.current();
        let t = view.plane(TEMPERATURE).unwrap();
        for row in 0..32u32 {
            for col in 0..32u32 {
                let a = t[grid.index(row, col)];
                let b = t[grid.index(row, 31 - col)];
                assert!(
                    (a - b).abs() < 1e-4,
                    "asymmetry at ({row},{col}): {a} vs {b}"
                );
            }
        }
    }

    // ── Measurement ─────────────────────────────────────────────

    #[test]
    fn uniform_field_measures_in_conduction_regime() {
        let mut engine = thermal_engine(16);
        let record = engine.measure().unwrap();
        assert_relative_eq!(record.mean, 20.0);
        let numbers = record.dimensionless.unwrap();
        assert_eq!(numbers.rayleigh, 0.0);
        assert_eq!(numbers.nusselt, 1.0);
        assert!(!record.flags.any());
    }

    #[test]
    fn heated_field_crosses_into_convection_regime() {
        let mut engine = thermal_engine(32);
        engine.add_heat_source(0.0, 0.0, 0.3, 100.0, 0.8).unwrap();
        engine.step().unwrap();
        let record = engine.measure().unwrap();
        let numbers = record.dimensionless.unwrap();
        assert!(numbers.rayleigh > CRITICAL_RAYLEIGH);
        assert_relative_eq!(
            numbers.nusselt,
            0.54 * numbers.rayleigh.powf(0.25),
            epsilon = 1e-12
        );
    }

    #[test]
    fn wave_measurements_carry_no_dimensionless_numbers() {
        let mut engine = Engine::new(EngineConfig::wave(16, 1.0)).unwrap();
        let record = engine.measure().unwrap();
        assert!(record.dimensionless.is_none());
    }

    #[test]
    fn history_is_bounded_with_the_oldest_evicted() {
        let mut engine = thermal_engine(16);
        let mut record_501 = None;
        for i in 0..1500 {
            let record = engine.measure().unwrap();
            if i == 500 {
                record_501 = Some(record);
            }
        }
        assert_eq!(engine.measurements().len(), 1000);
        assert_eq!(engine.measurements().capacity(), 1000);
        let earliest = engine.history().next().unwrap();
        assert_eq!(earliest.timestamp, record_501.unwrap().timestamp);
    }

    // ── Stepping & derivatives ──────────────────────────────────

    #[test]
    fn wave_step_moves_an_injected_drop() {
        let mut engine = Engine::new(EngineConfig::wave(32, 1.0)).unwrap();
        engine.inject_disturbance(0.0, 0.0, 0.1, 0.05, 1.0).unwrap();
        let before: Vec<f32> = engine.current().plane(HEIGHT).unwrap().to_vec();
        engine.step().unwrap();
        let after = engine.current();
        assert_ne!(after.plane(HEIGHT).unwrap(), before.as_slice());
        assert_eq!(engine.step_id(), shimmer_core::StepId(1));
    }

    #[test]
    fn derivatives_reflect_the_field_without_mutating_it() {
        let mut engine = thermal_engine(32);
        engine.add_heat_source(0.0, 0.0, 0.3, 100.0, 0.8).unwrap();

        let before: Vec<f32> = engine.current().plane(TEMPERATURE).unwrap().to_vec();
        let gradients = engine.compute_derivatives().unwrap();
        assert_eq!(gradients.resolution(), 32);
        assert!(gradients.as_slice().iter().any(|&g| g != 0.0));
        assert_eq!(
            engine.current().plane(TEMPERATURE).unwrap(),
            before.as_slice()
        );
    }

    // ── Walls & experiments ─────────────────────────────────────

    #[test]
    fn conduction_experiment_pins_both_walls() {
        let mut engine = thermal_engine(16);
        engine.start_conduction_experiment().unwrap();
        engine.step().unwrap();
        let grid = engine.grid().clone();
        let view = engine.current();
        let t = view.plane(TEMPERATURE).unwrap();
        for row in 0..16u32 {
            assert_eq!(t[grid.index(row, 0)], 80.0);
            assert_eq!(t[grid.index(row, 15)], 20.0);
        }
    }

    #[test]
    fn experiments_require_the_thermal_model() {
        let mut engine = Engine::new(EngineConfig::wave(16, 1.0)).unwrap();
        assert!(matches!(
            engine.start_conduction_experiment(),
            Err(StepError::WrongModel { .. })
        ));
        assert!(matches!(
            engine.start_diffusion_experiment(),
            Err(StepError::WrongModel { .. })
        ));
        assert!(matches!(
            engine.set_wall_temperature(Wall::Left, Some(50.0)),
            Err(StepError::WrongModel { .. })
        ));
    }

    #[test]
    fn convection_experiment_heats_the_base() {
        let mut engine = thermal_engine(32);
        engine.start_convection_experiment().unwrap();
        let grid = engine.grid().clone();
        let view = engine.current();
        let t = view.plane(TEMPERATURE).unwrap();
        // Bottom rows warmed, top rows untouched.
        let bottom: f32 = (0..32).map(|c| t[grid.index(2, c)]).sum();
        let top: f32 = (0..32).map(|c| t[grid.index(29, c)]).sum();
        assert!(bottom > top);
        assert!((top - 32.0 * 20.0).abs() < 1e-3);
    }

    #[test]
    fn cold_source_cools() {
        // The sink of a hot source: same write, intensity sign flipped.
        let mut engine = thermal_engine(32);
        engine.add_cold_source(0.0, 0.0, 0.3, 100.0, 0.5).unwrap();
        let view = engine.current();
        let min = view
            .plane(TEMPERATURE)
            .unwrap()
            .iter()
            .cloned()
            .fold(f32::INFINITY, f32::min);
        assert!(min < 20.0, "cold source should cool below ambient: {min}");
    }

    proptest::proptest! {
        #[test]
        fn set_parameter_effective_value_always_in_range(
            value in proptest::num::f64::ANY,
        ) {
            let mut engine = thermal_engine(4);
            let effective = engine.set_parameter("diffusivity", value).unwrap();
            proptest::prop_assert!(
                (0.01..=2.0).contains(&effective),
                "effective diffusivity {} escaped its range", effective,
            );
        }
    }

    #[test]
    fn dt_above_stable_bound_is_flagged_not_fatal() {
        let mut engine = Engine::new(EngineConfig {
            model: ModelConfig::Wave(WaveParams {
                wave_speed: 5.0,
                damping: 0.9,
                dt: 1.0,
            }),
            ..EngineConfig::wave(16, 1.0)
        })
        .unwrap();
        let diag = engine.step().unwrap();
        assert!(diag.dt_exceeds_stable_bound);
    }
}
