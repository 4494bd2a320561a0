//! Diffusion–convection thermal kernel.
//!
//! Evolves `∂T/∂t = α∇²T + convection` on the grid. Each substep:
//! 4-neighbour Laplacian into the temperature rate, buoyancy into the
//! vertical convection velocity, retention damping, explicit Euler
//! integration, a cheap semi-Lagrangian advection pass, and a final
//! clamp of the temperature channel.
//!
//! The advection step blends toward a value sampled below the cell by
//! `convection · dt` rows. It is deliberately not mass-conservative —
//! a visual approximation of transport, not rigorous physics — and the
//! blend factor `|convection| · 0.1` is left unclamped to match that
//! behavior. Instability shows up in the step diagnostics instead.
//!
//! Constructed via the builder pattern: [`ThermalKernel::builder`].

use std::any::Any;

use shimmer_core::{ChannelDef, ChannelId, KernelError, Parameter, StepDiagnostics};
use shimmer_grid::{FieldView, FieldViewMut, Grid};

use crate::inject::InjectionProfile;
use crate::kernel::UpdateKernel;

/// Temperature channel (°C).
pub const TEMPERATURE: ChannelId = ChannelId(0);
/// Temperature rate channel (dT/dt).
pub const RATE: ChannelId = ChannelId(1);
/// Vertical convection velocity channel.
pub const CONVECTION: ChannelId = ChannelId(2);

/// Default ambient temperature in °C.
pub const DEFAULT_AMBIENT: f64 = 20.0;

const MIN_TEMP: f32 = 0.0;
const MAX_TEMP: f32 = 120.0;
/// Temperature span normalizing the buoyancy term.
const BUOYANCY_SPAN: f32 = 80.0;
/// Per-substep damping of the convection velocity.
const CONVECTION_DAMPING: f32 = 0.98;
/// Advection blend weight per unit of convection velocity.
const ADVECTION_BLEND: f32 = 0.1;

static CHANNELS: &[ChannelDef] = &[
    ChannelDef {
        name: "temperature",
        units: Some("°C"),
        bounds: Some((MIN_TEMP, MAX_TEMP)),
    },
    ChannelDef {
        name: "rate",
        units: Some("°C/s"),
        bounds: None,
    },
    ChannelDef {
        name: "convection",
        units: None,
        bounds: None,
    },
];

/// A vertical wall column that can hold a fixed temperature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wall {
    /// The column at the minimum x edge.
    Left,
    /// The column at the maximum x edge.
    Right,
}

/// The diffusion–convection thermal kernel.
///
/// Tunables (all clamped silently at set time): `diffusivity`
/// `[0.01, 2.0]`, `retention` `[0.9, 0.999]`, `gravity` `[0.0, 1.0]`.
#[derive(Debug)]
pub struct ThermalKernel {
    diffusivity: f64,
    retention: f64,
    gravity: f64,
    ambient: f64,
    wall_temps: [Option<f32>; 2],
}

/// Builder for [`ThermalKernel`].
///
/// All fields have defaults; tunables out of their documented range are
/// clamped, not rejected.
pub struct ThermalKernelBuilder {
    diffusivity: f64,
    retention: f64,
    gravity: f64,
    ambient: f64,
}

impl ThermalKernel {
    /// Create a new builder with default parameters.
    pub fn builder() -> ThermalKernelBuilder {
        ThermalKernelBuilder {
            diffusivity: Parameter::Diffusivity.default_value(),
            retention: Parameter::Retention.default_value(),
            gravity: Parameter::Gravity.default_value(),
            ambient: DEFAULT_AMBIENT,
        }
    }

    /// The ambient (rest) temperature.
    pub fn ambient(&self) -> f64 {
        self.ambient
    }

    /// Pin a wall column to a fixed temperature (clamped to the
    /// temperature bounds), or release it with `None`. The pinned value
    /// is re-asserted at the end of every substep.
    pub fn set_wall_temperature(&mut self, wall: Wall, temperature: Option<f32>) {
        let idx = match wall {
            Wall::Left => 0,
            Wall::Right => 1,
        };
        self.wall_temps[idx] = temperature.map(|t| t.clamp(MIN_TEMP, MAX_TEMP));
    }

    /// The fixed temperature of a wall, if pinned.
    pub fn wall_temperature(&self, wall: Wall) -> Option<f32> {
        match wall {
            Wall::Left => self.wall_temps[0],
            Wall::Right => self.wall_temps[1],
        }
    }
}

impl ThermalKernelBuilder {
    /// Set the thermal diffusivity (clamped to `[0.01, 2.0]`).
    pub fn diffusivity(mut self, value: f64) -> Self {
        self.diffusivity = Parameter::Diffusivity.clamp(value);
        self
    }

    /// Set the heat retention factor (clamped to `[0.9, 0.999]`).
    pub fn retention(mut self, value: f64) -> Self {
        self.retention = Parameter::Retention.clamp(value);
        self
    }

    /// Set the buoyancy gravity factor (clamped to `[0.0, 1.0]`).
    pub fn gravity(mut self, value: f64) -> Self {
        self.gravity = Parameter::Gravity.clamp(value);
        self
    }

    /// Set the ambient temperature (default 20.0 °C).
    pub fn ambient(mut self, value: f64) -> Self {
        self.ambient = value;
        self
    }

    /// Build the kernel, validating the fixed configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `ambient` is non-finite or outside the
    /// temperature bounds.
    pub fn build(self) -> Result<ThermalKernel, String> {
        if !self.ambient.is_finite()
            || self.ambient < f64::from(MIN_TEMP)
            || self.ambient > f64::from(MAX_TEMP)
        {
            return Err(format!(
                "ambient must lie within [{MIN_TEMP}, {MAX_TEMP}], got {}",
                self.ambient
            ));
        }
        Ok(ThermalKernel {
            diffusivity: self.diffusivity,
            retention: self.retention,
            gravity: self.gravity,
            ambient: self.ambient,
            wall_temps: [None, None],
        })
    }
}

impl UpdateKernel for ThermalKernel {
    fn name(&self) -> &str {
        "ThermalConvection"
    }

    fn channels(&self) -> &'static [ChannelDef] {
        CHANNELS
    }

    fn rest_state(&self) -> Vec<f32> {
        vec![self.ambient as f32, 0.0, 0.0]
    }

    fn injection_profile(&self) -> InjectionProfile {
        InjectionProfile::Blend
    }

    fn max_dt(&self) -> Option<f64> {
        // Explicit diffusion on a 4-neighbour stencil: dt <= 1 / (4·α).
        Some(1.0 / (4.0 * self.diffusivity))
    }

    fn parameter(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Diffusivity => Some(self.diffusivity),
            Parameter::Retention => Some(self.retention),
            Parameter::Gravity => Some(self.gravity),
            _ => None,
        }
    }

    fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Option<f64> {
        let clamped = parameter.clamp(value);
        match parameter {
            Parameter::Diffusivity => self.diffusivity = clamped,
            Parameter::Retention => self.retention = clamped,
            Parameter::Gravity => self.gravity = clamped,
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
        let temp = prev
            .plane(TEMPERATURE)
            .ok_or(KernelError::ChannelUnavailable {
                channel: TEMPERATURE,
            })?;
        let rate = prev
            .plane(RATE)
            .ok_or(KernelError::ChannelUnavailable { channel: RATE })?;
        let conv = prev
            .plane(CONVECTION)
            .ok_or(KernelError::ChannelUnavailable {
                channel: CONVECTION,
            })?;

        let res = grid.resolution() as i32;
        let n = grid.cell_count();
        let alpha = self.diffusivity as f32;
        let retention = self.retention as f32;
        let gravity = self.gravity as f32;
        let ambient = self.ambient as f32;
        let dt_f32 = dt as f32;
        let last_col = grid.resolution() - 1;

        let mut new_t = vec![0.0f32; n];
        let mut new_r = vec![0.0f32; n];
        let mut new_c = vec![0.0f32; n];
        let mut diag = StepDiagnostics::default();

        for r in 0..res {
            for c in 0..res {
                let i = grid.index(r as u32, c as u32);
                let t_center = temp[i];

                let stencil = grid.stencil4(r, c);
                let neighbour_sum: f32 = stencil.iter().map(|&ni| temp[ni]).sum();
                let laplacian = neighbour_sum - 4.0 * t_center;

                let mut rate_i = rate[i] + laplacian * alpha;
                let mut conv_i = conv[i] + ((t_center - ambient) / BUOYANCY_SPAN) * gravity;
                rate_i *= retention;
                conv_i *= CONVECTION_DAMPING;

                let mut t = t_center + rate_i * dt_f32;

                // Semi-Lagrangian transport: rising cells pull from below.
                let source_row = f64::from(r) - f64::from(conv_i) * dt;
                let sampled = grid.sample_row_linear(temp, source_row, c);
                let blend = conv_i.abs() * ADVECTION_BLEND;
                t += (sampled - t) * blend;

                if c == 0 {
                    if let Some(w) = self.wall_temps[0] {
                        t = w;
                    }
                }
                if c as u32 == last_col {
                    if let Some(w) = self.wall_temps[1] {
                        t = w;
                    }
                }

                if !t.is_finite() {
                    diag.non_finite_cells += 1;
                }
                let clamped = t.clamp(MIN_TEMP, MAX_TEMP);
                if t.is_finite() && clamped != t {
                    diag.clamped_cells += 1;
                }

                new_t[i] = clamped;
                new_r[i] = rate_i;
                new_c[i] = conv_i;
            }
        }

        let out_t = next
            .plane_mut(TEMPERATURE)
            .ok_or(KernelError::ChannelUnavailable {
                channel: TEMPERATURE,
            })?;
        out_t.copy_from_slice(&new_t);
        let out_r = next
            .plane_mut(RATE)
            .ok_or(KernelError::ChannelUnavailable { channel: RATE })?;
        out_r.copy_from_slice(&new_r);
        let out_c = next
            .plane_mut(CONVECTION)
            .ok_or(KernelError::ChannelUnavailable {
                channel: CONVECTION,
            })?;
        out_c.copy_from_slice(&new_c);

        Ok(diag)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shimmer_grid::{DoubleBuffer, EdgeBehavior};

    const DT: f64 = 0.016;

    fn grid(res: u32) -> Grid {
        Grid::new(res, 1.0, EdgeBehavior::Clamp).unwrap()
    }

    fn buffers(grid: &Grid, kernel: &ThermalKernel) -> DoubleBuffer {
        DoubleBuffer::new(grid.cell_count(), &kernel.rest_state()).unwrap()
    }

    fn seed(db: &mut DoubleBuffer, channel: ChannelId, index: usize, value: f32) {
        let (prev, mut next) = db.split();
        next.copy_from(&prev);
        next.plane_mut(channel).unwrap()[index] = value;
        drop(prev);
        drop(next);
        db.swap().unwrap();
    }

    fn run_step(grid: &Grid, kernel: &ThermalKernel, db: &mut DoubleBuffer) -> StepDiagnostics {
        let (prev, mut next) = db.split();
        let diag = kernel.step(grid, &prev, &mut next, DT).unwrap();
        drop(prev);
        drop(next);
        db.swap().unwrap();
        diag
    }

    // ── Builder ─────────────────────────────────────────────────

    #[test]
    fn builder_defaults() {
        let k = ThermalKernel::builder().build().unwrap();
        assert_eq!(k.parameter(Parameter::Diffusivity), Some(0.1));
        assert_eq!(k.parameter(Parameter::Retention), Some(0.995));
        assert_eq!(k.parameter(Parameter::Gravity), Some(0.1));
        assert_eq!(k.ambient(), 20.0);
        assert_eq!(k.name(), "ThermalConvection");
        assert_eq!(k.substeps(), 1);
        assert_eq!(k.channels().len(), 3);
        assert_eq!(k.rest_state(), vec![20.0, 0.0, 0.0]);
    }

    #[test]
    fn builder_clamps_tunables() {
        let k = ThermalKernel::builder()
            .diffusivity(99.0)
            .retention(0.0)
            .gravity(-3.0)
            .build()
            .unwrap();
        assert_eq!(k.parameter(Parameter::Diffusivity), Some(2.0));
        assert_eq!(k.parameter(Parameter::Retention), Some(0.9));
        assert_eq!(k.parameter(Parameter::Gravity), Some(0.0));
    }

    #[test]
    fn builder_rejects_bad_ambient() {
        assert!(ThermalKernel::builder().ambient(f64::NAN).build().is_err());
        assert!(ThermalKernel::builder().ambient(500.0).build().is_err());
        assert!(ThermalKernel::builder().ambient(-10.0).build().is_err());
    }

    #[test]
    fn setters_clamp_and_report_effective_value() {
        let mut k = ThermalKernel::builder().build().unwrap();
        assert_eq!(k.set_parameter(Parameter::Diffusivity, 7.0), Some(2.0));
        assert_eq!(k.set_parameter(Parameter::Diffusivity, -1.0), Some(0.01));
        assert_eq!(k.parameter(Parameter::Diffusivity), Some(0.01));
        // Wave parameters are not owned by the thermal model.
        assert_eq!(k.set_parameter(Parameter::WaveSpeed, 1.0), None);
        assert_eq!(k.parameter(Parameter::Damping), None);
    }

    // ── Step physics ────────────────────────────────────────────

    #[test]
    fn uniform_ambient_field_is_stationary() {
        let g = grid(8);
        let k = ThermalKernel::builder().build().unwrap();
        let mut db = buffers(&g, &k);
        for _ in 0..5 {
            let diag = run_step(&g, &k, &mut db);
            assert!(diag.is_clean());
        }
        let view = db.current();
        assert!(view.plane(TEMPERATURE).unwrap().iter().all(|&t| t == 20.0));
        assert!(view.plane(CONVECTION).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn hot_cell_cools_and_warms_neighbours() {
        let g = grid(9);
        let k = ThermalKernel::builder().build().unwrap();
        let mut db = buffers(&g, &k);
        let center = g.index(4, 4);
        seed(&mut db, TEMPERATURE, center, 100.0);

        run_step(&g, &k, &mut db);

        let view = db.current();
        let t = view.plane(TEMPERATURE).unwrap();
        assert!(t[center] < 100.0, "hot cell should cool: {}", t[center]);
        for ni in g.stencil4(4, 4) {
            assert!(t[ni] > 20.0, "neighbour {ni} should warm: {}", t[ni]);
        }
    }

    #[test]
    fn hot_cell_gains_upward_convection() {
        let g = grid(9);
        let k = ThermalKernel::builder().build().unwrap();
        let mut db = buffers(&g, &k);
        let center = g.index(4, 4);
        seed(&mut db, TEMPERATURE, center, 100.0);

        run_step(&g, &k, &mut db);

        let conv = db.current().plane(CONVECTION).unwrap()[center];
        assert!(conv > 0.0, "hot gas should rise, got {conv}");
    }

    #[test]
    fn temperature_stays_within_bounds() {
        let g = grid(8);
        let k = ThermalKernel::builder()
            .diffusivity(2.0)
            .retention(0.999)
            .gravity(1.0)
            .build()
            .unwrap();
        let mut db = buffers(&g, &k);
        // Pathological rate pushing far past the clamp range.
        seed(&mut db, RATE, g.index(3, 3), 1.0e6);
        seed(&mut db, RATE, g.index(4, 4), -1.0e6);

        let diag = run_step(&g, &k, &mut db);
        assert!(diag.clamped_cells >= 2);

        for _ in 0..10 {
            run_step(&g, &k, &mut db);
            let t = db.current().plane(TEMPERATURE).unwrap();
            assert!(t.iter().all(|&v| (0.0..=120.0).contains(&v)));
        }
    }

    #[test]
    fn retention_decays_the_rate() {
        let g = grid(4);
        let k = ThermalKernel::builder().gravity(0.0).build().unwrap();
        let mut db = buffers(&g, &k);
        // Uniform temperature, so the Laplacian is zero everywhere and the
        // rate evolves purely under retention.
        seed(&mut db, RATE, 5, 10.0);
        run_step(&g, &k, &mut db);
        let r = db.current().plane(RATE).unwrap()[5];
        assert!((r - 9.95).abs() < 1e-4, "rate should decay by 0.995: {r}");
    }

    #[test]
    fn wall_temperatures_are_pinned() {
        let g = grid(8);
        let mut k = ThermalKernel::builder().build().unwrap();
        k.set_wall_temperature(Wall::Left, Some(80.0));
        k.set_wall_temperature(Wall::Right, Some(20.0));
        assert_eq!(k.wall_temperature(Wall::Left), Some(80.0));

        let mut db = buffers(&g, &k);
        for _ in 0..3 {
            run_step(&g, &k, &mut db);
        }
        let view = db.current();
        let t = view.plane(TEMPERATURE).unwrap();
        for row in 0..8u32 {
            assert_eq!(t[g.index(row, 0)], 80.0);
            assert_eq!(t[g.index(row, 7)], 20.0);
        }
        // Interior next to the hot wall starts conducting.
        assert!(t[g.index(4, 1)] > 20.0);
    }

    #[test]
    fn wall_temperature_is_clamped_and_releasable() {
        let mut k = ThermalKernel::builder().build().unwrap();
        k.set_wall_temperature(Wall::Left, Some(1000.0));
        assert_eq!(k.wall_temperature(Wall::Left), Some(120.0));
        k.set_wall_temperature(Wall::Left, None);
        assert_eq!(k.wall_temperature(Wall::Left), None);
    }

    #[test]
    fn non_finite_values_are_counted_not_hidden() {
        let g = grid(4);
        let k = ThermalKernel::builder().build().unwrap();
        let mut db = buffers(&g, &k);
        seed(&mut db, RATE, 5, f32::NAN);
        let diag = run_step(&g, &k, &mut db);
        assert!(diag.non_finite_cells >= 1);
        let t = db.current().plane(TEMPERATURE).unwrap();
        assert!(t[5].is_nan(), "NaN must propagate, got {}", t[5]);
    }

    #[test]
    fn max_dt_tracks_diffusivity() {
        let mut k = ThermalKernel::builder().diffusivity(0.5).build().unwrap();
        assert_eq!(k.max_dt(), Some(0.5));
        k.set_parameter(Parameter::Diffusivity, 2.0);
        assert_eq!(k.max_dt(), Some(0.125));
    }
}
