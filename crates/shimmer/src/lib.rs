//! Shimmer: a 2D scalar-field simulation engine.
//!
//! Two physical models share one architecture — an interactive
//! height-field water surface and a diffusion–convection thermal gas —
//! built on double-buffered channel planes, stencil update kernels,
//! falloff source injection, gradient extraction, and a bounded
//! measurement history.
//!
//! This is the top-level facade crate re-exporting the public API from
//! the Shimmer sub-crates. For most users, adding `shimmer` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use shimmer::prelude::*;
//!
//! // A 64×64 thermal gas at 20 °C ambient.
//! let mut engine = Engine::new(EngineConfig::thermal(64, 1.0)).unwrap();
//!
//! // Drop a heat source in the middle and advance the simulation.
//! engine.add_heat_source(0.0, 0.0, 0.1, 100.0, 0.5).unwrap();
//! let diagnostics = engine.step().unwrap();
//! assert!(diagnostics.is_clean());
//!
//! // Reduce the field to scalar diagnostics.
//! let record = engine.measure().unwrap();
//! assert!(record.mean > 20.0);
//!
//! // Read back state and derived gradients for rendering.
//! let view = engine.current();
//! let temperatures = view.plane(ChannelId(0)).unwrap();
//! assert_eq!(temperatures.len(), 64 * 64);
//! let gradients = engine.compute_derivatives().unwrap();
//! assert_eq!(gradients.resolution(), 64);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shimmer-core` | IDs, channel defs, parameters, diagnostics |
//! | [`grid`] | `shimmer-grid` | Grid topology, field buffers, double buffering |
//! | [`kernels`] | `shimmer-kernels` | Update kernels, injection, gradients |
//! | [`engine`] | `shimmer-engine` | The engine facade, config, measurement |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, parameters, and errors (`shimmer-core`).
pub use shimmer_core as types;

/// Grid topology and field storage (`shimmer-grid`).
///
/// Provides [`grid::Grid`], [`grid::DoubleBuffer`], and the read/write
/// field views.
pub use shimmer_grid as grid;

/// Update kernels and field operators (`shimmer-kernels`).
///
/// The [`kernels::UpdateKernel`] trait is the extension point for
/// additional physical models.
pub use shimmer_kernels as kernels;

/// The engine facade, configuration, and measurement (`shimmer-engine`).
pub use shimmer_engine as engine;

/// Common imports for typical Shimmer usage.
///
/// ```rust
/// use shimmer::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use shimmer_core::{ChannelDef, ChannelId, Parameter, StepDiagnostics, StepId};

    // Errors
    pub use shimmer_core::KernelError;
    pub use shimmer_engine::{ConfigError, StepError};
    pub use shimmer_grid::GridError;

    // Grid
    pub use shimmer_grid::{DoubleBuffer, EdgeBehavior, FieldView, FieldViewMut, Grid};

    // Kernels and operators
    pub use shimmer_kernels::{
        Disturbance, GradientExtractor, GradientField, InjectionProfile, SourceInjector,
        ThermalKernel, UpdateKernel, Wall, WaveKernel,
    };

    // Engine
    pub use shimmer_engine::{
        Engine, EngineConfig, InitialDisturbances, MeasurementRecord, ModelConfig, ThermalParams,
        WaveParams,
    };
}
