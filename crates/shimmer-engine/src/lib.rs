//! The Shimmer simulation engine.
//!
//! [`Engine`] is the composition root: it owns the grid, the double
//! buffer, the model kernel, the source injector, the gradient
//! extractor, and the measurement history, and exposes the handful of
//! operations rendering and interaction collaborators consume:
//! inject, step, derive, measure, read back.
//!
//! All operations are synchronous and single-threaded; a concurrent
//! host serializes access externally.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod measure;

pub use config::{
    ConfigError, EngineConfig, InitialDisturbances, ModelConfig, ThermalParams, WaveParams,
};
pub use engine::{Engine, StepError};
pub use measure::{
    DimensionlessNumbers, InstabilityFlags, MeasurementEngine, MeasurementRecord,
    CRITICAL_RAYLEIGH,
};
