//! Update kernels and field operators for the Shimmer simulation engine.
//!
//! A kernel advances the whole field one substep, reading only the
//! previous generation and writing only the staging buffer:
//!
//! 1. [`ThermalKernel`] — diffusion–convection: `∂T/∂t = α∇²T` plus a
//!    buoyancy-driven semi-Lagrangian advection pass.
//! 2. [`WaveKernel`] — damped height-field waves: `∂²h/∂t² = c²∇²h`.
//!
//! Alongside the kernels live the two per-field operators consumed by
//! interaction and rendering collaborators: [`SourceInjector`] (smooth
//! falloff disturbances, sources and sinks alike) and
//! [`GradientExtractor`] (forward-difference gradients for shading and
//! flow display).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod gradient;
pub mod inject;
pub mod kernel;
pub mod thermal;
pub mod wave;

pub use gradient::{GradientExtractor, GradientField};
pub use inject::{Disturbance, InjectionProfile, SourceInjector};
pub use kernel::UpdateKernel;
pub use thermal::{ThermalKernel, Wall};
pub use wave::WaveKernel;
