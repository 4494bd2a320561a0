//! Edge (boundary) behavior for stencil sampling.

/// How out-of-bounds stencil samples are resolved at the grid edge.
///
/// This controls the *topology* seen by kernels, not field values.
/// `Clamp` makes edge cells sample themselves for missing neighbours —
/// an implicit insulating/reflective boundary. `Wrap` produces a
/// periodic (torus) domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds sample maps to the nearest boundary cell.
    #[default]
    Clamp,
    /// Out-of-bounds sample wraps to the opposite side (periodic).
    Wrap,
}
