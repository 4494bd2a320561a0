//! The tunable-parameter registry.
//!
//! Every runtime-tunable physics constant is listed here with its
//! documented range. Setters clamp silently to that range instead of
//! rejecting out-of-range input; only *unknown* parameter names are an
//! error, and that check happens at the engine facade.

use std::fmt;

/// A runtime-tunable physics parameter.
///
/// Which parameters a kernel accepts depends on the model: the thermal
/// kernel owns `Diffusivity`, `Retention`, and `Gravity`; the wave
/// kernel owns `WaveSpeed` and `Damping`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Thermal diffusivity α in the diffusion term `α∇²T`.
    Diffusivity,
    /// Per-substep retention factor applied to the temperature rate.
    Retention,
    /// Buoyancy strength driving the convection velocity.
    Gravity,
    /// Wave propagation speed `c` in `∂²h/∂t² = c²∇²h`.
    WaveSpeed,
    /// Per-substep multiplicative damping of the wave velocity.
    Damping,
}

impl Parameter {
    /// All registered parameters.
    pub const ALL: [Parameter; 5] = [
        Parameter::Diffusivity,
        Parameter::Retention,
        Parameter::Gravity,
        Parameter::WaveSpeed,
        Parameter::Damping,
    ];

    /// Look up a parameter by its external name.
    ///
    /// Names match the public facade vocabulary: `"diffusivity"`,
    /// `"retention"`, `"gravity"`, `"waveSpeed"`, `"damping"`.
    /// Returns `None` for anything else.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "diffusivity" => Some(Self::Diffusivity),
            "retention" => Some(Self::Retention),
            "gravity" => Some(Self::Gravity),
            "waveSpeed" => Some(Self::WaveSpeed),
            "damping" => Some(Self::Damping),
            _ => None,
        }
    }

    /// The external name of this parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Diffusivity => "diffusivity",
            Self::Retention => "retention",
            Self::Gravity => "gravity",
            Self::WaveSpeed => "waveSpeed",
            Self::Damping => "damping",
        }
    }

    /// The documented `(min, max)` range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Diffusivity => (0.01, 2.0),
            Self::Retention => (0.9, 0.999),
            Self::Gravity => (0.0, 1.0),
            Self::WaveSpeed => (0.1, 5.0),
            Self::Damping => (0.9, 0.999),
        }
    }

    /// The default value a fresh kernel starts with.
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Diffusivity => 0.1,
            Self::Retention => 0.995,
            Self::Gravity => 0.1,
            Self::WaveSpeed => 2.0,
            Self::Damping => 0.995,
        }
    }

    /// Clamp `value` into the documented range.
    ///
    /// NaN maps to the lower bound so that the effective value is always
    /// inside the range, whatever the input.
    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        if value.is_nan() {
            lo
        } else {
            value.clamp(lo, hi)
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn name_round_trips() {
        for p in Parameter::ALL {
            assert_eq!(Parameter::from_name(p.name()), Some(p));
        }
    }

    #[test]
    fn unknown_names_rejected() {
        assert_eq!(Parameter::from_name("viscosity"), None);
        assert_eq!(Parameter::from_name(""), None);
        // Names are case-sensitive.
        assert_eq!(Parameter::from_name("WaveSpeed"), None);
        assert_eq!(Parameter::from_name("wavespeed"), None);
    }

    #[test]
    fn defaults_lie_within_range() {
        for p in Parameter::ALL {
            let (lo, hi) = p.range();
            let d = p.default_value();
            assert!(d >= lo && d <= hi, "{p}: default {d} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn clamp_handles_non_finite() {
        let p = Parameter::Diffusivity;
        assert_eq!(p.clamp(f64::NEG_INFINITY), 0.01);
        assert_eq!(p.clamp(f64::INFINITY), 2.0);
        assert_eq!(p.clamp(f64::NAN), 0.01);
    }

    proptest! {
        #[test]
        fn clamp_always_in_range(value in prop::num::f64::ANY) {
            for p in Parameter::ALL {
                let (lo, hi) = p.range();
                let clamped = p.clamp(value);
                prop_assert!(
                    clamped >= lo && clamped <= hi,
                    "{}: clamp({}) = {} escaped [{}, {}]",
                    p, value, clamped, lo, hi,
                );
            }
        }

        #[test]
        fn clamp_is_identity_inside_range(value in 0.0f64..1.0) {
            // Gravity spans [0, 1]; in-range values pass through untouched.
            prop_assert_eq!(Parameter::Gravity.clamp(value), value);
        }
    }
}
