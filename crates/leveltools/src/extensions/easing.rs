// extensions/easing.rs
//
// Penner easing functions for tween progress.
// Each maps an elapsed-time fraction k (0..1) to an eased fraction.
// No dependencies on tweens or targets; just math.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Easing curve applied to tween progress.
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuarticIn,
    QuarticOut,
    QuarticInOut,
    QuinticIn,
    QuinticOut,
    QuinticInOut,
    SinusoidalIn,
    SinusoidalOut,
    SinusoidalInOut,
    ExponentialIn,
    ExponentialOut,
    ExponentialInOut,
    CircularIn,
    CircularOut,
    CircularInOut,
    /// Spring that overshoots before settling.
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    /// Overshoot then settle.
    BackIn,
    BackOut,
    BackInOut,
    /// Bouncy finish.
    BounceIn,
    BounceOut,
    BounceInOut,
    /// Caller-supplied curve.
    Custom(fn(f64) -> f64),
}

const BACK_S: f64 = 1.70158;
const BACK_S_IN_OUT: f64 = BACK_S * 1.525;

impl Easing {
    /// Every named curve, in family order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::QuadraticIn, Easing::QuadraticOut, Easing::QuadraticInOut,
        Easing::CubicIn, Easing::CubicOut, Easing::CubicInOut,
        Easing::QuarticIn, Easing::QuarticOut, Easing::QuarticInOut,
        Easing::QuinticIn, Easing::QuinticOut, Easing::QuinticInOut,
        Easing::SinusoidalIn, Easing::SinusoidalOut, Easing::SinusoidalInOut,
        Easing::ExponentialIn, Easing::ExponentialOut, Easing::ExponentialInOut,
        Easing::CircularIn, Easing::CircularOut, Easing::CircularInOut,
        Easing::ElasticIn, Easing::ElasticOut, Easing::ElasticInOut,
        Easing::BackIn, Easing::BackOut, Easing::BackInOut,
        Easing::BounceIn, Easing::BounceOut, Easing::BounceInOut,
    ];

    /// Apply the easing function to an elapsed-time fraction `k`.
    /// Input is not clamped; Back and Elastic can leave [0, 1] on output.
    #[inline]
    pub fn apply(self, k: f64) -> f64 {
        match self {
            Easing::Linear => k,

            // Quadratic
            Easing::QuadraticIn => k * k,
            Easing::QuadraticOut => k * (2.0 - k),
            Easing::QuadraticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k
                } else {
                    let k = k - 1.0;
                    -0.5 * (k * (k - 2.0) - 1.0)
                }
            }

            // Cubic
            Easing::CubicIn => k * k * k,
            Easing::CubicOut => {
                let k = k - 1.0;
                k * k * k + 1.0
            }
            Easing::CubicInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * k + 2.0)
                }
            }

            // Quartic
            Easing::QuarticIn => k * k * k * k,
            Easing::QuarticOut => {
                let k = k - 1.0;
                1.0 - k * k * k * k
            }
            Easing::QuarticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k * k
                } else {
                    let k = k - 2.0;
                    -0.5 * (k * k * k * k - 2.0)
                }
            }

            // Quintic
            Easing::QuinticIn => k * k * k * k * k,
            Easing::QuinticOut => {
                let k = k - 1.0;
                k * k * k * k * k + 1.0
            }
            Easing::QuinticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k * k * k
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * k * k * k + 2.0)
                }
            }

            // Sinusoidal
            Easing::SinusoidalIn => 1.0 - (k * PI / 2.0).cos(),
            Easing::SinusoidalOut => (k * PI / 2.0).sin(),
            Easing::SinusoidalInOut => 0.5 * (1.0 - (PI * k).cos()),

            // Exponential
            Easing::ExponentialIn => {
                if k == 0.0 { 0.0 } else { 1024.0_f64.powf(k - 1.0) }
            }
            Easing::ExponentialOut => {
                if k == 1.0 { 1.0 } else { 1.0 - 2.0_f64.powf(-10.0 * k) }
            }
            Easing::ExponentialInOut => {
                if k == 0.0 {
                    return 0.0;
                }
                if k == 1.0 {
                    return 1.0;
                }
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * 1024.0_f64.powf(k - 1.0)
                } else {
                    0.5 * (-(2.0_f64.powf(-10.0 * (k - 1.0))) + 2.0)
                }
            }

            // Circular
            Easing::CircularIn => 1.0 - (1.0 - k * k).sqrt(),
            Easing::CircularOut => {
                let k = k - 1.0;
                (1.0 - k * k).sqrt()
            }
            Easing::CircularInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    -0.5 * ((1.0 - k * k).sqrt() - 1.0)
                } else {
                    let k = k - 2.0;
                    0.5 * ((1.0 - k * k).sqrt() + 1.0)
                }
            }

            // Elastic
            Easing::ElasticIn => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                -(2.0_f64.powf(10.0 * (k - 1.0))) * ((k - 1.1) * 5.0 * PI).sin()
            }
            Easing::ElasticOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                2.0_f64.powf(-10.0 * k) * ((k - 0.1) * 5.0 * PI).sin() + 1.0
            }
            Easing::ElasticInOut => {
                if k == 0.0 || k == 1.0 {
                    return k;
                }
                let k = k * 2.0;
                if k < 1.0 {
                    -0.5 * 2.0_f64.powf(10.0 * (k - 1.0)) * ((k - 1.1) * 5.0 * PI).sin()
                } else {
                    0.5 * 2.0_f64.powf(-10.0 * (k - 1.0)) * ((k - 1.1) * 5.0 * PI).sin() + 1.0
                }
            }

            // Back
            Easing::BackIn => k * k * ((BACK_S + 1.0) * k - BACK_S),
            Easing::BackOut => {
                let k = k - 1.0;
                k * k * ((BACK_S + 1.0) * k + BACK_S) + 1.0
            }
            Easing::BackInOut => {
                let s = BACK_S_IN_OUT;
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * (k * k * ((s + 1.0) * k - s))
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * ((s + 1.0) * k + s) + 2.0)
                }
            }

            // Bounce
            Easing::BounceIn => 1.0 - bounce_out(1.0 - k),
            Easing::BounceOut => bounce_out(k),
            Easing::BounceInOut => {
                if k < 0.5 {
                    (1.0 - bounce_out(1.0 - k * 2.0)) * 0.5
                } else {
                    bounce_out(k * 2.0 - 1.0) * 0.5 + 0.5
                }
            }

            Easing::Custom(f) => f(k),
        }
    }

    /// `Family.Variant` name, e.g. `Quadratic.Out`. Custom curves report `Custom`.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "Linear.None",
            Easing::QuadraticIn => "Quadratic.In",
            Easing::QuadraticOut => "Quadratic.Out",
            Easing::QuadraticInOut => "Quadratic.InOut",
            Easing::CubicIn => "Cubic.In",
            Easing::CubicOut => "Cubic.Out",
            Easing::CubicInOut => "Cubic.InOut",
            Easing::QuarticIn => "Quartic.In",
            Easing::QuarticOut => "Quartic.Out",
            Easing::QuarticInOut => "Quartic.InOut",
            Easing::QuinticIn => "Quintic.In",
            Easing::QuinticOut => "Quintic.Out",
            Easing::QuinticInOut => "Quintic.InOut",
            Easing::SinusoidalIn => "Sinusoidal.In",
            Easing::SinusoidalOut => "Sinusoidal.Out",
            Easing::SinusoidalInOut => "Sinusoidal.InOut",
            Easing::ExponentialIn => "Exponential.In",
            Easing::ExponentialOut => "Exponential.Out",
            Easing::ExponentialInOut => "Exponential.InOut",
            Easing::CircularIn => "Circular.In",
            Easing::CircularOut => "Circular.Out",
            Easing::CircularInOut => "Circular.InOut",
            Easing::ElasticIn => "Elastic.In",
            Easing::ElasticOut => "Elastic.Out",
            Easing::ElasticInOut => "Elastic.InOut",
            Easing::BackIn => "Back.In",
            Easing::BackOut => "Back.Out",
            Easing::BackInOut => "Back.InOut",
            Easing::BounceIn => "Bounce.In",
            Easing::BounceOut => "Bounce.Out",
            Easing::BounceInOut => "Bounce.InOut",
            Easing::Custom(_) => "Custom",
        }
    }
}

#[inline]
fn bounce_out(k: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if k < 1.0 / D1 {
        N1 * k * k
    } else if k < 2.0 / D1 {
        let k = k - 1.5 / D1;
        N1 * k * k + 0.75
    } else if k < 2.5 / D1 {
        let k = k - 2.25 / D1;
        N1 * k * k + 0.9375
    } else {
        let k = k - 2.625 / D1;
        N1 * k * k + 0.984375
    }
}

/// Returned by `Easing::from_str` for names outside the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing function `{}`", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    /// Accepts `Quadratic.Out`, `QuadraticOut` and the bare `Linear`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '.').collect();
        if wanted == "Linear" {
            return Ok(Easing::Linear);
        }
        Easing::ALL
            .iter()
            .copied()
            .find(|e| e.name().replace('.', "") == wanted)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn every_curve_hits_both_endpoints() {
        for easing in Easing::ALL {
            let start = easing.apply(0.0);
            let end = easing.apply(1.0);
            assert!(start.abs() < EPS, "{} at 0 was {}", easing.name(), start);
            assert!((end - 1.0).abs() < EPS, "{} at 1 was {}", easing.name(), end);
        }
    }

    #[test]
    fn special_cased_endpoints_are_exact() {
        for easing in [
            Easing::ExponentialIn, Easing::ExponentialOut, Easing::ExponentialInOut,
            Easing::ElasticIn, Easing::ElasticOut, Easing::ElasticInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{}", easing.name());
            assert_eq!(easing.apply(1.0), 1.0, "{}", easing.name());
        }
    }

    #[test]
    fn polynomial_degrees_match_family() {
        assert!((Easing::QuadraticIn.apply(0.5) - 0.25).abs() < EPS);
        assert!((Easing::CubicIn.apply(0.5) - 0.125).abs() < EPS);
        assert!((Easing::QuarticIn.apply(0.5) - 0.0625).abs() < EPS);
        assert!((Easing::QuinticIn.apply(0.5) - 0.03125).abs() < EPS);
        assert!((Easing::QuadraticOut.apply(0.5) - 0.75).abs() < EPS);
    }

    #[test]
    fn in_out_is_symmetric_around_midpoint() {
        for easing in [
            Easing::QuadraticInOut, Easing::CubicInOut, Easing::QuarticInOut,
            Easing::QuinticInOut, Easing::SinusoidalInOut, Easing::CircularInOut,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < EPS, "{}", easing.name());
            let a = easing.apply(0.2);
            let b = easing.apply(0.8);
            assert!((a + b - 1.0).abs() < EPS, "{}: {} + {}", easing.name(), a, b);
        }
    }

    #[test]
    fn back_overshoots() {
        assert!(Easing::BackIn.apply(0.2) < 0.0, "BackIn should dip below zero");
        assert!(Easing::BackOut.apply(0.8) > 1.0, "BackOut should overshoot");
    }

    #[test]
    fn bounce_segments_join() {
        // Segment boundaries at 1/2.75 and 2/2.75 land on 1.0
        let first = bounce_out(1.0 / 2.75 - 1e-12);
        assert!((first - 1.0).abs() < 1e-9);
        assert!((Easing::BounceOut.apply(2.0 / 2.75) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn custom_curve_is_called() {
        fn square_root(k: f64) -> f64 {
            k.sqrt()
        }
        assert_eq!(Easing::Custom(square_root).apply(0.25), 0.5);
    }

    #[test]
    fn parses_names() {
        assert!(matches!("Quadratic.Out".parse::<Easing>(), Ok(Easing::QuadraticOut)));
        assert!(matches!("BounceInOut".parse::<Easing>(), Ok(Easing::BounceInOut)));
        assert!(matches!("Linear".parse::<Easing>(), Ok(Easing::Linear)));
        assert!(matches!("Linear.None".parse::<Easing>(), Ok(Easing::Linear)));
        assert_eq!(
            "Wobbly.In".parse::<Easing>().unwrap_err(),
            UnknownEasing("Wobbly.In".to_string())
        );
    }

    #[test]
    fn ease_interpolates() {
        let result = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((result - 150.0).abs() < 0.001);
    }
}
