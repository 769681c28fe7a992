//! Easing curves for keyframed sample animation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing curve applied to a normalized time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing.
    Linear,
    /// Slow start, fast end.
    QuadIn,
    /// Fast start, slow end.
    QuadOut,
    /// Slow at both ends.
    #[default]
    CubicInOut,
    /// Overshoots and settles with a spring.
    Elastic,
    /// Lands with decaying bounces.
    Bounce,
}

impl Easing {
    /// Evaluate the curve. Input is clamped to `[0, 1]`; the output starts
    /// at 0 and ends at 1 but may overshoot in between.
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
            Self::Elastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    let c4 = std::f32::consts::TAU / 3.0;
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
            Self::Bounce => bounce_out(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::CubicInOut,
        Easing::Elastic,
        Easing::Bounce,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.evaluate(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.evaluate(-3.0), easing.evaluate(0.0));
            assert_eq!(easing.evaluate(7.0), easing.evaluate(1.0));
        }
    }

    #[test]
    fn cubic_is_symmetric() {
        let e = Easing::CubicInOut;
        assert!((e.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((e.evaluate(0.25) + e.evaluate(0.75) - 1.0).abs() < 1e-5);
    }
}
