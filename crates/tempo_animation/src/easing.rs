//! Easing curve presets
//!
//! Pure, stateless shape functions mapping normalized progress in `[0, 1]`
//! to an output fraction. Every preset satisfies `shape(0) == 0` and
//! `shape(1) == 1`; the Back, Elastic, and Bounce families leave `[0, 1]`
//! transiently in between (overshoot/oscillation).

use std::f32::consts::PI;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

/// Named easing curve presets
///
/// `Linear` plus in/out/in-out variants of the standard polynomial,
/// trigonometric, and exponential families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

impl Easing {
    /// All presets, for enumeration in tests and pickers
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
    ];

    /// Evaluate the shape function at normalized progress `t`
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,

            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,

            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }

            Easing::EaseInQuint => t * t * t * t * t,
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }

            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            }
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            Easing::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Easing::EaseOutBack => {
                1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Easing::EaseInOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }

            Easing::EaseInElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    -(2.0_f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Easing::EaseOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Easing::EaseInOutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    -(2.0_f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin())
                        / 2.0
                } else {
                    2.0_f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()
                        / 2.0
                        + 1.0
                }
            }

            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }

    /// Map a progress coordinate into the output range
    ///
    /// Evaluates `begin + (end - begin) * shape(now_x / max_x)`. A
    /// non-positive `max_x` evaluates the shape at 0, so degenerate runs
    /// emit `begin` rather than NaN.
    pub fn sample(self, now_x: f32, begin: f32, end: f32, max_x: f32) -> f32 {
        let t = if max_x > 0.0 { now_x / max_x } else { 0.0 };
        begin + (end - begin) * self.apply(t)
    }

    /// Look up a preset by identifier, falling back to `Linear`
    ///
    /// Accepts the canonical snake-case ids (`"ease_in_out_quad"`),
    /// case-insensitively. Unknown ids are not an error: the identity curve
    /// is the defensive default.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linear" => Easing::Linear,
            "ease_in_sine" => Easing::EaseInSine,
            "ease_out_sine" => Easing::EaseOutSine,
            "ease_in_out_sine" => Easing::EaseInOutSine,
            "ease_in_quad" => Easing::EaseInQuad,
            "ease_out_quad" => Easing::EaseOutQuad,
            "ease_in_out_quad" => Easing::EaseInOutQuad,
            "ease_in_cubic" => Easing::EaseInCubic,
            "ease_out_cubic" => Easing::EaseOutCubic,
            "ease_in_out_cubic" => Easing::EaseInOutCubic,
            "ease_in_quart" => Easing::EaseInQuart,
            "ease_out_quart" => Easing::EaseOutQuart,
            "ease_in_out_quart" => Easing::EaseInOutQuart,
            "ease_in_quint" => Easing::EaseInQuint,
            "ease_out_quint" => Easing::EaseOutQuint,
            "ease_in_out_quint" => Easing::EaseInOutQuint,
            "ease_in_expo" => Easing::EaseInExpo,
            "ease_out_expo" => Easing::EaseOutExpo,
            "ease_in_out_expo" => Easing::EaseInOutExpo,
            "ease_in_circ" => Easing::EaseInCirc,
            "ease_out_circ" => Easing::EaseOutCirc,
            "ease_in_out_circ" => Easing::EaseInOutCirc,
            "ease_in_back" => Easing::EaseInBack,
            "ease_out_back" => Easing::EaseOutBack,
            "ease_in_out_back" => Easing::EaseInOutBack,
            "ease_in_elastic" => Easing::EaseInElastic,
            "ease_out_elastic" => Easing::EaseOutElastic,
            "ease_in_out_elastic" => Easing::EaseInOutElastic,
            "ease_in_bounce" => Easing::EaseInBounce,
            "ease_out_bounce" => Easing::EaseOutBounce,
            "ease_in_out_bounce" => Easing::EaseInOutBounce,
            other => {
                tracing::debug!("unknown easing id {other:?}, falling back to linear");
                Easing::Linear
            }
        }
    }
}

/// The decaying-bounce shape, piecewise over four sub-intervals
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn every_preset_hits_both_endpoints() {
        for easing in Easing::ALL {
            assert!(
                easing.apply(0.0).abs() < EPS,
                "{easing:?} shape(0) = {}",
                easing.apply(0.0)
            );
            assert!(
                (easing.apply(1.0) - 1.0).abs() < EPS,
                "{easing:?} shape(1) = {}",
                easing.apply(1.0)
            );
        }
    }

    #[test]
    fn linear_is_identity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((Easing::Linear.apply(t) - t).abs() < EPS);
        }
    }

    #[test]
    fn sample_maps_into_output_range() {
        assert!((Easing::Linear.sample(5.0, 0.0, 100.0, 10.0) - 50.0).abs() < EPS);
        assert!((Easing::Linear.sample(0.0, 20.0, 80.0, 10.0) - 20.0).abs() < EPS);
        assert!((Easing::Linear.sample(10.0, 20.0, 80.0, 10.0) - 80.0).abs() < EPS);
    }

    #[test]
    fn sample_with_degenerate_domain_emits_begin() {
        for easing in Easing::ALL {
            let v = easing.sample(0.0, 42.0, 100.0, 0.0);
            assert!(v.is_finite());
            assert!((v - 42.0).abs() < EPS, "{easing:?} emitted {v}");
        }
    }

    #[test]
    fn bounce_covers_all_four_branches() {
        // Branch boundaries sit at 1/2.75, 2/2.75, and 2.5/2.75.
        for t in [0.1, 0.3, 0.5, 0.7, 0.8, 0.9, 0.95, 1.0] {
            let v = bounce_out(t);
            assert!((0.0..=1.0 + 1e-4).contains(&v), "bounce_out({t}) = {v}");
        }
        assert!((bounce_out(0.2) - 7.5625 * 0.2 * 0.2).abs() < EPS);
    }

    #[test]
    fn back_overshoots_but_settles() {
        let overshoot = (1..20)
            .map(|i| Easing::EaseOutBack.apply(i as f32 / 20.0))
            .fold(f32::MIN, f32::max);
        assert!(overshoot > 1.0);
        assert!((Easing::EaseOutBack.apply(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn elastic_oscillates_around_target() {
        let samples: Vec<f32> = (1..40)
            .map(|i| Easing::EaseOutElastic.apply(i as f32 / 40.0))
            .collect();
        assert!(samples.iter().any(|&v| v > 1.0));
        assert!(samples.iter().any(|&v| v < 1.0));
    }

    #[test]
    fn in_out_pairs_are_complementary() {
        // shape_out(t) == 1 - shape_in(1 - t) for the polynomial families.
        for (ease_in, ease_out) in [
            (Easing::EaseInQuad, Easing::EaseOutQuad),
            (Easing::EaseInCubic, Easing::EaseOutCubic),
            (Easing::EaseInQuart, Easing::EaseOutQuart),
            (Easing::EaseInQuint, Easing::EaseOutQuint),
        ] {
            for i in 0..=10 {
                let t = i as f32 / 10.0;
                let forward = ease_out.apply(t);
                let mirrored = 1.0 - ease_in.apply(1.0 - t);
                assert!(
                    (forward - mirrored).abs() < 1e-4,
                    "{ease_out:?}({t}) = {forward} vs {mirrored}"
                );
            }
        }
    }

    #[test]
    fn from_name_resolves_known_ids() {
        assert_eq!(Easing::from_name("linear"), Easing::Linear);
        assert_eq!(Easing::from_name("EASE_IN_OUT_QUAD"), Easing::EaseInOutQuad);
        assert_eq!(Easing::from_name("ease_out_bounce"), Easing::EaseOutBounce);
    }

    #[test]
    fn from_name_falls_back_to_linear() {
        assert_eq!(Easing::from_name("wobble"), Easing::Linear);
        assert_eq!(Easing::from_name(""), Easing::Linear);
    }
}
