//! Closed-form easing curves.
//!
//! Every family is expressed as an `In` base curve on [0,1]; directions are
//! derived from it. Back and Elastic use their dedicated InOut forms with
//! the wider overshoot constants.

use std::f32::consts::PI;

use super::{EaseType, TransitionType};

/// Back overshoot.
pub const BACK_C1: f32 = 1.70158;
/// Back overshoot used by InOut.
pub const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;

pub const BOUNCE_N1: f32 = 7.5625;
pub const BOUNCE_D1: f32 = 2.75;

/// Elastic period for In/Out.
pub const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
/// Elastic period for InOut.
pub const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

#[inline]
fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

/// Base `In` curve of a family. Linear is the identity.
#[inline]
pub fn ease_in(transition: TransitionType, t: f32) -> f32 {
    match transition {
        TransitionType::Linear => t,
        TransitionType::Sine => 1.0 - (t * PI / 2.0).cos(),
        TransitionType::Quad => t * t,
        TransitionType::Cubic => t * t * t,
        TransitionType::Quart => t * t * t * t,
        TransitionType::Quint => t * t * t * t * t,
        TransitionType::Expo => {
            if t <= 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * t - 10.0)
            }
        }
        TransitionType::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        TransitionType::Back => BACK_C3 * t * t * t - BACK_C1 * t * t,
        TransitionType::Bounce => 1.0 - bounce_out(1.0 - t),
        TransitionType::Elastic => {
            if t <= 0.0 {
                0.0
            } else if t >= 1.0 {
                1.0
            } else {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
        }
    }
}

#[inline]
pub fn ease_out(transition: TransitionType, t: f32) -> f32 {
    1.0 - ease_in(transition, 1.0 - t)
}

#[inline]
fn ease_in_out(transition: TransitionType, t: f32) -> f32 {
    match transition {
        TransitionType::Back => {
            if t < 0.5 {
                let x = 2.0 * t;
                (x * x * ((BACK_C2 + 1.0) * x - BACK_C2)) / 2.0
            } else {
                let x = 2.0 * t - 2.0;
                (x * x * ((BACK_C2 + 1.0) * x + BACK_C2) + 2.0) / 2.0
            }
        }
        TransitionType::Elastic => {
            if t <= 0.0 {
                0.0
            } else if t >= 1.0 {
                1.0
            } else if t < 0.5 {
                -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
            } else {
                (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                    + 1.0
            }
        }
        _ => {
            if t < 0.5 {
                ease_in(transition, 2.0 * t) / 2.0
            } else {
                0.5 + ease_out(transition, 2.0 * t - 1.0) / 2.0
            }
        }
    }
}

#[inline]
fn ease_out_in(transition: TransitionType, t: f32) -> f32 {
    if t < 0.5 {
        ease_out(transition, 2.0 * t) / 2.0
    } else {
        0.5 + ease_in(transition, 2.0 * t - 1.0) / 2.0
    }
}

/// Exact eased value for `(transition, ease)` at `t`.
///
/// Boundaries are exact: `t <= 0` gives 0 and `t >= 1` gives 1.
pub fn ease_exact(t: f32, transition: TransitionType, ease: EaseType) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    if transition == TransitionType::Linear {
        return t;
    }
    match ease {
        EaseType::In => ease_in(transition, t),
        EaseType::Out => ease_out(transition, t),
        EaseType::InOut => ease_in_out(transition, t),
        EaseType::OutIn => ease_out_in(transition, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn powers_match_textbook_values() {
        approx(ease_exact(0.5, TransitionType::Quad, EaseType::In), 0.25, 1e-6);
        approx(ease_exact(0.5, TransitionType::Cubic, EaseType::Out), 0.875, 1e-6);
        approx(ease_exact(0.25, TransitionType::Quad, EaseType::InOut), 0.125, 1e-6);
        approx(ease_exact(0.5, TransitionType::Quint, EaseType::In), 0.03125, 1e-6);
    }

    #[test]
    fn back_overshoots_below_zero() {
        assert!(ease_exact(0.2, TransitionType::Back, EaseType::In) < 0.0);
        assert!(ease_exact(0.8, TransitionType::Back, EaseType::Out) > 1.0);
    }

    #[test]
    fn bounce_out_lands_on_plateaus() {
        approx(bounce_out(1.0 / BOUNCE_D1), 1.0, 1e-5);
        approx(bounce_out(1.0), 1.0, 1e-5);
    }

    #[test]
    fn symmetric_in_out_passes_through_half() {
        for tr in TransitionType::TABULATED {
            approx(ease_exact(0.5, tr, EaseType::InOut), 0.5, 1e-4);
            approx(ease_exact(0.5, tr, EaseType::OutIn), 0.5, 1e-4);
        }
    }

    #[test]
    fn elastic_ends_are_exact() {
        assert_eq!(ease_in(TransitionType::Elastic, 0.0), 0.0);
        assert_eq!(ease_in(TransitionType::Elastic, 1.0), 1.0);
    }
}
