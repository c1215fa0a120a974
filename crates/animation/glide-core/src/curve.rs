//! Per-segment custom easing: a sampled curve or an arbitrary function.
//!
//! A custom ease replaces the table lookup and any record-level override.

use std::fmt;
use std::sync::Arc;

/// Curve sampled uniformly over normalized time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampledCurve {
    points: Vec<f32>,
}

impl SampledCurve {
    /// `points[i]` is the eased value at `i / (len - 1)`. Fewer than two
    /// points collapse to the identity curve.
    pub fn new(points: Vec<f32>) -> Self {
        Self { points }
    }

    /// Sample an arbitrary function at `count` evenly spaced points.
    pub fn from_fn(count: usize, f: impl Fn(f32) -> f32) -> Self {
        let count = count.max(2);
        let last = (count - 1) as f32;
        Self::new((0..count).map(|i| f(i as f32 / last)).collect())
    }

    pub fn points(&self) -> &[f32] {
        &self.points
    }

    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        let n = self.points.len();
        if n < 2 {
            return t;
        }
        let pos = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i0 = (pos as usize).min(n - 1);
        let i1 = (i0 + 1).min(n - 1);
        let frac = pos - i0 as f32;
        self.points[i0] + (self.points[i1] - self.points[i0]) * frac
    }
}

pub type EaseFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

#[derive(Clone)]
pub enum CustomEase {
    Curve(SampledCurve),
    Function(EaseFn),
}

impl CustomEase {
    pub fn function(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        CustomEase::Function(Arc::new(f))
    }

    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            CustomEase::Curve(curve) => curve.sample(t),
            CustomEase::Function(f) => f(t),
        }
    }
}

impl fmt::Debug for CustomEase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomEase::Curve(curve) => f.debug_tuple("Curve").field(&curve.points.len()).finish(),
            CustomEase::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_curve_interpolates_between_points() {
        let curve = SampledCurve::new(vec![0.0, 0.8, 1.0]);
        assert_eq!(curve.sample(0.0), 0.0);
        assert!((curve.sample(0.25) - 0.4).abs() < 1e-6);
        assert_eq!(curve.sample(1.0), 1.0);
        assert_eq!(curve.sample(4.0), 1.0);
    }

    #[test]
    fn degenerate_curve_is_identity() {
        assert_eq!(SampledCurve::new(vec![0.3]).sample(0.6), 0.6);
    }

    #[test]
    fn from_fn_samples_endpoints() {
        let curve = SampledCurve::from_fn(5, |t| t * t);
        assert_eq!(curve.points(), &[0.0, 0.0625, 0.25, 0.5625, 1.0]);
    }

    #[test]
    fn function_override_is_called() {
        let ease = CustomEase::function(|t| 1.0 - t);
        assert_eq!(ease.apply(0.25), 0.75);
    }
}
