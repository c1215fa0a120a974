//! Precomputed easing lookup table.
//!
//! Layout is a flat `[family][direction][sample]` array of f32. Sample `i`
//! maps to `t = i / (N - 1)`. Linear is not stored.

use super::functions::ease_exact;
use super::{EaseType, TransitionType};

pub const DEFAULT_SAMPLES: usize = 1024;

const FAMILIES: usize = TransitionType::TABULATED.len();
const DIRECTIONS: usize = EaseType::ALL.len();

#[derive(Clone)]
pub struct EasingTable {
    samples: usize,
    values: Vec<f32>,
}

impl std::fmt::Debug for EasingTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EasingTable")
            .field("samples", &self.samples)
            .field("bytes", &self.memory_bytes())
            .finish()
    }
}

impl EasingTable {
    /// Tabulate every (family, direction) pair with `samples` points (min 2).
    pub fn build(samples: usize) -> Self {
        let samples = samples.max(2);
        let mut values = Vec::with_capacity(FAMILIES * DIRECTIONS * samples);
        let last = (samples - 1) as f32;
        for tr in TransitionType::TABULATED {
            for ease in EaseType::ALL {
                for i in 0..samples {
                    let t = i as f32 / last;
                    values.push(ease_exact(t, tr, ease));
                }
                // Pin the ends so boundary samples are exactly 0 and 1.
                let row_end = values.len();
                values[row_end - samples] = 0.0;
                values[row_end - 1] = 1.0;
            }
        }
        log::debug!(
            "easing table built: {} samples, {} bytes",
            samples,
            values.len() * std::mem::size_of::<f32>()
        );
        Self { samples, values }
    }

    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    #[inline]
    pub fn memory_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<f32>()
    }

    /// One (family, direction) row, or `None` for Linear.
    #[inline]
    pub fn row(&self, transition: TransitionType, ease: EaseType) -> Option<&[f32]> {
        let fam = transition.table_row()?;
        let start = (fam * DIRECTIONS + ease as usize) * self.samples;
        self.values.get(start..start + self.samples)
    }

    /// Linearly interpolated lookup.
    #[inline]
    pub fn lookup(&self, t: f32, transition: TransitionType, ease: EaseType) -> f32 {
        let Some(row) = self.row(transition, ease) else {
            return t;
        };
        let pos = t.clamp(0.0, 1.0) * (self.samples - 1) as f32;
        let i0 = pos as usize;
        let i1 = (i0 + 1).min(self.samples - 1);
        let frac = pos - i0 as f32;
        let a = row[i0];
        a + (row[i1] - a) * frac
    }

    /// Truncating lookup: the sample at or below `t`.
    #[inline]
    pub fn lookup_nearest(&self, t: f32, transition: TransitionType, ease: EaseType) -> f32 {
        let Some(row) = self.row(transition, ease) else {
            return t;
        };
        let pos = t.clamp(0.0, 1.0) * (self.samples - 1) as f32;
        row[(pos as usize).min(self.samples - 1)]
    }
}

impl Default for EasingTable {
    fn default() -> Self {
        Self::build(DEFAULT_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_samples_are_zero_and_one() {
        let table = EasingTable::build(64);
        for tr in TransitionType::TABULATED {
            for ease in EaseType::ALL {
                let row = table.row(tr, ease).unwrap();
                assert_eq!(row.len(), 64);
                assert_eq!(row[0], 0.0);
                assert_eq!(row[63], 1.0);
            }
        }
        assert!(table.row(TransitionType::Linear, EaseType::In).is_none());
    }

    #[test]
    fn samples_agree_with_closed_form() {
        let n = 1024;
        let table = EasingTable::build(n);
        for tr in TransitionType::TABULATED {
            for ease in EaseType::ALL {
                for i in (0..n).step_by(7) {
                    let t = i as f32 / (n - 1) as f32;
                    let exact = ease_exact(t, tr, ease);
                    let got = table.lookup(t, tr, ease);
                    assert!(
                        (got - exact).abs() <= 1e-3,
                        "{tr:?}/{ease:?} t={t} got={got} exact={exact}"
                    );
                }
            }
        }
    }

    #[test]
    fn interpolated_lookup_lies_between_bracketing_samples() {
        let n = 32;
        let table = EasingTable::build(n);
        let step = 1.0 / (n - 1) as f32;
        for tr in TransitionType::TABULATED {
            for ease in EaseType::ALL {
                for i in 1..(n - 2) {
                    let t0 = i as f32 * step;
                    let t1 = (i + 1) as f32 * step;
                    let mid = (t0 + t1) * 0.5;
                    let lo = ease_exact(t0, tr, ease).min(ease_exact(t1, tr, ease));
                    let hi = ease_exact(t0, tr, ease).max(ease_exact(t1, tr, ease));
                    let v = table.lookup(mid, tr, ease);
                    assert!(v >= lo - 1e-5 && v <= hi + 1e-5, "{tr:?}/{ease:?} t={mid}");
                }
            }
        }
    }

    #[test]
    fn nearest_truncates_to_lower_sample() {
        let table = EasingTable::build(11);
        let row = table.row(TransitionType::Quad, EaseType::In).unwrap().to_vec();
        assert_eq!(table.lookup_nearest(0.35, TransitionType::Quad, EaseType::In), row[3]);
    }

    #[test]
    fn memory_matches_layout() {
        let table = EasingTable::build(100);
        assert_eq!(table.memory_bytes(), 10 * 4 * 100 * 4);
        assert_eq!(EasingTable::build(0).samples(), 2);
    }
}
