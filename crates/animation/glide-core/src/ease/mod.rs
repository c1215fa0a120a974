//! Easing evaluator.
//!
//! `Easing` maps (normalized time, transition family, direction) to an eased
//! value. It reads from a shared [`EasingTable`] when one is attached and
//! falls back to the closed-form curves otherwise; it never fails.

pub mod functions;
pub mod table;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use functions::ease_exact;
pub use table::EasingTable;

/// Shape family of an easing curve.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionType {
    #[default]
    Linear,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
    Back,
    Bounce,
    Elastic,
}

impl TransitionType {
    /// Families stored in the lookup table (everything but Linear), in table order.
    pub const TABULATED: [TransitionType; 10] = [
        TransitionType::Sine,
        TransitionType::Quad,
        TransitionType::Cubic,
        TransitionType::Quart,
        TransitionType::Quint,
        TransitionType::Expo,
        TransitionType::Circ,
        TransitionType::Back,
        TransitionType::Bounce,
        TransitionType::Elastic,
    ];

    /// Decode a raw discriminant. Unknown or reserved values degrade to Linear.
    pub fn from_index(raw: u8) -> Self {
        match raw {
            1..=10 => Self::TABULATED[raw as usize - 1],
            _ => TransitionType::Linear,
        }
    }

    /// Row in the lookup table, `None` for Linear.
    #[inline]
    pub(crate) fn table_row(self) -> Option<usize> {
        match self {
            TransitionType::Linear => None,
            other => Some(other as usize - 1),
        }
    }
}

/// How a family is applied at the curve ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EaseType {
    In,
    #[default]
    Out,
    InOut,
    OutIn,
}

impl EaseType {
    pub const ALL: [EaseType; 4] = [EaseType::In, EaseType::Out, EaseType::InOut, EaseType::OutIn];

    /// Decode a raw discriminant. Unknown values map to `In`.
    pub fn from_index(raw: u8) -> Self {
        Self::ALL.get(raw as usize).copied().unwrap_or(EaseType::In)
    }
}

/// Table read strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupMode {
    /// Blend the two bracketing samples.
    #[default]
    Interpolated,
    /// Truncate to the lower sample. Cheaper, coarser.
    Nearest,
}

/// Cloneable evaluator handle shared by the schedulers.
#[derive(Clone, Debug, Default)]
pub struct Easing {
    table: Option<Arc<EasingTable>>,
    mode: LookupMode,
}

impl Easing {
    pub fn new(table: Arc<EasingTable>, mode: LookupMode) -> Self {
        Self {
            table: Some(table),
            mode,
        }
    }

    /// Evaluator with no table; every call takes the closed-form path.
    pub fn exact() -> Self {
        Self::default()
    }

    #[inline]
    pub fn table(&self) -> Option<&Arc<EasingTable>> {
        self.table.as_ref()
    }

    #[inline]
    pub fn mode(&self) -> LookupMode {
        self.mode
    }

    /// Eased value of `t` (already clamped to [0,1] by the caller).
    #[inline]
    pub fn evaluate(&self, t: f32, transition: TransitionType, ease: EaseType) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        if transition == TransitionType::Linear {
            return t;
        }
        match &self.table {
            Some(table) => match self.mode {
                LookupMode::Interpolated => table.lookup(t, transition, ease),
                LookupMode::Nearest => table.lookup_nearest(t, transition, ease),
            },
            None => ease_exact(t, transition, ease),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluators() -> Vec<Easing> {
        let table = Arc::new(EasingTable::build(256));
        vec![
            Easing::exact(),
            Easing::new(table.clone(), LookupMode::Interpolated),
            Easing::new(table, LookupMode::Nearest),
        ]
    }

    #[test]
    fn boundaries_are_exact_for_every_pair() {
        for easing in evaluators() {
            for tr in TransitionType::TABULATED {
                for ease in EaseType::ALL {
                    assert_eq!(easing.evaluate(0.0, tr, ease), 0.0);
                    assert_eq!(easing.evaluate(1.0, tr, ease), 1.0);
                    assert_eq!(easing.evaluate(-3.0, tr, ease), 0.0);
                    assert_eq!(easing.evaluate(7.0, tr, ease), 1.0);
                }
            }
        }
    }

    #[test]
    fn linear_is_identity() {
        for easing in evaluators() {
            for ease in EaseType::ALL {
                for i in 0..=100 {
                    let t = i as f32 / 100.0;
                    assert_eq!(easing.evaluate(t, TransitionType::Linear, ease), t);
                }
            }
        }
    }

    #[test]
    fn unknown_discriminants_degrade() {
        assert_eq!(TransitionType::from_index(0), TransitionType::Linear);
        assert_eq!(TransitionType::from_index(200), TransitionType::Linear);
        assert_eq!(TransitionType::from_index(10), TransitionType::Elastic);
        assert_eq!(EaseType::from_index(9), EaseType::In);
        assert_eq!(EaseType::from_index(3), EaseType::OutIn);
    }

    #[test]
    fn table_rows_follow_tabulated_order() {
        for (row, tr) in TransitionType::TABULATED.iter().enumerate() {
            assert_eq!(tr.table_row(), Some(row));
        }
        assert_eq!(TransitionType::Linear.table_row(), None);
    }
}
