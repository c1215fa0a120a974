//! Segment: one start -> end interpolation leg.

use crate::curve::CustomEase;
use crate::ease::{EaseType, Easing, TransitionType};
use crate::value::Value;

/// Where a segment's start value comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentOrigin {
    /// Start and end were given explicitly.
    Fixed,
    /// Start is read from the target when the record first starts.
    FromCurrent,
    /// Start is read from the target; end is start plus this offset.
    Relative(Value),
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub start: Value,
    pub end: Value,
    /// Seconds, never negative. Zero completes on the tick it becomes active.
    pub duration: f32,
    pub transition: TransitionType,
    pub ease: EaseType,
    /// Wins over both the table and any record-level override.
    pub custom: Option<CustomEase>,
    pub(crate) origin: SegmentOrigin,
}

#[inline]
fn normalize_duration(duration: f32) -> f32 {
    if duration.is_finite() && duration > 0.0 {
        duration
    } else {
        0.0
    }
}

impl Segment {
    pub fn new(start: impl Into<Value>, end: impl Into<Value>, duration: f32) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            duration: normalize_duration(duration),
            transition: TransitionType::Linear,
            ease: EaseType::default(),
            custom: None,
            origin: SegmentOrigin::Fixed,
        }
    }

    /// Animate from whatever the property holds when the record starts.
    pub fn from_current(end: impl Into<Value>, duration: f32) -> Self {
        let end = end.into();
        Self {
            origin: SegmentOrigin::FromCurrent,
            ..Self::new(end, end, duration)
        }
    }

    /// Animate by `offset` relative to the value when the record starts.
    pub fn relative(offset: impl Into<Value>, duration: f32) -> Self {
        let offset = offset.into();
        let zero = Value::zero(offset.kind());
        Self {
            origin: SegmentOrigin::Relative(offset),
            ..Self::new(zero, offset, duration)
        }
    }

    pub fn with_ease(mut self, transition: TransitionType, ease: EaseType) -> Self {
        self.transition = transition;
        self.ease = ease;
        self
    }

    pub fn with_custom(mut self, custom: CustomEase) -> Self {
        self.custom = Some(custom);
        self
    }

    #[inline]
    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.origin != SegmentOrigin::Fixed
    }

    /// Fix a dynamic start against `current`. Returns the resolved end.
    pub(crate) fn resolve(&mut self, current: Value) -> Value {
        match self.origin {
            SegmentOrigin::Fixed => {}
            SegmentOrigin::FromCurrent => {
                self.start = current;
            }
            SegmentOrigin::Relative(offset) => {
                self.start = current;
                self.end = current.add(&offset);
            }
        }
        self.origin = SegmentOrigin::Fixed;
        self.end
    }

    #[inline]
    pub(crate) fn swap_ends(&mut self) {
        std::mem::swap(&mut self.start, &mut self.end);
    }

    /// Fraction of the segment covered after `elapsed` seconds, in [0,1].
    #[inline]
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Eased progress. Priority: custom ease, then `over`, then own easing.
    #[inline]
    pub fn eased(
        &self,
        progress: f32,
        easing: &Easing,
        over: Option<(TransitionType, EaseType)>,
    ) -> f32 {
        if let Some(custom) = &self.custom {
            return custom.apply(progress);
        }
        let (transition, ease) = over.unwrap_or((self.transition, self.ease));
        easing.evaluate(progress, transition, ease)
    }

    /// Interpolated value after `elapsed` seconds.
    #[inline]
    pub fn sample(
        &self,
        elapsed: f32,
        easing: &Easing,
        over: Option<(TransitionType, EaseType)>,
    ) -> Value {
        self.blend(self.eased(self.progress(elapsed), easing, over))
    }

    /// Value at eased time `t`. The ends are returned verbatim so a finished
    /// segment lands exactly on `end`.
    #[inline]
    pub fn blend(&self, t: f32) -> Value {
        if t == 1.0 {
            self.end
        } else if t == 0.0 {
            self.start
        } else {
            Value::interpolate(&self.start, &self.end, t)
        }
    }
}
