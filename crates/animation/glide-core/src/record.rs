//! Animation record: one running animation and its playback state.
//!
//! A record owns an ordered segment list plus the position within it, loop
//! and pause state, timing modifiers and callbacks. Time only advances
//! inside `Tweener::tick`; the methods here are the position math shared by
//! the tick loop and the handle operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::callbacks::{Callback, Callbacks, SharedHandler, TweenEvent, TweenEventKind};
use crate::ease::{EaseType, Easing, TransitionType};
use crate::error::{GlideError, Result};
use crate::ids::{RecordId, TargetId};
use crate::segment::Segment;
use crate::value::Value;

/// Property identifier. Shared so the registry and pending writes clone cheaply.
pub type Property = Arc<str>;

/// Repeat behavior once the last segment finishes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Restart from the first segment.
    #[default]
    Linear,
    /// Flip the segment list so the next pass plays backward.
    PingPong,
}

/// Policy for a new record on a (target, property) pair that is already animated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictMode {
    /// Refuse the new record.
    Ignore,
    /// Kill existing records first.
    Kill,
    /// Jump existing records to their final value and complete them.
    Complete,
    /// Let every record write; the last write of the tick wins.
    #[default]
    Parallel,
}

#[derive(Debug)]
pub struct Record {
    pub(crate) target: TargetId,
    pub(crate) property: Property,
    pub(crate) target_kind: Option<Arc<str>>,
    pub(crate) correlation: Option<Arc<str>>,

    pub(crate) segments: Vec<Segment>,
    pub(crate) index: usize,
    pub(crate) elapsed: f32,

    pub(crate) delay: f32,
    pub(crate) delay_left: f32,
    pub(crate) speed: f32,
    /// 0 = infinite, 1 = play once, n = n total passes.
    pub(crate) loops: u32,
    pub(crate) loop_count: u32,
    pub(crate) loop_mode: LoopMode,
    /// Odd number of ping-pong flips applied since registration.
    pub(crate) flipped: bool,

    pub(crate) paused: bool,
    pub(crate) killed: bool,
    pub(crate) started: bool,
    pub(crate) finished: bool,
    pub(crate) snap: bool,
    pub(crate) auto_kill: bool,

    pub(crate) ease_override: Option<(TransitionType, EaseType)>,
    pub(crate) callbacks: Callbacks,
}

impl Record {
    pub fn new(target: TargetId, property: impl Into<Property>) -> Self {
        Self {
            target,
            property: property.into(),
            target_kind: None,
            correlation: None,
            segments: Vec::new(),
            index: 0,
            elapsed: 0.0,
            delay: 0.0,
            delay_left: 0.0,
            speed: 1.0,
            loops: 1,
            loop_count: 0,
            loop_mode: LoopMode::Linear,
            flipped: false,
            paused: false,
            killed: false,
            started: false,
            finished: false,
            snap: false,
            auto_kill: true,
            ease_override: None,
            callbacks: Callbacks::default(),
        }
    }

    // ---- construction ----

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn with_segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.set_delay(delay);
        self
    }

    /// Non-finite speeds are ignored.
    pub fn with_speed(mut self, speed: f32) -> Self {
        if speed.is_finite() {
            self.speed = speed;
        }
        self
    }

    pub fn with_loops(mut self, loops: u32, mode: LoopMode) -> Self {
        self.loops = loops;
        self.loop_mode = mode;
        self
    }

    pub fn with_ease_override(mut self, transition: TransitionType, ease: EaseType) -> Self {
        self.ease_override = Some((transition, ease));
        self
    }

    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap = snap;
        self
    }

    /// When false, completion parks the record instead of retiring it.
    pub fn with_auto_kill(mut self, auto_kill: bool) -> Self {
        self.auto_kill = auto_kill;
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.correlation = Some(id.into());
        self
    }

    pub fn with_target_kind(mut self, kind: impl Into<Arc<str>>) -> Self {
        self.target_kind = Some(kind.into());
        self
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_handler(mut self, handler: SharedHandler) -> Self {
        self.callbacks = Callbacks::handler(handler);
        self
    }

    pub fn on_start(mut self, f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        self.callbacks.on_start = Callback::closure(f);
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        self.callbacks.on_update = Callback::closure(f);
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        self.callbacks.on_complete = Callback::closure(f);
        self
    }

    pub fn on_kill(mut self, f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        self.callbacks.on_kill = Callback::closure(f);
        self
    }

    pub fn on_pause_toggle(mut self, f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        self.callbacks.on_pause = Callback::closure(f);
        self
    }

    // ---- inspection ----

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn target_kind(&self) -> Option<&str> {
        self.target_kind.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_index(&self) -> usize {
        self.index
    }

    pub fn elapsed_in_segment(&self) -> f32 {
        self.elapsed
    }

    pub fn delay_remaining(&self) -> f32 {
        self.delay_left.max(0.0)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn auto_kill(&self) -> bool {
        self.auto_kill
    }

    // ---- validation ----

    pub(crate) fn validate(&self) -> Result<()> {
        if self.property.is_empty() {
            return Err(GlideError::EmptyProperty);
        }
        let first = self.segments.first().ok_or(GlideError::NoSegments)?;
        let expected = first.end.kind();
        for (i, seg) in self.segments.iter().enumerate() {
            for actual in [seg.start.kind(), seg.end.kind()] {
                if actual != expected {
                    return Err(GlideError::KindMismatch {
                        segment: i,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    // ---- timing ----

    pub(crate) fn set_delay(&mut self, delay: f32) {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.delay = delay;
        self.delay_left = delay;
    }

    /// Duration of one pass over all segments.
    pub fn total_duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Time into the current pass.
    pub fn position(&self) -> f32 {
        let before: f32 = self.segments[..self.index.min(self.segments.len())]
            .iter()
            .map(|s| s.duration)
            .sum();
        let within = self
            .segments
            .get(self.index)
            .map(|s| self.elapsed.clamp(0.0, s.duration))
            .unwrap_or(0.0);
        before + within
    }

    /// Fraction of the current pass played, in [0,1].
    pub fn progress(&self) -> f32 {
        let total = self.total_duration();
        if total <= 0.0 {
            return if self.started { 1.0 } else { 0.0 };
        }
        (self.position() / total).clamp(0.0, 1.0)
    }

    /// Delay plus the rest of this pass plus every remaining pass.
    pub fn remaining_time(&self) -> f32 {
        let total = self.total_duration();
        let this_pass = (total - self.position()).max(0.0);
        let passes_left = if self.loops == 0 {
            if total > 0.0 {
                return f32::INFINITY;
            }
            0
        } else {
            self.loops.saturating_sub(self.loop_count + 1)
        };
        self.delay_remaining() + this_pass + total * passes_left as f32
    }

    #[inline]
    pub(crate) fn should_loop(&self) -> bool {
        self.loops == 0 || self.loop_count < self.loops.saturating_sub(1)
    }

    /// Reverse segment order and swap every start/end.
    pub(crate) fn flip(&mut self) {
        self.segments.reverse();
        for seg in &mut self.segments {
            seg.swap_ends();
        }
    }

    pub(crate) fn begin_next_loop(&mut self) {
        self.index = 0;
        self.elapsed = 0.0;
        self.loop_count += 1;
        if self.loop_mode == LoopMode::PingPong {
            self.flip();
            self.flipped = !self.flipped;
        }
    }

    /// Flip the list and restart from the first segment.
    pub(crate) fn reverse(&mut self) {
        self.flip();
        self.index = 0;
        self.elapsed = 0.0;
    }

    /// Undo ping-pong flips so the list plays in registered orientation.
    pub(crate) fn restore_orientation(&mut self) {
        if self.flipped {
            self.flip();
            self.flipped = false;
        }
    }

    /// Back to the first frame of the first pass.
    pub(crate) fn rewind_position(&mut self) {
        self.restore_orientation();
        self.index = 0;
        self.elapsed = 0.0;
        self.loop_count = 0;
        self.finished = false;
    }

    /// Place the play head `time` seconds into the current pass.
    /// Past the end it lands on the final frame.
    pub(crate) fn seek(&mut self, time: f32) {
        if self.segments.is_empty() {
            return;
        }
        let mut left = if time.is_finite() { time.max(0.0) } else { 0.0 };
        for (i, seg) in self.segments.iter().enumerate() {
            if left < seg.duration {
                self.index = i;
                self.elapsed = left;
                return;
            }
            left -= seg.duration;
        }
        let last = self.segments.len() - 1;
        self.index = last;
        self.elapsed = self.segments[last].duration;
    }

    /// Resolve dynamic starts, chaining each from the previous segment's end.
    pub(crate) fn resolve_dynamic(&mut self, current: Option<Value>) {
        let mut carry = current;
        for seg in &mut self.segments {
            if seg.is_dynamic() {
                let from = match carry {
                    Some(v) if v.kind() == seg.end.kind() => v,
                    _ => {
                        log::warn!(
                            "no current value for '{}' on {:?}; starting from zero",
                            self.property,
                            self.target
                        );
                        Value::zero(seg.end.kind())
                    }
                };
                seg.resolve(from);
            }
            carry = Some(seg.end);
        }
    }

    #[inline]
    pub(crate) fn has_dynamic(&self) -> bool {
        self.segments.iter().any(Segment::is_dynamic)
    }

    /// Value at the play head, without advancing.
    pub fn current_value(&self, easing: &Easing) -> Option<Value> {
        let seg = self.segments.get(self.index)?;
        let v = seg.sample(self.elapsed, easing, self.ease_override);
        Some(if self.snap { v.snap() } else { v })
    }

    pub fn first_value(&self) -> Option<Value> {
        self.segments.first().map(|s| s.start)
    }

    pub fn final_value(&self) -> Option<Value> {
        self.segments.last().map(|s| s.end)
    }

    // ---- callbacks ----

    pub(crate) fn emit(&mut self, id: RecordId, kind: TweenEventKind<'_>) {
        let Record {
            callbacks,
            property,
            target,
            ..
        } = self;
        let slot = callbacks.slot_mut(&kind);
        if slot.is_none() {
            return;
        }
        let event = TweenEvent {
            record: id,
            target: *target,
            property: &**property,
            kind,
        };
        slot.invoke(&event);
    }

    // ---- pooling ----

    /// Blank state for the pool. Segment storage keeps its capacity.
    pub(crate) fn reset_blank(&mut self) {
        self.segments.clear();
        self.callbacks.clear();
        self.target_kind = None;
        self.correlation = None;
        self.index = 0;
        self.elapsed = 0.0;
        self.delay = 0.0;
        self.delay_left = 0.0;
        self.speed = 1.0;
        self.loops = 1;
        self.loop_count = 0;
        self.loop_mode = LoopMode::Linear;
        self.flipped = false;
        self.paused = false;
        self.killed = false;
        self.started = false;
        self.finished = false;
        self.snap = false;
        self.auto_kill = true;
        self.ease_override = None;
    }

    pub(crate) fn retarget(&mut self, target: TargetId, property: Property) {
        self.target = target;
        self.property = property;
    }
}
