//! Controller operations on a registered record.
//!
//! A `Handle` is a generational id. Once the record is killed (or has
//! completed and been retired) every operation is a silent no-op.

use serde::{Deserialize, Serialize};

use crate::ease::{EaseType, TransitionType};
use crate::error::{GlideError, Result};
use crate::ids::RecordId;
use crate::record::{LoopMode, Record};
use crate::scheduler::Tweener;
use crate::segment::Segment;
use crate::target::TargetAccess;
use crate::value::Value;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Handle(RecordId);

impl Handle {
    pub(crate) fn new(id: RecordId) -> Self {
        Self(id)
    }

    pub fn id(&self) -> RecordId {
        self.0
    }
}

impl Tweener {
    fn live(&self, h: Handle) -> Option<&Record> {
        self.slot_record(h.id())
            .filter(|r| !r.killed && !(r.finished && r.auto_kill))
    }

    fn live_mut(&mut self, h: Handle) -> Option<&mut Record> {
        self.slot_record_mut(h.id())
            .filter(|r| !r.killed && !(r.finished && r.auto_kill))
    }

    pub fn is_valid(&self, h: Handle) -> bool {
        self.live(h).is_some()
    }

    pub fn pause(&mut self, h: Handle) {
        if self.is_valid(h) {
            self.set_paused(h.id(), true);
        }
    }

    pub fn resume(&mut self, h: Handle) {
        if self.is_valid(h) {
            self.set_paused(h.id(), false);
        }
    }

    pub fn toggle_pause(&mut self, h: Handle) {
        if let Some(paused) = self.live(h).map(|r| r.paused) {
            self.set_paused(h.id(), !paused);
        }
    }

    /// Fire on-kill and invalidate the handle.
    pub fn kill(&mut self, h: Handle) {
        if self.is_valid(h) {
            self.kill_record(h.id());
        }
    }

    /// Back to the start of the first pass. The target keeps its value until
    /// the next tick; the delay and on-start fire again.
    pub fn restart(&mut self, h: Handle) {
        let Some(rec) = self.live_mut(h) else {
            return;
        };
        rec.rewind_position();
        rec.delay_left = rec.delay;
        rec.started = false;
        self.revive(h.id());
    }

    /// Back to the start and write the first value right away. A record that
    /// has not started yet takes its dynamic starts from the target here.
    pub fn rewind(&mut self, h: Handle, targets: &mut dyn TargetAccess) {
        let Some(rec) = self.live_mut(h) else {
            return;
        };
        rec.rewind_position();
        if rec.has_dynamic() {
            let current = targets.get(rec.target, &rec.property);
            rec.resolve_dynamic(current);
        }
        if let Some(v) = rec.first_value() {
            let v = if rec.snap { v.snap() } else { v };
            targets.set(rec.target, &rec.property, v);
        }
        self.revive(h.id());
    }

    /// Move the play head to `time` seconds into the current pass. Loops are
    /// not counted: times past one pass land on the pass's final frame.
    pub fn seek(&mut self, h: Handle, time: f32) {
        let Some(rec) = self.live_mut(h) else {
            return;
        };
        rec.finished = false;
        rec.seek(time);
        self.revive(h.id());
    }

    /// Seek by fraction of the pass, clamped to [0,1].
    pub fn seek_progress(&mut self, h: Handle, fraction: f32) {
        let Some(total) = self.live(h).map(Record::total_duration) else {
            return;
        };
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        self.seek(h, total * fraction);
    }

    /// Flip segment order, swap every start/end and restart the pass.
    /// A parked record is put back in play.
    pub fn reverse(&mut self, h: Handle) {
        let Some(rec) = self.live_mut(h) else {
            return;
        };
        rec.reverse();
        self.revive(h.id());
    }

    pub fn set_loops(&mut self, h: Handle, loops: u32, mode: LoopMode) {
        if let Some(rec) = self.live_mut(h) {
            rec.loops = loops;
            rec.loop_mode = mode;
        }
    }

    pub fn set_speed(&mut self, h: Handle, speed: f32) {
        if let Some(rec) = self.live_mut(h) {
            if speed.is_finite() {
                rec.speed = speed;
            }
        }
    }

    /// Replace the delay. Only the part not yet consumed is affected.
    pub fn set_delay(&mut self, h: Handle, delay: f32) {
        if let Some(rec) = self.live_mut(h) {
            rec.set_delay(delay);
            if rec.started {
                rec.delay_left = 0.0;
            }
        }
    }

    /// Add a segment after the last one.
    pub fn append_segment(&mut self, h: Handle, segment: Segment) -> Result<()> {
        self.insert_at(h, segment, None)
    }

    /// Add a segment right after the current one.
    pub fn insert_segment(&mut self, h: Handle, segment: Segment) -> Result<()> {
        let Some(index) = self.live(h).map(|r| r.index) else {
            return Ok(());
        };
        self.insert_at(h, segment, Some(index + 1))
    }

    fn insert_at(&mut self, h: Handle, segment: Segment, at: Option<usize>) -> Result<()> {
        let Some(rec) = self.live_mut(h) else {
            return Ok(());
        };
        if let Some(expected) = rec.segments.first().map(|s| s.end.kind()) {
            let actual = segment.end.kind();
            if actual != expected || segment.start.kind() != expected {
                return Err(GlideError::KindMismatch {
                    segment: at.unwrap_or(rec.segments.len()),
                    expected,
                    actual,
                });
            }
        }
        let mut segment = segment;
        if rec.started && segment.is_dynamic() {
            let prev = at
                .and_then(|i| i.checked_sub(1))
                .or_else(|| rec.segments.len().checked_sub(1))
                .and_then(|i| rec.segments.get(i))
                .map(|s| s.end);
            if let Some(prev) = prev {
                segment.resolve(prev);
            }
        }
        match at {
            Some(i) if i <= rec.segments.len() => rec.segments.insert(i, segment),
            _ => rec.segments.push(segment),
        }
        Ok(())
    }

    /// Rewrite the easing of every segment not yet consumed.
    pub fn restyle(&mut self, h: Handle, transition: TransitionType, ease: EaseType) {
        if let Some(rec) = self.live_mut(h) {
            let from = rec.index;
            for seg in rec.segments.iter_mut().skip(from) {
                seg.transition = transition;
                seg.ease = ease;
            }
        }
    }

    pub fn set_ease_override(&mut self, h: Handle, over: Option<(TransitionType, EaseType)>) {
        if let Some(rec) = self.live_mut(h) {
            rec.ease_override = over;
        }
    }

    pub fn set_snap(&mut self, h: Handle, snap: bool) {
        if let Some(rec) = self.live_mut(h) {
            rec.snap = snap;
        }
    }

    /// Fraction of the current pass played; 0 for an invalid handle.
    pub fn progress(&self, h: Handle) -> f32 {
        self.live(h).map(Record::progress).unwrap_or(0.0)
    }

    /// Seconds left including delay and remaining loops; 0 for an invalid handle.
    pub fn remaining_time(&self, h: Handle) -> f32 {
        self.live(h).map(Record::remaining_time).unwrap_or(0.0)
    }

    pub fn current_value(&self, h: Handle) -> Option<Value> {
        self.live(h)?.current_value(self.easing())
    }

    pub fn is_paused(&self, h: Handle) -> bool {
        self.live(h).map(|r| r.paused).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ids::TargetId;

    struct Sink(Vec<Value>);

    impl TargetAccess for Sink {
        fn get(&self, _: TargetId, _: &str) -> Option<Value> {
            self.0.last().copied()
        }
        fn set(&mut self, _: TargetId, _: &str, value: Value) {
            self.0.push(value);
        }
        fn is_valid(&self, _: TargetId) -> bool {
            true
        }
    }

    fn tweener() -> Tweener {
        Tweener::new(Config {
            lut_samples: 32,
            ..Config::default()
        })
    }

    fn two_legs() -> Record {
        Record::new(TargetId(1), "x")
            .with_segment(Segment::new(0.0, 1.0, 1.0))
            .with_segment(Segment::new(1.0, 3.0, 1.0))
    }

    #[test]
    fn insert_goes_after_current_segment() {
        let mut tw = tweener();
        let mut sink = Sink(Vec::new());
        let h = tw.register(two_legs()).unwrap();
        tw.tick(0.5, &mut sink);
        tw.insert_segment(h, Segment::new(1.0, 9.0, 1.0)).unwrap();
        let ends: Vec<_> = tw.record(h).unwrap().segments().iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![Value::Float(1.0), Value::Float(9.0), Value::Float(3.0)]);
    }

    #[test]
    fn insert_rejects_other_kinds() {
        let mut tw = tweener();
        let h = tw.register(two_legs()).unwrap();
        let err = tw
            .append_segment(h, Segment::new(Value::Vec2([0.0; 2]), Value::Vec2([1.0; 2]), 1.0))
            .unwrap_err();
        assert!(matches!(err, GlideError::KindMismatch { segment: 2, .. }));
    }

    #[test]
    fn restyle_leaves_consumed_segments() {
        let mut tw = tweener();
        let mut sink = Sink(Vec::new());
        let h = tw.register(two_legs()).unwrap();
        tw.tick(1.0, &mut sink);
        tw.restyle(h, TransitionType::Quad, EaseType::In);
        let segs = tw.record(h).unwrap().segments();
        assert_eq!(segs[0].transition, TransitionType::Linear);
        assert_eq!(segs[1].transition, TransitionType::Quad);
    }

    #[test]
    fn seek_progress_maps_to_time() {
        let mut tw = tweener();
        let h = tw.register(two_legs()).unwrap();
        tw.seek_progress(h, 0.75);
        assert_eq!(tw.record(h).unwrap().segment_index(), 1);
        assert_eq!(tw.current_value(h), Some(Value::Float(2.0)));
        assert_eq!(tw.progress(h), 0.75);
    }

    #[test]
    fn rewind_writes_first_value() {
        let mut tw = tweener();
        let mut sink = Sink(Vec::new());
        let h = tw.register(two_legs()).unwrap();
        tw.tick(1.5, &mut sink);
        tw.rewind(h, &mut sink);
        assert_eq!(sink.0.last(), Some(&Value::Float(0.0)));
        assert_eq!(tw.progress(h), 0.0);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut tw = tweener();
        let h = tw.register(two_legs()).unwrap();
        tw.toggle_pause(h);
        assert!(tw.is_paused(h));
        tw.toggle_pause(h);
        assert!(!tw.is_paused(h));
    }
}
