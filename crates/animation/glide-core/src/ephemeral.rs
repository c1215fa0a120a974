//! Lightweight scheduler for values that are not bound to a target property.
//!
//! Used for waits and procedural values. Callers get raw components through a
//! per-tick callback. Storage is a flat slot array plus a FIFO of free
//! indices; every slot holds its kind-tagged update callback and plain `f32`
//! lanes, so nothing is boxed per value.

use std::collections::VecDeque;

use crate::ease::{EaseType, Easing, TransitionType};
use crate::ids::EphemeralId;
use crate::value::lerp_f32;

pub type EaseSpec = (TransitionType, EaseType);

/// Kind-tagged update callback.
#[derive(Default)]
pub enum EphemeralUpdate {
    /// Waits deliver nothing.
    #[default]
    None,
    Float(Box<dyn FnMut(f32) + Send>),
    Vec2(Box<dyn FnMut([f32; 2]) + Send>),
    Vec3(Box<dyn FnMut([f32; 3]) + Send>),
    Color(Box<dyn FnMut([f32; 4]) + Send>),
}

impl EphemeralUpdate {
    #[inline]
    fn deliver(&mut self, v: &[f32; 4]) {
        match self {
            EphemeralUpdate::None => {}
            EphemeralUpdate::Float(f) => f(v[0]),
            EphemeralUpdate::Vec2(f) => f([v[0], v[1]]),
            EphemeralUpdate::Vec3(f) => f([v[0], v[1], v[2]]),
            EphemeralUpdate::Color(f) => f(*v),
        }
    }
}

type CompleteFn = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct EphemeralSlot {
    generation: u32,
    live: bool,
    from: [f32; 4],
    to: [f32; 4],
    duration: f32,
    elapsed: f32,
    delay: f32,
    transition: TransitionType,
    ease: EaseType,
    update: EphemeralUpdate,
    on_complete: Option<CompleteFn>,
}

impl EphemeralSlot {
    fn release(&mut self) {
        self.live = false;
        self.generation = self.generation.wrapping_add(1);
        self.update = EphemeralUpdate::None;
        self.on_complete = None;
    }
}

pub struct EphemeralScheduler {
    slots: Vec<EphemeralSlot>,
    free: VecDeque<u32>,
    easing: Easing,
    live: usize,
}

impl std::fmt::Debug for EphemeralScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralScheduler")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}

impl EphemeralScheduler {
    pub fn new(easing: Easing, capacity: usize) -> Self {
        let mut sched = Self {
            slots: Vec::new(),
            free: VecDeque::new(),
            easing,
            live: 0,
        };
        sched.grow_to(capacity.max(1));
        sched
    }

    pub(crate) fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    fn grow_to(&mut self, len: usize) {
        let old = self.slots.len();
        if len <= old {
            return;
        }
        self.slots.resize_with(len, EphemeralSlot::default);
        self.free.extend(old as u32..len as u32);
    }

    fn spawn(
        &mut self,
        from: [f32; 4],
        to: [f32; 4],
        duration: f32,
        (transition, ease): EaseSpec,
        update: EphemeralUpdate,
    ) -> EphemeralId {
        if self.free.is_empty() {
            let len = self.slots.len();
            self.grow_to((len * 2).max(4));
        }
        // grow_to always leaves at least one free index
        let index = self.free.pop_front().unwrap_or_default();
        let slot = &mut self.slots[index as usize];
        slot.live = true;
        slot.from = from;
        slot.to = to;
        slot.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        slot.elapsed = 0.0;
        slot.delay = 0.0;
        slot.transition = transition;
        slot.ease = ease;
        slot.update = update;
        slot.on_complete = None;
        self.live += 1;
        EphemeralId {
            index,
            generation: slot.generation,
        }
    }

    pub fn tween_float(
        &mut self,
        from: f32,
        to: f32,
        duration: f32,
        easing: EaseSpec,
        on_update: impl FnMut(f32) + Send + 'static,
    ) -> EphemeralId {
        self.spawn(
            [from, 0.0, 0.0, 0.0],
            [to, 0.0, 0.0, 0.0],
            duration,
            easing,
            EphemeralUpdate::Float(Box::new(on_update)),
        )
    }

    pub fn tween_vec2(
        &mut self,
        from: [f32; 2],
        to: [f32; 2],
        duration: f32,
        easing: EaseSpec,
        on_update: impl FnMut([f32; 2]) + Send + 'static,
    ) -> EphemeralId {
        self.spawn(
            [from[0], from[1], 0.0, 0.0],
            [to[0], to[1], 0.0, 0.0],
            duration,
            easing,
            EphemeralUpdate::Vec2(Box::new(on_update)),
        )
    }

    pub fn tween_vec3(
        &mut self,
        from: [f32; 3],
        to: [f32; 3],
        duration: f32,
        easing: EaseSpec,
        on_update: impl FnMut([f32; 3]) + Send + 'static,
    ) -> EphemeralId {
        self.spawn(
            [from[0], from[1], from[2], 0.0],
            [to[0], to[1], to[2], 0.0],
            duration,
            easing,
            EphemeralUpdate::Vec3(Box::new(on_update)),
        )
    }

    pub fn tween_color(
        &mut self,
        from: [f32; 4],
        to: [f32; 4],
        duration: f32,
        easing: EaseSpec,
        on_update: impl FnMut([f32; 4]) + Send + 'static,
    ) -> EphemeralId {
        self.spawn(
            from,
            to,
            duration,
            easing,
            EphemeralUpdate::Color(Box::new(on_update)),
        )
    }

    /// Fire `on_complete` after `duration` seconds.
    pub fn wait(&mut self, duration: f32, on_complete: impl FnOnce() + Send + 'static) -> EphemeralId {
        let id = self.spawn(
            [0.0; 4],
            [0.0; 4],
            duration,
            (TransitionType::Linear, EaseType::In),
            EphemeralUpdate::None,
        );
        self.on_complete(id, on_complete);
        id
    }

    fn slot_mut(&mut self, id: EphemeralId) -> Option<&mut EphemeralSlot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.live && s.generation == id.generation)
    }

    pub fn on_complete(&mut self, id: EphemeralId, f: impl FnOnce() + Send + 'static) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.on_complete = Some(Box::new(f));
                true
            }
            None => false,
        }
    }

    pub fn set_delay(&mut self, id: EphemeralId, delay: f32) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
                true
            }
            None => false,
        }
    }

    /// Stop without delivering the end value or completing.
    pub fn cancel(&mut self, id: EphemeralId) -> bool {
        let released = match self.slot_mut(id) {
            Some(slot) => {
                slot.release();
                true
            }
            None => false,
        };
        if released {
            self.free.push_back(id.index);
            self.live -= 1;
        }
        released
    }

    pub fn is_live(&self, id: EphemeralId) -> bool {
        self.slots
            .get(id.index as usize)
            .map(|s| s.live && s.generation == id.generation)
            .unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.live
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.live {
                slot.release();
                self.free.push_back(i as u32);
            }
        }
        self.live = 0;
    }

    /// Advance every live slot by `dt`.
    pub fn tick(&mut self, dt: f32) {
        if self.live == 0 {
            return;
        }
        let easing = &self.easing;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if !slot.live {
                continue;
            }
            let mut dt = dt;
            if slot.delay > 0.0 {
                slot.delay -= dt;
                if slot.delay > 0.0 {
                    continue;
                }
                dt = -slot.delay;
                slot.delay = 0.0;
            }
            slot.elapsed += dt;
            let progress = if slot.duration <= 0.0 {
                1.0
            } else {
                (slot.elapsed / slot.duration).clamp(0.0, 1.0)
            };
            let t = easing.evaluate(progress, slot.transition, slot.ease);
            let mut v = [0.0f32; 4];
            for (c, out) in v.iter_mut().enumerate() {
                *out = lerp_f32(slot.from[c], slot.to[c], t);
            }
            slot.update.deliver(&v);
            if progress >= 1.0 {
                let end = slot.to;
                slot.update.deliver(&end);
                if let Some(done) = slot.on_complete.take() {
                    done();
                }
                slot.release();
                self.free.push_back(i as u32);
                self.live -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn sched() -> EphemeralScheduler {
        EphemeralScheduler::new(Easing::exact(), 2)
    }

    const LINEAR: EaseSpec = (TransitionType::Linear, EaseType::In);

    #[test]
    fn float_delivers_then_exact_end_then_completes() {
        let mut s = sched();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Mutex::new(false));
        let sink = seen.clone();
        let id = s.tween_float(0.1, 0.3, 1.0, LINEAR, move |v| sink.lock().unwrap().push(v));
        let flag = done.clone();
        assert!(s.on_complete(id, move || *flag.lock().unwrap() = true));

        s.tick(0.5);
        assert_eq!(seen.lock().unwrap().len(), 1);
        s.tick(0.5);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(*seen.last().unwrap(), 0.3);
        assert!(*done.lock().unwrap());
        assert!(!s.is_live(id));
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn slots_grow_by_doubling_and_recycle() {
        let mut s = sched();
        let ids: Vec<_> = (0..5).map(|_| s.wait(1.0, || {})).collect();
        assert_eq!(s.active_count(), 5);
        assert!(s.capacity() >= 5);
        assert!(s.cancel(ids[0]));
        assert!(!s.cancel(ids[0]));
        let reused = s.wait(1.0, || {});
        assert!(s.is_live(reused));
        assert!(!s.is_live(ids[0]));
    }

    #[test]
    fn wait_honours_delay() {
        let mut s = sched();
        let done = Arc::new(Mutex::new(0));
        let d = done.clone();
        let id = s.wait(0.5, move || *d.lock().unwrap() += 1);
        s.set_delay(id, 1.0);
        s.tick(1.0);
        assert_eq!(*done.lock().unwrap(), 0);
        s.tick(0.5);
        assert_eq!(*done.lock().unwrap(), 1);
    }

    #[test]
    fn vec3_interpolates_components() {
        let mut s = sched();
        let last = Arc::new(Mutex::new([0.0f32; 3]));
        let l = last.clone();
        s.tween_vec3([0.0, 0.0, 0.0], [2.0, 4.0, 8.0], 2.0, LINEAR, move |v| {
            *l.lock().unwrap() = v
        });
        s.tick(1.0);
        assert_eq!(*last.lock().unwrap(), [1.0, 2.0, 4.0]);
    }

    #[test]
    fn clear_cancels_without_completion() {
        let mut s = sched();
        let done = Arc::new(Mutex::new(false));
        let d = done.clone();
        s.wait(0.1, move || *d.lock().unwrap() = true);
        s.clear();
        s.tick(1.0);
        assert!(!*done.lock().unwrap());
        assert_eq!(s.active_count(), 0);
    }
}
