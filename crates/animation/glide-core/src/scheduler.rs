//! Tweener: the scheduling context.
//!
//! Owns the record arena, the active list, the record pool, the conflict
//! registry, the pending write batch and the easing evaluator. `tick` is the
//! only place time advances.
//!
//! Per tick:
//! 1. advance every active record (killed/stale -> retire, paused -> skip,
//!    delay countdown, one-time start, time advance, ease, interpolate, queue
//!    write, update callback, segment/loop/complete transitions)
//! 2. flush the write batch to the host
//! 3. retire or park finished records (swap-remove from the active list,
//!    unregister, reset, return to the pool)
//! 4. advance the ephemeral scheduler

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::callbacks::TweenEventKind;
use crate::config::Config;
use crate::ease::{Easing, EasingTable};
use crate::ephemeral::EphemeralScheduler;
use crate::error::{GlideError, Result};
use crate::handle::Handle;
use crate::ids::{RecordId, SlotAllocator, TargetId};
use crate::record::{ConflictMode, Property, Record};
use crate::registry::ConflictRegistry;
use crate::scratch::{push_doubling, Scratch};
use crate::target::TargetAccess;
use crate::writes::{PendingWrite, WriteBatch};

/// Counters for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    /// Records that produced a value.
    pub advanced: usize,
    /// `set` calls made on the host.
    pub writes: usize,
    /// Records that ran their last loop.
    pub completed: usize,
    /// Records whose slot was reclaimed.
    pub retired: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Slot {
    pub(crate) record: Option<Record>,
    /// Position in `active`, `None` when parked or free.
    pub(crate) active_pos: Option<usize>,
}

enum Step {
    Idle,
    Advanced,
    Completed,
    Retire,
}

pub struct Tweener {
    cfg: Config,
    easing: Easing,

    slots: Vec<Slot>,
    alloc: SlotAllocator,
    active: Vec<u32>,
    pool: Vec<Record>,

    registry: ConflictRegistry,
    writes: WriteBatch,
    scratch: Scratch,

    ephemeral: EphemeralScheduler,
    time_scale: f32,
}

impl std::fmt::Debug for Tweener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tweener")
            .field("active", &self.active.len())
            .field("slots", &self.slots.len())
            .field("pooled", &self.pool.len())
            .field("easing", &self.easing.table())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

impl Default for Tweener {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Advance one record by `dt`. Never fails; every fault retires the record.
fn advance(
    rec: &mut Record,
    id: RecordId,
    dt: f32,
    easing: &Easing,
    writes: &mut WriteBatch,
    targets: &dyn TargetAccess,
) -> Step {
    if rec.killed || rec.finished {
        return Step::Retire;
    }
    if !targets.is_valid(rec.target) {
        log::debug!("retiring {:?}: target {:?} is gone", id, rec.target);
        return Step::Retire;
    }
    if rec.paused {
        return Step::Idle;
    }

    let mut dt = dt;
    if rec.delay_left > 0.0 {
        rec.delay_left -= dt;
        if rec.delay_left > 0.0 {
            return Step::Idle;
        }
        dt = -rec.delay_left;
        rec.delay_left = 0.0;
    }

    if !rec.started {
        if rec.has_dynamic() {
            let current = targets.get(rec.target, &rec.property);
            rec.resolve_dynamic(current);
        }
        rec.started = true;
        rec.emit(id, TweenEventKind::Start);
    }

    let Some(seg) = rec.segments.get(rec.index) else {
        return Step::Retire;
    };
    rec.elapsed += dt * rec.speed;
    let progress = seg.progress(rec.elapsed);
    let mut value = seg.blend(seg.eased(progress, easing, rec.ease_override));
    if rec.snap {
        value = value.snap();
    }

    writes.push(PendingWrite {
        record: id,
        target: rec.target,
        property: rec.property.clone(),
        value,
    });
    rec.emit(id, TweenEventKind::Update(&value));

    if progress >= 1.0 {
        if rec.index + 1 < rec.segments.len() {
            rec.index += 1;
            rec.elapsed = 0.0;
        } else if rec.should_loop() {
            rec.begin_next_loop();
        } else {
            rec.finished = true;
            rec.emit(id, TweenEventKind::Complete);
            return Step::Completed;
        }
    }
    Step::Advanced
}

impl Tweener {
    /// Build the context and its easing table.
    pub fn new(cfg: Config) -> Self {
        let table = Arc::new(EasingTable::build(cfg.lut_samples));
        let easing = Easing::new(table, cfg.lookup);
        Self {
            slots: Vec::with_capacity(cfg.initial_records),
            alloc: SlotAllocator::with_capacity(cfg.initial_records),
            active: Vec::with_capacity(cfg.initial_records),
            pool: Vec::new(),
            registry: ConflictRegistry::new(),
            writes: WriteBatch::with_capacity(cfg.initial_writes),
            scratch: Scratch::new(&cfg),
            ephemeral: EphemeralScheduler::new(easing.clone(), cfg.initial_ephemeral),
            time_scale: cfg.time_scale,
            easing,
            cfg,
        }
    }

    /// Validate the config first.
    pub fn try_new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg))
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn easing(&self) -> &Easing {
        &self.easing
    }

    pub fn ephemeral(&self) -> &EphemeralScheduler {
        &self.ephemeral
    }

    pub fn ephemeral_mut(&mut self) -> &mut EphemeralScheduler {
        &mut self.ephemeral
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.time_scale = scale;
        }
    }

    // ---- easing table lifecycle ----

    pub fn is_easing_initialized(&self) -> bool {
        self.easing.table().is_some()
    }

    /// Build the easing table if it was torn down.
    pub fn init_easing(&mut self) {
        if self.is_easing_initialized() {
            return;
        }
        let table = Arc::new(EasingTable::build(self.cfg.lut_samples));
        self.easing = Easing::new(table, self.cfg.lookup);
        self.ephemeral.set_easing(self.easing.clone());
    }

    /// Release the easing table. Live records keep running on the closed-form
    /// curves; new registrations are refused until `init_easing`.
    pub fn teardown_easing(&mut self) {
        if self.easing.table().is_some() {
            log::debug!("easing table released");
        }
        self.easing = Easing::exact();
        self.ephemeral.set_easing(self.easing.clone());
    }

    // ---- arena ----

    #[inline]
    pub(crate) fn slot_record(&self, id: RecordId) -> Option<&Record> {
        if !self.alloc.is_current(id.index, id.generation) {
            return None;
        }
        self.slots.get(id.index as usize)?.record.as_ref()
    }

    #[inline]
    pub(crate) fn slot_record_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        if !self.alloc.is_current(id.index, id.generation) {
            return None;
        }
        self.slots.get_mut(id.index as usize)?.record.as_mut()
    }

    #[inline]
    pub(crate) fn is_active_slot(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .map(|s| s.active_pos.is_some())
            .unwrap_or(false)
    }

    fn activate(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        if slot.active_pos.is_some() {
            return;
        }
        slot.active_pos = Some(self.active.len());
        push_doubling(&mut self.active, index);
    }

    fn deactivate(&mut self, index: u32) {
        let Some(pos) = self.slots[index as usize].active_pos.take() else {
            return;
        };
        self.active.swap_remove(pos);
        if let Some(&moved) = self.active.get(pos) {
            self.slots[moved as usize].active_pos = Some(pos);
        }
    }

    /// Put a parked record back on the active list and in the registry.
    pub(crate) fn revive(&mut self, id: RecordId) {
        if self.is_active_slot(id.index) {
            return;
        }
        let Some(rec) = self.slot_record_mut(id) else {
            return;
        };
        rec.finished = false;
        let (target, property) = (rec.target, rec.property.clone());
        self.registry.insert(target, &property, id);
        self.activate(id.index);
    }

    fn park(&mut self, id: RecordId) {
        let Some(rec) = self.slot_record(id) else {
            return;
        };
        let (target, property) = (rec.target, rec.property.clone());
        self.registry.remove(target, &property, id);
        self.deactivate(id.index);
    }

    /// Reclaim the slot and pool the record.
    fn retire(&mut self, id: RecordId) -> bool {
        if !self.alloc.is_current(id.index, id.generation) {
            return false;
        }
        self.deactivate(id.index);
        let Some(mut rec) = self.slots[id.index as usize].record.take() else {
            return false;
        };
        self.registry.remove(rec.target, &rec.property, id);
        self.alloc.release(id.index);
        if self.pool.len() < self.cfg.pool_capacity {
            rec.reset_blank();
            self.pool.push(rec);
        }
        true
    }

    // ---- registration ----

    /// Blank record from the pool, or a fresh one.
    pub fn acquire_record(&mut self, target: TargetId, property: impl Into<Property>) -> Record {
        match self.pool.pop() {
            Some(mut rec) => {
                rec.retarget(target, property.into());
                rec
            }
            None => Record::new(target, property),
        }
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    /// Register without consulting the host or the conflict policy
    /// (equivalent to `ConflictMode::Parallel`).
    pub fn register(&mut self, record: Record) -> Result<Handle> {
        if !self.is_easing_initialized() {
            return Err(GlideError::EasingNotInitialized);
        }
        record.validate()?;
        Ok(self.insert(record))
    }

    /// Validate against the host, apply `mode`, then register.
    pub fn register_with(
        &mut self,
        record: Record,
        mode: ConflictMode,
        targets: &mut dyn TargetAccess,
    ) -> Result<Handle> {
        if !self.is_easing_initialized() {
            return Err(GlideError::EasingNotInitialized);
        }
        record.validate()?;
        if !targets.is_valid(record.target) {
            return Err(GlideError::InvalidTarget {
                target: record.target,
            });
        }
        let current = targets
            .get(record.target, &record.property)
            .ok_or_else(|| GlideError::UnknownProperty {
                target: record.target,
                property: record.property.to_string(),
            })?;
        if let Some(first) = record.segments.first() {
            if current.kind() != first.end.kind() {
                return Err(GlideError::KindMismatch {
                    segment: 0,
                    expected: current.kind(),
                    actual: first.end.kind(),
                });
            }
        }
        if !self.resolve_conflict(record.target, &record.property, mode, targets) {
            log::debug!(
                "registration refused: '{}' on {:?} already animated",
                record.property,
                record.target
            );
            return Err(GlideError::Conflict {
                target: record.target,
                property: record.property.to_string(),
            });
        }
        Ok(self.insert(record))
    }

    fn insert(&mut self, record: Record) -> Handle {
        let (index, generation, is_new) = self.alloc.alloc();
        if is_new {
            push_doubling(&mut self.slots, Slot::default());
        }
        let id = RecordId { index, generation };
        self.registry.insert(record.target, &record.property, id);
        self.slots[index as usize].record = Some(record);
        self.activate(index);
        Handle::new(id)
    }

    /// Apply `mode` to whatever already drives (target, property).
    /// Returns false when the new record must be refused.
    pub fn resolve_conflict(
        &mut self,
        target: TargetId,
        property: &str,
        mode: ConflictMode,
        targets: &mut dyn TargetAccess,
    ) -> bool {
        if !self.registry.has_live(target, property) {
            return true;
        }
        match mode {
            ConflictMode::Parallel => true,
            ConflictMode::Ignore => false,
            ConflictMode::Kill => {
                let ids = self.registry.records(target, property).to_vec();
                log::debug!("conflict: killing {} record(s) on '{}'", ids.len(), property);
                for id in ids {
                    self.kill_record(id);
                }
                true
            }
            ConflictMode::Complete => {
                let ids = self.registry.records(target, property).to_vec();
                log::debug!("conflict: completing {} record(s) on '{}'", ids.len(), property);
                for id in ids {
                    self.force_complete(id, targets);
                }
                true
            }
        }
    }

    // ---- termination ----

    /// Flag, fire on-kill, unregister. Active slots are reclaimed on the next
    /// tick; parked ones right away.
    pub(crate) fn kill_record(&mut self, id: RecordId) -> bool {
        let Some(rec) = self.slot_record_mut(id) else {
            return false;
        };
        if rec.killed {
            return false;
        }
        rec.killed = true;
        rec.emit(id, TweenEventKind::Kill);
        let (target, property) = (rec.target, rec.property.clone());
        self.registry.remove(target, &property, id);
        if !self.is_active_slot(id.index) {
            self.retire(id);
        }
        true
    }

    /// Jump to the final value, write it, fire on-complete. Dynamic starts
    /// are resolved first so the final value is the real one.
    pub(crate) fn force_complete(&mut self, id: RecordId, targets: &mut dyn TargetAccess) -> bool {
        let Some(rec) = self.slot_record_mut(id) else {
            return false;
        };
        if rec.killed || rec.finished {
            return false;
        }
        if rec.has_dynamic() {
            let current = targets.get(rec.target, &rec.property);
            rec.resolve_dynamic(current);
        }
        if let Some(last) = rec.segments.len().checked_sub(1) {
            rec.index = last;
            rec.elapsed = rec.segments[last].duration;
        }
        if let Some(v) = rec.final_value() {
            let v = if rec.snap { v.snap() } else { v };
            targets.set(rec.target, &rec.property, v);
        }
        rec.finished = true;
        rec.emit(id, TweenEventKind::Complete);
        let auto_kill = rec.auto_kill;
        let (target, property) = (rec.target, rec.property.clone());
        self.registry.remove(target, &property, id);
        if !auto_kill {
            self.deactivate(id.index);
        }
        true
    }

    fn live_ids(&self, mut pred: impl FnMut(&Record) -> bool) -> Vec<RecordId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let rec = slot.record.as_ref()?;
                if rec.killed || (rec.finished && rec.auto_kill) || !pred(rec) {
                    return None;
                }
                Some(RecordId {
                    index: i as u32,
                    generation: self.alloc.generation(i as u32),
                })
            })
            .collect()
    }

    fn kill_where(&mut self, pred: impl FnMut(&Record) -> bool) -> usize {
        self.live_ids(pred)
            .into_iter()
            .filter(|id| self.kill_record(*id))
            .count()
    }

    pub fn kill_all(&mut self) -> usize {
        self.kill_where(|_| true)
    }

    pub fn kill_target(&mut self, target: TargetId) -> usize {
        self.kill_where(|r| r.target == target)
    }

    pub fn kill_by_id(&mut self, correlation: &str) -> usize {
        self.kill_where(|r| r.correlation.as_deref() == Some(correlation))
    }

    pub fn kill_by_kind(&mut self, kind: &str) -> usize {
        self.kill_where(|r| r.target_kind.as_deref() == Some(kind))
    }

    // ---- global pause ----

    pub(crate) fn set_paused(&mut self, id: RecordId, paused: bool) -> bool {
        let Some(rec) = self.slot_record_mut(id) else {
            return false;
        };
        if rec.paused != paused {
            rec.paused = paused;
            rec.emit(id, TweenEventKind::PauseToggled(paused));
        }
        true
    }

    pub fn pause_all(&mut self) {
        for id in self.live_ids(|_| true) {
            self.set_paused(id, true);
        }
    }

    pub fn resume_all(&mut self) {
        for id in self.live_ids(|_| true) {
            self.set_paused(id, false);
        }
    }

    pub fn toggle_pause_all(&mut self) {
        for id in self.live_ids(|_| true) {
            let paused = self.slot_record(id).map(|r| r.paused).unwrap_or(false);
            self.set_paused(id, !paused);
        }
    }

    // ---- queries ----

    /// Records still playing (not killed, finished or parked).
    pub fn active_count(&self) -> usize {
        self.active
            .iter()
            .filter_map(|&i| self.slots[i as usize].record.as_ref())
            .filter(|r| !r.killed && !r.finished)
            .count()
    }

    pub fn has_live(&self, target: TargetId, property: &str) -> bool {
        self.registry.has_live(target, property)
    }

    pub fn live_records(&self, target: TargetId, property: &str) -> Vec<Handle> {
        self.registry
            .records(target, property)
            .iter()
            .map(|id| Handle::new(*id))
            .collect()
    }

    pub fn registry(&self) -> &ConflictRegistry {
        &self.registry
    }

    pub fn record(&self, handle: Handle) -> Option<&Record> {
        self.slot_record(handle.id())
    }

    // ---- tick ----

    /// Advance every record by `dt` seconds (scaled by the global time scale)
    /// and flush the resulting writes to `targets`.
    pub fn tick(&mut self, dt: f32, targets: &mut dyn TargetAccess) -> TickStats {
        let dt = dt * self.time_scale;
        let mut stats = TickStats::default();
        self.scratch.begin_frame();

        for pos in 0..self.active.len() {
            let index = self.active[pos];
            let id = RecordId {
                index,
                generation: self.alloc.generation(index),
            };
            let Some(rec) = self.slots[index as usize].record.as_mut() else {
                continue;
            };
            match advance(rec, id, dt, &self.easing, &mut self.writes, targets) {
                Step::Idle => {}
                Step::Advanced => stats.advanced += 1,
                Step::Completed => {
                    stats.advanced += 1;
                    stats.completed += 1;
                    if rec.auto_kill {
                        push_doubling(&mut self.scratch.retire, id);
                    } else {
                        push_doubling(&mut self.scratch.park, id);
                    }
                }
                Step::Retire => push_doubling(&mut self.scratch.retire, id),
            }
        }

        stats.writes = self.writes.flush(targets, self.cfg.coalesce_writes);

        let retire = std::mem::take(&mut self.scratch.retire);
        for id in &retire {
            if self.retire(*id) {
                stats.retired += 1;
            }
        }
        self.scratch.retire = retire;

        let park = std::mem::take(&mut self.scratch.park);
        for id in &park {
            self.park(*id);
        }
        self.scratch.park = park;

        self.ephemeral.tick(dt);

        log::trace!(
            "tick dt={dt}: advanced={} writes={} completed={} retired={}",
            stats.advanced,
            stats.writes,
            stats.completed,
            stats.retired
        );
        stats
    }
}
