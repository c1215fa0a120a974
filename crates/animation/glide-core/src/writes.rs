//! Pending property writes.
//!
//! The tick loop never touches targets directly. Each advanced record pushes
//! one `PendingWrite`; the batch is flushed once after every record has been
//! advanced. With coalescing on, several writes to the same (target,
//! property) in one tick collapse to the last one in batch order.

use hashbrown::HashMap;

use crate::ids::{RecordId, TargetId};
use crate::record::Property;
use crate::scratch::push_doubling;
use crate::target::TargetAccess;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq)]
pub struct PendingWrite {
    pub record: RecordId,
    pub target: TargetId,
    pub property: Property,
    pub value: Value,
}

#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<PendingWrite>,
    last: HashMap<(TargetId, Property), usize>,
}

impl WriteBatch {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            writes: Vec::with_capacity(cap),
            last: HashMap::with_capacity(cap),
        }
    }

    #[inline]
    pub fn push(&mut self, write: PendingWrite) {
        push_doubling(&mut self.writes, write);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.writes.iter()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.writes.clear();
        self.last.clear();
    }

    /// Apply every pending write to `targets` and empty the batch.
    /// Returns the number of `set` calls made.
    pub fn flush(&mut self, targets: &mut dyn TargetAccess, coalesce: bool) -> usize {
        if coalesce {
            self.last.clear();
            for (i, w) in self.writes.iter().enumerate() {
                self.last.insert((w.target, w.property.clone()), i);
            }
        }
        let mut applied = 0;
        for (i, w) in self.writes.drain(..).enumerate() {
            if coalesce && self.last.get(&(w.target, w.property.clone())) != Some(&i) {
                continue;
            }
            targets.set(w.target, &w.property, w.value);
            applied += 1;
        }
        self.last.clear();
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log(Vec<(TargetId, String, Value)>);

    impl TargetAccess for Log {
        fn get(&self, _: TargetId, _: &str) -> Option<Value> {
            None
        }
        fn set(&mut self, target: TargetId, property: &str, value: Value) {
            self.0.push((target, property.to_string(), value));
        }
        fn is_valid(&self, _: TargetId) -> bool {
            true
        }
    }

    fn write(index: u32, target: u64, prop: &str, v: f32) -> PendingWrite {
        PendingWrite {
            record: RecordId {
                index,
                generation: 0,
            },
            target: TargetId(target),
            property: prop.into(),
            value: Value::Float(v),
        }
    }

    #[test]
    fn coalescing_keeps_last_write_per_key() {
        let mut batch = WriteBatch::with_capacity(1);
        batch.push(write(0, 1, "x", 1.0));
        batch.push(write(1, 1, "x", 2.0));
        batch.push(write(2, 1, "y", 3.0));
        let mut log = Log::default();
        assert_eq!(batch.flush(&mut log, true), 2);
        assert_eq!(
            log.0,
            vec![
                (TargetId(1), "x".to_string(), Value::Float(2.0)),
                (TargetId(1), "y".to_string(), Value::Float(3.0)),
            ]
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn without_coalescing_every_write_lands_in_order() {
        let mut batch = WriteBatch::default();
        batch.push(write(0, 1, "x", 1.0));
        batch.push(write(1, 1, "x", 2.0));
        let mut log = Log::default();
        assert_eq!(batch.flush(&mut log, false), 2);
        assert_eq!(log.0.last().map(|e| e.2), Some(Value::Float(2.0)));
    }
}
