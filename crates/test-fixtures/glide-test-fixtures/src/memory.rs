//! In-memory host for driving a `Tweener` in tests and benches.

use glide_core::{TargetAccess, TargetId, Value};
use hashbrown::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct MemoryTargets {
    values: HashMap<(TargetId, String), Value>,
    live: HashSet<TargetId>,
    kinds: HashMap<TargetId, String>,
    log: Vec<(TargetId, String, Value)>,
}

impl MemoryTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_target(&mut self, target: TargetId) {
        self.live.insert(target);
    }

    /// Simulate the host object being destroyed.
    pub fn remove_target(&mut self, target: TargetId) {
        self.live.remove(&target);
    }

    pub fn set_kind(&mut self, target: TargetId, kind: &str) {
        self.kinds.insert(target, kind.to_string());
    }

    pub fn kind(&self, target: TargetId) -> Option<&str> {
        self.kinds.get(&target).map(String::as_str)
    }

    /// Seed a property without recording a write.
    pub fn insert(&mut self, target: TargetId, property: &str, value: Value) {
        self.live.insert(target);
        self.values.insert((target, property.to_string()), value);
    }

    pub fn value(&self, target: TargetId, property: &str) -> Option<Value> {
        self.values.get(&(target, property.to_string())).copied()
    }

    pub fn float(&self, target: TargetId, property: &str) -> Option<f32> {
        match self.value(target, property)? {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    /// Every `set` in call order.
    pub fn writes(&self) -> &[(TargetId, String, Value)] {
        &self.log
    }

    /// Values written to one property, in order.
    pub fn history(&self, target: TargetId, property: &str) -> Vec<Value> {
        self.log
            .iter()
            .filter(|(t, p, _)| *t == target && p == property)
            .map(|(_, _, v)| *v)
            .collect()
    }

    pub fn clear_writes(&mut self) {
        self.log.clear();
    }
}

impl TargetAccess for MemoryTargets {
    fn get(&self, target: TargetId, property: &str) -> Option<Value> {
        self.value(target, property)
    }

    fn set(&mut self, target: TargetId, property: &str, value: Value) {
        self.values.insert((target, property.to_string()), value);
        self.log.push((target, property.to_string(), value));
    }

    fn is_valid(&self, target: TargetId) -> bool {
        self.live.contains(&target)
    }
}
