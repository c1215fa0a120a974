//! Conflict registry: which live records drive each (target, property).
//!
//! Empty sets are removed eagerly so lookups on idle pairs stay cheap.

use hashbrown::HashMap;

use crate::ids::{RecordId, TargetId};
use crate::record::Property;

#[derive(Debug, Default)]
pub struct ConflictRegistry {
    by_target: HashMap<TargetId, HashMap<Property, Vec<RecordId>>>,
    len: usize,
}

impl ConflictRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: TargetId, property: &Property, id: RecordId) {
        let set = self
            .by_target
            .entry(target)
            .or_default()
            .entry(property.clone())
            .or_default();
        if !set.contains(&id) {
            set.push(id);
            self.len += 1;
        }
    }

    /// Returns true if `id` was present.
    pub fn remove(&mut self, target: TargetId, property: &str, id: RecordId) -> bool {
        let Some(props) = self.by_target.get_mut(&target) else {
            return false;
        };
        let Some(set) = props.get_mut(property) else {
            return false;
        };
        let Some(pos) = set.iter().position(|r| *r == id) else {
            return false;
        };
        set.swap_remove(pos);
        self.len -= 1;
        if set.is_empty() {
            props.remove(property);
            if props.is_empty() {
                self.by_target.remove(&target);
            }
        }
        true
    }

    pub fn has_live(&self, target: TargetId, property: &str) -> bool {
        !self.records(target, property).is_empty()
    }

    pub fn records(&self, target: TargetId, property: &str) -> &[RecordId] {
        self.by_target
            .get(&target)
            .and_then(|props| props.get(property))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of (record, pair) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(index: u32) -> RecordId {
        RecordId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn insert_and_remove_drop_empty_sets() {
        let mut reg = ConflictRegistry::new();
        let x: Property = "x".into();
        reg.insert(TargetId(1), &x, rid(0));
        reg.insert(TargetId(1), &x, rid(1));
        reg.insert(TargetId(1), &x, rid(1));
        assert_eq!(reg.len(), 2);
        assert!(reg.has_live(TargetId(1), "x"));
        assert!(!reg.has_live(TargetId(1), "y"));

        assert!(reg.remove(TargetId(1), "x", rid(0)));
        assert!(!reg.remove(TargetId(1), "x", rid(0)));
        assert!(reg.remove(TargetId(1), "x", rid(1)));
        assert!(reg.is_empty());
        assert!(reg.records(TargetId(1), "x").is_empty());
    }

    #[test]
    fn records_are_kept_per_pair() {
        let mut reg = ConflictRegistry::new();
        reg.insert(TargetId(3), &Property::from("a"), rid(0));
        reg.insert(TargetId(3), &Property::from("b"), rid(1));
        reg.insert(TargetId(4), &Property::from("a"), rid(2));
        assert_eq!(reg.records(TargetId(3), "a"), &[rid(0)]);
        assert_eq!(reg.records(TargetId(3), "b"), &[rid(1)]);
        assert_eq!(reg.records(TargetId(4), "a"), &[rid(2)]);
        assert_eq!(reg.len(), 3);
    }
}
