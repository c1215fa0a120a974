//! Identifiers for targets, records and ephemeral slots.

use serde::{Deserialize, Serialize};

use crate::scratch::push_doubling;

/// Opaque handle to an external animated object. Compared by identity only.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u64);

/// Stable reference to a record slot. The generation changes every time the
/// slot is recycled, so stale ids never alias a newer record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    pub index: u32,
    pub generation: u32,
}

/// Stable reference to an ephemeral scheduler slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EphemeralId {
    pub index: u32,
    pub generation: u32,
}

/// Index + generation bookkeeping shared by both schedulers.
///
/// Slots are dense; freed indices are reused before the array grows.
#[derive(Default, Debug)]
pub struct SlotAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl SlotAllocator {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            generations: Vec::with_capacity(cap),
            free: Vec::new(),
        }
    }

    /// Pop a free index or append a new one. Returns (index, generation, is_new).
    #[inline]
    pub fn alloc(&mut self) -> (u32, u32, bool) {
        if let Some(index) = self.free.pop() {
            (index, self.generations[index as usize], false)
        } else {
            let index = self.generations.len() as u32;
            push_doubling(&mut self.generations, 0);
            (index, 0, true)
        }
    }

    /// Bump the generation and return the index to the free list.
    #[inline]
    pub fn release(&mut self, index: u32) {
        if let Some(g) = self.generations.get_mut(index as usize) {
            *g = g.wrapping_add(1);
            self.free.push(index);
        }
    }

    #[inline]
    pub fn generation(&self, index: u32) -> u32 {
        self.generations.get(index as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_current(&self, index: u32, generation: u32) -> bool {
        self.generations
            .get(index as usize)
            .map(|g| *g == generation)
            .unwrap_or(false)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_reuses_released_slots_with_new_generation() {
        let mut alloc = SlotAllocator::default();
        assert_eq!(alloc.alloc(), (0, 0, true));
        assert_eq!(alloc.alloc(), (1, 0, true));
        alloc.release(0);
        assert!(!alloc.is_current(0, 0));
        assert_eq!(alloc.alloc(), (0, 1, false));
        assert!(alloc.is_current(0, 1));
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn unknown_index_is_never_current() {
        let alloc = SlotAllocator::with_capacity(4);
        assert!(!alloc.is_current(3, 0));
        assert!(alloc.is_empty());
    }
}
