//! Per-tick scratch buffers.
//!
//! Reused across ticks so the hot loop does not allocate once capacity has
//! settled. Growth doubles.

use crate::config::Config;
use crate::ids::RecordId;

#[derive(Debug, Default)]
pub struct Scratch {
    /// Records to retire (slot reclaimed) after the flush.
    pub retire: Vec<RecordId>,
    /// Records to park (auto-kill off) after the flush.
    pub park: Vec<RecordId>,
}

#[inline]
pub(crate) fn push_doubling<T>(v: &mut Vec<T>, item: T) {
    if v.len() == v.capacity() {
        let extra = v.len().max(4);
        v.reserve(extra);
    }
    v.push(item);
}

impl Scratch {
    pub fn new(cfg: &Config) -> Self {
        let cap = (cfg.initial_records / 4).max(4);
        Self {
            retire: Vec::with_capacity(cap),
            park: Vec::with_capacity(cap),
        }
    }

    #[inline]
    pub fn begin_frame(&mut self) {
        self.retire.clear();
        self.park.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_doubling_grows_geometrically() {
        let mut v: Vec<u8> = Vec::with_capacity(4);
        for i in 0..5 {
            push_doubling(&mut v, i);
        }
        assert!(v.capacity() >= 8);
        assert_eq!(v.len(), 5);
    }
}
