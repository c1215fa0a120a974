//! Boundary to the objects being animated.
//!
//! The engine never interprets property semantics; it only reads and writes
//! `Value`s by (target, property) and asks whether a target is still alive.
//! Hosts implement this trait and pass it to `Tweener::tick`.

use crate::ids::TargetId;
use crate::value::Value;

pub trait TargetAccess {
    /// Current value of a property, `None` if the target does not expose it.
    fn get(&self, target: TargetId, property: &str) -> Option<Value>;

    fn set(&mut self, target: TargetId, property: &str, value: Value);

    /// Records on invalid targets are retired silently on the next tick.
    fn is_valid(&self, target: TargetId) -> bool;
}
