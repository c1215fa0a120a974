//! Lifecycle callbacks.
//!
//! Each slot is `None`, an owned closure, or a shared handler object. The
//! handler form lets one object serve many records without a closure per
//! record.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::ids::{RecordId, TargetId};
use crate::value::Value;

/// What happened to a record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenEventKind<'a> {
    Start,
    Update(&'a Value),
    Complete,
    Kill,
    PauseToggled(bool),
}

/// Event delivered to callbacks.
#[derive(Clone, Copy, Debug)]
pub struct TweenEvent<'a> {
    pub record: RecordId,
    pub target: TargetId,
    pub property: &'a str,
    pub kind: TweenEventKind<'a>,
}

/// Shared callback object. Implementors receive every event routed to them.
pub trait TweenHandler: Send {
    fn handle(&mut self, event: &TweenEvent<'_>);
}

pub type SharedHandler = Arc<Mutex<dyn TweenHandler>>;

pub type CallbackFn = Box<dyn FnMut(&TweenEvent<'_>) + Send>;

#[derive(Default)]
pub enum Callback {
    #[default]
    None,
    Closure(CallbackFn),
    Handler(SharedHandler),
}

impl Callback {
    pub fn closure(f: impl FnMut(&TweenEvent<'_>) + Send + 'static) -> Self {
        Callback::Closure(Box::new(f))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Callback::None)
    }

    #[inline]
    pub fn invoke(&mut self, event: &TweenEvent<'_>) {
        match self {
            Callback::None => {}
            Callback::Closure(f) => f(event),
            Callback::Handler(h) => {
                // A poisoned handler still receives events.
                let mut guard = match h.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.handle(event);
            }
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::None => f.write_str("None"),
            Callback::Closure(_) => f.write_str("Closure(..)"),
            Callback::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

/// All callback slots of a record.
#[derive(Debug, Default)]
pub struct Callbacks {
    pub on_start: Callback,
    pub on_update: Callback,
    pub on_complete: Callback,
    pub on_kill: Callback,
    pub on_pause: Callback,
}

impl Callbacks {
    /// Route every slot to one shared handler.
    pub fn handler(handler: SharedHandler) -> Self {
        Self {
            on_start: Callback::Handler(handler.clone()),
            on_update: Callback::Handler(handler.clone()),
            on_complete: Callback::Handler(handler.clone()),
            on_kill: Callback::Handler(handler.clone()),
            on_pause: Callback::Handler(handler),
        }
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, kind: &TweenEventKind<'_>) -> &mut Callback {
        match kind {
            TweenEventKind::Start => &mut self.on_start,
            TweenEventKind::Update(_) => &mut self.on_update,
            TweenEventKind::Complete => &mut self.on_complete,
            TweenEventKind::Kill => &mut self.on_kill,
            TweenEventKind::PauseToggled(_) => &mut self.on_pause,
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(Vec<String>);

    impl TweenHandler for Counter {
        fn handle(&mut self, event: &TweenEvent<'_>) {
            self.0.push(format!("{:?}", event.kind));
        }
    }

    fn event(kind: TweenEventKind<'_>) -> TweenEvent<'_> {
        TweenEvent {
            record: RecordId {
                index: 0,
                generation: 0,
            },
            target: TargetId(1),
            property: "x",
            kind,
        }
    }

    #[test]
    fn closure_slot_runs() {
        let hits = Arc::new(Mutex::new(0));
        let h = hits.clone();
        let mut cb = Callback::closure(move |_| *h.lock().unwrap() += 1);
        cb.invoke(&event(TweenEventKind::Start));
        cb.invoke(&event(TweenEventKind::Complete));
        assert_eq!(*hits.lock().unwrap(), 2);
    }

    #[test]
    fn handler_receives_routed_events() {
        let handler = Arc::new(Mutex::new(Counter(Vec::new())));
        let shared: SharedHandler = handler.clone();
        let mut cbs = Callbacks::handler(shared);
        let v = Value::Float(1.0);
        let e = event(TweenEventKind::Update(&v));
        cbs.slot_mut(&e.kind).invoke(&e);
        let e = event(TweenEventKind::PauseToggled(true));
        cbs.slot_mut(&e.kind).invoke(&e);
        assert_eq!(
            handler.lock().unwrap().0,
            vec!["Update(Float(1.0))".to_string(), "PauseToggled(true)".to_string()]
        );
    }

    #[test]
    fn none_slot_is_silent() {
        let mut cb = Callback::None;
        assert!(cb.is_none());
        cb.invoke(&event(TweenEventKind::Kill));
    }
}
