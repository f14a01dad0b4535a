//! Input events and listener registration.
//!
//! Mouse, touch and resize input are normalized into [`InputEvent`] values.
//! Components subscribe to a [`Dispatcher`]; the returned [`Subscription`]
//! unregisters the listener when dropped, whatever the exit path.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::types::{ClientRect, Point};

/// A normalized input event. Positions are client coordinates (CSS pixels).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed over the element.
    PointerDown(Point),
    /// Mouse moved over the element.
    PointerMove(Point),
    /// Mouse button released over the element.
    PointerUp(Point),
    /// Mouse left the element.
    PointerLeave,
    /// Finger contact. Holds every active touch point, first one first.
    TouchStart(Vec<Point>),
    TouchMove(Vec<Point>),
    TouchEnd,
    /// The element's footprint or the device pixel ratio changed.
    Resize { rect: ClientRect, dpr: f32 },
}

impl InputEvent {
    /// Position that drives the pen. Touch events use the first touch only.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown(p) | Self::PointerMove(p) | Self::PointerUp(p) => Some(*p),
            Self::TouchStart(touches) | Self::TouchMove(touches) => touches.first().copied(),
            _ => None,
        }
    }
}

/// Something that reacts to input events.
pub trait Listener {
    fn on_event(&mut self, event: &InputEvent);
}

type ListenerRef = Weak<RefCell<dyn Listener>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, ListenerRef)>,
}

/// Fans events out to every registered listener, in registration order.
#[derive(Default, Clone)]
pub struct Dispatcher {
    registry: Rc<RefCell<Registry>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. The dispatcher only keeps a weak reference; the
    /// registration lives as long as the returned guard.
    #[must_use = "dropping the Subscription unregisters the listener"]
    pub fn subscribe(&self, listener: ListenerRef) -> Subscription {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.listeners.push((id, listener));
        log::trace!("listener {id} subscribed");
        Subscription { id, registry: Rc::downgrade(&self.registry) }
    }

    /// Deliver `event`; returns how many listeners received it.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        // Snapshot first so listeners may subscribe/unsubscribe while handling.
        let live: Vec<Rc<RefCell<dyn Listener>>> = {
            let mut reg = self.registry.borrow_mut();
            reg.listeners.retain(|(_, l)| l.strong_count() > 0);
            reg.listeners.iter().filter_map(|(_, l)| l.upgrade()).collect()
        };

        let mut delivered = 0;
        for listener in live {
            match listener.try_borrow_mut() {
                Ok(mut l) => {
                    l.on_event(event);
                    delivered += 1;
                }
                Err(_) => log::debug!("listener busy, dropped {event:?}"),
            }
        }
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Registration guard returned by [`Dispatcher::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut reg) = registry.try_borrow_mut() {
                reg.listeners.retain(|(id, _)| *id != self.id);
                log::trace!("listener {} unsubscribed", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<InputEvent>,
    }

    impl Listener for Recorder {
        fn on_event(&mut self, event: &InputEvent) {
            self.seen.push(event.clone());
        }
    }

    fn recorder() -> (Rc<RefCell<Recorder>>, ListenerRef) {
        let rc = Rc::new(RefCell::new(Recorder::default()));
        let dyn_rc: Rc<RefCell<dyn Listener>> = rc.clone();
        let weak = Rc::downgrade(&dyn_rc);
        (rc, weak)
    }

    #[test]
    fn touch_uses_first_point_only() {
        let ev = InputEvent::TouchMove(vec![Point::new(1.0, 2.0), Point::new(9.0, 9.0)]);
        assert_eq!(ev.position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(InputEvent::TouchStart(vec![]).position(), None);
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }

    #[test]
    fn subscription_guard_unregisters_on_drop() {
        let dispatcher = Dispatcher::new();
        let (rec, weak) = recorder();

        let sub = dispatcher.subscribe(weak);
        assert_eq!(dispatcher.listener_count(), 1);
        assert_eq!(dispatcher.dispatch(&InputEvent::PointerLeave), 1);

        drop(sub);
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.dispatch(&InputEvent::TouchEnd), 0);
        assert_eq!(rec.borrow().seen, vec![InputEvent::PointerLeave]);
    }

    #[test]
    fn dropped_listener_is_pruned() {
        let dispatcher = Dispatcher::new();
        let (rec, weak) = recorder();
        let _sub = dispatcher.subscribe(weak);

        drop(rec);
        assert_eq!(dispatcher.dispatch(&InputEvent::PointerLeave), 0);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn guard_outliving_dispatcher_is_harmless() {
        let (_rec, weak) = recorder();
        let sub = {
            let dispatcher = Dispatcher::new();
            dispatcher.subscribe(weak)
        };
        drop(sub);
    }
}
