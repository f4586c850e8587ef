//! Synchronous, single-threaded event sources with scoped subscriptions.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Handler<E> = Box<dyn FnMut(&E)>;

struct Registry<E> {
    handlers: RefCell<Vec<(u64, Handler<E>)>>,
    // Subscriptions made or dropped while an emit holds `handlers`.
    pending: RefCell<Vec<(u64, Handler<E>)>>,
    retired: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
    live: Cell<usize>,
}

trait Unsubscribe {
    fn unsubscribe(&self, id: u64);
}

impl<E> Unsubscribe for Registry<E> {
    fn unsubscribe(&self, id: u64) {
        self.live.set(self.live.get().saturating_sub(1));
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.retain(|(h, _)| *h != id),
            Err(_) => self.retired.borrow_mut().push(id),
        }
        self.pending.borrow_mut().retain(|(h, _)| *h != id);
    }
}

impl<E> Registry<E> {
    fn flush(&self) {
        let retired = std::mem::take(&mut *self.retired.borrow_mut());
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let mut handlers = self.handlers.borrow_mut();
        handlers.retain(|(id, _)| !retired.contains(id));
        handlers.extend(pending);
    }
}

/// A source of events of type `E`, e.g. the keyboard or one controller hand.
///
/// Handlers run synchronously inside [`EventSource::emit`], in subscription
/// order. A handler is removed when its [`Subscription`] is dropped.
pub struct EventSource<E> {
    registry: Rc<Registry<E>>,
}

impl<E: 'static> EventSource<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                handlers: RefCell::new(Vec::new()),
                pending: RefCell::new(Vec::new()),
                retired: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                live: Cell::new(0),
            }),
        }
    }

    /// Register a handler. It stays registered until the returned
    /// subscription is dropped.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn subscribe(&self, handler: impl FnMut(&E) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.live.set(self.registry.live.get() + 1);

        let entry: (u64, Handler<E>) = (id, Box::new(handler));
        match self.registry.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(entry),
            Err(_) => self.registry.pending.borrow_mut().push(entry),
        }

        let registry: Weak<dyn Unsubscribe> = Rc::downgrade(&self.registry) as Weak<dyn Unsubscribe>;
        Subscription { id, registry }
    }

    /// Deliver `event` to every live handler. Returns how many handlers ran.
    pub fn emit(&self, event: &E) -> usize {
        let Ok(mut handlers) = self.registry.handlers.try_borrow_mut() else {
            tracing::warn!("event emitted from inside one of its own handlers was not delivered");
            return 0;
        };

        let mut delivered = 0;
        for (id, handler) in handlers.iter_mut() {
            if self.registry.retired.borrow().contains(id) {
                continue;
            }
            handler(event);
            delivered += 1;
        }
        drop(handlers);

        self.registry.flush();
        delivered
    }

    /// Number of live subscriptions. Safe to call from inside a handler.
    pub fn subscriber_count(&self) -> usize {
        self.registry.live.get()
    }
}

impl<E: 'static> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a handler registered on an [`EventSource`]. Unsubscribes on drop.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    /// True while the source this subscription belongs to still exists.
    pub fn is_connected(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
