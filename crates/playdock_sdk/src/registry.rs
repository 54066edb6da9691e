//! Listener registration and ordered dispatch.

use parking_lot::Mutex;
use playdock_protocol::{Event, EventKind};

/// Boxed listener invoked for every event of its registered kind.
pub type Listener = Box<dyn FnMut(&Event) + Send>;

/// Opaque handle identifying one registration.
///
/// Closures have no identity of their own, so registration hands back a
/// token and unregistration takes it. Tokens are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

enum PendingChange {
    Add(Registration),
    Remove(ListenerId),
}

/// Holds listeners per event kind and dispatches events to them in
/// registration order.
///
/// Registration and unregistration may be called from inside a listener
/// (during dispatch). Such calls are buffered and applied at the start of
/// the next pump, so the set of listeners is stable for the whole batch:
/// a listener removed mid-batch still sees the rest of the batch, and a
/// listener added mid-batch sees none of it.
pub struct CallbackRegistry {
    registrations: Mutex<Vec<Registration>>,
    pending: Mutex<Vec<PendingChange>>,
    next_id: Mutex<u64>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Registers a listener for one event kind and returns its token.
    ///
    /// The listener does not receive events until the next pump begins.
    pub fn register(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = {
            let mut next = self.next_id.lock();
            let id = ListenerId(*next);
            *next += 1;
            id
        };
        self.pending
            .lock()
            .push(PendingChange::Add(Registration { id, kind, listener }));
        tracing::debug!(listener = id.0, ?kind, "listener registered");
        id
    }

    /// Removes the listener behind `id`. Unknown or already-removed tokens
    /// are ignored. Takes effect at the next pump.
    pub fn unregister(&self, id: ListenerId) {
        self.pending.lock().push(PendingChange::Remove(id));
    }

    /// Applies buffered registrations and removals. Called once at the
    /// start of each pump, before any event of the batch is dispatched.
    pub fn apply_pending(&self) {
        let changes = std::mem::take(&mut *self.pending.lock());
        if changes.is_empty() {
            return;
        }
        let mut registrations = self.registrations.lock();
        for change in changes {
            match change {
                PendingChange::Add(registration) => registrations.push(registration),
                PendingChange::Remove(id) => {
                    registrations.retain(|r| r.id != id);
                }
            }
        }
    }

    /// Invokes every listener registered for this event's kind, in
    /// registration order.
    ///
    /// The registration table stays locked while listeners run, so a
    /// listener must not call `dispatch` (or anything that does, such as
    /// `Sdk::pump`). Listeners may register and unregister freely; those
    /// calls only touch the pending buffer.
    pub fn dispatch(&self, event: &Event) {
        let kind = event.kind();
        let mut registrations = self.registrations.lock();
        for registration in registrations.iter_mut() {
            if registration.kind == kind {
                (registration.listener)(event);
            }
        }
    }

    /// Drops all listeners and buffered changes. Called at shutdown.
    pub fn clear(&self) {
        self.registrations.lock().clear();
        self.pending.lock().clear();
    }

    /// Number of active (applied) registrations.
    pub fn len(&self) -> usize {
        self.registrations.lock().len()
    }

    /// True if no listeners are active.
    pub fn is_empty(&self) -> bool {
        self.registrations.lock().is_empty()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
