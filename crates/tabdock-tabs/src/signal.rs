//! Typed observer lists
//!
//! Subscriptions are owned by the subscriber through a [`Connection`]
//! guard; dropping the guard disconnects the slot.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Slot<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T> {
    next_id: u64,
    slots: Vec<(u64, Slot<T>)>,
}

pub struct Signal<T> {
    inner: Arc<Mutex<Slots<T>>>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Slots {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    #[must_use = "dropping the connection disconnects the slot"]
    pub fn connect<F>(&self, slot: F) -> Connection
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.slots.push((id, Arc::new(slot)));

        let weak: Weak<Mutex<Slots<T>>> = Arc::downgrade(&self.inner);
        Connection {
            disconnect: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().slots.retain(|(slot_id, _)| *slot_id != id);
                }
            })),
        }
    }

    /// Call every connected slot in connection order.
    ///
    /// Slots run without the lock held, so a slot may connect or disconnect.
    pub fn emit(&self, value: &T) {
        let slots: Vec<Slot<T>> = self
            .inner
            .lock()
            .slots
            .iter()
            .map(|(_, slot)| Arc::clone(slot))
            .collect();

        for slot in slots {
            slot(value);
        }
    }

    pub fn slot_count(&self) -> usize {
        self.inner.lock().slots.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Connection {
    disconnect: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Connection {
    pub fn disconnect(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }

    /// Keep the slot connected for as long as the signal lives.
    pub fn forget(mut self) {
        self.disconnect = None;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}
