use std::sync::{Arc, Mutex, PoisonError};

use crate::core::time::DateTime;

/// Notified after a switch command has been confirmed by the device.
pub trait ControlStateChangedListener: Send + Sync {
    fn control_state_changed(&self, now: DateTime, switch_on: bool);
}

impl<F> ControlStateChangedListener for F
where
    F: Fn(DateTime, bool) + Send + Sync,
{
    fn control_state_changed(&self, now: DateTime, switch_on: bool) {
        self(now, switch_on)
    }
}

/// Listeners in registration order.
///
/// Notification iterates over a copy taken under the lock, so listeners may register or
/// unregister (themselves included) while being notified. Such changes only affect later
/// notifications.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<Arc<dyn ControlStateChangedListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Arc<dyn ControlStateChangedListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    //removes the first registration of exactly this listener instance
    pub fn remove(&self, listener: &Arc<dyn ControlStateChangedListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)))
        {
            listeners.remove(pos);
        }
    }

    fn len(&self) -> usize {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn notify(&self, now: DateTime, switch_on: bool) {
        let snapshot: Vec<_> = self.listeners.lock().unwrap_or_else(PoisonError::into_inner).clone();

        for listener in snapshot {
            listener.control_state_changed(now, switch_on);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry").field("listeners", &self.len()).finish()
    }
}
