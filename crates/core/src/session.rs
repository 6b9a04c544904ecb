//! Process-wide session expiry signalling
//!
//! When a token refresh fails for good, every in-flight request fails at
//! roughly the same moment. Consumers still want exactly one "please log
//! in again" notification, so the watch debounces: the first failure
//! fires the event, later ones are swallowed until the guard is re-armed
//! by a successful login or refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Events emitted on the session channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Stored credentials are invalid or absent; the user must
    /// re-authenticate.
    Expired { reason: String },
}

/// Shared, debounced session state.
#[derive(Clone)]
pub struct SessionWatch {
    inner: Arc<Inner>,
}

struct Inner {
    expired: AtomicBool,
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionWatch {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                expired: AtomicBool::new(false),
                tx,
            }),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.tx.subscribe()
    }

    /// Signal that the session has expired.
    ///
    /// Only the first call per expiry burst emits an event; returns
    /// whether this call was the one that fired. Sending is infallible
    /// even with no subscribers.
    pub fn notify_expired(&self, reason: impl Into<String>) -> bool {
        if self.inner.expired.swap(true, Ordering::SeqCst) {
            return false;
        }
        let reason = reason.into();
        tracing::warn!(%reason, "session expired");
        let _ = self.inner.tx.send(SessionEvent::Expired { reason });
        true
    }

    /// Whether the session is currently marked expired.
    pub fn is_expired(&self) -> bool {
        self.inner.expired.load(Ordering::SeqCst)
    }

    /// Re-arm the guard after the user re-authenticates.
    pub fn reset(&self) {
        self.inner.expired.store(false, Ordering::SeqCst);
    }
}

impl Default for SessionWatch {
    fn default() -> Self {
        Self::new()
    }
}
