//! Subscription handles.

use crate::types::AppState;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::bus::Registry;

/// Unique identifier for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked with a snapshot of the state after each change.
pub type Listener = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Capability to remove one listener from the bus.
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe). Calling it more than once is harmless.
#[derive(Clone)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    pub(crate) id: ListenerId,
    pub(crate) registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Remove the listener. Returns true if this call removed it.
    ///
    /// Safe to call from inside the listener itself: the running
    /// notification still completes, later ones skip the listener.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.lock().remove(self.id),
            None => false,
        }
    }

    /// Check if the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.lock().contains(self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Channel-backed subscription receiving state snapshots.
pub struct ChannelSubscription {
    pub subscription: Subscription,
    /// Channel to receive snapshots.
    pub receiver: crossbeam_channel::Receiver<Arc<AppState>>,
}

impl ChannelSubscription {
    /// Receive the next snapshot (blocking).
    pub fn recv(&self) -> Result<Arc<AppState>, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a snapshot (non-blocking).
    pub fn try_recv(&self) -> Result<Arc<AppState>, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<Arc<AppState>, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    pub fn unsubscribe(&self) -> bool {
        self.subscription.unsubscribe()
    }
}
