//! Listener registry with a pause gate.

use crate::types::AppState;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::Arc;

use super::types::{ChannelSubscription, Listener, ListenerId, Subscription};

/// Where a notification is delivered.
#[derive(Clone)]
enum Sink {
    Callback(Listener),
    Channel(Sender<Arc<AppState>>),
}

/// Registered listeners, in registration order.
pub(crate) struct Registry {
    listeners: Vec<(ListenerId, Sink)>,
    next_id: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, sink: Sink) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, sink));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(lid, _)| *lid == id)
    }
}

/// Synchronous, ordered delivery of state-change notifications.
///
/// Listeners run on the notifying thread in registration order. While the
/// bus is paused, [`notify`](Self::notify) does nothing.
pub struct SubscriptionBus {
    registry: Arc<Mutex<Registry>>,
    paused: bool,
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
            paused: false,
        }
    }

    /// Register a callback listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        self.register(Sink::Callback(Arc::new(listener)))
    }

    /// Register a channel listener with room for `buffer_size` snapshots.
    ///
    /// A channel that is full or disconnected at notification time is
    /// unsubscribed for good: it receives nothing further, and
    /// [`Subscription::is_active`] turns false.
    pub fn subscribe_channel(&self, buffer_size: usize) -> ChannelSubscription {
        let (sender, receiver) = bounded(buffer_size);
        ChannelSubscription {
            subscription: self.register(Sink::Channel(sender)),
            receiver,
        }
    }

    fn register(&self, sink: Sink) -> Subscription {
        let id = self.registry.lock().insert(sink);
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Remove a listener by ID.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.registry.lock().remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    /// Stop delivering notifications. Pausing twice is the same as once.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Deliver notifications again. Any resume makes the bus live.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Deliver `state` to every listener, unless paused.
    ///
    /// The listener list is copied before delivery, so listeners may
    /// subscribe or unsubscribe while running; changes apply to the next
    /// notification.
    pub fn notify(&self, state: &AppState) {
        if self.is_paused() {
            return;
        }

        let listeners: Vec<(ListenerId, Sink)> = self.registry.lock().listeners.clone();
        tracing::debug!(listeners = listeners.len(), "notifying state change");

        let mut snapshot: Option<Arc<AppState>> = None;
        let mut to_remove = Vec::new();

        for (id, sink) in &listeners {
            match sink {
                Sink::Callback(listener) => listener(state),
                Sink::Channel(sender) => {
                    let shared = snapshot.get_or_insert_with(|| Arc::new(state.clone()));
                    match sender.try_send(Arc::clone(shared)) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!(listener = id.0, "dropping slow channel subscriber");
                            to_remove.push(*id);
                        }
                        Err(TrySendError::Disconnected(_)) => to_remove.push(*id),
                    }
                }
            }
        }

        if !to_remove.is_empty() {
            let mut registry = self.registry.lock();
            for id in to_remove {
                registry.remove(id);
            }
        }
    }
}

impl Default for SubscriptionBus {
    fn default() -> Self {
        Self::new()
    }
}
