//! Subscription system for state-change notifications.
//!
//! Listeners are either callbacks, run synchronously in registration order,
//! or bounded channels that receive shared snapshots. The bus can be paused
//! so that several mutations reach observers as one notification.
//!
//! # Example
//!
//! ```
//! use logsift::{AppState, SubscriptionBus};
//!
//! let mut bus = SubscriptionBus::new();
//! let sub = bus.subscribe(|state: &AppState| {
//!     println!("{} entries", state.entries.len());
//! });
//!
//! bus.pause();
//! bus.notify(&AppState::default()); // suppressed
//! bus.resume();
//! bus.notify(&AppState::default()); // delivered
//! sub.unsubscribe();
//! ```

mod bus;
mod types;

pub use bus::SubscriptionBus;
pub use types::{ChannelSubscription, Listener, ListenerId, Subscription};
