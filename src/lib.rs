//! # logsift
//!
//! State store and filter engine for a log viewer. Uploaded log entries are
//! held in a [`FilterStore`] together with the user's filter criteria and
//! search history; the filtered view is computed on demand.
//!
//! ## Core Concepts
//!
//! - **Entries**: already-parsed `{type, content}` lines, replaced per upload
//! - **Filters**: type, level and search predicates evaluated in that order
//! - **History**: the ten most recent distinct searches, persisted
//! - **Subscriptions**: synchronous change notifications with batching
//!
//! ## Example
//!
//! ```
//! use logsift::{FilterStore, FilterUpdate, LogEntry, LogLevel, LogType};
//!
//! let mut store = FilterStore::default();
//! let _sub = store.subscribe(|state| println!("{} entries", state.entries.len()));
//!
//! store.set_entries(
//!     vec![
//!         LogEntry::new("LogNet", "Warning: connection timeout"),
//!         LogEntry::new("LogInit", "Display: engine ready"),
//!     ],
//!     vec![LogType::new("LogNet", 1), LogType::new("LogInit", 1)],
//!     "game.log",
//! );
//!
//! store.update_filters(FilterUpdate::new().levels([LogLevel::Warning]));
//! assert_eq!(store.filtered_entries().len(), 1);
//! ```

pub mod error;
pub mod filter;
pub mod history;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod upload;

// Re-exports
pub use error::{Result, SiftError};
pub use filter::{detect_level, CompiledFilter, SearchMode};
pub use history::{
    FileStorage, KeyValueStore, MemoryStorage, SearchHistory, DEFAULT_HISTORY_LIMIT,
};
pub use store::{FilterStore, NotifyBatch, StorageConfig, StoreConfig, DEFAULT_HISTORY_KEY};
pub use subscriptions::{
    ChannelSubscription, Listener, ListenerId, Subscription, SubscriptionBus,
};
pub use types::*;
pub use upload::{UploadPayload, UploadResponse};
