//! Main FilterStore struct tying all components together.

use crate::error::{Result, SiftError};
use crate::filter::{detect_level, CompiledFilter};
use crate::history::{
    FileStorage, KeyValueStore, MemoryStorage, SearchHistory, DEFAULT_HISTORY_LIMIT,
};
use crate::subscriptions::{ChannelSubscription, Subscription, SubscriptionBus};
use crate::types::{
    AppState, FilterCriteria, FilterUpdate, LevelCounts, LogEntry, LogType, UiState,
};
use crate::upload::UploadPayload;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

/// Default storage key for the search history.
pub const DEFAULT_HISTORY_KEY: &str = "logsift.search_history";

/// Where search history is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StorageConfig {
    /// Keep history in memory only.
    #[default]
    Memory,

    /// One JSON file per key inside this directory.
    Directory(PathBuf),
}

impl StorageConfig {
    /// Per-user data directory, if the platform has one.
    pub fn default_directory() -> Option<Self> {
        dirs::data_dir().map(|p| StorageConfig::Directory(p.join("logsift")))
    }
}

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Storage key for the search history.
    pub history_key: String,

    /// Maximum number of remembered search terms.
    pub history_limit: usize,

    /// Persistence backend.
    pub storage: StorageConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage: StorageConfig::Memory,
        }
    }
}

/// The log viewer's state store.
///
/// Owns the entries of the current upload, the filter criteria and the search
/// history, and notifies subscribers after every change. The filtered view is
/// computed on demand and never cached.
pub struct FilterStore {
    /// Store configuration.
    config: StoreConfig,

    /// Current state.
    state: AppState,

    /// Search history persistence.
    storage: Box<dyn KeyValueStore>,

    /// Change notifications.
    bus: SubscriptionBus,

    /// Number of open [`NotifyBatch`] guards.
    batch_depth: usize,
}

impl FilterStore {
    /// Open a store with the storage backend named in `config`.
    pub fn open(config: StoreConfig) -> Self {
        let storage: Box<dyn KeyValueStore> = match &config.storage {
            StorageConfig::Memory => Box::new(MemoryStorage::new()),
            StorageConfig::Directory(dir) => Box::new(FileStorage::new(dir)),
        };
        Self::with_storage(config, storage)
    }

    /// Open a store over any storage backend. History is loaded immediately.
    pub fn with_storage(config: StoreConfig, storage: impl KeyValueStore + 'static) -> Self {
        let storage: Box<dyn KeyValueStore> = Box::new(storage);
        let search_history =
            SearchHistory::load(storage.as_ref(), &config.history_key, config.history_limit);

        tracing::debug!(
            key = %config.history_key,
            terms = search_history.len(),
            "search history loaded"
        );

        Self {
            config,
            state: AppState {
                search_history,
                ..Default::default()
            },
            storage,
            bus: SubscriptionBus::new(),
            batch_depth: 0,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- State Access ---

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.state.entries
    }

    pub fn log_types(&self) -> &[LogType] {
        &self.state.log_types
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.state.filters
    }

    pub fn current_file(&self) -> Option<&str> {
        self.state.current_file.as_deref()
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.state.search_history
    }

    pub fn ui(&self) -> &UiState {
        &self.state.ui
    }

    // --- Mutations ---

    /// Replace the entries, log types and file name with one notification.
    pub fn set_entries(
        &mut self,
        entries: Vec<LogEntry>,
        log_types: Vec<LogType>,
        filename: impl Into<String>,
    ) {
        self.state.entries = entries;
        self.state.log_types = log_types;
        self.state.current_file = Some(filename.into());
        self.notify();
    }

    /// Store a completed upload and clear the loading flag, as one change.
    pub fn apply_upload(&mut self, filename: impl Into<String>, payload: UploadPayload) {
        let mut batch = self.batch();
        batch.set_entries(payload.entries, payload.log_types, filename);
        batch.set_loading(false, None);
    }

    /// Merge a partial filter update into the current criteria.
    pub fn update_filters(&mut self, update: FilterUpdate) {
        self.state.filters.merge(update);
        self.notify();
    }

    /// Show or hide the loading indicator. Clearing it drops the message.
    pub fn set_loading(&mut self, loading: bool, message: Option<String>) {
        self.state.ui = UiState {
            is_loading: loading,
            loading_message: if loading { message } else { None },
        };
        self.notify();
    }

    /// Remember a search term. Blank terms are ignored.
    pub fn add_search_history(&mut self, term: &str) {
        if !self.state.search_history.push(term) {
            return;
        }
        self.persist_history();
        self.notify();
    }

    pub fn clear_search_history(&mut self) {
        self.state.search_history.clear();
        self.persist_history();
        self.notify();
    }

    fn persist_history(&self) {
        self.state
            .search_history
            .persist(self.storage.as_ref(), &self.config.history_key);
    }

    // --- Filtering ---

    /// Entries that pass the current filters, in upload order.
    pub fn filtered_entries(&self) -> Vec<LogEntry> {
        CompiledFilter::new(&self.state.filters).apply(&self.state.entries)
    }

    /// Level totals over the filtered view. Entries without a level are not
    /// counted.
    pub fn level_counts(&self) -> LevelCounts {
        let filter = CompiledFilter::new(&self.state.filters);
        let mut counts = LevelCounts::default();
        for entry in filter.iter(&self.state.entries) {
            if let Some(level) = detect_level(&entry.content) {
                counts.record(level);
            }
        }
        counts
    }

    /// Filtered entry count for every known log type, in upload order.
    pub fn type_counts(&self) -> Vec<LogType> {
        let filter = CompiledFilter::new(&self.state.filters);
        let mut counts: Vec<LogType> = self
            .state
            .log_types
            .iter()
            .map(|t| LogType::new(t.log_type.clone(), 0))
            .collect();

        for entry in filter.iter(&self.state.entries) {
            if let Some(slot) = counts.iter_mut().find(|t| t.log_type == entry.log_type) {
                slot.count += 1;
            }
        }
        counts
    }

    /// The filtered view as clipboard text, one `"{type} {content}"` line per
    /// entry.
    pub fn copy_text(&self) -> Result<String> {
        let filter = CompiledFilter::new(&self.state.filters);
        let mut text = String::new();
        for entry in filter.iter(&self.state.entries) {
            text.push_str(&entry.log_type);
            text.push(' ');
            text.push_str(&entry.content);
            text.push('\n');
        }

        if text.is_empty() {
            return Err(SiftError::NothingToCopy);
        }
        Ok(text)
    }

    // --- Subscriptions ---

    /// Register a listener called with the state after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        self.bus.subscribe(listener)
    }

    /// Receive state snapshots over a bounded channel.
    ///
    /// The notifier never blocks on a channel. If the buffer is still full
    /// when the next change is announced, the channel is unsubscribed for
    /// good and receives nothing further; check
    /// [`Subscription::is_active`] to detect this. Size the buffer for the
    /// slowest expected reader.
    pub fn subscribe_channel(&self, buffer_size: usize) -> ChannelSubscription {
        self.bus.subscribe_channel(buffer_size)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    /// Suppress notifications until
    /// [`resume_notifications`](Self::resume_notifications). Pausing an
    /// already paused store changes nothing.
    pub fn pause_notifications(&mut self) {
        self.bus.pause();
    }

    /// Un-pause and give every listener one notification with the current
    /// state, however many pauses or mutations came before.
    pub fn resume_notifications(&mut self) {
        self.bus.resume();
        tracing::debug!("notifications resumed");
        self.notify();
    }

    pub fn notifications_paused(&self) -> bool {
        self.bus.is_paused()
    }

    /// Group several mutations into one notification.
    ///
    /// Notifications are paused until the returned guard is dropped. Batches
    /// nest: only the outermost guard resumes and notifies.
    pub fn batch(&mut self) -> NotifyBatch<'_> {
        if self.batch_depth == 0 {
            self.pause_notifications();
        }
        self.batch_depth += 1;
        NotifyBatch { store: self }
    }

    fn notify(&self) {
        self.bus.notify(&self.state);
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::open(StoreConfig::default())
    }
}

/// Scope in which store mutations are not announced.
///
/// Dropping the guard resumes notifications. If the scope is left by a panic
/// the bus is un-paused without notifying.
pub struct NotifyBatch<'a> {
    store: &'a mut FilterStore,
}

impl Deref for NotifyBatch<'_> {
    type Target = FilterStore;

    fn deref(&self) -> &FilterStore {
        self.store
    }
}

impl DerefMut for NotifyBatch<'_> {
    fn deref_mut(&mut self) -> &mut FilterStore {
        self.store
    }
}

impl Drop for NotifyBatch<'_> {
    fn drop(&mut self) {
        self.store.batch_depth -= 1;
        if self.store.batch_depth > 0 {
            return;
        }

        if std::thread::panicking() {
            self.store.bus.resume();
        } else {
            self.store.resume_notifications();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample_store() -> FilterStore {
        let mut store = FilterStore::default();
        store.set_entries(
            vec![
                LogEntry::new("auth", "Error: login failed"),
                LogEntry::new("auth", "Display: login ok"),
                LogEntry::new("net", "Warning: timeout"),
                LogEntry::new("net", "socket opened"),
            ],
            vec![LogType::new("auth", 2), LogType::new("net", 2)],
            "game.log",
        );
        store
    }

    fn count_calls(store: &FilterStore) -> (Arc<AtomicUsize>, Subscription) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let sub = store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (calls, sub)
    }

    #[test]
    fn test_set_entries_notifies_once() {
        let mut store = FilterStore::default();
        let (calls, _sub) = count_calls(&store);

        store.set_entries(vec![LogEntry::new("a", "b")], vec![], "x.log");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.current_file(), Some("x.log"));
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_filtered_entries_idempotent() {
        let store = sample_store();
        assert_eq!(store.filtered_entries(), store.filtered_entries());
    }

    #[test]
    fn test_filtered_entries_tracks_mutations() {
        let mut store = sample_store();
        assert_eq!(store.filtered_entries().len(), 3);

        store.update_filters(FilterUpdate::new().search("login"));
        assert_eq!(store.filtered_entries().len(), 2);

        store.update_filters(FilterUpdate::new().types(["net"]));
        assert!(store.filtered_entries().is_empty());
    }

    #[test]
    fn test_level_counts() {
        let mut store = sample_store();
        let counts = store.level_counts();
        assert_eq!(counts.error, 1);
        assert_eq!(counts.display, 1);
        assert_eq!(counts.warning, 1);

        store.update_filters(FilterUpdate::new().levels([LogLevel::Error]));
        assert_eq!(store.level_counts().total(), 1);
    }

    #[test]
    fn test_type_counts_include_zero_rows() {
        let mut store = sample_store();
        store.update_filters(FilterUpdate::new().types(["auth"]));

        assert_eq!(
            store.type_counts(),
            vec![LogType::new("auth", 2), LogType::new("net", 0)]
        );
    }

    #[test]
    fn test_copy_text() {
        let mut store = sample_store();
        store.update_filters(FilterUpdate::new().types(["net"]));
        assert_eq!(store.copy_text().unwrap(), "net Warning: timeout\n");

        store.update_filters(FilterUpdate::new().search("nothing matches"));
        assert!(matches!(store.copy_text(), Err(SiftError::NothingToCopy)));
    }

    #[test]
    fn test_loading_flag() {
        let mut store = FilterStore::default();
        store.set_loading(true, Some("Uploading file...".to_string()));
        assert!(store.ui().is_loading);
        assert_eq!(store.ui().loading_message.as_deref(), Some("Uploading file..."));

        store.set_loading(false, Some("ignored".to_string()));
        assert_eq!(*store.ui(), UiState::default());
    }

    #[test]
    fn test_apply_upload_is_one_change() {
        let mut store = FilterStore::default();
        store.set_loading(true, None);

        let states = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&states);
        let _sub = store.subscribe(move |state: &AppState| seen.lock().push(state.clone()));

        store.apply_upload(
            "game.log",
            UploadPayload {
                entries: vec![LogEntry::new("LogNet", "Warning: lag")],
                log_types: vec![LogType::new("LogNet", 1)],
            },
        );

        let states = states.lock();
        assert_eq!(states.len(), 1);
        assert!(!states[0].ui.is_loading);
        assert_eq!(states[0].entries.len(), 1);
        assert_eq!(states[0].current_file.as_deref(), Some("game.log"));
    }

    #[test]
    fn test_pause_resume_batches() {
        let mut store = sample_store();
        let states = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&states);
        let _sub = store.subscribe(move |state: &AppState| {
            seen.lock().push(state.filters.clone());
        });

        store.pause_notifications();
        store.update_filters(FilterUpdate::new().search("a"));
        store.update_filters(FilterUpdate::new().search("b"));
        store.update_filters(FilterUpdate::new().case_sensitive(true));
        assert!(states.lock().is_empty());
        store.resume_notifications();

        let states = states.lock();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].search, "b");
        assert!(states[0].case_sensitive);
    }

    #[test]
    fn test_single_resume_ends_repeated_pauses() {
        let mut store = sample_store();
        let (calls, _sub) = count_calls(&store);

        store.pause_notifications();
        store.pause_notifications();
        store.update_filters(FilterUpdate::new().search("login"));
        store.resume_notifications();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.notifications_paused());

        store.update_filters(FilterUpdate::new().search("timeout"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resume_without_pause_notifies() {
        let mut store = sample_store();
        let (calls, _sub) = count_calls(&store);

        store.resume_notifications();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_batches_flush_once() {
        let mut store = sample_store();
        let (calls, _sub) = count_calls(&store);

        {
            let mut outer = store.batch();
            outer.update_filters(FilterUpdate::new().search("x"));
            {
                let mut inner = outer.batch();
                inner.update_filters(FilterUpdate::new().search("y"));
            }
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert!(outer.notifications_paused());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!store.notifications_paused());
    }

    #[test]
    fn test_batch_unpauses_after_panic() {
        let mut store = sample_store();
        let (calls, _sub) = count_calls(&store);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut batch = store.batch();
            batch.update_filters(FilterUpdate::new().search("x"));
            panic!("mutation failed");
        }));
        assert!(result.is_err());

        assert!(!store.notifications_paused());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.update_filters(FilterUpdate::new().search("y"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_history_add_and_clear_notify() {
        let mut store = FilterStore::default();
        let (calls, _sub) = count_calls(&store);

        store.add_search_history("  ");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.add_search_history("timeout");
        store.clear_search_history();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(store.search_history().is_empty());
    }

    #[test]
    fn test_full_channel_is_unsubscribed() {
        let mut store = sample_store();
        let handle = store.subscribe_channel(1);

        store.update_filters(FilterUpdate::new().search("a"));
        assert!(handle.subscription.is_active());

        store.update_filters(FilterUpdate::new().search("b"));
        assert!(!handle.subscription.is_active());
        assert_eq!(store.listener_count(), 0);

        let first = handle.try_recv().unwrap();
        assert_eq!(first.filters.search, "a");
        assert!(handle.try_recv().is_err());
    }

    #[test]
    fn test_history_persists_to_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = FilterStore::with_storage(StoreConfig::default(), Arc::clone(&storage));
        store.add_search_history("error");

        let reopened = FilterStore::with_storage(StoreConfig::default(), Arc::clone(&storage));
        assert_eq!(reopened.search_history().terms(), ["error"]);
    }
}
