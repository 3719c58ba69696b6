//! The shared task cache every view reads from.
//!
//! One `TaskStore` is created at start-up and cloned into whatever needs it.
//! Requests carry a sequence number and only the most recently issued one may
//! write to the cache, so a slow response can never overwrite a newer one.

mod inflight;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;

use crate::api::{ApiError, MailApi, UpdateOutcome};
use crate::config::{ErrorPolicy, MailSyncConfig};
use crate::core::column::{TaskColumn, aggregate};
use crate::core::convert::{fallback_tasks, transform_all};
use crate::core::insight::Insights;
use crate::core::raw::RawTaskRecord;
use crate::core::stats::TaskStats;
use crate::core::task::Task;
use inflight::Inflight;

const LIST_OP: &str = "allmessages";
const UPDATE_OP: &str = "update_mail";
const INSIGHT_OP: &str = "insight";

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How failures are folded into the cache, per operation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicies {
    /// Listing and update-and-fetch.
    pub list: ErrorPolicy,
    pub search: ErrorPolicy,
}

impl StorePolicies {
    pub fn from_config(config: &MailSyncConfig) -> Self {
        Self {
            list: config.list_error_policy,
            search: config.search_error_policy,
        }
    }
}

impl Default for StorePolicies {
    fn default() -> Self {
        Self::from_config(&MailSyncConfig::default())
    }
}

/// A copy of the cache at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSnapshot {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    /// The active search, `None` when showing the full listing.
    pub query: Option<String>,
    pub insights: Option<Insights>,
}

struct Inner<A> {
    api: A,
    policies: StorePolicies,
    state: Mutex<TaskSnapshot>,
    /// Sequence number of the latest request issued.
    issued: AtomicU64,
    /// Requests up to and including this number are ignored on completion.
    ignored_through: AtomicU64,
    init: OnceCell<()>,
    lists: Inflight<Vec<RawTaskRecord>>,
    updates: Inflight<UpdateOutcome>,
    insight_requests: Inflight<Insights>,
}

pub struct TaskStore<A: MailApi> {
    inner: Arc<Inner<A>>,
}

impl<A: MailApi> Clone for TaskStore<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: MailApi> TaskStore<A> {
    pub fn new(api: A, policies: StorePolicies) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                policies,
                state: Mutex::new(TaskSnapshot::default()),
                issued: AtomicU64::new(0),
                ignored_through: AtomicU64::new(0),
                init: OnceCell::new(),
                lists: Inflight::new(),
                updates: Inflight::new(),
                insight_requests: Inflight::new(),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        lock(&self.inner.state).clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        lock(&self.inner.state).tasks.clone()
    }

    /// Kanban columns for the current list, recomputed on every call.
    pub fn columns(&self) -> Vec<TaskColumn> {
        aggregate(&self.tasks())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> TaskStats {
        TaskStats::from_tasks(&self.tasks(), now)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.init.initialized()
    }

    /// Load the listing once per store. Concurrent and later callers wait for
    /// that first load rather than starting their own.
    pub async fn ensure_loaded(&self) -> TaskSnapshot {
        self.inner
            .init
            .get_or_init(|| async {
                log::info!("Initial task load");
                if let Err(e) = self.fetch_all().await {
                    log::warn!("Initial task load failed: {}", e);
                }
            })
            .await;
        self.snapshot()
    }

    /// Replace the cache with the full listing.
    pub async fn fetch_all(&self) -> Result<(), ApiError> {
        let seq = self.begin(None);
        self.fetch_all_as(seq, true).await
    }

    /// Ask the backend to pull new mail, then show the refreshed list.
    /// Any failure falls back to a plain listing.
    pub async fn update_and_fetch(&self) -> Result<(), ApiError> {
        let seq = self.begin(None);
        let inner = Arc::clone(&self.inner);
        let result = self
            .inner
            .updates
            .run(UPDATE_OP, move || {
                async move { inner.api.update_mail().await }.boxed()
            })
            .await;

        match result {
            Ok(UpdateOutcome::Tasks(records)) => {
                log::info!("Mail update returned {} records", records.len());
                self.commit_tasks(seq, transform_all(&records));
                Ok(())
            }
            // A listing issued before the update cannot contain the mail it pulled.
            Ok(UpdateOutcome::Acknowledged) => self.fetch_all_as(seq, false).await,
            Err(e) => {
                log::warn!("Mail update failed, listing instead: {}", e);
                self.fetch_all_as(seq, true).await
            }
        }
    }

    /// Replace the cache with server-side search results. A blank query clears
    /// the search and reloads the full listing.
    pub async fn search(&self, query: &str) -> Result<(), ApiError> {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Blank search, reloading listing");
            return self.fetch_all().await;
        }

        let seq = self.begin(Some(query.to_string()));
        match self.inner.api.search(query).await {
            Ok(records) => {
                log::info!("Search {:?} returned {} records", query, records.len());
                self.commit_tasks(seq, transform_all(&records));
                Ok(())
            }
            Err(e) => {
                log::warn!("Search {:?} failed: {}", query, e);
                self.commit_error(seq, e, self.inner.policies.search)
            }
        }
    }

    /// Dashboard metrics, fetched once and then served from the cache.
    pub async fn insights(&self) -> Result<Insights, ApiError> {
        let cached = lock(&self.inner.state).insights.clone();
        if let Some(cached) = cached {
            return Ok(cached);
        }
        self.refresh_insights().await
    }

    pub async fn refresh_insights(&self) -> Result<Insights, ApiError> {
        let inner = Arc::clone(&self.inner);
        let insights = self
            .inner
            .insight_requests
            .run(INSIGHT_OP, move || {
                async move { inner.api.insights().await }.boxed()
            })
            .await?;
        lock(&self.inner.state).insights = Some(insights.clone());
        Ok(insights)
    }

    pub fn invalidate_insights(&self) {
        lock(&self.inner.state).insights = None;
    }

    pub fn clear_error(&self) {
        lock(&self.inner.state).error = None;
    }

    /// Stop every outstanding request from writing to the cache, e.g. when the
    /// view that started them goes away.
    pub fn detach(&self) {
        let latest = self.inner.issued.load(Ordering::SeqCst);
        self.inner.ignored_through.fetch_max(latest, Ordering::SeqCst);
        lock(&self.inner.state).loading = false;
        log::debug!("Detached; ignoring requests through #{}", latest);
    }

    /// List under sequence number `seq`. With `join_pending` unset the listing
    /// always goes out fresh instead of sharing one already in flight.
    async fn fetch_all_as(&self, seq: u64, join_pending: bool) -> Result<(), ApiError> {
        if !self.is_current(seq) {
            log::debug!("Request #{} superseded before listing", seq);
            return Ok(());
        }
        let inner = Arc::clone(&self.inner);
        let start = move || async move { inner.api.list_tasks().await }.boxed();
        let result = if join_pending {
            self.inner.lists.run(LIST_OP, start).await
        } else {
            self.inner.lists.restart(LIST_OP, start).await
        };

        match result {
            Ok(records) => {
                log::info!("Fetched {} tasks", records.len());
                self.commit_tasks(seq, transform_all(&records));
                Ok(())
            }
            Err(e) => {
                log::warn!("Error fetching tasks: {}", e);
                self.commit_error(seq, e, self.inner.policies.list)
            }
        }
    }

    fn begin(&self, query: Option<String>) -> u64 {
        let seq = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = lock(&self.inner.state);
        state.loading = true;
        state.query = query;
        seq
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.inner.issued.load(Ordering::SeqCst)
            && seq > self.inner.ignored_through.load(Ordering::SeqCst)
    }

    fn commit_tasks(&self, seq: u64, tasks: Vec<Task>) {
        if !self.is_current(seq) {
            log::debug!("Discarding stale result of request #{}", seq);
            return;
        }
        let mut state = lock(&self.inner.state);
        state.tasks = tasks;
        state.loading = false;
        state.error = None;
    }

    fn commit_error(&self, seq: u64, error: ApiError, policy: ErrorPolicy) -> Result<(), ApiError> {
        if !self.is_current(seq) {
            log::debug!("Discarding stale error of request #{}: {}", seq, error);
            return Ok(());
        }
        let mut state = lock(&self.inner.state);
        state.loading = false;
        state.error = Some(error.to_string());
        match policy {
            ErrorPolicy::UseLastGoodCache => Ok(()),
            ErrorPolicy::UseBuiltInSample => {
                state.tasks = fallback_tasks();
                Ok(())
            }
            ErrorPolicy::Propagate => {
                state.tasks.clear();
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::column::FALLBACK_COLUMN_TITLE;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn record(id: u32, title: &str, category: &str) -> RawTaskRecord {
        RawTaskRecord::from_value(&json!({
            "id": id,
            "title": title,
            "category": category,
            "priority": "High",
            "due_at": "NA",
            "created_at": "2025-06-01T10:00:00Z",
        }))
    }

    /// Scripted backend. Gated operations wait on their `Notify` before answering.
    struct FakeApi {
        list: Mutex<Result<Vec<RawTaskRecord>, ApiError>>,
        list_gate: Option<Arc<Notify>>,
        list_started: Notify,
        list_calls: AtomicUsize,
        update: Mutex<Result<UpdateOutcome, ApiError>>,
        /// Listing the backend serves once an update has pulled new mail.
        pulled_mail: Mutex<Option<Vec<RawTaskRecord>>>,
        update_calls: AtomicUsize,
        search: Mutex<HashMap<String, Result<Vec<RawTaskRecord>, ApiError>>>,
        search_gates: HashMap<String, Arc<Notify>>,
        search_calls: AtomicUsize,
        insights: Mutex<Result<Insights, ApiError>>,
        insight_calls: AtomicUsize,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                list: Mutex::new(Ok(vec![record(7, "Draft report", "Work")])),
                list_gate: None,
                list_started: Notify::new(),
                list_calls: AtomicUsize::new(0),
                update: Mutex::new(Ok(UpdateOutcome::Acknowledged)),
                pulled_mail: Mutex::new(None),
                update_calls: AtomicUsize::new(0),
                search: Mutex::new(HashMap::new()),
                search_gates: HashMap::new(),
                search_calls: AtomicUsize::new(0),
                insights: Mutex::new(Ok(Insights::default())),
                insight_calls: AtomicUsize::new(0),
            }
        }

        fn with_list(self, result: Result<Vec<RawTaskRecord>, ApiError>) -> Self {
            *lock(&self.list) = result;
            self
        }

        fn with_update(self, result: Result<UpdateOutcome, ApiError>) -> Self {
            *lock(&self.update) = result;
            self
        }

        fn with_pulled_mail(self, records: Vec<RawTaskRecord>) -> Self {
            *lock(&self.pulled_mail) = Some(records);
            self
        }

        fn with_search(self, query: &str, result: Result<Vec<RawTaskRecord>, ApiError>) -> Self {
            lock(&self.search).insert(query.to_string(), result);
            self
        }

        fn with_list_gate(mut self, gate: Arc<Notify>) -> Self {
            self.list_gate = Some(gate);
            self
        }

        fn with_search_gate(mut self, query: &str, gate: Arc<Notify>) -> Self {
            self.search_gates.insert(query.to_string(), gate);
            self
        }

        fn with_insights(self, result: Result<Insights, ApiError>) -> Self {
            *lock(&self.insights) = result;
            self
        }
    }

    impl MailApi for FakeApi {
        async fn list_tasks(&self) -> Result<Vec<RawTaskRecord>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.list_started.notify_one();
            let result = lock(&self.list).clone();
            if let Some(gate) = &self.list_gate {
                gate.notified().await;
            }
            result
        }

        async fn update_mail(&self) -> Result<UpdateOutcome, ApiError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(records) = lock(&self.pulled_mail).take() {
                *lock(&self.list) = Ok(records);
            }
            lock(&self.update).clone()
        }

        async fn search(&self, query: &str) -> Result<Vec<RawTaskRecord>, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.search_gates.get(query) {
                gate.notified().await;
            }
            lock(&self.search)
                .get(query)
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn insights(&self) -> Result<Insights, ApiError> {
            self.insight_calls.fetch_add(1, Ordering::SeqCst);
            lock(&self.insights).clone()
        }
    }

    fn store(api: FakeApi) -> TaskStore<FakeApi> {
        TaskStore::new(api, StorePolicies::default())
    }

    fn policies(list: ErrorPolicy, search: ErrorPolicy) -> StorePolicies {
        StorePolicies { list, search }
    }

    #[tokio::test]
    async fn fetch_all_fills_the_cache() {
        let store = store(FakeApi::new());
        store.fetch_all().await.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.tasks[0].id, "7");
        assert_eq!(snap.tasks[0].due_date, None);
        assert!(!snap.loading);
        assert_eq!(snap.error, None);
    }

    #[tokio::test]
    async fn http_500_falls_back_to_sample_task() {
        let store = store(FakeApi::new().with_list(Err(ApiError::Http { status: 500 })));
        assert_eq!(store.fetch_all().await, Ok(()));

        let snap = store.snapshot();
        assert_eq!(snap.tasks, fallback_tasks());
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.error.as_deref(), Some("HTTP error! status: 500"));
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn last_good_cache_policy_keeps_previous_list() {
        let api = FakeApi::new();
        let store = TaskStore::new(
            api,
            policies(ErrorPolicy::UseLastGoodCache, ErrorPolicy::Propagate),
        );
        store.fetch_all().await.unwrap();
        *lock(&store.api().list) = Err(ApiError::Transport("connection reset".into()));

        assert_eq!(store.fetch_all().await, Ok(()));
        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.tasks[0].title, "Draft report");
        assert!(snap.error.is_some());
    }

    #[tokio::test]
    async fn propagate_policy_clears_and_returns_error() {
        let api = FakeApi::new().with_list(Err(ApiError::InvalidFormat("status flag is false".into())));
        let store = TaskStore::new(api, policies(ErrorPolicy::Propagate, ErrorPolicy::Propagate));

        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidFormat(_)));
        let snap = store.snapshot();
        assert!(snap.tasks.is_empty());
        assert!(snap.error.is_some());
    }

    #[tokio::test]
    async fn search_with_no_results_is_not_an_error() {
        let store = store(FakeApi::new().with_search("from:nobody", Ok(Vec::new())));
        store.fetch_all().await.unwrap();

        store.search("from:nobody").await.unwrap();
        let snap = store.snapshot();
        assert!(snap.tasks.is_empty());
        assert_eq!(snap.error, None);
        assert_eq!(snap.query.as_deref(), Some("from:nobody"));
    }

    #[tokio::test]
    async fn search_failure_clears_without_fallback() {
        let store = store(
            FakeApi::new().with_search("priority:High", Err(ApiError::Http { status: 502 })),
        );
        store.fetch_all().await.unwrap();

        let err = store.search("priority:High").await.unwrap_err();
        assert_eq!(err, ApiError::Http { status: 502 });
        let snap = store.snapshot();
        assert!(snap.tasks.is_empty());
        assert_eq!(snap.error.as_deref(), Some("HTTP error! status: 502"));
    }

    #[tokio::test]
    async fn blank_search_reloads_listing() {
        let api = FakeApi::new().with_search("invoice", Ok(vec![record(1, "Invoice", "Finance")]));
        let store = store(api);
        store.search("invoice").await.unwrap();
        assert_eq!(store.tasks()[0].title, "Invoice");

        store.search("   ").await.unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.query, None);
        assert_eq!(snap.tasks[0].title, "Draft report");
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.api().search_calls.load(Ordering::SeqCst), 1);

        let via_fetch = store.snapshot();
        store.fetch_all().await.unwrap();
        assert_eq!(store.snapshot(), via_fetch);
    }

    #[tokio::test]
    async fn update_with_inline_list_skips_listing() {
        let api = FakeApi::new().with_update(Ok(UpdateOutcome::Tasks(vec![
            record(1, "Standup", "Meeting"),
            record(2, "Draft report", "Work"),
        ])));
        let store = store(api);
        store.update_and_fetch().await.unwrap();

        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.api().update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_acknowledgement_then_lists() {
        let store = store(FakeApi::new());
        store.update_and_fetch().await.unwrap();
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.tasks()[0].title, "Draft report");
    }

    #[tokio::test]
    async fn update_failure_cascades_into_listing() {
        let api = FakeApi::new()
            .with_update(Err(ApiError::Http { status: 500 }))
            .with_list(Err(ApiError::Http { status: 500 }));
        let store = store(api);

        assert_eq!(store.update_and_fetch().await, Ok(()));
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 1);
        let snap = store.snapshot();
        assert_eq!(snap.tasks, fallback_tasks());
        assert!(snap.error.is_some());
    }

    #[tokio::test]
    async fn update_lists_again_instead_of_joining_older_listing() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi::new()
            .with_list_gate(gate.clone())
            .with_pulled_mail(vec![record(8, "New invoice", "Finance")]);
        let store = store(api);

        let (listing, update, _) = tokio::join!(store.fetch_all(), store.update_and_fetch(), async {
            store.api().list_started.notified().await;
            tokio::task::yield_now().await;
            gate.notify_waiters();
        });
        assert_eq!(listing, Ok(()));
        assert_eq!(update, Ok(()));
        assert_eq!(store.api().update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 2);

        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.tasks[0].title, "New invoice");
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn initial_load_happens_once() {
        let gate = Arc::new(Notify::new());
        let store = store(FakeApi::new().with_list_gate(gate.clone()));

        let (a, b, _) = tokio::join!(store.ensure_loaded(), store.ensure_loaded(), async {
            store.api().list_started.notified().await;
            tokio::task::yield_now().await;
            gate.notify_one();
        });
        assert_eq!(a.tasks.len(), 1);
        assert_eq!(a, b);
        assert!(store.is_initialized());

        store.ensure_loaded().await;
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_request() {
        let gate = Arc::new(Notify::new());
        let store = store(FakeApi::new().with_list_gate(gate.clone()));

        let (a, b, _) = tokio::join!(store.fetch_all(), store.fetch_all(), async {
            store.api().list_started.notified().await;
            tokio::task::yield_now().await;
            gate.notify_one();
        });
        assert_eq!(a, Ok(()));
        assert_eq!(b, Ok(()));
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn slow_older_search_does_not_overwrite_newer() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi::new()
            .with_search("slow", Ok(vec![record(1, "Slow result", "Work")]))
            .with_search("fast", Ok(vec![record(2, "Fast result", "Work")]))
            .with_search_gate("slow", gate.clone());
        let store = store(api);

        let (slow, _) = tokio::join!(store.search("slow"), async {
            store.search("fast").await.unwrap();
            gate.notify_one();
        });
        assert_eq!(slow, Ok(()));
        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.tasks[0].title, "Fast result");
        assert_eq!(snap.query.as_deref(), Some("fast"));
        assert!(!snap.loading);
    }

    #[tokio::test]
    async fn slow_listing_does_not_overwrite_search() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi::new()
            .with_list_gate(gate.clone())
            .with_search("urgent", Ok(vec![record(3, "Urgent reply", "Work")]));
        let store = store(api);

        let (listing, _) = tokio::join!(store.fetch_all(), async {
            store.api().list_started.notified().await;
            store.search("urgent").await.unwrap();
            gate.notify_one();
        });
        assert_eq!(listing, Ok(()));
        assert_eq!(store.tasks()[0].title, "Urgent reply");
    }

    #[tokio::test]
    async fn detached_requests_are_ignored() {
        let gate = Arc::new(Notify::new());
        let store = store(FakeApi::new().with_list_gate(gate.clone()));

        let (result, _) = tokio::join!(store.fetch_all(), async {
            store.api().list_started.notified().await;
            store.detach();
            gate.notify_one();
        });
        assert_eq!(result, Ok(()));
        let snap = store.snapshot();
        assert!(snap.tasks.is_empty());
        assert!(!snap.loading);

        gate.notify_one();
        store.fetch_all().await.unwrap();
        assert_eq!(store.tasks().len(), 1);
    }

    #[tokio::test]
    async fn insights_are_cached_until_invalidated() {
        let insights = Insights {
            meeting_count: 4,
            ..Insights::default()
        };
        let store = store(FakeApi::new().with_insights(Ok(insights.clone())));

        assert_eq!(store.insights().await, Ok(insights.clone()));
        assert_eq!(store.insights().await, Ok(insights.clone()));
        assert_eq!(store.api().insight_calls.load(Ordering::SeqCst), 1);

        store.invalidate_insights();
        store.insights().await.unwrap();
        assert_eq!(store.api().insight_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn insight_errors_are_returned_and_not_cached() {
        let store = store(FakeApi::new().with_insights(Err(ApiError::MissingCredential)));
        assert_eq!(store.insights().await, Err(ApiError::MissingCredential));
        assert_eq!(store.snapshot().insights, None);
    }

    #[tokio::test]
    async fn columns_follow_the_cache() {
        let api = FakeApi::new().with_list(Ok(vec![
            record(1, "Standup", "Meeting"),
            record(2, "Draft report", "Work"),
            RawTaskRecord::from_value(&json!({"id": 3, "title": "Loose end"})),
        ]));
        let store = store(api);
        assert!(store.columns().is_empty());

        store.fetch_all().await.unwrap();
        let columns = store.columns();
        let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting", "Work", FALLBACK_COLUMN_TITLE]);
        assert_eq!(columns.iter().map(|c| c.count).sum::<usize>(), 3);
        assert_eq!(columns, store.columns());
    }

    #[tokio::test]
    async fn clear_error_keeps_tasks() {
        let store = store(FakeApi::new().with_list(Err(ApiError::Http { status: 500 })));
        store.fetch_all().await.unwrap();
        store.clear_error();
        let snap = store.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.tasks.len(), 1);
    }
}
