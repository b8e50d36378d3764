// src/services/store.rs

//! Generic section store.
//!
//! One `SectionStore` replaces the per-page stores: it fetches a single
//! content endpoint, coerces the payload against a `FieldSchema` and keeps
//! loading/error state for the page that owns it.
//!
//! ## Fetch lifecycle
//!
//! ```text
//! fetch_all_data(scope)
//!   ├─ is_loading = true, error = None
//!   ├─ GET endpoint ──┬─ Ok(json)  → data = schema.coerce(json)
//!   │                 ├─ Err(e)    → error = e.to_string(), data kept
//!   │                 └─ scope cancelled → request dropped, result discarded
//!   └─ is_loading = false (once no other call is in flight)
//! ```
//!
//! Overlapping calls are not deduplicated; the last one to resolve wins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::models::{FieldSchema, ListItem, unique_items};
use crate::utils::http::ContentSource;

/// Cancellation token tied to the lifetime of a view.
///
/// Clones share the same flag. Once cancelled, a scope stays cancelled.
#[derive(Debug, Clone)]
pub struct ViewScope {
    cancelled: Arc<watch::Sender<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            cancelled: Arc::new(tx),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.subscribe();
        // The sender lives as long as `self`, so this cannot fail early.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Section payload after schema coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectionData {
    fields: Map<String, Value>,
}

impl SectionData {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Array field, empty when absent.
    pub fn list(&self, name: &str) -> &[Value] {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Object field, if present.
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.fields.get(name).and_then(Value::as_object)
    }

    /// String field, empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or("")
    }

    /// Array field normalized into list items, first occurrence per key.
    pub fn items(&self, name: &str) -> Vec<ListItem> {
        unique_items(self.list(name))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// True when every field holds an empty array, object or string.
    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|value| match value {
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Null => true,
            _ => false,
        })
    }
}

/// Snapshot of a store's state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionState {
    pub data: SectionData,
    pub is_loading: bool,
    pub error: Option<String>,
    /// When data was last applied; `None` until the first successful fetch
    pub loaded_at: Option<DateTime<Utc>>,
}

/// What a page shows. Exactly one of these, never a mix.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Error(String),
    Empty,
    Ready(SectionData),
}

impl From<&SectionState> for PageView {
    fn from(state: &SectionState) -> Self {
        if state.is_loading {
            return PageView::Loading;
        }
        if let Some(error) = &state.error {
            return PageView::Error(error.clone());
        }
        match state.loaded_at {
            None => PageView::Loading,
            Some(_) if state.data.is_empty() => PageView::Empty,
            Some(_) => PageView::Ready(state.data.clone()),
        }
    }
}

/// Result of a single `fetch_all_data` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Payload was coerced and stored
    Applied,
    /// Fetch failed; the message was recorded as the store error
    Failed(String),
    /// Scope was cancelled before the response; nothing was stored
    Discarded,
}

/// State container for one content section.
pub struct SectionStore {
    endpoint: String,
    schema: FieldSchema,
    source: Arc<dyn ContentSource>,
    state: RwLock<SectionState>,
    in_flight: AtomicUsize,
}

impl SectionStore {
    /// Create a store for `endpoint` whose payload follows `schema`.
    ///
    /// Every schema field starts at its default, so a page can read the
    /// store before the first fetch completes.
    pub fn new(
        endpoint: impl Into<String>,
        schema: FieldSchema,
        source: Arc<dyn ContentSource>,
    ) -> Self {
        let state = SectionState {
            data: SectionData::new(schema.defaults()),
            ..SectionState::default()
        };
        Self {
            endpoint: endpoint.into(),
            schema,
            source,
            state: RwLock::new(state),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Current state snapshot.
    pub fn state(&self) -> SectionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn view(&self) -> PageView {
        PageView::from(&self.state())
    }

    /// Fetch the endpoint and update the store.
    pub async fn fetch_all_data(&self, scope: &ViewScope) -> FetchOutcome {
        if scope.is_cancelled() {
            return FetchOutcome::Discarded;
        }

        // The in-flight count only changes under the state lock so the
        // loading flag always agrees with it.
        self.update(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.is_loading = true;
            state.error = None;
        });

        let result = tokio::select! {
            biased;
            () = scope.cancelled() => None,
            result = self.source.fetch_json(&self.endpoint) => Some(result),
        };

        let outcome = match result {
            Some(Ok(payload)) if !scope.is_cancelled() => {
                let data = SectionData::new(self.schema.coerce(&payload));
                self.update(|state| {
                    state.data = data;
                    state.loaded_at = Some(Utc::now());
                });
                FetchOutcome::Applied
            }
            Some(Err(error)) if !scope.is_cancelled() => {
                let message = error.to_string();
                log::warn!("Fetching {} failed: {}", self.endpoint, message);
                self.update(|state| state.error = Some(message.clone()));
                FetchOutcome::Failed(message)
            }
            _ => {
                log::debug!("Discarding response for {}: view closed", self.endpoint);
                FetchOutcome::Discarded
            }
        };

        self.update(|state| {
            state.is_loading = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        });
        outcome
    }

    fn update(&self, f: impl FnOnce(&mut SectionState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::{AppError, Result};
    use crate::models::Section;

    /// Canned response for the fake source.
    pub(crate) enum Reply {
        Json(Value),
        Status(u16),
        Timeout,
        Hang,
    }

    /// In-memory content source replaying queued replies.
    pub(crate) struct FakeSource {
        replies: Mutex<VecDeque<(Duration, Reply)>>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(replies: Vec<Reply>) -> Arc<Self> {
            Self::delayed(replies.into_iter().map(|r| (Duration::ZERO, r)).collect())
        }

        pub(crate) fn delayed(replies: Vec<(Duration, Reply)>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentSource for FakeSource {
        async fn fetch_json(&self, _url: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.replies.lock().unwrap().pop_front();
            let (delay, reply) = next.unwrap_or((Duration::ZERO, Reply::Json(json!({}))));
            tokio::time::sleep(delay).await;
            match reply {
                Reply::Json(value) => Ok(value),
                Reply::Status(code) => Err(AppError::http_status(
                    reqwest::StatusCode::from_u16(code).unwrap(),
                )),
                Reply::Timeout => Err(AppError::Timeout { timeout_ms: 10_000 }),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn store(section: Section, source: Arc<FakeSource>) -> SectionStore {
        SectionStore::new(
            format!("https://cms.example.edu/wp-json/university/v1/{section}"),
            section.schema(),
            source,
        )
    }

    #[test]
    fn test_new_store_starts_with_defaults() {
        let store = store(Section::Alumni, FakeSource::new(vec![]));
        let state = store.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert!(state.data.list("notable_alumni").is_empty());
        assert_eq!(store.view(), PageView::Loading);
    }

    #[tokio::test]
    async fn test_empty_payload_defaults_every_list() {
        let store = store(Section::Home, FakeSource::new(vec![Reply::Json(json!({}))]));

        let outcome = store.fetch_all_data(&ViewScope::new()).await;
        assert_eq!(outcome, FetchOutcome::Applied);

        let state = store.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        for field in store.schema().list_fields() {
            assert_eq!(state.data.get(field), Some(&json!([])), "{field}");
        }
        assert_eq!(store.view(), PageView::Empty);
    }

    #[tokio::test]
    async fn test_malformed_payloads_never_leave_missing_lists() {
        let payloads = vec![
            json!(null),
            json!([]),
            json!("text"),
            json!({ "events": null, "categories": 4 }),
            json!({ "events": { "0": "not a list" } }),
        ];

        for payload in payloads {
            let store = store(
                Section::Events,
                FakeSource::new(vec![Reply::Json(payload.clone())]),
            );
            store.fetch_all_data(&ViewScope::new()).await;
            let state = store.state();
            assert_eq!(state.data.get("events"), Some(&json!([])), "{payload}");
            assert_eq!(state.data.get("categories"), Some(&json!([])), "{payload}");
            assert!(state.error.is_none());
        }
    }

    #[tokio::test]
    async fn test_payload_fields_are_applied() {
        let store = store(
            Section::Admissions,
            FakeSource::new(vec![Reply::Json(json!({
                "scholarships": [{ "title": "Merit Award" }],
                "tuition": { "undergraduate": 12000 },
                "unrelated": true
            }))]),
        );

        store.fetch_all_data(&ViewScope::new()).await;
        let state = store.state();
        assert_eq!(state.data.items("scholarships")[0].title, "Merit Award");
        assert_eq!(state.data.object("tuition").unwrap()["undergraduate"], 12000);
        assert!(state.data.get("unrelated").is_none());
        assert!(state.loaded_at.is_some());
        assert!(matches!(store.view(), PageView::Ready(_)));
    }

    #[tokio::test]
    async fn test_http_error_is_recorded() {
        for code in [400, 404, 500, 503] {
            let store = store(Section::Giving, FakeSource::new(vec![Reply::Status(code)]));
            let outcome = store.fetch_all_data(&ViewScope::new()).await;

            let expected = format!("HTTP error: {code}");
            assert_eq!(outcome, FetchOutcome::Failed(expected.clone()));
            let state = store.state();
            assert!(!state.is_loading);
            assert_eq!(state.error.as_deref(), Some(expected.as_str()));
            assert_eq!(store.view(), PageView::Error(expected));
        }
    }

    #[tokio::test]
    async fn test_error_keeps_previous_data() {
        let store = store(
            Section::Gallery,
            FakeSource::new(vec![
                Reply::Json(json!({ "images": [{ "title": "Quad at dusk" }] })),
                Reply::Timeout,
            ]),
        );
        let scope = ViewScope::new();

        store.fetch_all_data(&scope).await;
        let outcome = store.fetch_all_data(&scope).await;

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        let state = store.state();
        assert_eq!(state.data.list("images").len(), 1);
        assert_eq!(state.error.as_deref(), Some("Request timed out after 10000ms"));
    }

    #[tokio::test]
    async fn test_retry_clears_error() {
        let store = store(
            Section::News,
            FakeSource::new(vec![
                Reply::Status(502),
                Reply::Json(json!({ "articles": [{ "title": "Budget approved" }] })),
            ]),
        );
        let scope = ViewScope::new();

        store.fetch_all_data(&scope).await;
        assert!(matches!(store.view(), PageView::Error(_)));

        store.fetch_all_data(&scope).await;
        assert!(store.state().error.is_none());
        assert!(matches!(store.view(), PageView::Ready(_)));
    }

    #[tokio::test]
    async fn test_every_call_refetches() {
        let source = FakeSource::new(vec![]);
        let store = store(Section::Visit, Arc::clone(&source));
        let scope = ViewScope::new();

        store.fetch_all_data(&scope).await;
        store.fetch_all_data(&scope).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_overlapping_calls_last_to_resolve_wins() {
        let source = FakeSource::delayed(vec![
            (
                Duration::from_millis(80),
                Reply::Json(json!({ "faculty": [{ "name": "Slow" }] })),
            ),
            (
                Duration::from_millis(5),
                Reply::Json(json!({ "faculty": [{ "name": "Fast" }] })),
            ),
        ]);
        let store = store(Section::Faculty, source);
        let scope = ViewScope::new();

        let (first, second) =
            tokio::join!(store.fetch_all_data(&scope), store.fetch_all_data(&scope));
        assert_eq!(first, FetchOutcome::Applied);
        assert_eq!(second, FetchOutcome::Applied);

        let state = store.state();
        assert!(!state.is_loading);
        assert_eq!(state.data.items("faculty")[0].title, "Slow");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_on_worker_threads_clear_loading() {
        for round in 0..50 {
            let replies = (0..16u64)
                .map(|i| {
                    (
                        Duration::from_micros(i % 4 * 50),
                        Reply::Json(json!({ "images": [{ "title": format!("#{i}") }] })),
                    )
                })
                .collect();
            let store = Arc::new(store(Section::Gallery, FakeSource::delayed(replies)));
            let scope = ViewScope::new();

            let handles: Vec<_> = (0..16)
                .map(|_| {
                    let store = Arc::clone(&store);
                    let scope = scope.clone();
                    tokio::spawn(async move { store.fetch_all_data(&scope).await })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.await.unwrap(), FetchOutcome::Applied);
            }

            let state = store.state();
            assert!(!state.is_loading, "round {round} left the store loading");
            assert_eq!(state.data.list("images").len(), 1);
        }
    }

    #[tokio::test]
    async fn test_cancelled_scope_discards_result() {
        let store = store(Section::Events, FakeSource::new(vec![Reply::Hang]));
        let scope = ViewScope::new();

        let (outcome, ()) = tokio::join!(store.fetch_all_data(&scope), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            scope.cancel();
        });

        assert_eq!(outcome, FetchOutcome::Discarded);
        let state = store.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert!(state.loaded_at.is_none());
    }

    #[tokio::test]
    async fn test_already_cancelled_scope_skips_request() {
        let source = FakeSource::new(vec![]);
        let store = store(Section::Research, Arc::clone(&source));
        let scope = ViewScope::new();
        scope.cancel();

        assert_eq!(store.fetch_all_data(&scope).await, FetchOutcome::Discarded);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scope_clones_share_cancellation() {
        let scope = ViewScope::new();
        let clone = scope.clone();
        clone.cancel();
        assert!(scope.is_cancelled());
    }
}
