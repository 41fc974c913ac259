use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::json;
use tokio::sync::Notify;

use super::*;

enum Reply {
    Document(RawDocument),
    Status(u16),
}

struct Gate {
    release: Notify,
    reply: Reply,
}

/// In-memory source whose responses are held until the test releases them.
struct GatedSource {
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl GatedSource {
    fn new(routes: Vec<(&str, Reply)>) -> Arc<Self> {
        let gates = routes
            .into_iter()
            .map(|(key, reply)| {
                (
                    key.to_owned(),
                    Arc::new(Gate {
                        release: Notify::new(),
                        reply,
                    }),
                )
            })
            .collect();
        Arc::new(Self {
            gates: Mutex::new(gates),
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    fn gate(&self, key: &str) -> Arc<Gate> {
        let gates = self.gates.lock().unwrap();
        Arc::clone(gates.get(key).expect("unknown test route"))
    }

    fn release(&self, key: &str) {
        self.gate(key).release.notify_one();
    }

    fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for GatedSource {
    async fn fetch(&self, resource: &ResourceId) -> Result<RawDocument, FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate(resource.as_str());
        gate.release.notified().await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        match &gate.reply {
            Reply::Document(doc) => Ok(doc.clone()),
            Reply::Status(404) => Err(FetchError::NotFound {
                url: resource.to_string(),
            }),
            Reply::Status(status) => Err(FetchError::HttpStatus {
                status: *status,
                url: resource.to_string(),
            }),
        }
    }
}

/// Lets spawned request tasks run up to their next suspension point.
async fn drain() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn two_documents() -> Arc<GatedSource> {
    GatedSource::new(vec![
        ("r1", Reply::Document(json!({ "from": "r1" }))),
        ("r2", Reply::Document(json!({ "from": "r2" }))),
    ])
}

fn loaded_from(snapshot: &Snapshot) -> Option<String> {
    snapshot
        .state
        .data()
        .and_then(|doc| doc["from"].as_str())
        .map(str::to_owned)
}

#[tokio::test]
async fn subscription_without_resource_stays_idle() {
    let source = two_documents();
    let sub = Fetcher::new(Arc::clone(&source)).subscribe(None);
    drain().await;

    let snap = sub.snapshot();
    assert!(matches!(snap.state, FetchState::Idle));
    assert!(snap.resource.is_none());
    assert_eq!(source.started(), 0);
}

#[tokio::test]
async fn subscribing_loads_the_document() {
    let source = two_documents();
    let sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));

    assert!(sub.snapshot().state.is_loading());
    source.release("r1");
    let snap = sub.settled().await;

    assert_eq!(loaded_from(&snap).as_deref(), Some("r1"));
    assert_eq!(snap.resource, Some(ResourceId::new("r1")));
    assert_eq!(source.started(), 1);
}

#[tokio::test]
async fn switching_resource_never_surfaces_stale_data() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    drain().await;
    assert_eq!(source.started(), 1);

    sub.set_resource(Some("r2".into()));
    source.release("r1");
    drain().await;

    let snap = sub.snapshot();
    assert!(snap.state.is_loading(), "expected Loading, got {:?}", snap.state);
    assert_eq!(snap.resource, Some(ResourceId::new("r2")));

    source.release("r2");
    let snap = sub.settled().await;
    assert_eq!(loaded_from(&snap).as_deref(), Some("r2"));

    drain().await;
    assert_eq!(loaded_from(&sub.snapshot()).as_deref(), Some("r2"));
    // The r1 request was aborted before it could finish.
    assert_eq!(source.completed(), 1);
}

#[tokio::test]
async fn watchers_never_observe_superseded_data() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    let mut rx = sub.watch();
    drain().await;

    sub.set_resource(Some("r2".into()));
    source.release("r1");
    source.release("r2");
    let _ = sub.settled().await;

    let mut seen = Vec::new();
    while rx.has_changed().unwrap_or(false) {
        let snap = rx.borrow_and_update().clone();
        seen.push(loaded_from(&snap));
    }
    assert!(!seen.iter().any(|s| s.as_deref() == Some("r1")));
    assert_eq!(loaded_from(&rx.borrow()).as_deref(), Some("r2"));
}

#[tokio::test]
async fn failed_request_maps_to_failed_state() {
    let source = GatedSource::new(vec![("boom", Reply::Status(500)), ("gone", Reply::Status(404))]);
    let fetcher = Fetcher::new(Arc::clone(&source));

    let sub = fetcher.subscribe(Some("boom".into()));
    source.release("boom");
    let snap = sub.settled().await;
    let err = snap.state.error().expect("expected Failed");
    assert_eq!(err.status(), Some(500));
    assert!(!err.is_not_found());

    let sub = fetcher.subscribe(Some("gone".into()));
    source.release("gone");
    let snap = sub.settled().await;
    assert!(snap.state.error().is_some_and(FetchError::is_not_found));
}

#[tokio::test]
async fn setting_the_same_resource_does_not_refetch() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    drain().await;

    sub.set_resource(Some("r1".into()));
    drain().await;

    assert_eq!(source.started(), 1);
    assert_eq!(sub.snapshot().generation, 1);
}

#[tokio::test]
async fn clearing_resource_cancels_and_returns_to_idle() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    drain().await;

    sub.set_resource(None);
    source.release("r1");
    drain().await;

    assert!(matches!(sub.snapshot().state, FetchState::Idle));
    assert_eq!(source.completed(), 0);
}

#[tokio::test]
async fn clearing_during_superseding_request_lands_in_idle() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    source.release("r1");
    assert_eq!(loaded_from(&sub.settled().await).as_deref(), Some("r1"));

    sub.set_resource(Some("r2".into()));
    drain().await;
    sub.set_resource(None);
    source.release("r2");
    drain().await;

    let snap = sub.snapshot();
    assert!(matches!(snap.state, FetchState::Idle), "got {:?}", snap.state);
    assert!(snap.resource.is_none());
    // Only r1 ever finished.
    assert_eq!(source.completed(), 1);
}

#[tokio::test]
async fn setting_resource_after_absent_issues_request() {
    let source = two_documents();
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(None);

    sub.set_resource(Some("r2".into()));
    source.release("r2");
    let snap = sub.settled().await;

    assert_eq!(loaded_from(&snap).as_deref(), Some("r2"));
    assert_eq!(source.started(), 1);
}

#[tokio::test]
async fn dropping_subscription_cancels_in_flight_request() {
    let source = two_documents();
    let sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("r1".into()));
    drain().await;
    assert_eq!(source.started(), 1);

    sub.unsubscribe();
    source.release("r1");
    drain().await;

    assert_eq!(source.completed(), 0);
}

#[tokio::test]
async fn refetch_reissues_current_resource() {
    let source = GatedSource::new(vec![("flaky", Reply::Status(503))]);
    let mut sub = Fetcher::new(Arc::clone(&source)).subscribe(Some("flaky".into()));
    source.release("flaky");
    assert!(sub.settled().await.state.error().is_some());

    sub.refetch();
    assert!(sub.snapshot().state.is_loading());
    assert_eq!(sub.snapshot().generation, 2);
    source.release("flaky");
    let _ = sub.settled().await;
    assert_eq!(source.started(), 2);
}

#[tokio::test]
async fn settled_returns_immediately_when_idle() {
    let source = two_documents();
    let sub = Fetcher::new(source).subscribe(None);
    let snap = sub.settled().await;
    assert!(matches!(snap.state, FetchState::Idle));
}

#[test]
fn publish_rejects_superseded_generation() {
    let (tx, _rx) = watch::channel(Snapshot {
        generation: 3,
        resource: Some(ResourceId::new("r2")),
        state: FetchState::Loading,
    });

    let stale = FetchState::Loaded(Arc::new(json!({ "from": "r1" })));
    assert!(!publish(&tx, 2, stale));
    assert!(tx.borrow().state.is_loading());

    let fresh = FetchState::Loaded(Arc::new(json!({ "from": "r2" })));
    assert!(publish(&tx, 3, fresh));
    assert_eq!(loaded_from(&tx.borrow()).as_deref(), Some("r2"));
}

#[test]
fn fetch_state_map_only_touches_loaded() {
    let loaded: FetchState<u32> = FetchState::Loaded(2);
    assert_eq!(loaded.map(|n| n * 10).data(), Some(&20));

    let loading: FetchState<u32> = FetchState::Loading;
    assert!(loading.map(|n| n * 10).is_loading());
}
