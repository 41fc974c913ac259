//! Cancellable, identifier-keyed document subscriptions.
//!
//! A [`Subscription`] owns the fetch lifecycle of one consumer. Whenever its
//! [`ResourceId`] changes, the in-flight request task is aborted (dropping
//! the HTTP future, which closes the connection) and a new request is
//! spawned. State is published through a `tokio::sync::watch` channel as a
//! [`Snapshot`].
//!
//! Every request is tagged with the snapshot generation current when it was
//! issued. A finished request only writes its result if that generation is
//! still current, and the check happens under the channel lock, so a
//! superseded request can never overwrite newer state even when it completes
//! between being superseded and being aborted.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::FetchError;

/// Untyped JSON body of a catalog document.
pub type RawDocument = serde_json::Value;

/// Opaque identifier (URL) of a fetchable catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ResourceId {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// Lifecycle of the request behind a subscription.
#[derive(Debug, Clone)]
pub enum FetchState<T> {
    /// No identifier is set. Clearing the identifier always lands here, even
    /// when data was loaded before; a cancelled request never restores or
    /// leaves behind a `Loaded`/`Failed` of its own.
    Idle,
    Loading,
    Loaded(T),
    Failed(Arc<FetchError>),
}

impl<T> FetchState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// `true` once a request has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchState::Loaded(_) | FetchState::Failed(_))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Transforms loaded data, keeping every other state as is.
    pub fn map<U, F>(self, f: F) -> FetchState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            FetchState::Idle => FetchState::Idle,
            FetchState::Loading => FetchState::Loading,
            FetchState::Loaded(data) => FetchState::Loaded(f(data)),
            FetchState::Failed(error) => FetchState::Failed(error),
        }
    }
}

/// What a subscription publishes: the state together with the identifier
/// it belongs to.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Bumped every time the identifier is set, cleared, or refetched.
    pub generation: u64,
    pub resource: Option<ResourceId>,
    pub state: FetchState<Arc<RawDocument>>,
}

impl Snapshot {
    fn idle() -> Self {
        Self {
            generation: 0,
            resource: None,
            state: FetchState::Idle,
        }
    }
}

/// Something that can produce a catalog document for an identifier.
///
/// [`crate::CatalogClient`] is the HTTP implementation; tests substitute
/// in-memory sources.
#[async_trait]
pub trait DocumentSource: Send + Sync + 'static {
    /// Fetches and decodes the document behind `resource`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for transport failures, non-2xx responses,
    /// and bodies that are not JSON.
    async fn fetch(&self, resource: &ResourceId) -> Result<RawDocument, FetchError>;
}

/// Factory for subscriptions sharing one [`DocumentSource`].
///
/// Cheap to clone. Subscriptions created from the same fetcher run their
/// requests independently, so different identifiers may be in flight at the
/// same time.
pub struct Fetcher<S> {
    source: Arc<S>,
}

impl<S> Clone for Fetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: DocumentSource> Fetcher<S> {
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Opens a subscription, issuing the first request immediately when
    /// `resource` is present.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn subscribe(&self, resource: Option<ResourceId>) -> Subscription<S> {
        let (state_tx, _) = watch::channel(Snapshot::idle());
        let mut subscription = Subscription {
            source: Arc::clone(&self.source),
            state_tx: Arc::new(state_tx),
            in_flight: None,
        };
        if resource.is_some() {
            subscription.set_resource(resource);
        }
        subscription
    }
}

/// One consumer's view of a document, re-fetched whenever its identifier
/// changes. Dropping the subscription cancels any in-flight request.
pub struct Subscription<S> {
    source: Arc<S>,
    state_tx: Arc<watch::Sender<Snapshot>>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: DocumentSource> Subscription<S> {
    /// Points the subscription at `resource`.
    ///
    /// A different identifier cancels the current request and issues a new
    /// one; `None` cancels and returns to [`FetchState::Idle`]; the current
    /// identifier is a no-op.
    pub fn set_resource(&mut self, resource: Option<ResourceId>) {
        if self.state_tx.borrow().resource == resource {
            return;
        }
        match resource {
            Some(resource) => self.start(resource),
            None => {
                self.cancel_in_flight();
                self.state_tx.send_modify(|snap| {
                    snap.generation += 1;
                    snap.resource = None;
                    snap.state = FetchState::Idle;
                });
                tracing::debug!("subscription cleared");
            }
        }
    }

    /// Issues the request for the current identifier again. Does nothing
    /// when no identifier is set.
    pub fn refetch(&mut self) {
        let current = self.state_tx.borrow().resource.clone();
        if let Some(resource) = current {
            self.start(resource);
        }
    }

    fn start(&mut self, resource: ResourceId) {
        self.cancel_in_flight();

        let mut generation = 0;
        self.state_tx.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.resource = Some(resource.clone());
            snap.state = FetchState::Loading;
        });
        tracing::debug!(%resource, generation, "issuing catalog request");

        let source = Arc::clone(&self.source);
        let state_tx = Arc::clone(&self.state_tx);
        self.in_flight = Some(tokio::spawn(async move {
            let state = match source.fetch(&resource).await {
                Ok(document) => FetchState::Loaded(Arc::new(document)),
                Err(error) => {
                    tracing::warn!(%resource, %error, "catalog request failed");
                    FetchState::Failed(Arc::new(error))
                }
            };
            if publish(&state_tx, generation, state) {
                tracing::debug!(%resource, generation, "catalog request settled");
            } else {
                tracing::debug!(%resource, generation, "discarding superseded response");
            }
        }));
    }
}

impl<S> Subscription<S> {
    /// Receiver that observes every state transition of this subscription.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Snapshot> {
        self.state_tx.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state_tx.borrow().clone()
    }

    #[must_use]
    pub fn resource(&self) -> Option<ResourceId> {
        self.state_tx.borrow().resource.clone()
    }

    /// Waits until the current request, if any, has finished and returns the
    /// resulting snapshot. Returns immediately when nothing is loading.
    pub async fn settled(&self) -> Snapshot {
        let mut rx = self.state_tx.subscribe();
        let snapshot = match rx.wait_for(|snap| !snap.state.is_loading()).await {
            Ok(snap) => snap.clone(),
            Err(_) => self.snapshot(),
        };
        snapshot
    }

    /// Tears the subscription down, cancelling any in-flight request.
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn cancel_in_flight(&mut self) {
        if let Some(task) = self.in_flight.take() {
            if !task.is_finished() {
                tracing::debug!("cancelling in-flight catalog request");
            }
            task.abort();
        }
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Writes `state` only if `generation` is still current. Returns whether the
/// write happened.
fn publish(
    state_tx: &watch::Sender<Snapshot>,
    generation: u64,
    state: FetchState<Arc<RawDocument>>,
) -> bool {
    state_tx.send_if_modified(|snap| {
        if snap.generation != generation {
            return false;
        }
        snap.state = state;
        true
    })
}

#[cfg(test)]
#[path = "subscription_test.rs"]
mod tests;
