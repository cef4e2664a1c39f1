//! Timeline sources and the per-trace memoizing registry.

use crate::frame::Timeline;
use filmstrip_core::{TimelineError, TimelineErrorCode};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Boxed future returned by object-safe async traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a timeline request. Shared by identity between callers.
pub type TimelineResult = std::result::Result<Arc<Timeline>, TimelineError>;

/// Identity of a recorded trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TraceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Produces the frame timeline for a trace.
pub trait TimelineSource: Send + Sync {
    fn request<'a>(&'a self, trace: &'a TraceId) -> BoxFuture<'a, TimelineResult>;
}

/// Wraps a source so each trace is computed at most once.
///
/// Concurrent requests for the same trace await the same in-flight
/// computation. Failures are memoized as well.
pub struct MemoizedTimelineSource<S> {
    inner: S,
    entries: Mutex<HashMap<TraceId, Arc<OnceCell<TimelineResult>>>>,
}

impl<S: TimelineSource> MemoizedTimelineSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop the memoized result for a trace, if any.
    pub fn forget(&self, trace: &TraceId) -> bool {
        self.entries.lock().remove(trace).is_some()
    }

    /// Number of traces requested so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TimelineSource> TimelineSource for MemoizedTimelineSource<S> {
    fn request<'a>(&'a self, trace: &'a TraceId) -> BoxFuture<'a, TimelineResult> {
        Box::pin(async move {
            let cell = {
                let mut entries = self.entries.lock();
                Arc::clone(entries.entry(trace.clone()).or_default())
            };
            cell.get_or_init(|| async {
                debug!(trace = %trace, "Computing timeline");
                self.inner.request(trace).await
            })
            .await
            .clone()
        })
    }
}

/// Source backed by a fixed table of results.
#[derive(Default)]
pub struct InMemoryTimelineSource {
    timelines: HashMap<TraceId, TimelineResult>,
}

impl InMemoryTimelineSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timeline for a trace.
    pub fn insert(&mut self, trace: impl Into<TraceId>, timeline: Timeline) {
        self.timelines.insert(trace.into(), Ok(Arc::new(timeline)));
    }

    /// Register a failure for a trace.
    pub fn insert_error(&mut self, trace: impl Into<TraceId>, error: TimelineError) {
        self.timelines.insert(trace.into(), Err(error));
    }
}

impl TimelineSource for InMemoryTimelineSource {
    fn request<'a>(&'a self, trace: &'a TraceId) -> BoxFuture<'a, TimelineResult> {
        let result = self.timelines.get(trace).cloned().unwrap_or_else(|| {
            Err(TimelineError::new(
                TimelineErrorCode::TraceUnreadable,
                format!("no trace registered as '{}'", trace),
            ))
        });
        Box::pin(async move { result })
    }
}
