//! Filmstrip Timeline - frame timeline model and sources
//!
//! Implements the input side of the pipeline:
//! - The `Frame` capability and ordered `Timeline`
//! - The async `TimelineSource` interface
//! - A memoizing source (one computation per trace)
//! - A file-backed source reading versioned JSON manifests

pub mod frame;
pub mod manifest;
pub mod source;

pub use frame::{Frame, InMemoryFrame, Timeline};
pub use manifest::{FileFrame, ManifestFrame, ManifestTimelineSource, TraceManifest};
pub use source::{
    BoxFuture, InMemoryTimelineSource, MemoizedTimelineSource, TimelineResult, TimelineSource,
    TraceId,
};
