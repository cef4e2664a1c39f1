//! Per-build cache of encoded thumbnails.
//!
//! Keyed by the frame's index in the timeline. Each key has its own slot
//! lock, so concurrent buckets that picked the same frame wait for a single
//! encode instead of repeating it.

use filmstrip_core::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<Mutex<Option<Arc<str>>>>;

/// Insert-if-absent map from frame index to encoded payload.
#[derive(Default)]
pub struct EncodingCache {
    slots: Mutex<HashMap<usize, Slot>>,
}

impl EncodingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the payload for `frame_index`, running `encode` only on a miss.
    ///
    /// A failed encode leaves the slot empty and returns the error.
    pub fn get_or_encode<F>(&self, frame_index: usize, encode: F) -> Result<Arc<str>>
    where
        F: FnOnce() -> Result<String>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(frame_index).or_default())
        };

        let mut payload = slot.lock();
        if let Some(cached) = payload.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let encoded: Arc<str> = Arc::from(encode()?);
        *payload = Some(Arc::clone(&encoded));
        Ok(encoded)
    }

    /// Number of frames with a stored payload.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
