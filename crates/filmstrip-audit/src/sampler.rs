//! Bucket sampling: which analyzed frame represents each point in time.
//!
//! The timeline is cut into `count` evenly spaced targets. Each target holds
//! the last analyzed frame captured at or before it; the final target always
//! takes the last analyzed frame so the strip ends on the settled page.

use filmstrip_core::{FilmstripError, Result};
use filmstrip_timeline::Timeline;
use tracing::debug;

/// One evenly spaced target time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// 1-based position in the strip.
    pub index: usize,
    /// Absolute target time in milliseconds.
    pub target_timestamp: f64,
}

/// A bucket and the index (into `Timeline::frames`) of the frame chosen for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub bucket: Bucket,
    pub frame_index: usize,
}

/// Output of the sampler for one build.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    /// Start of the capture window in milliseconds.
    pub beginning: f64,
    /// Length of the sampled window in milliseconds.
    pub timeline_end: f64,
    /// One selection per bucket, in bucket order.
    pub selections: Vec<Selection>,
}

/// Length of the window to sample.
///
/// `completion` wins when known; otherwise the latest frame offset is used.
/// Either way the result is floored at `minimum_duration`. Fails with
/// `InvalidTimeline` on a non-finite frame time or a window that is not
/// strictly positive.
pub fn timeline_end(timeline: &Timeline, minimum_duration: f64) -> Result<f64> {
    if let Some((index, frame)) = timeline
        .frames()
        .iter()
        .enumerate()
        .find(|(_, frame)| !frame.timestamp().is_finite())
    {
        return Err(FilmstripError::InvalidTimeline(format!(
            "frame {} has a non-finite timestamp ({})",
            index,
            frame.timestamp()
        )));
    }

    let max_frame_time = match timeline.completion() {
        Some(completion) => completion,
        None => timeline
            .frames()
            .iter()
            .map(|frame| frame.timestamp() - timeline.beginning())
            .fold(f64::NEG_INFINITY, f64::max),
    };

    let end = max_frame_time.max(minimum_duration);
    if !max_frame_time.is_finite() || !end.is_finite() {
        return Err(FilmstripError::InvalidTimeline(format!(
            "timeline end is not finite ({})",
            max_frame_time
        )));
    }
    if end <= 0.0 {
        return Err(FilmstripError::InvalidTimeline(format!(
            "timeline window must be positive, got {}ms",
            end
        )));
    }
    Ok(end)
}

/// Choose a frame for each of `count` buckets.
///
/// Fails with `InvalidTimeline` when no analyzed frame exists or the window
/// end is not finite. No raster is touched.
pub fn sample(timeline: &Timeline, count: usize, minimum_duration: f64) -> Result<SamplePlan> {
    let analyzed: Vec<(usize, f64)> = timeline
        .analyzed_frames()
        .map(|(index, frame)| (index, frame.timestamp()))
        .collect();

    let (&(first_index, _), &(last_index, _)) = match (analyzed.first(), analyzed.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(FilmstripError::InvalidTimeline(
                "timeline has no analyzed frames".to_string(),
            ))
        }
    };

    let beginning = timeline.beginning();
    let end = timeline_end(timeline, minimum_duration)?;

    // Targets ascend, so the hold-last-known-value scan can resume where the
    // previous bucket stopped.
    let mut cursor = 0;
    let mut held: Option<usize> = None;
    let mut selections = Vec::with_capacity(count);

    for i in 1..=count {
        let target_timestamp = beginning + end * i as f64 / count as f64;
        let bucket = Bucket {
            index: i,
            target_timestamp,
        };

        while cursor < analyzed.len() && analyzed[cursor].1 <= target_timestamp {
            held = Some(analyzed[cursor].0);
            cursor += 1;
        }

        let frame_index = if i == count {
            last_index
        } else {
            held.unwrap_or_else(|| {
                debug!(
                    bucket = i,
                    target = target_timestamp,
                    "No analyzed frame at or before target, using first analyzed frame"
                );
                first_index
            })
        };

        selections.push(Selection {
            bucket,
            frame_index,
        });
    }

    debug!(
        analyzed = analyzed.len(),
        timeline_end = end,
        buckets = count,
        "Sampled filmstrip buckets"
    );

    Ok(SamplePlan {
        beginning,
        timeline_end: end,
        selections,
    })
}
