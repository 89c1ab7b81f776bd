#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sparse month timeline and per-frame aggregations.
//!
//! The [`Timeline`] is the ordered list of month buckets that actually
//! hold data — months without records are simply absent (sparse-timeline
//! semantics), and the rolling window and trend line silently skip them.
//! [`aggregate::FrameAggregates`] computes the three views each frame
//! renders, as pure functions over the frozen dataset.

pub mod aggregate;

use sim_timelapse_incident_models::{IncidentDataset, MonthKey};

/// Width of the rolling window, in timeline buckets.
pub const ROLLING_WINDOW_MONTHS: usize = 12;

/// The ordered, sparse sequence of month buckets with at least one record.
///
/// Derived once from the frozen dataset, then only read. Keys are strictly
/// increasing and duplicate-free; the length always equals the number of
/// distinct `year_month` values in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    keys: Vec<MonthKey>,
}

impl Timeline {
    /// Indexes the distinct month buckets present in the dataset, in
    /// chronological order. Months with zero records are not synthesized.
    #[must_use]
    pub fn from_dataset(dataset: &IncidentDataset) -> Self {
        let keys = dataset.counts_by_bucket().into_keys().collect();
        Self { keys }
    }

    /// Returns the ordered bucket keys.
    #[must_use]
    pub fn keys(&self) -> &[MonthKey] {
        &self.keys
    }

    /// Returns the number of buckets (= frames to render).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` when no bucket holds data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the bucket key at `frame_index`, if in range.
    #[must_use]
    pub fn get(&self, frame_index: usize) -> Option<MonthKey> {
        self.keys.get(frame_index).copied()
    }

    /// Returns the rolling window for `frame_index`: the trailing
    /// ≤12-bucket contiguous slice ending at that frame's bucket. The
    /// window holds `frame_index + 1` buckets until the timeline is 12
    /// buckets deep.
    ///
    /// Returns `None` when `frame_index` is out of range.
    #[must_use]
    pub fn rolling_window(&self, frame_index: usize) -> Option<&[MonthKey]> {
        if frame_index >= self.keys.len() {
            return None;
        }
        let start = frame_index.saturating_sub(ROLLING_WINDOW_MONTHS - 1);
        Some(&self.keys[start..=frame_index])
    }
}
