//! The three per-frame aggregations.
//!
//! Each frame shows a cumulative monthly trend, the current month's
//! category breakdown, and the rolling-window category totals. All three
//! are computed fresh for the requested frame index from the frozen
//! dataset and discarded after rendering — no cross-frame mutable state.

use std::collections::BTreeMap;

use serde::Serialize;
use sim_timelapse_incident_models::{IncidentCategory, IncidentDataset, MonthKey};

use crate::Timeline;

/// One point of the cumulative monthly trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Month bucket.
    pub key: MonthKey,
    /// Records in that bucket.
    pub count: u64,
}

/// A category and its record count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Canonical category.
    pub category: IncidentCategory,
    /// Records counted for it.
    pub count: u64,
}

/// Everything one frame displays, computed for a single frame index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAggregates {
    /// The frame's index into the timeline.
    pub frame_index: usize,
    /// The frame's month bucket.
    pub current: MonthKey,
    /// Monthly counts from the first bucket through the current one.
    /// Frame `i` holds exactly `i + 1` points and is a prefix of frame
    /// `i + 1`'s trend.
    pub trend: Vec<TrendPoint>,
    /// Current-month counts per category, descending by count.
    /// Zero-count categories are omitted entirely, never shown as empty
    /// slices.
    pub breakdown: Vec<CategoryCount>,
    /// Rolling-window counts per category, ascending by count so the
    /// largest bar renders at the top of the horizontal chart.
    pub rolling: Vec<CategoryCount>,
}

impl FrameAggregates {
    /// Computes the aggregates for `frame_index`.
    ///
    /// Pure over `(dataset, timeline, frame_index)`: recomputing with
    /// identical inputs yields identical values. Returns `None` when
    /// `frame_index` is out of range.
    #[must_use]
    pub fn compute(
        dataset: &IncidentDataset,
        timeline: &Timeline,
        frame_index: usize,
    ) -> Option<Self> {
        let current = timeline.get(frame_index)?;
        let window = timeline.rolling_window(frame_index)?;
        let window_start = *window.first()?;

        let mut bucket_counts: BTreeMap<MonthKey, u64> = BTreeMap::new();
        let mut breakdown_counts: BTreeMap<IncidentCategory, u64> = BTreeMap::new();
        let mut rolling_counts: BTreeMap<IncidentCategory, u64> = BTreeMap::new();

        for record in dataset.records() {
            let key = record.year_month;
            *bucket_counts.entry(key).or_insert(0) += 1;

            if key == current {
                *breakdown_counts.entry(record.incident_category).or_insert(0) += 1;
            }
            // The window is a contiguous bucket range, so membership is a
            // bounds check rather than a scan.
            if (window_start..=current).contains(&key) {
                *rolling_counts.entry(record.incident_category).or_insert(0) += 1;
            }
        }

        let trend = timeline.keys()[..=frame_index]
            .iter()
            .map(|key| TrendPoint {
                key: *key,
                count: bucket_counts.get(key).copied().unwrap_or(0),
            })
            .collect();

        Some(Self {
            frame_index,
            current,
            trend,
            breakdown: sorted_counts(&breakdown_counts, SortOrder::Descending),
            rolling: sorted_counts(&rolling_counts, SortOrder::Ascending),
        })
    }

    /// Total records in the current month (the last trend point).
    #[must_use]
    pub fn current_month_total(&self) -> u64 {
        self.trend.last().map_or(0, |p| p.count)
    }

    /// Total records across the rolling window.
    #[must_use]
    pub fn rolling_total(&self) -> u64 {
        self.rolling.iter().map(|c| c.count).sum()
    }

    /// Largest monthly count in the trend so far (for axis headroom).
    #[must_use]
    pub fn trend_max(&self) -> u64 {
        self.trend.iter().map(|p| p.count).max().unwrap_or(0)
    }
}

enum SortOrder {
    Ascending,
    Descending,
}

/// Flattens a category count map into a vector ordered by count, with
/// palette order breaking ties (stable sort over the palette-ordered
/// iteration).
fn sorted_counts(
    counts: &BTreeMap<IncidentCategory, u64>,
    order: SortOrder,
) -> Vec<CategoryCount> {
    let mut flat: Vec<CategoryCount> = IncidentCategory::all()
        .iter()
        .filter_map(|category| {
            counts.get(category).map(|&count| CategoryCount {
                category: *category,
                count,
            })
        })
        .collect();

    match order {
        SortOrder::Ascending => flat.sort_by_key(|c| c.count),
        SortOrder::Descending => flat.sort_by(|a, b| b.count.cmp(&a.count)),
    }

    flat
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sim_timelapse_incident_models::IncidentRecord;

    use super::*;

    fn record(y: i32, m: u32, category: IncidentCategory) -> IncidentRecord {
        let datetime = NaiveDate::from_ymd_opt(y, m, 15)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        IncidentRecord::new(datetime, category, None)
    }

    /// The reference scenario: three records in 2020-01 (A, A, B) and two
    /// in 2020-02 (C).
    fn scenario() -> (IncidentDataset, Timeline) {
        let dataset = IncidentDataset::new(vec![
            record(2020, 1, IncidentCategory::BuildingFire),
            record(2020, 1, IncidentCategory::BuildingFire),
            record(2020, 1, IncidentCategory::FireAlarm),
            record(2020, 2, IncidentCategory::FirstResponder),
            record(2020, 2, IncidentCategory::FirstResponder),
        ]);
        let timeline = Timeline::from_dataset(&dataset);
        (dataset, timeline)
    }

    #[test]
    fn scenario_timeline() {
        let (_, timeline) = scenario();
        assert_eq!(
            timeline
                .keys()
                .iter()
                .map(MonthKey::to_string)
                .collect::<Vec<_>>(),
            vec!["2020-01", "2020-02"]
        );
    }

    #[test]
    fn scenario_frame_zero_breakdown() {
        let (dataset, timeline) = scenario();
        let aggregates = FrameAggregates::compute(&dataset, &timeline, 0).unwrap();

        assert_eq!(aggregates.breakdown.len(), 2);
        assert_eq!(
            aggregates.breakdown[0],
            CategoryCount {
                category: IncidentCategory::BuildingFire,
                count: 2
            }
        );
        assert_eq!(
            aggregates.breakdown[1],
            CategoryCount {
                category: IncidentCategory::FireAlarm,
                count: 1
            }
        );
    }

    #[test]
    fn scenario_frame_one_rolling_covers_both_buckets() {
        let (dataset, timeline) = scenario();
        let aggregates = FrameAggregates::compute(&dataset, &timeline, 1).unwrap();

        // Ascending by count: B(1), then A(2)/C(2) with palette order
        // breaking the tie.
        assert_eq!(
            aggregates.rolling,
            vec![
                CategoryCount {
                    category: IncidentCategory::FireAlarm,
                    count: 1
                },
                CategoryCount {
                    category: IncidentCategory::BuildingFire,
                    count: 2
                },
                CategoryCount {
                    category: IncidentCategory::FirstResponder,
                    count: 2
                },
            ]
        );
        assert_eq!(aggregates.rolling_total(), 5);
    }

    #[test]
    fn scenario_trend_series() {
        let (dataset, timeline) = scenario();
        let frame0 = FrameAggregates::compute(&dataset, &timeline, 0).unwrap();
        let frame1 = FrameAggregates::compute(&dataset, &timeline, 1).unwrap();

        let counts: Vec<u64> = frame1.trend.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![3, 2]);

        // Frame 0's trend is a prefix of frame 1's.
        assert_eq!(frame0.trend.len(), 1);
        assert_eq!(frame1.trend[..1], frame0.trend[..]);
        assert_eq!(frame1.current_month_total(), 2);
    }

    #[test]
    fn breakdown_omits_zero_count_categories() {
        let (dataset, timeline) = scenario();
        let aggregates = FrameAggregates::compute(&dataset, &timeline, 0).unwrap();
        assert!(
            aggregates
                .breakdown
                .iter()
                .all(|c| c.count > 0 && c.category != IncidentCategory::Other)
        );
    }

    #[test]
    fn breakdown_sum_matches_bucket_count() {
        let (dataset, timeline) = scenario();
        for i in 0..timeline.len() {
            let aggregates = FrameAggregates::compute(&dataset, &timeline, i).unwrap();
            let bucket = timeline.get(i).unwrap();
            let expected = dataset
                .records()
                .iter()
                .filter(|r| r.year_month == bucket)
                .count() as u64;
            let sum: u64 = aggregates.breakdown.iter().map(|c| c.count).sum();
            assert_eq!(sum, expected);
        }
    }

    #[test]
    fn rolling_sum_matches_window_count() {
        let (dataset, timeline) = scenario();
        for i in 0..timeline.len() {
            let aggregates = FrameAggregates::compute(&dataset, &timeline, i).unwrap();
            let window = timeline.rolling_window(i).unwrap();
            let expected = dataset
                .records()
                .iter()
                .filter(|r| window.contains(&r.year_month))
                .count() as u64;
            assert_eq!(aggregates.rolling_total(), expected);
        }
    }

    #[test]
    fn trend_has_one_point_per_elapsed_bucket() {
        // 14 buckets so the window saturates before the last frame.
        let months: Vec<IncidentRecord> = (0..14i32)
            .map(|i| {
                record(
                    2019 + i / 12,
                    u32::try_from(i % 12 + 1).unwrap(),
                    IncidentCategory::NonFire,
                )
            })
            .collect();
        let dataset = IncidentDataset::new(months);
        let timeline = Timeline::from_dataset(&dataset);

        for i in 0..timeline.len() {
            let aggregates = FrameAggregates::compute(&dataset, &timeline, i).unwrap();
            assert_eq!(aggregates.trend.len(), i + 1);
            assert_eq!(aggregates.trend.last().unwrap().key, timeline.get(i).unwrap());
        }
    }

    #[test]
    fn recomputing_is_deterministic() {
        let (dataset, timeline) = scenario();
        let a = FrameAggregates::compute(&dataset, &timeline, 1).unwrap();
        let b = FrameAggregates::compute(&dataset, &timeline, 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_frame_yields_none() {
        let (dataset, timeline) = scenario();
        assert!(FrameAggregates::compute(&dataset, &timeline, 2).is_none());
    }
}
