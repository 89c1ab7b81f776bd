//! The canonical intervention record and the month bucket key.
//!
//! Records are produced once by the loader and frozen for the rest of the
//! run; every aggregation reads the same immutable dataset.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::IncidentCategory;

/// A calendar-month bucket key, displayed as `"YYYY-MM"`.
///
/// Ordering is `(year, month)`, which matches the lexicographic order of
/// the zero-padded display form — sorting keys as strings or as values
/// yields the same chronological sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a key from a year and a 1-based month.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonthKeyError`] if `month` is not in `1..=12`.
    pub const fn new(year: i32, month: u32) -> Result<Self, InvalidMonthKeyError> {
        match month {
            1..=12 => Ok(Self { year, month }),
            _ => Err(InvalidMonthKeyError { month }),
        }
    }

    /// Derives the bucket key from a record timestamp.
    #[must_use]
    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self {
            year: datetime.year(),
            month: datetime.month(),
        }
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the 1-based calendar month.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error returned when constructing a [`MonthKey`] with an out-of-range
/// month value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonthKeyError {
    /// The invalid month value that was provided.
    pub month: u32,
}

impl std::fmt::Display for InvalidMonthKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month value {}: expected 1-12", self.month)
    }
}

impl std::error::Error for InvalidMonthKeyError {}

/// One intervention report, normalized to the canonical schema.
///
/// Rows without a parseable creation timestamp never become records — the
/// loader drops them and counts the loss in its load report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Parsed creation timestamp.
    pub datetime: NaiveDateTime,
    /// Calendar year derived from `datetime`.
    pub year: i32,
    /// 1-based calendar month derived from `datetime`.
    pub month: u32,
    /// Month bucket key derived from `datetime`.
    pub year_month: MonthKey,
    /// `false` when the timestamp is exactly midnight (00:00:00), which in
    /// the SIM exports usually means the time portion was imputed. A
    /// precision flag, not an error — the record still counts.
    pub exact_time_known: bool,
    /// Canonical category mapped from the raw source label.
    pub incident_category: IncidentCategory,
    /// Raw source label, kept for diagnostics.
    pub raw_label: Option<String>,
}

impl IncidentRecord {
    /// Builds a record from a parsed timestamp, deriving the date
    /// components and the midnight-precision flag.
    #[must_use]
    pub fn new(
        datetime: NaiveDateTime,
        incident_category: IncidentCategory,
        raw_label: Option<String>,
    ) -> Self {
        let exact_time_known =
            !(datetime.hour() == 0 && datetime.minute() == 0 && datetime.second() == 0);
        Self {
            year: datetime.year(),
            month: datetime.month(),
            year_month: MonthKey::from_datetime(&datetime),
            datetime,
            exact_time_known,
            incident_category,
            raw_label,
        }
    }
}

/// The immutable record set for one run.
///
/// Built once by the loader before any frame renders, then only read.
/// Frames borrow the dataset; nothing mutates it during rendering.
#[derive(Debug, Clone, Default)]
pub struct IncidentDataset {
    records: Vec<IncidentRecord>,
}

impl IncidentDataset {
    /// Wraps a record set. The caller is expected to be done mutating.
    #[must_use]
    pub const fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    /// Returns the full record slice.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the inclusive `(min_year, max_year)` coverage, or `None`
    /// for an empty dataset.
    #[must_use]
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.records.first()?.year;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.year), hi.max(r.year))
        }))
    }

    /// Counts records per month bucket, ordered chronologically.
    #[must_use]
    pub fn counts_by_bucket(&self) -> BTreeMap<MonthKey, u64> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.year_month).or_insert(0) += 1;
        }
        counts
    }

}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn month_key_displays_zero_padded() {
        let key = MonthKey::new(2020, 3).unwrap();
        assert_eq!(key.to_string(), "2020-03");
    }

    #[test]
    fn month_key_rejects_out_of_range() {
        assert!(MonthKey::new(2020, 0).is_err());
        assert!(MonthKey::new(2020, 13).is_err());
    }

    #[test]
    fn month_key_order_matches_display_order() {
        let mut keys = vec![
            MonthKey::new(2020, 12).unwrap(),
            MonthKey::new(2021, 1).unwrap(),
            MonthKey::new(2020, 2).unwrap(),
        ];
        keys.sort_unstable();
        let displayed: Vec<String> = keys.iter().map(MonthKey::to_string).collect();
        let mut sorted_displayed = displayed.clone();
        sorted_displayed.sort();
        assert_eq!(displayed, sorted_displayed);
    }

    #[test]
    fn record_derives_date_components() {
        let record = IncidentRecord::new(
            dt(2019, 7, 14, 13, 45, 9),
            IncidentCategory::FireAlarm,
            Some("ALARME".to_string()),
        );
        assert_eq!(record.year, 2019);
        assert_eq!(record.month, 7);
        assert_eq!(record.year_month.to_string(), "2019-07");
        assert!(record.exact_time_known);
    }

    #[test]
    fn record_flags_exact_midnight() {
        let record = IncidentRecord::new(dt(2019, 7, 14, 0, 0, 0), IncidentCategory::Other, None);
        assert!(!record.exact_time_known);

        // One second past midnight is a real time.
        let record = IncidentRecord::new(dt(2019, 7, 14, 0, 0, 1), IncidentCategory::Other, None);
        assert!(record.exact_time_known);
    }

    #[test]
    fn dataset_counts_by_bucket() {
        let dataset = IncidentDataset::new(vec![
            IncidentRecord::new(dt(2020, 1, 1, 8, 0, 0), IncidentCategory::NonFire, None),
            IncidentRecord::new(dt(2020, 1, 20, 9, 0, 0), IncidentCategory::NonFire, None),
            IncidentRecord::new(dt(2020, 3, 2, 10, 0, 0), IncidentCategory::OtherFire, None),
        ]);
        let counts = dataset.counts_by_bucket();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&MonthKey::new(2020, 1).unwrap()], 2);
        assert_eq!(counts[&MonthKey::new(2020, 3).unwrap()], 1);
        assert_eq!(dataset.year_range(), Some((2020, 2020)));
    }
}
