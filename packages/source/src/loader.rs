//! CSV loading, cleaning, and merging.
//!
//! Each configured source is read independently; a source that is missing
//! or unparseable is skipped with a logged warning, and the run only
//! aborts when every source fails. Surviving records are concatenated in
//! registry order — overlapping export ranges are NOT deduplicated, so
//! duplicate records across vintages count twice. That caveat is
//! deliberate: deduplication would silently change historical outputs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use sim_timelapse_incident_models::{IncidentDataset, IncidentRecord};

use crate::SourceError;
use crate::normalize::normalize_incident_type;
use crate::parsing::parse_creation_datetime;
use crate::progress::ProgressCallback;
use crate::source_def::SourceDefinition;

/// Options controlling a load run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory containing the CSV export files.
    pub data_dir: PathBuf,
    /// Maximum number of records to keep per source (for testing).
    pub limit: Option<u64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            limit: None,
        }
    }
}

/// Row statistics for one successfully loaded source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLoadStats {
    /// Source identifier.
    pub id: String,
    /// File the rows came from.
    pub file_name: String,
    /// Data rows read from the CSV (excluding the header).
    pub rows_read: u64,
    /// Rows kept as records.
    pub records_kept: u64,
    /// Rows dropped for an unparseable or missing timestamp.
    pub dropped_timestamps: u64,
    /// Kept rows whose timestamp was exactly midnight (low time
    /// confidence, still counted).
    pub midnight_flagged: u64,
}

/// Merged statistics for a whole load run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Per-source row statistics, in merge order.
    pub sources: Vec<SourceLoadStats>,
    /// Identifiers of sources that failed to load and were skipped.
    pub skipped: Vec<String>,
}

impl LoadReport {
    /// Total data rows read across all loaded sources.
    #[must_use]
    pub fn rows_read(&self) -> u64 {
        self.sources.iter().map(|s| s.rows_read).sum()
    }

    /// Total records kept across all loaded sources.
    #[must_use]
    pub fn records_kept(&self) -> u64 {
        self.sources.iter().map(|s| s.records_kept).sum()
    }

    /// Total rows dropped for unparseable timestamps.
    #[must_use]
    pub fn dropped_timestamps(&self) -> u64 {
        self.sources.iter().map(|s| s.dropped_timestamps).sum()
    }

    /// Total kept rows flagged as exact-midnight timestamps.
    #[must_use]
    pub fn midnight_flagged(&self) -> u64 {
        self.sources.iter().map(|s| s.midnight_flagged).sum()
    }
}

/// Loads and merges all given sources into one frozen dataset.
///
/// Sources are concatenated in the given order. Failing sources are
/// skipped and recorded in the report.
///
/// # Errors
///
/// Returns [`SourceError::NoUsableSources`] when every source fails to
/// load.
pub fn load_sources(
    sources: &[SourceDefinition],
    options: &LoadOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(IncidentDataset, LoadReport), SourceError> {
    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for def in sources {
        let path = options.data_dir.join(&def.file_name);
        progress.set_message(format!("Loading {}", def.name()));

        match load_source(def, &path, options.limit, progress) {
            Ok((mut source_records, stats)) => {
                log::info!(
                    "[{}] {} rows read, {} kept, {} dropped (bad timestamp), {} midnight-flagged",
                    def.id(),
                    stats.rows_read,
                    stats.records_kept,
                    stats.dropped_timestamps,
                    stats.midnight_flagged,
                );
                records.append(&mut source_records);
                report.sources.push(stats);
            }
            Err(e) => {
                log::warn!("[{}] skipped: {e}", def.id());
                report.skipped.push(def.id().to_string());
            }
        }
    }

    if report.sources.is_empty() {
        return Err(SourceError::NoUsableSources {
            count: sources.len(),
        });
    }

    progress.finish(format!(
        "Loaded {} record(s) from {} source(s)",
        records.len(),
        report.sources.len()
    ));

    Ok((IncidentDataset::new(records), report))
}

/// Loads and cleans a single CSV source.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the CSV is malformed,
/// or no datetime column alias matches the header.
fn load_source(
    def: &SourceDefinition,
    path: &Path,
    limit: Option<u64>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<IncidentRecord>, SourceLoadStats), SourceError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();

    let Some(datetime_idx) = SourceDefinition::resolve_column(&headers, &def.datetime_columns)
    else {
        return Err(SourceError::MissingColumn {
            source_id: def.id().to_string(),
            kind: "datetime",
            tried: def.datetime_columns.join(", "),
        });
    };

    // A missing category column is survivable: every row falls back to
    // the Other category.
    let category_idx = SourceDefinition::resolve_column(&headers, &def.category_columns);
    if category_idx.is_none() {
        log::warn!(
            "[{}] no category column found (tried: {}); mapping all rows to Other",
            def.id(),
            def.category_columns.join(", ")
        );
    }

    let mut stats = SourceLoadStats {
        id: def.id().to_string(),
        file_name: def.file_name.clone(),
        rows_read: 0,
        records_kept: 0,
        dropped_timestamps: 0,
        midnight_flagged: 0,
    };
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        stats.rows_read += 1;
        progress.inc(1);

        let Some(datetime) = row.get(datetime_idx).and_then(parse_creation_datetime) else {
            stats.dropped_timestamps += 1;
            continue;
        };

        let raw_label = category_idx
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let category = normalize_incident_type(raw_label.as_deref());

        let record = IncidentRecord::new(datetime, category, raw_label);
        if !record.exact_time_known {
            stats.midnight_flagged += 1;
        }

        records.push(record);
        stats.records_kept += 1;

        if let Some(limit) = limit
            && stats.records_kept >= limit
        {
            log::info!("[{}] reached limit of {limit} record(s)", def.id());
            break;
        }
    }

    Ok((records, stats))
}
