#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! SIM intervention data loading and normalization.
//!
//! Reads the open-data CSV exports published by the Service d'incendie de
//! Montréal, resolves the column name aliases that drifted across export
//! vintages, parses timestamps, and normalizes raw intervention labels into
//! the canonical [`sim_timelapse_incident_models::IncidentCategory`]
//! taxonomy. The merged result is an immutable dataset the rest of the
//! pipeline only reads.

pub mod loader;
pub mod normalize;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod source_def;

/// Errors that can occur while loading source data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file open/read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The source file lacks every known alias for a required column.
    #[error("Source {source_id}: no {kind} column found (tried: {tried})")]
    MissingColumn {
        /// Source identifier.
        source_id: String,
        /// Which column kind was missing.
        kind: &'static str,
        /// The aliases that were tried, comma-separated.
        tried: String,
    },

    /// Every configured source failed to load.
    #[error("No usable sources: all {count} configured source(s) failed to load")]
    NoUsableSources {
        /// Number of sources that were attempted.
        count: usize,
    },
}
