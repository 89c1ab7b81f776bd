#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Composite bilingual chart frame rendering.
//!
//! [`FrameComposer`] turns one timeline index into one 1920x1080 PNG: a
//! full-width cumulative trend panel on top, the current-month category
//! pie bottom-left, the rolling 12-month totals bottom-right, framed by
//! bilingual title and footer bands. Frames are addressed by zero-padded
//! index so their lexicographic order is the chronological order the video
//! assembler depends on.

pub mod panels;
pub mod text;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackendError;
use sim_timelapse_incident_models::IncidentDataset;
use sim_timelapse_timeline::Timeline;
use sim_timelapse_timeline::aggregate::FrameAggregates;

/// Rendered frame width, in pixels.
pub const FRAME_WIDTH: u32 = 1920;

/// Rendered frame height, in pixels.
pub const FRAME_HEIGHT: u32 = 1080;

/// printf-style sequence pattern matching [`frame_file_name`], for
/// consumers that address the whole ordered sequence (ffmpeg).
pub const FRAME_SEQUENCE_PATTERN: &str = "frame_%04d.png";

/// Pixel heights of the stacked bands (title, trend, panels; the footer
/// takes the remainder).
const TITLE_BAND: i32 = 150;
const TREND_BAND: i32 = 430;
const PANEL_BAND: i32 = 460;

/// Pixel width of the pie panel within the lower band.
const PIE_PANEL_WIDTH: i32 = 1080;

/// Errors that can occur while rendering a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The requested frame index is outside the timeline.
    #[error("Frame index {index} out of range (timeline has {timeline_len} bucket(s))")]
    InvalidFrameIndex {
        /// The requested index.
        index: usize,
        /// Number of buckets in the timeline.
        timeline_len: usize,
    },

    /// Chart drawing or image encoding failed.
    #[error("Drawing failed: {0}")]
    Draw(#[from] DrawingAreaErrorKind<BitMapBackendError>),
}

/// Returns the artifact file name for a frame index (`"frame_0042.png"`).
///
/// Zero-padded so the lexicographic sort order of the artifacts equals
/// their chronological order.
#[must_use]
pub fn frame_file_name(frame_index: usize) -> String {
    format!("frame_{frame_index:04}.png")
}

/// Renders composite frames from a frozen dataset and timeline.
///
/// Both inputs are shared borrows: the composer can never mutate them, so
/// rendering the same index twice yields identical aggregate numbers.
pub struct FrameComposer<'a> {
    dataset: &'a IncidentDataset,
    timeline: &'a Timeline,
    frames_dir: PathBuf,
    /// Stamped once per run so every frame's footer carries the same
    /// generation date.
    generated_on: NaiveDate,
}

impl<'a> FrameComposer<'a> {
    /// Creates a composer writing into `frames_dir` (which must already
    /// exist — staging directories are created once before the run).
    #[must_use]
    pub fn new(
        dataset: &'a IncidentDataset,
        timeline: &'a Timeline,
        frames_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dataset,
            timeline,
            frames_dir: frames_dir.into(),
            generated_on: Local::now().date_naive(),
        }
    }

    /// Returns the staging directory frames are written into.
    #[must_use]
    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    /// Returns the artifact path for a frame index.
    #[must_use]
    pub fn frame_path(&self, frame_index: usize) -> PathBuf {
        self.frames_dir.join(frame_file_name(frame_index))
    }

    /// Renders the frame for `frame_index` and persists it as one PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidFrameIndex`] when the index is out of
    /// range, or [`RenderError::Draw`] when chart drawing or image
    /// encoding fails. Any error is fatal to the run — a skipped frame
    /// would desynchronize the video's frame-to-time mapping.
    pub fn render_frame(&self, frame_index: usize) -> Result<PathBuf, RenderError> {
        let aggregates = FrameAggregates::compute(self.dataset, self.timeline, frame_index)
            .ok_or(RenderError::InvalidFrameIndex {
                index: frame_index,
                timeline_len: self.timeline.len(),
            })?;

        let path = self.frame_path(frame_index);
        {
            let root =
                BitMapBackend::new(&path, (FRAME_WIDTH, FRAME_HEIGHT)).into_drawing_area();
            root.fill(&WHITE)?;

            let (title_area, body) = root.split_vertically(TITLE_BAND);
            panels::draw_title(&title_area, aggregates.current)?;

            let (trend_area, lower) = body.split_vertically(TREND_BAND);
            panels::draw_trend(&trend_area, &aggregates)?;

            let (panel_area, footer_area) = lower.split_vertically(PANEL_BAND);
            let (pie_area, bar_area) = panel_area.split_horizontally(PIE_PANEL_WIDTH);
            panels::draw_breakdown(&pie_area, &aggregates)?;
            panels::draw_rolling(&bar_area, &aggregates)?;

            panels::draw_footer(&footer_area, self.generated_on)?;

            root.present()?;
        }
        log::debug!("Rendered frame {frame_index} -> {}", path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sim_timelapse_incident_models::{IncidentCategory, IncidentRecord};

    use super::*;

    #[test]
    fn frame_file_names_are_zero_padded_and_ordered() {
        assert_eq!(frame_file_name(0), "frame_0000.png");
        assert_eq!(frame_file_name(42), "frame_0042.png");
        assert_eq!(frame_file_name(215), "frame_0215.png");

        let names: Vec<String> = (0..250).map(frame_file_name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn sequence_pattern_matches_file_naming() {
        // ffmpeg consumes the same sequence the composer writes.
        assert_eq!(
            FRAME_SEQUENCE_PATTERN.replace("%04d", "0007"),
            frame_file_name(7)
        );
    }

    #[test]
    fn out_of_range_index_fails_before_touching_disk() {
        let datetime = NaiveDate::from_ymd_opt(2020, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let dataset = IncidentDataset::new(vec![IncidentRecord::new(
            datetime,
            IncidentCategory::FireAlarm,
            None,
        )]);
        let timeline = Timeline::from_dataset(&dataset);
        let composer = FrameComposer::new(&dataset, &timeline, "/nonexistent/frames");

        let err = composer.render_frame(5).unwrap_err();
        assert!(matches!(
            err,
            RenderError::InvalidFrameIndex {
                index: 5,
                timeline_len: 1
            }
        ));
    }

    #[test]
    fn frame_paths_land_in_the_staging_dir() {
        let dataset = IncidentDataset::new(Vec::new());
        let timeline = Timeline::from_dataset(&dataset);
        let composer = FrameComposer::new(&dataset, &timeline, "/tmp/staging/frames");
        assert_eq!(
            composer.frame_path(3),
            PathBuf::from("/tmp/staging/frames/frame_0003.png")
        );
    }
}
