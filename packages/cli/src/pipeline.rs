//! Sequential pipeline orchestration.
//!
//! Chains load -> timeline -> frames -> video with per-step progress
//! bars. The dataset and timeline are fully built and frozen before the
//! first frame renders; frames are rendered strictly in index order; the
//! assembler runs only after every frame exists. A single frame failure
//! aborts the run — a gap in the sequence would desynchronize the video's
//! frame-to-time mapping.

use std::path::{Path, PathBuf};
use std::time::Instant;

use sim_timelapse_cli_utils::{IndicatifProgress, MultiProgress};
use sim_timelapse_incident_models::IncidentDataset;
use sim_timelapse_render::FrameComposer;
use sim_timelapse_source::loader::{LoadOptions, LoadReport, load_sources};
use sim_timelapse_source::registry::all_sources;
use sim_timelapse_timeline::Timeline;
use sim_timelapse_video::{AssembleOptions, assemble};

/// Staging directories for one run: frames under `frames/`, videos under
/// `output/`, both inside the work directory.
///
/// Created once before the run and not reused across runs — a populated
/// frames directory from an earlier run must be cleared explicitly.
#[derive(Debug, Clone)]
pub struct RunDirs {
    /// Directory the frame PNGs are staged into.
    pub frames_dir: PathBuf,
    /// Directory the video containers are written into.
    pub output_dir: PathBuf,
}

impl RunDirs {
    /// Lays out the staging directories under `work_dir`, creating them
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a previous run left frames behind and `force`
    /// is not set, or if directory creation fails.
    pub fn prepare(work_dir: &Path, force: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let frames_dir = work_dir.join("frames");
        let output_dir = work_dir.join("output");

        if frames_dir.is_dir() {
            let leftover = std::fs::read_dir(&frames_dir)?.next().is_some();
            if leftover && !force {
                return Err(format!(
                    "{} already contains frames from an earlier run; pass --force to clear it",
                    frames_dir.display()
                )
                .into());
            }
            if leftover {
                log::info!("Clearing stale frames in {}", frames_dir.display());
                std::fs::remove_dir_all(&frames_dir)?;
            }
        }

        std::fs::create_dir_all(&frames_dir)?;
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            frames_dir,
            output_dir,
        })
    }
}

/// Loads and merges all configured sources into a frozen dataset.
///
/// # Errors
///
/// Returns an error when every source fails to load.
pub fn load(
    multi: &MultiProgress,
    options: &LoadOptions,
    step: &str,
) -> Result<(IncidentDataset, LoadReport), Box<dyn std::error::Error>> {
    let bar = IndicatifProgress::records_bar(multi, &format!("{step} Loading sources"));
    let result = load_sources(&all_sources(), options, &bar);
    if result.is_err() {
        bar.finish_and_clear();
    }
    let (dataset, report) = result?;
    Ok((dataset, report))
}

/// Logs the merged load report the way `inspect` presents it.
pub fn log_report(report: &LoadReport, dataset: &IncidentDataset, timeline: &Timeline) {
    for source in &report.sources {
        log::info!(
            "Source {} ({}): {} rows, {} kept, {} dropped for bad timestamps, {} midnight-flagged",
            source.id,
            source.file_name,
            source.rows_read,
            source.records_kept,
            source.dropped_timestamps,
            source.midnight_flagged,
        );
    }
    for skipped in &report.skipped {
        log::warn!("Source {skipped} was skipped");
    }
    if report.sources.len() > 1 {
        log::info!(
            "Sources are concatenated without deduplication; overlapping export ranges count twice"
        );
    }

    if let Some((start, end)) = dataset.year_range() {
        log::info!("Data covers {start} to {end}");
    }
    log::info!(
        "{} record(s) across {} month(s) with data",
        dataset.len(),
        timeline.len()
    );
}

/// Renders every frame of the timeline in index order.
///
/// Returns the number of frames written. Any single frame failure aborts
/// the run.
///
/// # Errors
///
/// Returns an error when a frame fails to render.
pub fn render_frames(
    multi: &MultiProgress,
    dataset: &IncidentDataset,
    timeline: &Timeline,
    dirs: &RunDirs,
    frame_limit: Option<usize>,
    step: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let total = frame_limit.map_or(timeline.len(), |limit| timeline.len().min(limit));

    let composer = FrameComposer::new(dataset, timeline, &dirs.frames_dir);
    let bar = IndicatifProgress::steps_bar(multi, &format!("{step} Frames"), total as u64);

    for frame_index in 0..total {
        composer.render_frame(frame_index)?;
        bar.inc(1);
    }

    bar.finish(format!("{step} Rendered {total} frame(s)"));
    Ok(total)
}

/// Assembles the rendered frames into the video outputs.
///
/// # Errors
///
/// Returns an error when the sequence is incomplete or every encoder
/// plan fails.
pub fn assemble_videos(
    multi: &MultiProgress,
    dirs: &RunDirs,
    frame_count: usize,
    fps: u32,
    pause_seconds: u32,
    step: &str,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let bar = IndicatifProgress::records_bar(multi, &format!("{step} Encoding video"));

    let options = AssembleOptions {
        frames_dir: dirs.frames_dir.clone(),
        output_dir: dirs.output_dir.clone(),
        frame_count,
        fps,
        pause_seconds,
    };
    let result = assemble(&options);
    match &result {
        Ok(outputs) => bar.finish(format!("{step} Wrote {} video(s)", outputs.len())),
        Err(_) => bar.finish_and_clear(),
    }

    Ok(result?)
}

/// Runs the full pipeline: load -> timeline -> frames -> videos.
///
/// # Errors
///
/// Returns an error when loading, rendering, or assembly fails.
#[allow(clippy::too_many_arguments)]
pub fn run_animate(
    multi: &MultiProgress,
    load_options: &LoadOptions,
    work_dir: &Path,
    force: bool,
    frame_limit: Option<usize>,
    fps: u32,
    pause_seconds: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline_start = Instant::now();
    let dirs = RunDirs::prepare(work_dir, force)?;

    let (dataset, report) = load(multi, load_options, "[1/3]")?;
    let timeline = Timeline::from_dataset(&dataset);
    log_report(&report, &dataset, &timeline);

    if timeline.is_empty() {
        return Err("No months with data; nothing to animate".into());
    }

    let frame_count = render_frames(multi, &dataset, &timeline, &dirs, frame_limit, "[2/3]")?;

    let outputs = assemble_videos(multi, &dirs, frame_count, fps, pause_seconds, "[3/3]")?;
    for output in &outputs {
        log::info!("Video saved to {}", output.display());
    }

    log::info!(
        "Pipeline complete in {:.1}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(())
}
