//! Interactive flow for running the pipeline without CLI flags.
//!
//! Prompts for the tool to run, the data/work directories, and optional
//! advanced parameters, then delegates to the same pipeline functions the
//! batch subcommands use.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use sim_timelapse_cli_utils::MultiProgress;
use sim_timelapse_source::loader::LoadOptions;
use sim_timelapse_timeline::Timeline;
use sim_timelapse_video::{DEFAULT_FPS, DEFAULT_PAUSE_SECONDS};

use crate::pipeline;

/// Top-level tool selection.
enum Tool {
    Animate,
    RenderOnly,
    Inspect,
}

impl Tool {
    const ALL: &[Self] = &[Self::Animate, Self::RenderOnly, Self::Inspect];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Animate => "Run full animation pipeline",
            Self::RenderOnly => "Render frames only",
            Self::Inspect => "Inspect dataset",
        }
    }
}

/// Runs the interactive flow.
///
/// # Errors
///
/// Returns an error if a prompt, the load, the render loop, or the video
/// assembly fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("SIM Intervention Timelapse");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let data_dir: String = Input::new()
        .with_prompt("Data directory (containing the SIM CSV exports)")
        .default(".".to_string())
        .interact_text()?;
    let load_options = LoadOptions {
        data_dir: PathBuf::from(data_dir),
        limit: None,
    };

    if matches!(Tool::ALL[idx], Tool::Inspect) {
        let (dataset, report) = pipeline::load(multi, &load_options, "[1/1]")?;
        let timeline = Timeline::from_dataset(&dataset);
        pipeline::log_report(&report, &dataset, &timeline);
        return Ok(());
    }

    let work_dir: String = Input::new()
        .with_prompt("Working directory (for frames/ and output/)")
        .default(".".to_string())
        .interact_text()?;
    let work_dir = PathBuf::from(work_dir);

    // A populated frames directory means a stale run; confirm before
    // clearing it.
    let frames_dir = work_dir.join("frames");
    let mut force = false;
    if frames_dir.is_dir() && std::fs::read_dir(&frames_dir)?.next().is_some() {
        force = Confirm::new()
            .with_prompt(format!(
                "{} contains frames from an earlier run. Clear them?",
                frames_dir.display()
            ))
            .default(false)
            .interact()?;
        if !force {
            println!("Leaving existing frames untouched.");
            return Ok(());
        }
    }

    match Tool::ALL[idx] {
        Tool::RenderOnly => {
            let dirs = pipeline::RunDirs::prepare(&work_dir, force)?;
            let (dataset, report) = pipeline::load(multi, &load_options, "[1/2]")?;
            let timeline = Timeline::from_dataset(&dataset);
            pipeline::log_report(&report, &dataset, &timeline);
            let count =
                pipeline::render_frames(multi, &dataset, &timeline, &dirs, None, "[2/2]")?;
            log::info!("{count} frame(s) staged in {}", dirs.frames_dir.display());
        }
        Tool::Animate => {
            let (fps, pause_seconds) = prompt_animation_options()?;
            pipeline::run_animate(
                multi,
                &load_options,
                &work_dir,
                force,
                None,
                fps,
                pause_seconds,
            )?;
        }
        // Inspect returned above.
        Tool::Inspect => {}
    }

    Ok(())
}

/// Prompts for fps and trailing pause, defaulting to the standard
/// animation settings.
fn prompt_animation_options() -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let advanced = Confirm::new()
        .with_prompt("Configure advanced options?")
        .default(false)
        .interact()?;

    if !advanced {
        return Ok((DEFAULT_FPS, DEFAULT_PAUSE_SECONDS));
    }

    let fps_str: String = Input::new()
        .with_prompt("Frames per second")
        .default(DEFAULT_FPS.to_string())
        .interact_text()?;
    let fps = fps_str.parse().unwrap_or(DEFAULT_FPS);

    let pause_str: String = Input::new()
        .with_prompt("Final-frame pause in seconds (0 skips the pause variant)")
        .default(DEFAULT_PAUSE_SECONDS.to_string())
        .interact_text()?;
    let pause_seconds = pause_str.parse().unwrap_or(DEFAULT_PAUSE_SECONDS);

    Ok((fps, pause_seconds))
}
