#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the sim-timelapse animation pipeline.
//!
//! Provides batch subcommands (`inspect`, `render`, `animate`, `sources`)
//! and an interactive flow when invoked without a subcommand.
//!
//! Uses `indicatif-log-bridge` (via
//! [`sim_timelapse_cli_utils::init_logger`]) to route `log` output through
//! `indicatif::MultiProgress` so that log lines and progress bars never
//! fight for the terminal.

mod interactive;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sim_timelapse_source::loader::LoadOptions;
use sim_timelapse_source::registry::all_sources;
use sim_timelapse_timeline::Timeline;
use sim_timelapse_video::{DEFAULT_FPS, DEFAULT_PAUSE_SECONDS};

#[derive(Parser)]
#[command(name = "sim_timelapse", about = "Montreal SIM intervention animation generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all sources and report dataset statistics without rendering
    Inspect {
        /// Directory containing the SIM CSV exports
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Maximum number of records to load per source (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Print the load report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Render the frame sequence without assembling a video
    Render {
        /// Directory containing the SIM CSV exports
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Working directory for the frames/ and output/ staging dirs
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
        /// Maximum number of records to load per source (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Maximum number of frames to render (for testing)
        #[arg(long)]
        frames: Option<usize>,
        /// Clear frames left behind by an earlier run
        #[arg(long)]
        force: bool,
    },
    /// Run the full pipeline: load, render every frame, assemble videos
    Animate {
        /// Directory containing the SIM CSV exports
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Working directory for the frames/ and output/ staging dirs
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
        /// Maximum number of records to load per source (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Maximum number of frames to render (for testing)
        #[arg(long)]
        frames: Option<usize>,
        /// Playback speed in frames per second
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: u32,
        /// Seconds to hold the final frame in the pause variant
        #[arg(long, default_value_t = DEFAULT_PAUSE_SECONDS)]
        pause_seconds: u32,
        /// Skip the trailing-pause video variant
        #[arg(long)]
        skip_pause: bool,
        /// Clear frames left behind by an earlier run
        #[arg(long)]
        force: bool,
    },
    /// List all configured data sources
    Sources,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = sim_timelapse_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi);
    };

    match command {
        Commands::Sources => {
            println!("{:<16} FILE", "ID");
            println!("{}", "-".repeat(72));
            for source in &all_sources() {
                println!("{:<16} {}", source.id(), source.file_name);
            }
        }
        Commands::Inspect {
            data_dir,
            limit,
            json,
        } => {
            let options = LoadOptions { data_dir, limit };
            let (dataset, report) = pipeline::load(&multi, &options, "[1/1]")?;
            let timeline = Timeline::from_dataset(&dataset);
            pipeline::log_report(&report, &dataset, &timeline);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Render {
            data_dir,
            work_dir,
            limit,
            frames,
            force,
        } => {
            let options = LoadOptions { data_dir, limit };
            let dirs = pipeline::RunDirs::prepare(&work_dir, force)?;

            let (dataset, report) = pipeline::load(&multi, &options, "[1/2]")?;
            let timeline = Timeline::from_dataset(&dataset);
            pipeline::log_report(&report, &dataset, &timeline);

            let count =
                pipeline::render_frames(&multi, &dataset, &timeline, &dirs, frames, "[2/2]")?;
            log::info!("{count} frame(s) staged in {}", dirs.frames_dir.display());
        }
        Commands::Animate {
            data_dir,
            work_dir,
            limit,
            frames,
            fps,
            pause_seconds,
            skip_pause,
            force,
        } => {
            let options = LoadOptions { data_dir, limit };
            let pause = if skip_pause { 0 } else { pause_seconds };
            pipeline::run_animate(&multi, &options, &work_dir, force, frames, fps, pause)?;
        }
    }

    Ok(())
}
