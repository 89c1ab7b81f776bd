#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Video assembly from the ordered frame sequence.
//!
//! Sequences the rendered `frame_%04d.png` artifacts into MP4 containers
//! by shelling out to `ffmpeg`, trying encoder plans in order (libx264
//! first, then mpeg4) and reporting every failure when none succeeds.
//! Consumption order is the frame-index order — the assembler refuses to
//! run when the sequence has gaps, since a missing frame would
//! desynchronize the video's frame-to-time mapping.

use std::path::{Path, PathBuf};
use std::process::Command;

use sim_timelapse_render::{FRAME_SEQUENCE_PATTERN, frame_file_name};

/// Playback speed of the assembled videos, in frames per second.
pub const DEFAULT_FPS: u32 = 2;

/// How long the pause variant holds the final frame, in seconds.
pub const DEFAULT_PAUSE_SECONDS: u32 = 3;

/// File name of the plain video output.
pub const OUTPUT_VIDEO: &str = "montreal_sim_interventions_bilingual.mp4";

/// File name of the trailing-pause video output.
pub const OUTPUT_VIDEO_WITH_PAUSE: &str = "montreal_sim_interventions_bilingual_with_pause.mp4";

/// Environment variable overriding the ffmpeg binary name.
pub const FFMPEG_ENV: &str = "SIM_TIMELAPSE_FFMPEG";

/// Errors that can occur during video assembly.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    /// No frames were rendered, so there is nothing to assemble.
    #[error("No frames available for assembly")]
    NoFrames,

    /// The frame sequence has a gap.
    #[error("Frame {index} is missing from the sequence ({})", path.display())]
    MissingFrame {
        /// Index of the missing frame.
        index: usize,
        /// The path that was expected.
        path: PathBuf,
    },

    /// I/O error launching ffmpeg.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every encoder plan failed.
    #[error("Failed to encode video with ffmpeg:\n{report}")]
    Encode {
        /// Per-plan failure descriptions.
        report: String,
    },
}

/// Options for one assembly run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Directory holding the rendered frame sequence.
    pub frames_dir: PathBuf,
    /// Directory the video containers are written into.
    pub output_dir: PathBuf,
    /// Number of frames in the sequence (indices `0..frame_count`).
    pub frame_count: usize,
    /// Playback speed in frames per second.
    pub fps: u32,
    /// Trailing hold on the final frame for the pause variant, in
    /// seconds. `0` skips the pause variant entirely.
    pub pause_seconds: u32,
}

/// One way of asking ffmpeg to encode the sequence, tried in order.
struct EncoderPlan {
    description: &'static str,
    args: &'static [&'static str],
}

const ENCODER_PLANS: &[EncoderPlan] = &[
    EncoderPlan {
        description: "H.264 (libx264)",
        args: &[
            "-c:v",
            "libx264",
            "-crf",
            "18",
            "-preset",
            "medium",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ],
    },
    EncoderPlan {
        description: "MPEG-4 (mp4v)",
        args: &["-c:v", "mpeg4", "-q:v", "5", "-pix_fmt", "yuv420p"],
    },
];

/// Assembles the rendered frame sequence into one or two videos.
///
/// Always produces the plain video; additionally produces the
/// trailing-pause variant when `pause_seconds > 0`. Returns the paths of
/// the written containers, in that order.
///
/// # Errors
///
/// Returns [`VideoError::NoFrames`] for an empty sequence,
/// [`VideoError::MissingFrame`] when the sequence has a gap, and
/// [`VideoError::Encode`] when every encoder plan fails.
pub fn assemble(options: &AssembleOptions) -> Result<Vec<PathBuf>, VideoError> {
    if options.frame_count == 0 {
        return Err(VideoError::NoFrames);
    }
    verify_sequence(options)?;

    let mut outputs = Vec::new();

    let plain = options.output_dir.join(OUTPUT_VIDEO);
    log::info!(
        "Assembling {} frame(s) at {} fps -> {}",
        options.frame_count,
        options.fps,
        plain.display()
    );
    encode(options, &plain, None)?;
    outputs.push(plain);

    if options.pause_seconds > 0 {
        let paused = options.output_dir.join(OUTPUT_VIDEO_WITH_PAUSE);
        log::info!(
            "Assembling pause variant ({}s hold on final frame) -> {}",
            options.pause_seconds,
            paused.display()
        );
        encode(options, &paused, Some(options.pause_seconds))?;
        outputs.push(paused);
    }

    Ok(outputs)
}

/// Checks that every frame index in `0..frame_count` has its artifact on
/// disk.
fn verify_sequence(options: &AssembleOptions) -> Result<(), VideoError> {
    for index in 0..options.frame_count {
        let path = options.frames_dir.join(frame_file_name(index));
        if !path.is_file() {
            return Err(VideoError::MissingFrame { index, path });
        }
    }
    Ok(())
}

/// Builds the ffmpeg argument list for one plan.
///
/// Kept separate from process spawning so argument construction stays
/// testable without an ffmpeg install.
fn ffmpeg_args(
    options: &AssembleOptions,
    plan: &EncoderPlan,
    pause_seconds: Option<u32>,
    output: &Path,
) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-framerate".to_string(),
        options.fps.to_string(),
        "-i".to_string(),
        options
            .frames_dir
            .join(FRAME_SEQUENCE_PATTERN)
            .to_string_lossy()
            .into_owned(),
    ];

    if let Some(seconds) = pause_seconds {
        args.push("-vf".to_string());
        args.push(format!("tpad=stop_mode=clone:stop_duration={seconds}"));
    }

    args.extend(plan.args.iter().map(ToString::to_string));
    args.push(output.to_string_lossy().into_owned());

    args
}

/// Runs ffmpeg over the sequence, trying each encoder plan in order.
fn encode(
    options: &AssembleOptions,
    output: &Path,
    pause_seconds: Option<u32>,
) -> Result<(), VideoError> {
    let ffmpeg_bin = std::env::var(FFMPEG_ENV).unwrap_or_else(|_| "ffmpeg".to_string());
    let mut failures: Vec<(&str, String)> = Vec::new();

    for plan in ENCODER_PLANS {
        let args = ffmpeg_args(options, plan, pause_seconds, output);
        log::debug!("Running {ffmpeg_bin} {}", args.join(" "));

        match Command::new(&ffmpeg_bin).args(&args).output() {
            Ok(result) if result.status.success() => {
                log::info!("Wrote {} using {}", output.display(), plan.description);
                return Ok(());
            }
            Ok(result) => {
                let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
                failures.push((plan.description, stderr));
            }
            Err(e) => {
                failures.push((plan.description, e.to_string()));
            }
        }
    }

    let mut report = String::new();
    for (description, error) in failures {
        report.push_str(&format!("- {description}: {error}\n"));
    }
    Err(VideoError::Encode {
        report: report.trim_end().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(frames_dir: PathBuf, frame_count: usize) -> AssembleOptions {
        AssembleOptions {
            frames_dir,
            output_dir: PathBuf::from("/tmp/out"),
            frame_count,
            fps: DEFAULT_FPS,
            pause_seconds: DEFAULT_PAUSE_SECONDS,
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let result = assemble(&options(PathBuf::from("/tmp/none"), 0));
        assert!(matches!(result, Err(VideoError::NoFrames)));
    }

    #[test]
    fn gap_in_sequence_is_rejected_before_encoding() {
        let dir = std::env::temp_dir().join(format!("sim_timelapse_video_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(frame_file_name(0)), b"png").unwrap();
        // frame_0001.png is deliberately absent.
        std::fs::write(dir.join(frame_file_name(2)), b"png").unwrap();

        let result = assemble(&options(dir, 3));
        assert!(matches!(
            result,
            Err(VideoError::MissingFrame { index: 1, .. })
        ));
    }

    #[test]
    fn args_address_the_ordered_sequence() {
        let opts = options(PathBuf::from("/work/frames"), 10);
        let args = ffmpeg_args(&opts, &ENCODER_PLANS[0], None, Path::new("/work/out.mp4"));

        let framerate_pos = args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(args[framerate_pos + 1], "2");

        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], "/work/frames/frame_%04d.png");

        assert_eq!(args.last().unwrap(), "/work/out.mp4");
        assert!(args.iter().any(|a| a == "libx264"));
        assert!(!args.iter().any(|a| a.starts_with("tpad")));
    }

    #[test]
    fn pause_variant_clones_the_final_frame() {
        let opts = options(PathBuf::from("/work/frames"), 10);
        let args = ffmpeg_args(&opts, &ENCODER_PLANS[1], Some(3), Path::new("/work/pause.mp4"));

        let vf_pos = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf_pos + 1], "tpad=stop_mode=clone:stop_duration=3");
        assert!(args.iter().any(|a| a == "mpeg4"));
    }

    #[test]
    fn fallback_plan_exists_for_builds_without_libx264() {
        assert!(ENCODER_PLANS.len() >= 2);
        assert_eq!(ENCODER_PLANS[0].description, "H.264 (libx264)");
    }
}
