//! Visual asset tooling for the G.rave 2.0 grant application.
//!
//! Two independent tools share this crate:
//!
//! - **`gif-convert`** turns a screen-recorded MP4 into a looping GIF by shelling out to the system
//!   `ffmpeg` once, with a fixed palette filter chain and a wall-clock timeout.
//! - **`asset-gen`** renders three PNGs (demo-page QR code, budget pie chart, roadmap timeline)
//!   and then verifies which of them exist on disk.
//!
//! Both tools print line-oriented status through [`Report`] and always run to completion: an
//! operation failure becomes a `[FAIL]` line and a boolean, never a process error.
#![forbid(unsafe_code)]

/// Static PNG asset generation.
pub mod assets;
/// MP4 to GIF conversion.
pub mod convert;
mod foundation;

pub use crate::foundation::error::{GrantError, GrantResult};
pub use crate::foundation::fs::{file_size, kib, mib, tail_chars};
pub use crate::foundation::report::{Report, captured};

pub use crate::assets::color::Rgb8;
pub use crate::assets::generator::{
    AssetStep, GenerateOpts, GenerationOutcome, GenerationSummary, StepResult, check_files,
    default_steps, generate_all, preflight, print_summary, run_and_verify, run_steps,
};
pub use crate::assets::plan::{
    AssetPlan, EcLevel, Milestone, PiePlan, PieSlice, QrPlan, TimelinePlan,
};
pub use crate::convert::ffmpeg::{
    FfmpegTranscoder, TranscodeOutcome, Transcoder, is_ffmpeg_on_path,
};
pub use crate::convert::job::{
    DEFAULT_FPS, DEFAULT_OUTPUT, DEFAULT_TIMEOUT, DEFAULT_WIDTH, GifJob, SIZE_WARN_BYTES,
    STDERR_TAIL_CHARS, ffmpeg_args, gif_filter,
};
pub use crate::convert::workflow::{
    ConvertReport, convert_to_gif, detect_input, print_next_steps, resolve_input,
};

/// Block until the user presses Enter.
///
/// Double-clicked console windows on Windows close as soon as the process exits; the binaries call
/// this there so the report stays readable.
pub fn pause_for_enter() {
    use std::io::{BufRead as _, Write as _};

    print!("\nPress Enter to exit...");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

/// Install the stderr `tracing` subscriber used by both binaries (`RUST_LOG`, default `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
