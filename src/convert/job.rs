use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::foundation::error::{GrantError, GrantResult};

/// Output file written next to the working directory by default.
pub const DEFAULT_OUTPUT: &str = "grave_vinyl_demo.gif";
/// Target GIF width in pixels; height follows the source aspect ratio.
pub const DEFAULT_WIDTH: u32 = 800;
/// Target GIF frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Wall-clock budget for one transcoder run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Outputs strictly larger than this trigger the size advisory (2 MiB).
pub const SIZE_WARN_BYTES: u64 = 2 * 1024 * 1024;
/// Transcoder diagnostics are cut to their last this-many characters.
pub const STDERR_TAIL_CHARS: usize = 500;

/// One conversion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GifJob {
    /// Source video.
    pub input: PathBuf,
    /// Destination GIF.
    pub output: PathBuf,
    /// Output width in pixels.
    pub width: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Transcoder timeout.
    pub timeout: Duration,
}

impl GifJob {
    /// Job with the fixed default parameters.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            width: DEFAULT_WIDTH,
            fps: DEFAULT_FPS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn validate(&self) -> GrantResult<()> {
        if self.width == 0 {
            return Err(GrantError::validation("gif width must be non-zero"));
        }
        if self.fps == 0 {
            return Err(GrantError::validation("gif fps must be non-zero"));
        }
        if self.timeout.is_zero() {
            return Err(GrantError::validation("transcode timeout must be non-zero"));
        }
        if self.input == self.output {
            return Err(GrantError::validation(format!(
                "output '{}' would overwrite the input",
                self.output.display()
            )));
        }
        Ok(())
    }

    /// `-vf` expression for this job.
    pub fn filter(&self) -> String {
        gif_filter(self.width, self.fps)
    }
}

/// Frame-rate resample, lanczos scale, then a two-pass palette (generate on one branch of the
/// split, apply on the other).
pub fn gif_filter(width: u32, fps: u32) -> String {
    format!(
        "fps={fps},scale={width}:-1:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse"
    )
}

/// Full `ffmpeg` argument list for `job` (program name excluded).
pub fn ffmpeg_args(job: &GifJob) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), job.input.clone().into_os_string()];
    args.push("-vf".into());
    args.push(job.filter().into());
    // Infinite loop, overwrite output.
    args.extend(["-loop", "0", "-y"].map(OsString::from));
    args.push(job.output.clone().into_os_string());
    args
}

/// `true` when `path` names an `.mp4` file (exact, case-sensitive suffix).
pub fn is_mp4_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".mp4"))
}
