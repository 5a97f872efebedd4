use std::{
    ffi::OsString,
    io::Read,
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    convert::job::{GifJob, ffmpeg_args},
    foundation::error::{GrantError, GrantResult},
};

/// How one transcoder run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranscodeOutcome {
    /// The process exited on its own.
    Exited {
        /// `true` for a zero exit status.
        success: bool,
        /// Human-readable exit status.
        status: String,
        /// Everything the process wrote to stderr.
        stderr: String,
    },
    /// The process outlived the job timeout and was killed.
    TimedOut {
        /// The budget that was exceeded.
        after: Duration,
    },
}

/// External transcoding tool boundary.
///
/// The conversion workflow only ever talks to this trait, so tests can count calls and fake
/// outputs without a real `ffmpeg`.
pub trait Transcoder {
    /// Display name used in diagnostics.
    fn name(&self) -> &str;

    /// `true` when the tool can be invoked.
    fn probe(&self) -> bool;

    /// Run the tool once for `job`, honoring `job.timeout`.
    ///
    /// `Err` is reserved for failures to launch or supervise the process; a process that ran and
    /// failed is reported through [`TranscodeOutcome`].
    fn transcode(&self, job: &GifJob) -> GrantResult<TranscodeOutcome>;
}

/// [`Transcoder`] backed by the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    poll_interval: Duration,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTranscoder {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            poll_interval: Duration::from_millis(50),
        }
    }

    fn command(&self, args: &[OsString]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn probe(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self), fields(program = %self.program.display()))]
    fn transcode(&self, job: &GifJob) -> GrantResult<TranscodeOutcome> {
        let args = ffmpeg_args(job);
        tracing::debug!(?args, "spawning transcoder");

        let mut child = self.command(&args).spawn().map_err(|e| {
            GrantError::transcode(format!(
                "failed to spawn {} (is it installed and on PATH?): {e}",
                self.program.display()
            ))
        })?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| GrantError::transcode("failed to open ffmpeg stderr (unexpected)"))?;
        // Drain stderr concurrently so a verbose run cannot stall on a full pipe.
        let stderr_drain: JoinHandle<std::io::Result<Vec<u8>>> = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        let deadline = Instant::now() + job.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) if Instant::now() >= deadline => break None,
                Ok(None) => std::thread::sleep(self.poll_interval),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GrantError::transcode(format!(
                        "failed to wait for ffmpeg: {e}"
                    )));
                }
            }
        };

        let Some(status) = status else {
            tracing::warn!(timeout = ?job.timeout, "transcoder timed out; killing");
            let _ = child.kill();
            let _ = child.wait();
            // Output is discarded on timeout; the join only reaps the drain thread.
            let _ = stderr_drain.join();
            return Ok(TranscodeOutcome::TimedOut { after: job.timeout });
        };

        let stderr_bytes = join_drain(stderr_drain)?;
        Ok(exited(status, &stderr_bytes))
    }
}

fn join_drain(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> GrantResult<Vec<u8>> {
    handle
        .join()
        .map_err(|_| GrantError::transcode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| GrantError::transcode(format!("ffmpeg stderr read failed: {e}")))
}

fn exited(status: ExitStatus, stderr: &[u8]) -> TranscodeOutcome {
    TranscodeOutcome::Exited {
        success: status.success(),
        status: status.to_string(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    FfmpegTranscoder::new().probe()
}
