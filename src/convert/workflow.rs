use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    convert::{
        ffmpeg::{TranscodeOutcome, Transcoder},
        job::{GifJob, SIZE_WARN_BYTES, STDERR_TAIL_CHARS, is_mp4_name},
    },
    foundation::{
        error::GrantResult,
        fs::{file_size, kib, mib, tail_chars},
        report::Report,
    },
};

const FFMPEG_DOWNLOAD_URL: &str = "https://ffmpeg.org/download.html";
const ONLINE_CONVERTER_URL: &str = "https://ezgif.com/video-to-gif";
const ONLINE_OPTIMIZER_URL: &str = "https://ezgif.com/optimize";

/// Outcome of [`convert_to_gif`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// Transcoder exited cleanly and the output file exists.
    pub success: bool,
    /// Output size in bytes when `success`.
    pub output_bytes: Option<u64>,
    /// Output exceeded [`SIZE_WARN_BYTES`]. Advisory only.
    pub oversized: bool,
}

impl ConvertReport {
    fn failed() -> Self {
        Self::default()
    }
}

/// First `*.mp4` file in `dir`, in sorted name order.
///
/// Entries in `.` are returned as bare file names.
pub fn detect_input(dir: &Path) -> GrantResult<Option<PathBuf>> {
    let rd = std::fs::read_dir(dir)
        .with_context(|| format!("list directory '{}'", dir.display()))?;

    let mut names: Vec<PathBuf> = rd
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_mp4_name(p))
        .filter_map(|p| p.file_name().map(PathBuf::from))
        .collect();
    names.sort();

    Ok(names.into_iter().next().map(|name| {
        if dir == Path::new(".") {
            name
        } else {
            dir.join(name)
        }
    }))
}

/// Pick the input video: an explicit argument wins, otherwise auto-detect in `dir`.
///
/// Returns `None` (after printing usage) when there is nothing to convert.
pub fn resolve_input<W: Write>(
    arg: Option<PathBuf>,
    dir: &Path,
    report: &mut Report<W>,
) -> Option<PathBuf> {
    if let Some(path) = arg {
        return Some(path);
    }

    match detect_input(dir) {
        Ok(Some(found)) => {
            report.step(format!("Auto-detected: {}", found.display()));
            Some(found)
        }
        Ok(None) => {
            report.line("No MP4 files found in current directory");
            report.blank();
            report.line("Usage: gif-convert [input.mp4]");
            None
        }
        Err(e) => {
            report.fail(format!("Could not scan for MP4 files: {e:#}"));
            None
        }
    }
}

/// Convert `job.input` into a looping GIF at `job.output`.
///
/// Never returns an error: every failure is printed and folded into
/// [`ConvertReport::success`]. The transcoder is not touched at all when the input is missing,
/// and is only probed (never run) when it turns out to be unavailable.
#[tracing::instrument(skip(transcoder, report), fields(tool = transcoder.name()))]
pub fn convert_to_gif<W: Write>(
    job: &GifJob,
    transcoder: &dyn Transcoder,
    report: &mut Report<W>,
) -> ConvertReport {
    report.banner("MP4 to GIF Converter - G.rave 2.0");

    if let Err(e) = job.validate() {
        report.fail(format!("Error: {e}"));
        return ConvertReport::failed();
    }

    let Some(input_bytes) = file_size(&job.input) else {
        report.fail(format!("Input file not found: {}", job.input.display()));
        return ConvertReport::failed();
    };
    report.blank();
    report.step(format!(
        "Input: {} ({} KB)",
        job.input.display(),
        kib(input_bytes)
    ));

    if !transcoder.probe() {
        report.fail(format!(
            "{} not found. Install from: {FFMPEG_DOWNLOAD_URL}",
            transcoder.name()
        ));
        report.blank();
        report.line(format!(
            "Alternative: Use online converter at {ONLINE_CONVERTER_URL}"
        ));
        return ConvertReport::failed();
    }
    report.ok(format!("{} found", transcoder.name()));

    report.blank();
    report.step("Converting to GIF...");
    report.line(format!("    Width: {}px", job.width));
    report.line(format!("    FPS: {}", job.fps));

    let outcome = match transcoder.transcode(job) {
        Ok(outcome) => outcome,
        Err(e) => {
            report.blank();
            report.fail(format!("Error: {e}"));
            return ConvertReport::failed();
        }
    };

    match outcome {
        TranscodeOutcome::TimedOut { after } => {
            report.blank();
            report.fail(format!(
                "Conversion timeout (>{} seconds)",
                after.as_secs()
            ));
            ConvertReport::failed()
        }
        TranscodeOutcome::Exited {
            success,
            status,
            stderr,
        } => {
            let produced = if success {
                file_size(&job.output)
            } else {
                None
            };
            match produced {
                Some(bytes) => report_success(job, bytes, report),
                None => {
                    tracing::debug!(%status, success, "transcoder did not produce output");
                    report.blank();
                    report.fail("Conversion failed");
                    report.line(format!("Error: {}", tail_chars(&stderr, STDERR_TAIL_CHARS)));
                    ConvertReport::failed()
                }
            }
        }
    }
}

fn report_success<W: Write>(job: &GifJob, bytes: u64, report: &mut Report<W>) -> ConvertReport {
    report.blank();
    report.success(format!("GIF created: {}", job.output.display()));
    report.line(format!("          Size: {} KB", kib(bytes)));

    let oversized = bytes > SIZE_WARN_BYTES;
    if oversized {
        report.blank();
        report.warning(format!("GIF is large ({} MB)", mib(bytes)));
        report.line("          Consider reducing FPS or width");
        report.line(format!(
            "          Or use online optimizer: {ONLINE_OPTIMIZER_URL}"
        ));
    }

    ConvertReport {
        success: true,
        output_bytes: Some(bytes),
        oversized,
    }
}

/// Closing guidance: next steps on success, the manual online recipe otherwise.
pub fn print_next_steps<W: Write>(success: bool, job: &GifJob, report: &mut Report<W>) {
    report.blank();
    report.rule();
    if success {
        report.success("Ready for Executive Summary!");
        report.rule();
        report.blank();
        report.line("Next steps:");
        report.line(format!("  1. Check {} looks good", job.output.display()));
        report.line("  2. Insert into Executive Summary PDF");
        report.line("  3. Submit to TON Foundation!");
    } else {
        report.line("[ALTERNATIVE] Use online converter");
        report.rule();
        report.blank();
        report.line(format!("1. Go to: {ONLINE_CONVERTER_URL}"));
        report.line(format!("2. Upload: {}", job.input.display()));
        report.line(format!(
            "3. Settings: {}px width, {} FPS",
            job.width, job.fps
        ));
        let name = job
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| job.output.display().to_string());
        report.line(format!("4. Download as: {name}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::report::captured;

    fn scratch(name: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("unit_convert").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn detect_picks_first_mp4_in_name_order() {
        let dir = scratch("detect_order");
        std::fs::write(dir.join("b.mp4"), b"b").unwrap();
        std::fs::write(dir.join("a.mp4"), b"a").unwrap();
        std::fs::write(dir.join("0.mov"), b"x").unwrap();
        std::fs::create_dir_all(dir.join("0.mp4")).unwrap();

        let found = detect_input(&dir).unwrap();
        assert_eq!(found, Some(dir.join("a.mp4")));
    }

    #[test]
    fn detect_returns_none_without_videos() {
        let dir = scratch("detect_none");
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();
        assert_eq!(detect_input(&dir).unwrap(), None);
    }

    #[test]
    fn explicit_argument_wins_over_detection() {
        let dir = scratch("resolve_arg");
        std::fs::write(dir.join("a.mp4"), b"a").unwrap();

        let mut r = Report::new(Vec::new());
        let picked = resolve_input(Some(PathBuf::from("other.mp4")), &dir, &mut r);
        assert_eq!(picked, Some(PathBuf::from("other.mp4")));
        assert!(!captured(r).contains("Auto-detected"));
    }

    #[test]
    fn resolve_prints_usage_when_nothing_found() {
        let dir = scratch("resolve_empty");
        let mut r = Report::new(Vec::new());
        assert_eq!(resolve_input(None, &dir, &mut r), None);
        let text = captured(r);
        assert!(text.contains("No MP4 files found"));
        assert!(text.contains("Usage:"));
    }

    #[test]
    fn failure_guidance_names_input_and_settings() {
        let job = GifJob::new("vinyl.mp4");
        let mut r = Report::new(Vec::new());
        print_next_steps(false, &job, &mut r);
        let text = captured(r);
        assert!(text.contains("[ALTERNATIVE] Use online converter"));
        assert!(text.contains("2. Upload: vinyl.mp4"));
        assert!(text.contains("3. Settings: 800px width, 30 FPS"));
        assert!(text.contains("4. Download as: grave_vinyl_demo.gif"));
    }
}
