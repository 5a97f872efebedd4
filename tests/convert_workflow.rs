use std::{
    cell::Cell,
    path::{Path, PathBuf},
    time::Duration,
};

use grant_visuals::{
    GifJob, GrantError, GrantResult, Report, SIZE_WARN_BYTES, TranscodeOutcome, Transcoder,
    captured, convert_to_gif,
};

enum Behavior {
    WriteBytes(u64),
    Exit { code_ok: bool, stderr: String },
    TimeOut,
    SpawnError,
}

struct FakeTranscoder {
    available: bool,
    behavior: Behavior,
    probes: Cell<usize>,
    runs: Cell<usize>,
}

impl FakeTranscoder {
    fn new(available: bool, behavior: Behavior) -> Self {
        Self {
            available,
            behavior,
            probes: Cell::new(0),
            runs: Cell::new(0),
        }
    }
}

impl Transcoder for FakeTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn probe(&self) -> bool {
        self.probes.set(self.probes.get() + 1);
        self.available
    }

    fn transcode(&self, job: &GifJob) -> GrantResult<TranscodeOutcome> {
        self.runs.set(self.runs.get() + 1);
        match &self.behavior {
            Behavior::WriteBytes(n) => {
                let f = std::fs::File::create(&job.output).map_err(anyhow::Error::from)?;
                f.set_len(*n).map_err(anyhow::Error::from)?;
                Ok(TranscodeOutcome::Exited {
                    success: true,
                    status: "exit status: 0".to_owned(),
                    stderr: String::new(),
                })
            }
            Behavior::Exit { code_ok, stderr } => Ok(TranscodeOutcome::Exited {
                success: *code_ok,
                status: "exit status: 1".to_owned(),
                stderr: stderr.clone(),
            }),
            Behavior::TimeOut => Ok(TranscodeOutcome::TimedOut { after: job.timeout }),
            Behavior::SpawnError => Err(GrantError::transcode("failed to spawn ffmpeg")),
        }
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("convert_workflow").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn job_in(dir: &Path) -> GifJob {
    let input = dir.join("vinyl.mp4");
    std::fs::write(&input, vec![0u8; 3 * 1024]).unwrap();
    GifJob::new(input).with_output(dir.join("out.gif"))
}

#[test]
fn missing_input_fails_without_touching_transcoder() {
    let dir = scratch("missing_input");
    let job = GifJob::new(dir.join("absent.mp4")).with_output(dir.join("out.gif"));
    let t = FakeTranscoder::new(true, Behavior::WriteBytes(10));

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);
    let text = captured(r);

    assert!(!rep.success);
    assert_eq!(t.probes.get(), 0);
    assert_eq!(t.runs.get(), 0);
    assert!(text.contains("[FAIL] Input file not found:"));
    assert!(!dir.join("out.gif").exists());
}

#[test]
fn unavailable_tool_suggests_fallback_and_skips_conversion() {
    let dir = scratch("no_tool");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(false, Behavior::WriteBytes(10));

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);
    let text = captured(r);

    assert!(!rep.success);
    assert_eq!(t.probes.get(), 1);
    assert_eq!(t.runs.get(), 0);
    assert!(text.contains("[FAIL] ffmpeg not found"));
    assert!(text.contains("Alternative: Use online converter at https://ezgif.com/video-to-gif"));
    assert!(text.contains("(3 KB)"));
}

#[test]
fn success_reports_size_from_file_bytes() {
    let dir = scratch("success");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(true, Behavior::WriteBytes(5 * 1024 + 17));

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);
    let text = captured(r);

    assert!(rep.success);
    assert_eq!(rep.output_bytes, Some(5 * 1024 + 17));
    assert!(!rep.oversized);
    assert_eq!(t.runs.get(), 1);
    assert!(text.contains("[SUCCESS] GIF created:"));
    assert!(text.contains("Size: 5 KB"));
    assert!(!text.contains("[WARNING]"));
}

#[test]
fn output_over_threshold_warns_but_succeeds() {
    let dir = scratch("oversized");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(true, Behavior::WriteBytes(SIZE_WARN_BYTES + 1));

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);
    let text = captured(r);

    assert!(rep.success);
    assert!(rep.oversized);
    assert!(text.contains("[SUCCESS] GIF created:"));
    assert!(text.contains("[WARNING] GIF is large (2 MB)"));
    assert!(text.contains("Consider reducing FPS or width"));
}

#[test]
fn output_exactly_at_threshold_does_not_warn() {
    let dir = scratch("at_threshold");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(true, Behavior::WriteBytes(SIZE_WARN_BYTES));

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);

    assert!(rep.success);
    assert!(!rep.oversized);
    assert!(!captured(r).contains("[WARNING]"));
}

#[test]
fn nonzero_exit_prints_truncated_diagnostic() {
    let dir = scratch("nonzero");
    let job = job_in(&dir);
    let stderr = format!("{}{}", "x".repeat(1000), "TAIL-MARKER");
    let t = FakeTranscoder::new(
        true,
        Behavior::Exit {
            code_ok: false,
            stderr,
        },
    );

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);
    let text = captured(r);

    assert!(!rep.success);
    assert!(text.contains("[FAIL] Conversion failed"));
    let err_line = text
        .lines()
        .find(|l| l.starts_with("Error: "))
        .expect("error line");
    assert!(err_line.ends_with("TAIL-MARKER"));
    assert_eq!(err_line.trim_start_matches("Error: ").chars().count(), 500);
}

#[test]
fn clean_exit_without_output_is_failure() {
    let dir = scratch("no_output");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(
        true,
        Behavior::Exit {
            code_ok: true,
            stderr: String::new(),
        },
    );

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);

    assert!(!rep.success);
    assert!(captured(r).contains("[FAIL] Conversion failed"));
}

#[test]
fn timeout_is_failure() {
    let dir = scratch("timeout");
    let mut job = job_in(&dir);
    job.timeout = Duration::from_secs(60);
    let t = FakeTranscoder::new(true, Behavior::TimeOut);

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);

    assert!(!rep.success);
    assert!(captured(r).contains("[FAIL] Conversion timeout (>60 seconds)"));
}

#[test]
fn launch_error_is_reported_not_propagated() {
    let dir = scratch("spawn_error");
    let job = job_in(&dir);
    let t = FakeTranscoder::new(true, Behavior::SpawnError);

    let mut r = Report::new(Vec::new());
    let rep = convert_to_gif(&job, &t, &mut r);

    assert!(!rep.success);
    assert!(captured(r).contains("[FAIL] Error: transcode error: failed to spawn ffmpeg"));
}
