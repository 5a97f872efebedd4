use std::{path::PathBuf, time::Duration};

use clap::Parser;
use grant_visuals::{
    DEFAULT_FPS, DEFAULT_OUTPUT, DEFAULT_WIDTH, FfmpegTranscoder, GifJob, Report, convert_to_gif,
    print_next_steps, resolve_input,
};

/// Convert an MP4 screen recording into an optimized looping GIF (requires `ffmpeg` on PATH).
#[derive(Parser, Debug)]
#[command(name = "gif-convert", version)]
struct Cli {
    /// Input MP4. Defaults to the first `*.mp4` in `--dir`.
    input: Option<PathBuf>,

    /// Output GIF path.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Output width in pixels (height keeps the aspect ratio).
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Output frame rate.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Give up on ffmpeg after this many seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Directory searched when no input is given.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Do not wait for Enter before exiting on Windows.
    #[arg(long)]
    no_pause: bool,
}

fn main() -> anyhow::Result<()> {
    grant_visuals::init_tracing();
    let cli = Cli::parse();

    let mut report = Report::new(std::io::stdout().lock());
    if let Some(input) = resolve_input(cli.input, &cli.dir, &mut report) {
        let job = GifJob {
            input,
            output: cli.output,
            width: cli.width,
            fps: cli.fps,
            timeout: Duration::from_secs(cli.timeout_secs),
        };
        let outcome = convert_to_gif(&job, &FfmpegTranscoder::new(), &mut report);
        print_next_steps(outcome.success, &job, &mut report);
    }
    report.finish()?;

    if cfg!(windows) && !cli.no_pause {
        grant_visuals::pause_for_enter();
    }
    Ok(())
}
