use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use grant_visuals::{AssetPlan, GenerateOpts, Report, generate_all};

/// Render the grant PNG assets: demo QR code, budget pie chart, roadmap timeline.
#[derive(Parser, Debug)]
#[command(name = "asset-gen", version)]
struct Cli {
    /// Directory the PNGs are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// JSON plan overriding the built-in labels, colors, and milestones.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Print the effective plan as JSON and exit.
    #[arg(long)]
    dump_plan: bool,

    /// Extra font directory (repeatable). `./fonts` is always scanned.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Do not wait for Enter before exiting on Windows.
    #[arg(long)]
    no_pause: bool,
}

fn main() -> anyhow::Result<()> {
    grant_visuals::init_tracing();
    let cli = Cli::parse();

    let plan = match &cli.plan {
        Some(path) => AssetPlan::from_path(path)
            .with_context(|| format!("load asset plan '{}'", path.display()))?,
        None => AssetPlan::default(),
    };

    if cli.dump_plan {
        println!("{}", plan.to_json_pretty()?);
        return Ok(());
    }

    let mut font_dirs = vec![PathBuf::from("fonts")];
    font_dirs.extend(cli.font_dirs);
    let opts = GenerateOpts {
        out_dir: cli.out_dir,
        font_dirs,
    };

    let mut report = Report::new(std::io::stdout().lock());
    let outcome = generate_all(&plan, &opts, &mut report);
    tracing::debug!(?outcome, "asset generation finished");
    report.finish()?;

    if cfg!(windows) && !cli.no_pause {
        grant_visuals::pause_for_enter();
    }
    Ok(())
}
