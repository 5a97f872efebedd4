use std::{
    any::Any,
    io::Write,
    panic::{AssertUnwindSafe, catch_unwind},
    path::{Path, PathBuf},
};

use crate::{
    assets::{
        fonts::{FontDb, build_fontdb},
        pie::PieStep,
        plan::AssetPlan,
        qr::QrStep,
        timeline::TimelineStep,
    },
    foundation::{
        error::{GrantError, GrantResult},
        fs::{file_size, kib},
        report::Report,
    },
};

/// One independent image-producing step.
pub trait AssetStep {
    /// Human-readable step name.
    fn title(&self) -> &str;

    /// Output file name inside the output directory.
    fn file_name(&self) -> &str;

    /// Follow-up advice printed after a successful render.
    fn hint(&self) -> &str {
        ""
    }

    /// Render into `out_path`.
    fn render(&self, out_path: &Path) -> GrantResult<()>;
}

/// Result of one step as the step itself saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepResult {
    /// Output file name.
    pub file_name: String,
    /// The step returned `Ok`.
    pub ok: bool,
}

/// Final state of an asset-generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Prerequisites failed; no step ran.
    Aborted,
    /// All steps were attempted.
    Completed(GenerationSummary),
}

/// Tally of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Per-step results, in run order.
    pub steps: Vec<StepResult>,
    /// Expected files present on disk after the run.
    pub produced: usize,
    /// Number of expected files.
    pub expected: usize,
    /// Files whose presence disagrees with their step's result.
    pub inconsistent: Vec<String>,
}

impl GenerationSummary {
    /// Every expected file is on disk.
    pub fn all_produced(&self) -> bool {
        self.produced == self.expected
    }
}

/// Settings for [`generate_all`].
#[derive(Clone, Debug)]
pub struct GenerateOpts {
    /// Where the images are written.
    pub out_dir: PathBuf,
    /// Extra directories scanned for fonts, on top of system fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            font_dirs: vec![PathBuf::from("fonts")],
        }
    }
}

/// Check the rendering prerequisites and build the font database.
///
/// This is the one gate that aborts the whole run: chart labels cannot be drawn without at least
/// one font face, and nothing can be written without an output directory.
pub fn preflight<W: Write>(opts: &GenerateOpts, report: &mut Report<W>) -> Option<FontDb> {
    report.step("Preparing rendering prerequisites...");

    let fonts = build_fontdb(&opts.font_dirs);
    if fonts.len() == 0 {
        report.item_fail(
            "No fonts found. Install a TrueType/OpenType font or place one in ./fonts",
        );
        return None;
    }
    report.item_ok(format!("font database ({} faces)", fonts.len()));

    if let Err(e) = std::fs::create_dir_all(&opts.out_dir) {
        report.item_fail(format!(
            "Cannot create output directory {}: {e}",
            opts.out_dir.display()
        ));
        return None;
    }
    report.item_ok(format!("output directory {}", opts.out_dir.display()));

    Some(fonts)
}

/// The three grant assets in their canonical order.
pub fn default_steps(plan: &AssetPlan, fonts: &FontDb) -> Vec<Box<dyn AssetStep>> {
    vec![
        Box::new(QrStep::new(plan.qr.clone())),
        Box::new(PieStep::new(plan.budget.clone(), fonts.clone())),
        Box::new(TimelineStep::new(plan.roadmap.clone(), fonts.clone())),
    ]
}

/// Run every step; a step that errors or panics is reported and the next one still runs.
pub fn run_steps<W: Write>(
    steps: &[Box<dyn AssetStep>],
    out_dir: &Path,
    report: &mut Report<W>,
) -> Vec<StepResult> {
    steps
        .iter()
        .map(|step| {
            report.blank();
            report.step(format!("Generating {}...", step.title()));

            let out_path = out_dir.join(step.file_name());
            let result = catch_unwind(AssertUnwindSafe(|| step.render(&out_path)))
                .unwrap_or_else(|payload| Err(panic_to_error(payload.as_ref())));

            let ok = match result {
                Ok(()) => {
                    report.item_ok(format!("Saved: {}", step.file_name()));
                    if !step.hint().is_empty() {
                        report.line(format!("       {}", step.hint()));
                    }
                    true
                }
                Err(e) => {
                    tracing::warn!(step = step.title(), error = %e, "asset step failed");
                    report.item_fail(format!("Error: {e}"));
                    false
                }
            };

            StepResult {
                file_name: step.file_name().to_owned(),
                ok,
            }
        })
        .collect()
}

fn panic_to_error(payload: &(dyn Any + Send)) -> GrantError {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    GrantError::render(format!("step panicked: {msg}"))
}

/// Report each expected file and return how many exist on disk.
///
/// Only the filesystem counts here; step results are deliberately ignored.
pub fn check_files<W: Write, S: AsRef<str>>(
    names: &[S],
    out_dir: &Path,
    report: &mut Report<W>,
) -> usize {
    report.blank();
    report.step("Checking generated files...");

    let mut produced = 0usize;
    for name in names {
        let name = name.as_ref();
        match file_size(&out_dir.join(name)) {
            Some(bytes) => {
                report.item_ok(format!("{name} ({} KB)", kib(bytes)));
                produced += 1;
            }
            None => report.item_fail(format!("{name} - NOT FOUND")),
        }
    }

    report.blank();
    report.step(format!("Generated: {produced}/{} assets", names.len()));
    produced
}

/// Closing banner with next steps or a warning.
pub fn print_summary<W: Write>(produced: usize, expected: usize, report: &mut Report<W>) {
    report.blank();
    report.rule();
    if produced == expected {
        report.success(format!("All {expected} assets generated!"));
        report.blank();
        report.step("Next steps:");
        report.line("  1. Record 3D vinyl GIF manually (use ScreenToGif)");
        report.line("  2. Insert all 4 visuals into Executive Summary PDF");
        report.line("  3. Test QR code with phone camera");
        report.line("  4. Submit to TON Foundation!");
    } else {
        report.warning(format!("Generated {produced}/{expected} assets"));
        report.line("   Check error messages above");
    }
    report.rule();
}

/// Attempt every step, then tally what is on disk.
///
/// Files that exist despite a failed step (left over from an earlier run, say) still count toward
/// the tally; such disagreements are listed in [`GenerationSummary::inconsistent`].
pub fn run_and_verify<W: Write>(
    steps: &[Box<dyn AssetStep>],
    out_dir: &Path,
    report: &mut Report<W>,
) -> GenerationSummary {
    let results = run_steps(steps, out_dir, report);
    let names: Vec<&str> = steps.iter().map(|s| s.file_name()).collect();
    let produced = check_files(&names, out_dir, report);

    let inconsistent: Vec<String> = results
        .iter()
        .filter(|r| r.ok != file_size(&out_dir.join(&r.file_name)).is_some())
        .map(|r| r.file_name.clone())
        .collect();
    for name in &inconsistent {
        tracing::warn!(file = %name, "step result disagrees with file presence");
    }

    print_summary(produced, names.len(), report);
    GenerationSummary {
        steps: results,
        produced,
        expected: names.len(),
        inconsistent,
    }
}

/// Full asset-generator run: banner, prerequisites, the three steps, verification, summary.
#[tracing::instrument(skip(plan, report))]
pub fn generate_all<W: Write>(
    plan: &AssetPlan,
    opts: &GenerateOpts,
    report: &mut Report<W>,
) -> GenerationOutcome {
    report.banner("G.rave 2.0 - Visual Assets Generator");

    if let Err(e) = plan.validate() {
        report.fail(format!("Invalid asset plan: {e}"));
        return GenerationOutcome::Aborted;
    }

    let Some(fonts) = preflight(opts, report) else {
        report.blank();
        report.fail("Failed to prepare rendering prerequisites. Exiting.");
        return GenerationOutcome::Aborted;
    };

    let steps = default_steps(plan, &fonts);
    GenerationOutcome::Completed(run_and_verify(&steps, &opts.out_dir, report))
}
