use std::io::Write;

/// Width of the `=` rules framing each tool's output.
pub const RULE_WIDTH: usize = 60;

/// Human-readable status writer used by both tools.
///
/// Status lines are the user-facing product of the tools, so they go to a plain writer (stdout in
/// the binaries, a `Vec<u8>` in tests) rather than through `tracing`. Write failures do not
/// interrupt the workflow: the first one is kept and surfaced by [`Report::finish`].
pub struct Report<W: Write> {
    out: W,
    first_err: Option<std::io::Error>,
}

impl<W: Write> Report<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self {
            out,
            first_err: None,
        }
    }

    /// Write one raw line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        if self.first_err.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", text.as_ref()) {
            self.first_err = Some(e);
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.line("");
    }

    /// `====...` rule.
    pub fn rule(&mut self) {
        self.line("=".repeat(RULE_WIDTH));
    }

    /// Rule, title, rule.
    pub fn banner(&mut self, title: &str) {
        self.rule();
        self.line(title);
        self.rule();
    }

    /// `[*] ...` progress line.
    pub fn step(&mut self, msg: impl AsRef<str>) {
        self.line(format!("[*] {}", msg.as_ref()));
    }

    /// `[OK] ...` line.
    pub fn ok(&mut self, msg: impl AsRef<str>) {
        self.line(format!("[OK] {}", msg.as_ref()));
    }

    /// `[FAIL] ...` line.
    pub fn fail(&mut self, msg: impl AsRef<str>) {
        self.line(format!("[FAIL] {}", msg.as_ref()));
    }

    /// Indented `[OK] ...` line for per-item results.
    pub fn item_ok(&mut self, msg: impl AsRef<str>) {
        self.line(format!("  [OK] {}", msg.as_ref()));
    }

    /// Indented `[FAIL] ...` line for per-item results.
    pub fn item_fail(&mut self, msg: impl AsRef<str>) {
        self.line(format!("  [FAIL] {}", msg.as_ref()));
    }

    /// `[WARNING] ...` line.
    pub fn warning(&mut self, msg: impl AsRef<str>) {
        self.line(format!("[WARNING] {}", msg.as_ref()));
    }

    /// `[SUCCESS] ...` line.
    pub fn success(&mut self, msg: impl AsRef<str>) {
        self.line(format!("[SUCCESS] {}", msg.as_ref()));
    }

    /// Flush and return the writer, or the first write error encountered.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.first_err.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Render a captured report as text (tests and diagnostics).
pub fn captured(report: Report<Vec<u8>>) -> String {
    match report.finish() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => format!("<report write failed: {e}>"),
    }
}
