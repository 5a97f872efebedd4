use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::color::Rgb8,
    foundation::error::{GrantError, GrantResult},
};

/// Everything the asset generator draws.
///
/// `Default` carries the grant-application literals; a JSON plan file may override any subset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetPlan {
    /// Demo-page QR code.
    pub qr: QrPlan,
    /// Budget pie chart.
    pub budget: PiePlan,
    /// Roadmap timeline.
    pub roadmap: TimelinePlan,
}

impl AssetPlan {
    /// Read a plan from a JSON file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> GrantResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read plan '{}'", path.display()))?;
        let plan: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse plan JSON '{}'", path.display()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Pretty JSON form of the plan.
    pub fn to_json_pretty(&self) -> GrantResult<String> {
        Ok(serde_json::to_string_pretty(self).context("serialize plan")?)
    }

    pub fn validate(&self) -> GrantResult<()> {
        self.qr.validate()?;
        self.budget.validate()?;
        self.roadmap.validate()
    }
}

/// QR error-correction level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// QR code parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrPlan {
    /// Encoded payload.
    pub data: String,
    /// Error-correction level.
    pub ec_level: EcLevel,
    /// Pixels per module.
    pub box_size: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
    /// Dark-module color.
    pub fill: Rgb8,
    /// Light-module and quiet-zone color.
    pub background: Rgb8,
    /// Output file name.
    pub file_name: String,
}

impl Default for QrPlan {
    fn default() -> Self {
        Self {
            data: "https://normaldance.com/grave/demo".to_owned(),
            ec_level: EcLevel::H,
            box_size: 10,
            border: 4,
            fill: Rgb8::new(0x00, 0x88, 0xcc),
            background: Rgb8::WHITE,
            file_name: "demo_qr_code.png".to_owned(),
        }
    }
}

impl QrPlan {
    pub fn validate(&self) -> GrantResult<()> {
        if self.data.is_empty() {
            return Err(GrantError::validation("qr data must be non-empty"));
        }
        if self.box_size == 0 {
            return Err(GrantError::validation("qr box_size must be non-zero"));
        }
        validate_file_name(&self.file_name)
    }
}

/// One pie slice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PieSlice {
    /// Label lines, drawn outside the slice.
    pub label: Vec<String>,
    /// Relative size.
    pub size: f64,
    /// Fill color.
    pub color: Rgb8,
    /// Offset from the center as a fraction of the radius.
    #[serde(default)]
    pub explode: f64,
}

/// Budget pie chart parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PiePlan {
    /// Chart title.
    pub title: String,
    /// Slices, drawn counter-clockwise from `start_angle_deg`.
    pub slices: Vec<PieSlice>,
    /// Angle of the first slice edge, degrees counter-clockwise from 3 o'clock.
    pub start_angle_deg: f64,
    /// Draw a soft drop shadow under each slice.
    pub shadow: bool,
    /// Output resolution.
    pub dpi: u32,
    /// Output file name.
    pub file_name: String,
}

impl Default for PiePlan {
    fn default() -> Self {
        fn slice(lines: [&str; 3], size: f64, color: Rgb8, explode: f64) -> PieSlice {
            PieSlice {
                label: lines.iter().map(|s| (*s).to_owned()).collect(),
                size,
                color,
                explode,
            }
        }

        Self {
            title: "Phase 1 Budget Allocation ($15,000)".to_owned(),
            slices: vec![
                slice(
                    ["Development", "80%", "$12,000"],
                    80.0,
                    Rgb8::new(0x00, 0x88, 0xcc),
                    0.05,
                ),
                slice(
                    ["Marketing", "13%", "$2,000"],
                    13.0,
                    Rgb8::new(0x00, 0xcc, 0x88),
                    0.0,
                ),
                slice(
                    ["Legal", "7%", "$1,000"],
                    7.0,
                    Rgb8::new(0xff, 0x88, 0x00),
                    0.0,
                ),
            ],
            start_angle_deg: 90.0,
            shadow: true,
            dpi: 300,
            file_name: "budget_breakdown.png".to_owned(),
        }
    }
}

impl PiePlan {
    pub fn validate(&self) -> GrantResult<()> {
        if self.slices.is_empty() {
            return Err(GrantError::validation("pie chart needs at least one slice"));
        }
        for s in &self.slices {
            if !s.size.is_finite() || s.size <= 0.0 {
                return Err(GrantError::validation(format!(
                    "pie slice sizes must be positive (got {})",
                    s.size
                )));
            }
            if !s.explode.is_finite() || !(0.0..=0.5).contains(&s.explode) {
                return Err(GrantError::validation(
                    "pie slice explode must be within 0..=0.5",
                ));
            }
        }
        validate_dpi(self.dpi)?;
        validate_file_name(&self.file_name)
    }

    /// Sum of slice sizes.
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.size).sum()
    }
}

/// One roadmap milestone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Milestone {
    /// Date drawn above the axis.
    pub date: String,
    /// Label lines drawn below the axis.
    pub label: Vec<String>,
    /// Position along the axis.
    pub x: f64,
    /// Marker and label-box color.
    pub color: Rgb8,
}

/// Roadmap timeline parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelinePlan {
    /// Chart title.
    pub title: String,
    /// Axis extent; milestones must fall inside `0..=axis_max`.
    pub axis_max: f64,
    /// Milestones in drawing order.
    pub milestones: Vec<Milestone>,
    /// Main axis color.
    pub line_color: Rgb8,
    /// Dashed connector color.
    pub connector_color: Rgb8,
    /// Output resolution.
    pub dpi: u32,
    /// Output file name.
    pub file_name: String,
}

impl Default for TimelinePlan {
    fn default() -> Self {
        fn milestone(date: &str, lines: [&str; 2], x: f64, color: Rgb8) -> Milestone {
            Milestone {
                date: date.to_owned(),
                label: lines.iter().map(|s| (*s).to_owned()).collect(),
                x,
                color,
            }
        }

        Self {
            title: "G.rave 2.0 Roadmap - 2025".to_owned(),
            axis_max: 13.0,
            milestones: vec![
                milestone(
                    "Jan 2025",
                    ["Start", "$15K Phase 1"],
                    1.0,
                    Rgb8::new(0x00, 0x88, 0xcc),
                ),
                milestone(
                    "May 2025",
                    ["Mainnet", "Deploy"],
                    5.0,
                    Rgb8::new(0x00, 0xcc, 0x88),
                ),
                milestone(
                    "Jul 2025",
                    ["1K Candles", "Lit"],
                    7.0,
                    Rgb8::new(0xff, 0x88, 0x00),
                ),
                milestone(
                    "Dec 2025",
                    ["$100K", "Revenue"],
                    12.0,
                    Rgb8::new(0xcc, 0x00, 0x88),
                ),
            ],
            line_color: Rgb8::new(0x33, 0x33, 0x33),
            connector_color: Rgb8::new(0xcc, 0xcc, 0xcc),
            dpi: 300,
            file_name: "timeline_roadmap.png".to_owned(),
        }
    }
}

impl TimelinePlan {
    pub fn validate(&self) -> GrantResult<()> {
        if !self.axis_max.is_finite() || self.axis_max <= 0.0 {
            return Err(GrantError::validation("timeline axis_max must be positive"));
        }
        for m in &self.milestones {
            if !m.x.is_finite() || m.x < 0.0 || m.x > self.axis_max {
                return Err(GrantError::validation(format!(
                    "milestone '{}' at x={} is outside the axis 0..={}",
                    m.date, m.x, self.axis_max
                )));
            }
        }
        validate_dpi(self.dpi)?;
        validate_file_name(&self.file_name)
    }
}

fn validate_dpi(dpi: u32) -> GrantResult<()> {
    if !(10..=1200).contains(&dpi) {
        return Err(GrantError::validation(format!(
            "dpi must be within 10..=1200 (got {dpi})"
        )));
    }
    Ok(())
}

/// Output names are bare file names inside the output directory.
fn validate_file_name(name: &str) -> GrantResult<()> {
    let p = Path::new(name);
    let bare = p.file_name().is_some_and(|n| n == p.as_os_str());
    if name.is_empty() || !bare || name.contains(['/', '\\']) {
        return Err(GrantError::validation(format!(
            "output name '{name}' must be a bare file name"
        )));
    }
    Ok(())
}
