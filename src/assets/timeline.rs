use std::path::Path;

use kurbo::Point;

use crate::{
    assets::{
        color::Rgb8,
        fonts::FontDb,
        generator::AssetStep,
        plan::TimelinePlan,
        svg::{Anchor, SvgDoc, TextStyle, VAlign, approx_text_width, block_height, pt},
        svg_raster::render_svg_png,
    },
    foundation::error::GrantResult,
};

// 16in x 5in figure at 100 units per inch.
const WIDTH: f64 = 1600.0;
const HEIGHT: f64 = 500.0;
const PLOT_LEFT: f64 = 50.0;
const PLOT_RIGHT: f64 = 1550.0;
const PLOT_TOP: f64 = 100.0;
const PLOT_BOTTOM: f64 = 480.0;

const AXIS_Y: f64 = 0.5;
const DATE_Y: f64 = 0.75;
const LABEL_Y: f64 = 0.25;
const CONNECTOR_UP: f64 = 0.7;
const CONNECTOR_DOWN: f64 = 0.3;

/// Roadmap timeline chart.
pub struct TimelineStep {
    plan: TimelinePlan,
    fonts: FontDb,
}

impl TimelineStep {
    pub fn new(plan: TimelinePlan, fonts: FontDb) -> Self {
        Self { plan, fonts }
    }
}

impl AssetStep for TimelineStep {
    fn title(&self) -> &str {
        "Timeline Roadmap"
    }

    fn file_name(&self) -> &str {
        &self.plan.file_name
    }

    fn hint(&self) -> &str {
        "Check: Verify dates are readable"
    }

    fn render(&self, out_path: &Path) -> GrantResult<()> {
        self.plan.validate()?;
        let svg = timeline_svg(&self.plan);
        render_svg_png(&svg, self.plan.dpi, &self.fonts, out_path)
    }
}

/// Data space (`0..=axis_max` by `0..=1`, y up) to chart units.
#[derive(Clone, Copy, Debug)]
pub struct PlotMap {
    axis_max: f64,
}

impl PlotMap {
    pub fn new(axis_max: f64) -> Self {
        Self { axis_max }
    }

    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(
            PLOT_LEFT + x / self.axis_max * (PLOT_RIGHT - PLOT_LEFT),
            PLOT_BOTTOM - y * (PLOT_BOTTOM - PLOT_TOP),
        )
    }
}

/// SVG document for the timeline chart.
pub fn timeline_svg(plan: &TimelinePlan) -> String {
    let map = PlotMap::new(plan.axis_max);
    let mut doc = SvgDoc::new(WIDTH, HEIGHT, Rgb8::WHITE);

    doc.text(
        Point::new(WIDTH / 2.0, 20.0),
        std::slice::from_ref(&plan.title),
        TextStyle {
            size: pt(22.0),
            bold: true,
            color: plan.line_color,
            anchor: Anchor::Middle,
            valign: VAlign::Top,
        },
    );

    // Connectors sit underneath the axis.
    for m in &plan.milestones {
        let base = map.point(m.x, AXIS_Y);
        for end in [CONNECTOR_UP, CONNECTOR_DOWN] {
            doc.line(base, map.point(m.x, end), plan.connector_color, pt(1.0), true);
        }
    }

    doc.line(
        map.point(0.0, AXIS_Y),
        map.point(plan.axis_max, AXIS_Y),
        plan.line_color,
        pt(4.0),
        false,
    );

    let label_size = pt(12.0);
    let pad = label_size * 0.5;
    for m in &plan.milestones {
        doc.circle(
            map.point(m.x, AXIS_Y),
            pt(20.0) / 2.0,
            m.color,
            Some((Rgb8::WHITE, pt(3.0))),
        );

        doc.text(
            map.point(m.x, DATE_Y),
            std::slice::from_ref(&m.date),
            TextStyle {
                size: pt(14.0),
                bold: true,
                color: plan.line_color,
                anchor: Anchor::Middle,
                valign: VAlign::Bottom,
            },
        );

        let at = map.point(m.x, LABEL_Y);
        let text_w = m
            .label
            .iter()
            .map(|l| approx_text_width(l, label_size))
            .fold(0.0, f64::max);
        let text_h = block_height(m.label.len(), label_size);
        doc.rect(
            at.x - text_w / 2.0 - pad,
            at.y - pad,
            text_w + 2.0 * pad,
            text_h + 2.0 * pad,
            pad,
            Some(m.color),
            Some((m.color, pt(2.0))),
            0.3,
        );
        doc.text(
            at,
            &m.label,
            TextStyle {
                size: label_size,
                bold: false,
                color: Rgb8::BLACK,
                anchor: Anchor::Middle,
                valign: VAlign::Top,
            },
        );
    }

    doc.finish()
}
