use std::{f64::consts::PI, path::Path};

use kurbo::{Arc as ArcShape, BezPath, Point, Vec2};

use crate::{
    assets::{
        color::Rgb8,
        fonts::FontDb,
        generator::AssetStep,
        plan::PiePlan,
        svg::{Anchor, SvgDoc, TextStyle, VAlign, pt},
        svg_raster::render_svg_png,
    },
    foundation::error::GrantResult,
};

// Layout in chart units (100 per inch): a 10in square figure.
const FIGURE: f64 = 1000.0;
const CENTER: Point = Point::new(500.0, 540.0);
const RADIUS: f64 = 330.0;
const LABEL_DISTANCE: f64 = 1.1;
const SHADOW_OFFSET: f64 = 0.02;

/// Budget allocation pie chart.
pub struct PieStep {
    plan: PiePlan,
    fonts: FontDb,
}

impl PieStep {
    pub fn new(plan: PiePlan, fonts: FontDb) -> Self {
        Self { plan, fonts }
    }
}

impl AssetStep for PieStep {
    fn title(&self) -> &str {
        "Budget Pie Chart"
    }

    fn file_name(&self) -> &str {
        &self.plan.file_name
    }

    fn hint(&self) -> &str {
        "Preview: Open file to verify colors"
    }

    fn render(&self, out_path: &Path) -> GrantResult<()> {
        self.plan.validate()?;
        let svg = pie_svg(&self.plan);
        render_svg_png(&svg, self.plan.dpi, &self.fonts, out_path)
    }
}

/// Angular extent of one slice, radians counter-clockwise from 3 o'clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceGeometry {
    /// Edge where the slice starts.
    pub start: f64,
    /// Angular size (always positive).
    pub sweep: f64,
}

impl SliceGeometry {
    /// Bisector angle.
    pub fn mid(&self) -> f64 {
        self.start + self.sweep / 2.0
    }
}

/// Slice angles for `plan`, laid out counter-clockwise from the start angle.
pub fn slice_geometry(plan: &PiePlan) -> Vec<SliceGeometry> {
    let total = plan.total();
    let mut start = plan.start_angle_deg.to_radians();
    plan.slices
        .iter()
        .map(|s| {
            let sweep = 2.0 * PI * s.size / total;
            let g = SliceGeometry { start, sweep };
            start += sweep;
            g
        })
        .collect()
}

/// Unit vector for a counter-clockwise angle, in y-down screen space.
fn screen_dir(theta: f64) -> Vec2 {
    let v = Vec2::from_angle(theta);
    Vec2::new(v.x, -v.y)
}

/// Wedge outline. Screen space is y-down, so counter-clockwise angles are negated.
fn wedge(center: Point, radius: f64, g: SliceGeometry) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(center);
    path.line_to(center + screen_dir(g.start) * radius);
    let arc = ArcShape {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: -g.start,
        sweep_angle: -g.sweep,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(0.1));
    path.close_path();
    path
}

/// SVG document for the pie chart.
pub fn pie_svg(plan: &PiePlan) -> String {
    let mut doc = SvgDoc::new(FIGURE, FIGURE, Rgb8::WHITE);

    doc.text(
        Point::new(FIGURE / 2.0, 60.0),
        std::slice::from_ref(&plan.title),
        TextStyle {
            size: pt(20.0),
            bold: true,
            color: Rgb8::BLACK,
            anchor: Anchor::Middle,
            valign: VAlign::Top,
        },
    );

    let geometry = slice_geometry(plan);
    let centers: Vec<Point> = plan
        .slices
        .iter()
        .zip(&geometry)
        .map(|(s, g)| CENTER + screen_dir(g.mid()) * (s.explode * RADIUS))
        .collect();

    if plan.shadow {
        // Down and to the left, like a light source at the upper right.
        let offset = Vec2::new(-SHADOW_OFFSET * RADIUS, SHADOW_OFFSET * RADIUS);
        for ((s, g), c) in plan.slices.iter().zip(&geometry).zip(&centers) {
            doc.path(&wedge(*c + offset, RADIUS, *g), s.color.scaled(0.3), 0.5);
        }
    }

    for ((s, g), c) in plan.slices.iter().zip(&geometry).zip(&centers) {
        doc.path(&wedge(*c, RADIUS, *g), s.color, 1.0);
    }

    for ((s, g), c) in plan.slices.iter().zip(&geometry).zip(&centers) {
        let dir = screen_dir(g.mid());
        let at = *c + dir * (LABEL_DISTANCE * RADIUS);
        doc.text(
            at,
            &s.label,
            TextStyle {
                size: pt(16.0),
                bold: true,
                color: Rgb8::BLACK,
                anchor: if dir.x >= 0.0 {
                    Anchor::Start
                } else {
                    Anchor::End
                },
                valign: VAlign::Center,
            },
        );
    }

    doc.finish()
}
