use std::fmt::Write as _;

use kurbo::{BezPath, Point};

use crate::assets::color::Rgb8;

/// Font stack for all chart text.
pub const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

/// Typographic points to chart units (charts use 100 units per inch).
pub fn pt(points: f64) -> f64 {
    points * 100.0 / 72.0
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at `x`.
    Start,
    /// Text is centered on `x`.
    Middle,
    /// Text ends at `x`.
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Vertical placement of a text block relative to `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VAlign {
    /// Block hangs below `y`.
    Top,
    /// Block is centered on `y`.
    Center,
    /// Block sits above `y`.
    Bottom,
}

/// Text styling.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle {
    /// Font size in chart units.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Fill color.
    pub color: Rgb8,
    /// Horizontal anchor.
    pub anchor: Anchor,
    /// Vertical placement.
    pub valign: VAlign,
}

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f64 = 1.2;

/// Approximate rendered width of `line` at `size`, used to size label boxes.
pub fn approx_text_width(line: &str, size: f64) -> f64 {
    line.chars().count() as f64 * size * 0.6
}

/// Height of a block of `lines` lines at `size`.
pub fn block_height(lines: usize, size: f64) -> f64 {
    lines as f64 * size * LINE_SPACING
}

/// Minimal SVG document writer for the chart steps.
pub struct SvgDoc {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDoc {
    /// Empty document of `width` x `height` chart units with a solid background.
    pub fn new(width: f64, height: f64, background: Rgb8) -> Self {
        let mut doc = Self {
            width,
            height,
            body: String::new(),
        };
        doc.rect(0.0, 0.0, width, height, 0.0, Some(background), None, 1.0);
        doc
    }

    /// Document size in chart units.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Axis-aligned rectangle with optional corner radius, fill, and stroke.
    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        fill: Option<Rgb8>,
        stroke: Option<(Rgb8, f64)>,
        opacity: f64,
    ) {
        let _ = write!(
            self.body,
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" rx="{radius:.2}" {} opacity="{opacity:.3}"/>"#,
            paint_attrs(fill, stroke),
        );
        self.body.push('\n');
    }

    /// Circle.
    pub fn circle(&mut self, c: Point, r: f64, fill: Rgb8, stroke: Option<(Rgb8, f64)>) {
        let _ = write!(
            self.body,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}" {}/>"#,
            c.x,
            c.y,
            paint_attrs(Some(fill), stroke),
        );
        self.body.push('\n');
    }

    /// Straight line, optionally dashed.
    pub fn line(&mut self, a: Point, b: Point, color: Rgb8, width: f64, dashed: bool) {
        let dash = if dashed {
            format!(r#" stroke-dasharray="{:.2} {:.2}""#, width * 3.7, width * 1.6)
        } else {
            String::new()
        };
        let _ = write!(
            self.body,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{width:.2}"{dash}/>"#,
            a.x,
            a.y,
            b.x,
            b.y,
            color.to_hex(),
        );
        self.body.push('\n');
    }

    /// Filled path.
    pub fn path(&mut self, path: &BezPath, fill: Rgb8, opacity: f64) {
        let _ = write!(
            self.body,
            r#"<path d="{}" fill="{}" opacity="{opacity:.3}"/>"#,
            path.to_svg(),
            fill.to_hex(),
        );
        self.body.push('\n');
    }

    /// Multi-line text block anchored at `at`.
    pub fn text(&mut self, at: Point, lines: &[String], style: TextStyle) {
        if lines.is_empty() {
            return;
        }
        let lh = style.size * LINE_SPACING;
        let block = block_height(lines.len(), style.size);
        // Baseline of the first line; 0.8 of the font size approximates the ascent.
        let first_baseline = match style.valign {
            VAlign::Top => at.y + style.size * 0.8,
            VAlign::Center => at.y - block / 2.0 + style.size * 0.8 + (lh - style.size) / 2.0,
            VAlign::Bottom => at.y - block + style.size * 0.8 + (lh - style.size),
        };

        let _ = write!(
            self.body,
            r#"<text font-family="{FONT_FAMILY}" font-size="{:.2}" font-weight="{}" fill="{}" text-anchor="{}">"#,
            style.size,
            if style.bold { "bold" } else { "normal" },
            style.color.to_hex(),
            style.anchor.as_str(),
        );
        for (i, line) in lines.iter().enumerate() {
            let _ = write!(
                self.body,
                r#"<tspan x="{:.2}" y="{:.2}">{}</tspan>"#,
                at.x,
                first_baseline + i as f64 * lh,
                escape_xml(line),
            );
        }
        self.body.push_str("</text>\n");
    }

    /// Serialized document.
    pub fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

fn paint_attrs(fill: Option<Rgb8>, stroke: Option<(Rgb8, f64)>) -> String {
    let fill = match fill {
        Some(c) => format!(r#"fill="{}""#, c.to_hex()),
        None => r#"fill="none""#.to_owned(),
    };
    match stroke {
        Some((c, w)) => format!(r#"{fill} stroke="{}" stroke-width="{w:.2}""#, c.to_hex()),
        None => fill,
    }
}

/// Escape text content for XML.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("R&D <$1,000>"), "R&amp;D &lt;$1,000&gt;");
    }

    #[test]
    fn text_emits_one_tspan_per_line() {
        let mut doc = SvgDoc::new(100.0, 50.0, Rgb8::WHITE);
        doc.text(
            Point::new(10.0, 10.0),
            &["Start".to_owned(), "$15K Phase 1".to_owned()],
            TextStyle {
                size: 12.0,
                bold: false,
                color: Rgb8::BLACK,
                anchor: Anchor::Middle,
                valign: VAlign::Top,
            },
        );
        let svg = doc.finish();
        assert_eq!(svg.matches("<tspan").count(), 2);
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn points_convert_at_100_units_per_inch() {
        assert!((pt(72.0) - 100.0).abs() < 1e-9);
    }
}
