//! Static grant assets: a QR code, a budget pie chart, and a roadmap timeline.
//!
//! Charts are composed as SVG documents and rasterized with `resvg`; the QR code is painted
//! directly into an RGBA buffer. All three land as PNG files.

/// `#RRGGBB` colors used by plans.
pub mod color;
/// Font discovery for chart labels.
pub mod fonts;
/// Step orchestration, verification, and summary.
pub mod generator;
/// Pie chart step.
pub mod pie;
/// Serializable asset parameters with the grant defaults.
pub mod plan;
/// QR code step.
pub mod qr;
/// Minimal SVG writer.
pub mod svg;
/// SVG rasterization and PNG output.
pub mod svg_raster;
/// Timeline chart step.
pub mod timeline;
