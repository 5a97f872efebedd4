use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::fonts::{FontDb, font_resolver},
    foundation::{
        error::{GrantError, GrantResult},
        fs::ensure_parent_dir,
    },
};

// Avoid pathological allocations from hand-edited plans.
const MAX_DIM: u32 = 16_384;

/// Parse `svg` with the shared font database.
pub fn parse_svg(svg: &str, fonts: &FontDb) -> GrantResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: fonts.clone(),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Pixel size of `tree` rendered at `scale`.
pub fn raster_size(tree: &usvg::Tree, scale: f32) -> GrantResult<(u32, u32)> {
    fn to_px(v: f32) -> GrantResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(GrantError::render("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width() * scale)?;
    let h = to_px(size.height() * scale)?;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(GrantError::render(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

/// Rasterize `tree` at `scale`.
///
/// The document always paints an opaque background, so resvg's premultiplied output equals
/// straight RGBA and can be handed to `image` as-is.
pub fn rasterize(tree: &usvg::Tree, scale: f32) -> GrantResult<image::RgbaImage> {
    let (w, h) = raster_size(tree, scale)?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| GrantError::render("failed to allocate svg pixmap"))?;
    pixmap.fill(resvg::tiny_skia::Color::WHITE);

    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    image::RgbaImage::from_raw(w, h, pixmap.take())
        .ok_or_else(|| GrantError::render("pixmap size mismatch (unexpected)"))
}

/// Parse, rasterize at `dpi`, and write a PNG.
pub fn render_svg_png(svg: &str, dpi: u32, fonts: &FontDb, out_path: &Path) -> GrantResult<()> {
    let tree = parse_svg(svg, fonts)?;
    // Chart documents are laid out at 100 units per inch.
    let img = rasterize(&tree, dpi as f32 / 100.0)?;
    save_png(&img, out_path)
}

/// Write an RGBA image as PNG, creating parent directories.
pub fn save_png(img: &image::RgbaImage, out_path: &Path) -> GrantResult<()> {
    ensure_parent_dir(out_path)?;
    image::save_buffer_with_format(
        out_path,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out_path.display()))?;
    Ok(())
}
