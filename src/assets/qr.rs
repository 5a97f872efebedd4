use std::path::Path;

use qrcode::QrCode;

use crate::{
    assets::{generator::AssetStep, plan::QrPlan, svg_raster::save_png},
    foundation::error::{GrantError, GrantResult},
};

/// Scannable QR code for the demo page.
pub struct QrStep {
    plan: QrPlan,
}

impl QrStep {
    pub fn new(plan: QrPlan) -> Self {
        Self { plan }
    }
}

impl AssetStep for QrStep {
    fn title(&self) -> &str {
        "QR Code"
    }

    fn file_name(&self) -> &str {
        &self.plan.file_name
    }

    fn hint(&self) -> &str {
        "Test: Scan with phone camera"
    }

    fn render(&self, out_path: &Path) -> GrantResult<()> {
        let img = render_qr(&self.plan)?;
        save_png(&img, out_path)
    }
}

/// Encode and paint the code: `box_size` pixels per module, `border` modules of quiet zone.
///
/// The smallest symbol version that fits the payload at the requested error-correction level is
/// chosen automatically.
pub fn render_qr(plan: &QrPlan) -> GrantResult<image::RgbaImage> {
    plan.validate()?;
    let code = QrCode::with_error_correction_level(plan.data.as_bytes(), plan.ec_level.into())
        .map_err(|e| GrantError::render(format!("qr encode failed: {e}")))?;

    let modules = code.width() as u32;
    let side_modules = modules + 2 * plan.border;
    let side = side_modules
        .checked_mul(plan.box_size)
        .filter(|&s| s <= 16_384)
        .ok_or_else(|| GrantError::render("qr image too large"))?;

    let mut img = image::RgbaImage::from_pixel(side, side, plan.background.to_rgba_pixel());
    let dark = plan.fill.to_rgba_pixel();
    for my in 0..modules {
        for mx in 0..modules {
            if code[(mx as usize, my as usize)] != qrcode::Color::Dark {
                continue;
            }
            let x0 = (mx + plan.border) * plan.box_size;
            let y0 = (my + plan.border) * plan.box_size;
            for y in y0..y0 + plan.box_size {
                for x in x0..x0 + plan.box_size {
                    img.put_pixel(x, y, dark);
                }
            }
        }
    }

    tracing::debug!(modules, side, "qr code rendered");
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::color::Rgb8;

    #[test]
    fn image_side_includes_quiet_zone() {
        let plan = QrPlan::default();
        let img = render_qr(&plan).unwrap();
        let code = QrCode::with_error_correction_level(
            plan.data.as_bytes(),
            qrcode::EcLevel::H,
        )
        .unwrap();
        let expected = (code.width() as u32 + 2 * plan.border) * plan.box_size;
        assert_eq!(img.dimensions(), (expected, expected));
    }

    #[test]
    fn quiet_zone_is_background_and_finder_is_dark() {
        let plan = QrPlan::default();
        let img = render_qr(&plan).unwrap();
        assert_eq!(*img.get_pixel(0, 0), Rgb8::WHITE.to_rgba_pixel());

        // Top-left module of the finder pattern sits right after the quiet zone.
        let p = plan.border * plan.box_size;
        assert_eq!(*img.get_pixel(p, p), plan.fill.to_rgba_pixel());
    }

    #[test]
    fn zero_box_size_is_rejected() {
        let plan = QrPlan {
            box_size: 0,
            ..QrPlan::default()
        };
        assert!(render_qr(&plan).is_err());
    }
}
