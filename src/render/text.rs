use ab_glyph::{point, Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::RgbImage;

/// Anti-aliased text onto an `RgbImage`, using the sans-serif face egui ships.
pub struct TextPainter {
    font: FontRef<'static>,
}

impl TextPainter {
    /// `None` only if the bundled font fails to parse.
    pub fn new() -> Option<Self> {
        match FontRef::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT) {
            Ok(font) => Some(Self { font }),
            Err(err) => {
                tracing::warn!("bundled font unusable, rendering without text: {err}");
                None
            }
        }
    }

    /// Advance width of `text` at `px` pixels, kerning included.
    pub fn width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    pub fn line_height(&self, px: f32) -> f32 {
        self.font.as_scaled(PxScale::from(px)).height()
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw(&self, img: &mut RgbImage, text: &str, (x, y): (f32, f32), px: f32, color: [u8; 3]) {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let baseline = y + scaled.ascent();
        let (w, h) = (img.width() as i64, img.height() as i64);
        let mut caret = x;
        let mut prev: Option<GlyphId> = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue; // whitespace
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if (0..w).contains(&px) && (0..h).contains(&py) {
                    let pixel = img.get_pixel_mut(px as u32, py as u32);
                    let a = coverage.clamp(0.0, 1.0);
                    for k in 0..3 {
                        let blended = pixel.0[k] as f32 * (1.0 - a) + color[k] as f32 * a;
                        pixel.0[k] = blended.round() as u8;
                    }
                }
            });
        }
    }

    /// Draw `text` centred on (cx, cy).
    pub fn draw_centered(&self, img: &mut RgbImage, text: &str, (cx, cy): (f32, f32), px: f32, color: [u8; 3]) {
        let x = cx - self.width(text, px) * 0.5;
        let y = cy - self.line_height(px) * 0.5;
        self.draw(img, text, (x, y), px, color);
    }
}
