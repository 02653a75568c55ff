//! The procedurally drawn base pumpkin.

use crate::raster::{Pixmap, blend_over, rgba};
use crate::renderer::{RenderError, RenderResult};
use jackpatch_core::{BaseImage, ImageData};
use kurbo::{ParamCurveNearest, Point, QuadBez, Rect};
use peniko::Color;

const PUMPKIN_LIGHT: Color = Color::from_rgba8(0xFF, 0x8C, 0x00, 0xFF);
const PUMPKIN_MID: Color = Color::from_rgba8(0xFF, 0x6B, 0x00, 0xFF);
const PUMPKIN_DARK: Color = Color::from_rgba8(0xE5, 0x5A, 0x00, 0xFF);
const STEM: Color = Color::from_rgba8(0x8B, 0x45, 0x13, 0xFF);

const SHADOW_OPACITY: f32 = 0.6;

/// Radial gradient color at normalized distance `t` from the highlight.
fn gradient(t: f64) -> [u8; 4] {
    let (from, to, local) = if t <= 0.7 {
        (rgba(PUMPKIN_LIGHT), rgba(PUMPKIN_MID), t / 0.7)
    } else {
        (rgba(PUMPKIN_MID), rgba(PUMPKIN_DARK), ((t - 0.7) / 0.3).min(1.0))
    };
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;
    [
        lerp(from[0], to[0]),
        lerp(from[1], to[1]),
        lerp(from[2], to[2]),
        255,
    ]
}

/// Anti-aliased coverage of an axis-aligned ellipse at `p`.
fn ellipse_coverage(p: Point, center: Point, rx: f64, ry: f64) -> f32 {
    if rx <= 0.0 || ry <= 0.0 {
        return 0.0;
    }
    let dx = (p.x - center.x) / rx;
    let dy = (p.y - center.y) / ry;
    let f = (dx * dx + dy * dy).sqrt();
    // Approximate distance to the outline in pixels
    let distance = (f - 1.0) * rx.min(ry);
    (0.5 - distance).clamp(0.0, 1.0) as f32
}

/// Draw the pumpkin at `width` x `height` pixels.
///
/// An orange body with a radial highlight towards the top, a darker lower
/// lobe at 60% opacity and a curved brown stem.
pub fn render_pumpkin(width: u32, height: u32) -> RenderResult<ImageData> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyViewport { width, height });
    }
    let w = width as f64;
    let h = height as f64;
    let center = Point::new(w / 2.0, h / 2.0);
    let rx = w * 0.48;
    let ry = h * 0.52;

    // Gradient spans the body's bounding box, highlight at (50%, 30%)
    let body = Rect::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry);
    let highlight = Point::new(body.x0 + body.width() * 0.5, body.y0 + body.height() * 0.3);

    let shadow_center = Point::new(center.x, center.y + h * 0.08);
    let shadow = rgba(PUMPKIN_DARK);

    let stem_y = h * 0.08;
    let stem = QuadBez::new(
        Point::new(center.x - w * 0.2, stem_y),
        Point::new(center.x, stem_y * 0.6),
        Point::new(center.x + w * 0.2, stem_y),
    );
    let stem_half_width = w * 0.02 / 2.0;
    let stem_color = rgba(STEM);

    let mut pixmap = Pixmap::new(width, height, [0, 0, 0, 0]);
    for y in 0..height {
        for x in 0..width {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let mut pixel = [0, 0, 0, 0];

            let coverage = ellipse_coverage(p, center, rx, ry);
            if coverage > 0.0 {
                let gx = (p.x - highlight.x) / (body.width() * 0.5);
                let gy = (p.y - highlight.y) / (body.height() * 0.5);
                pixel = blend_over(pixel, gradient((gx * gx + gy * gy).sqrt()), coverage);
            }

            let coverage = ellipse_coverage(p, shadow_center, rx * 0.9, ry * 0.85);
            if coverage > 0.0 {
                pixel = blend_over(pixel, shadow, coverage * SHADOW_OPACITY);
            }

            let distance = stem.nearest(p, 1e-3).distance_sq.sqrt();
            let coverage = (stem_half_width + 0.5 - distance).clamp(0.0, 1.0) as f32;
            if coverage > 0.0 {
                pixel = blend_over(pixel, stem_color, coverage);
            }

            if pixel[3] > 0 {
                pixmap.blend(x, y, pixel, 1.0);
            }
        }
    }

    let image = pixmap.into_image();
    Ok(ImageData::new(image.width, image.height, image.rgba_data)?)
}

/// A base image filling `rect`, drawn at its whole-pixel size.
pub fn pumpkin_base(rect: Rect) -> RenderResult<BaseImage> {
    let width = rect.width().floor().max(0.0) as u32;
    let height = rect.height().floor().max(0.0) as u32;
    let image = render_pumpkin(width, height)?;
    log::debug!("Drew base pumpkin at {}x{}", width, height);
    Ok(BaseImage::new(rect, image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_stops() {
        assert_eq!(gradient(0.0), rgba(PUMPKIN_LIGHT));
        assert_eq!(gradient(0.7), rgba(PUMPKIN_MID));
        assert_eq!(gradient(1.0), rgba(PUMPKIN_DARK));
        assert_eq!(gradient(3.0), rgba(PUMPKIN_DARK));
    }

    #[test]
    fn test_pumpkin_shape() {
        let image = render_pumpkin(200, 200).unwrap();
        assert_eq!((image.width(), image.height()), (200, 200));

        // Corners lie outside the body
        assert_eq!(image.pixel(0, 0).unwrap()[3], 0);
        assert_eq!(image.pixel(199, 199).unwrap()[3], 0);

        // Body is opaque orange
        let [r, g, b, a] = image.pixel(100, 100).unwrap();
        assert_eq!(a, 255);
        assert!(r > g && g > b);

        // Stem crosses the top centre at y = 0.064 h
        assert_eq!(image.pixel(100, 12), Some(rgba(STEM)));
    }

    #[test]
    fn test_pumpkin_base_uses_rect() {
        let rect = Rect::new(47.0, 43.5, 473.0, 436.5);
        let base = pumpkin_base(rect).unwrap();
        assert_eq!(base.rect, rect);
        assert_eq!((base.image.width(), base.image.height()), (426, 393));
    }

    #[test]
    fn test_empty_size_is_rejected() {
        assert!(render_pumpkin(0, 10).is_err());
    }
}
