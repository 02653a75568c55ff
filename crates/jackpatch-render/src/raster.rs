//! CPU rasterizer.

use crate::renderer::{RenderContext, RenderError, RenderResult, RenderedImage, Renderer};
use jackpatch_core::selection::{
    HandleKind, anchor_position, get_handles, rotate_handle_position,
};
use jackpatch_core::{ImageData, PlacedPart};
use kurbo::{Affine, Line, ParamCurveNearest, Point, Rect};
use peniko::Color;

/// Handle square side in logical pixels.
const HANDLE_SIZE: f64 = 8.0;
/// Selection outline width in logical pixels.
const OUTLINE_WIDTH: f64 = 1.0;

/// Byte offset of pixel (x, y) in a row-major RGBA buffer `width` pixels wide.
pub(crate) fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Straight-alpha RGBA bytes of a color.
pub(crate) fn rgba(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

/// Blend `src` over `dst` with extra coverage in 0..=1.
pub(crate) fn blend_over(dst: [u8; 4], src: [u8; 4], coverage: f32) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Mutable RGBA pixel buffer.
pub(crate) struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    pub(crate) fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let data = fill
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn blend(&mut self, x: u32, y: u32, src: [u8; 4], coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = pixel_offset(self.width, x, y);
        let dst = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        self.data[i..i + 4].copy_from_slice(&blend_over(dst, src, coverage));
    }

    /// Pixel index range covered by `rect`, clipped to the buffer.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x0.floor().max(0.0);
        let y0 = rect.y0.floor().max(0.0);
        let x1 = rect.x1.ceil().min(self.width as f64);
        let y1 = rect.y1.ceil().min(self.height as f64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Draw `image` with `transform` mapping image pixel space to device
    /// space. Nearest-neighbour sampling.
    pub(crate) fn draw_image(&mut self, image: &ImageData, transform: Affine) {
        if image.is_empty() || transform.determinant().abs() < 1e-12 {
            return;
        }
        let local = Rect::new(0.0, 0.0, image.width() as f64, image.height() as f64);
        let Some((x0, y0, x1, y1)) = self.clip(transform.transform_rect_bbox(local)) else {
            return;
        };
        let inverse = transform.inverse();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if p.x < 0.0 || p.y < 0.0 || p.x >= local.x1 || p.y >= local.y1 {
                    continue;
                }
                if let Some(src) = image.pixel(p.x as u32, p.y as u32) {
                    self.blend(x, y, src, 1.0);
                }
            }
        }
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    /// Anti-aliased line of the given width.
    pub(crate) fn stroke_line(&mut self, line: Line, width: f64, color: [u8; 4]) {
        let half = width / 2.0;
        let bounds = Rect::from_points(line.p0, line.p1).inflate(half + 1.0, half + 1.0);
        let Some((x0, y0, x1, y1)) = self.clip(bounds) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let distance = line.nearest(center, 1e-6).distance_sq.sqrt();
                let coverage = (half + 0.5 - distance).clamp(0.0, 1.0) as f32;
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    pub(crate) fn into_image(self) -> RenderedImage {
        RenderedImage {
            rgba_data: self.data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Map image pixel space onto `width` x `height` logical units.
fn fit_image(image: &ImageData, width: f64, height: f64) -> Affine {
    Affine::scale_non_uniform(
        width / image.width().max(1) as f64,
        height / image.height().max(1) as f64,
    )
}

/// Software renderer that composites the base image and overlay parts.
#[derive(Debug, Default)]
pub struct CpuRenderer;

impl CpuRenderer {
    pub fn new() -> Self {
        Self
    }

    fn draw_part(&self, pixmap: &mut Pixmap, part: &PlacedPart, device: Affine) {
        let fit = fit_image(&part.image, part.attrs.width, part.attrs.height);
        pixmap.draw_image(&part.image, device * part.attrs.transform() * fit);
    }

    fn draw_selection(&self, pixmap: &mut Pixmap, part: &PlacedPart, ctx: &RenderContext) {
        let scale = ctx.scale_factor;
        let device = Affine::scale(scale);
        let color = rgba(ctx.selection_color);
        let corners = part.attrs.corners().map(|p| device * p);

        for i in 0..corners.len() {
            let line = Line::new(corners[i], corners[(i + 1) % corners.len()]);
            pixmap.stroke_line(line, OUTLINE_WIDTH * scale, color);
        }

        let top_center = device * anchor_position(&part.attrs, (0.5, 0.0));
        let rotate = device * rotate_handle_position(&part.attrs, ctx.rotate_handle_offset);
        pixmap.stroke_line(Line::new(top_center, rotate), OUTLINE_WIDTH * scale, color);

        let half = HANDLE_SIZE * scale / 2.0;
        let border = scale.max(1.0);
        for handle in get_handles(&part.attrs, ctx.rotate_handle_offset) {
            let center = device * handle.position;
            pixmap.fill_rect(Rect::from_center_size(center, (half * 2.0, half * 2.0)), color);
            if handle.kind != HandleKind::Rotate {
                let inner = (half - border).max(0.0) * 2.0;
                pixmap.fill_rect(Rect::from_center_size(center, (inner, inner)), [255, 255, 255, 255]);
            }
        }
    }
}

impl Renderer for CpuRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RenderedImage> {
        let scale = ctx.scale_factor;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::InvalidScale(scale));
        }
        let (width, height) = ctx.output_size();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }

        let mut pixmap = Pixmap::new(width, height, rgba(ctx.background_color));
        let device = Affine::scale(scale);

        let base = ctx.scene.base();
        let base_transform = device
            * Affine::translate(base.rect.origin().to_vec2())
            * fit_image(&base.image, base.rect.width(), base.rect.height());
        pixmap.draw_image(&base.image, base_transform);

        for part in ctx.scene.parts_ordered() {
            self.draw_part(&mut pixmap, part, device);
        }

        if let Some(part) = ctx.selection.and_then(|id| ctx.scene.get(id)) {
            self.draw_selection(&mut pixmap, part, ctx);
        }

        log::debug!(
            "Rendered {} parts at {}x{} (scale {})",
            ctx.scene.len(),
            width,
            height,
            scale
        );
        Ok(pixmap.into_image())
    }
}
