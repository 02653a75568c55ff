//! Renderer trait abstraction.

use jackpatch_core::{AssetError, PartId, Scene};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Nothing to render: {width}x{height} output")]
    EmptyViewport { width: u32, height: u32 },
    #[error("Invalid pixel ratio: {0}")]
    InvalidScale(f64),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Flattened output of a render: straight-alpha RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RenderedImage {
    /// Pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = crate::raster::pixel_offset(self.width, x, y);
        Some([
            self.rgba_data[i],
            self.rgba_data[i + 1],
            self.rgba_data[i + 2],
            self.rgba_data[i + 3],
        ])
    }
}

/// Context for a single render.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// Stage size in logical pixels.
    pub stage_size: Size,
    /// Device pixel ratio; exports use 2.
    pub scale_factor: f64,
    /// Stage background color.
    pub background_color: Color,
    /// Selection outline and handle color.
    pub selection_color: Color,
    /// Part to draw transform handles for. Exports leave this empty.
    pub selection: Option<PartId>,
    /// Distance of the rotation handle above the part.
    pub rotate_handle_offset: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, stage_size: Size) -> Self {
        Self {
            scene,
            stage_size,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(0, 0, 0, 0),
            selection_color: Color::from_rgba8(0, 161, 255, 255),
            selection: None,
            rotate_handle_offset: 40.0,
        }
    }

    /// Set the scale factor for HiDPI and exports.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Show transform handles around `selection`.
    pub fn with_selection(mut self, selection: Option<PartId>, rotate_handle_offset: f64) -> Self {
        self.selection = selection;
        self.rotate_handle_offset = rotate_handle_offset;
        self
    }

    /// Output size in device pixels.
    pub fn output_size(&self) -> (u32, u32) {
        let width = (self.stage_size.width * self.scale_factor).round().max(0.0) as u32;
        let height = (self.stage_size.height * self.scale_factor).round().max(0.0) as u32;
        (width, height)
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Flatten the scene described by `ctx` into pixels.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RenderedImage>;
}
