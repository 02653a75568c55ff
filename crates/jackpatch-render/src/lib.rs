//! Jackpatch Render Library
//!
//! Renderer abstraction plus a CPU rasterizer that flattens the base
//! pumpkin and its overlay parts into RGBA pixels, with helpers to decode
//! assets and encode exports.

pub mod decode;
pub mod export;
pub mod pumpkin;
mod raster;
mod renderer;

pub use decode::{decode_file, decode_image};
pub use export::{data_url, encode_png, export_file_name, export_file_name_at};
pub use pumpkin::{pumpkin_base, render_pumpkin};
pub use raster::CpuRenderer;
pub use renderer::{RenderContext, RenderError, RenderResult, RenderedImage, Renderer};
