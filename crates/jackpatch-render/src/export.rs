//! PNG encoding and export naming.

use crate::renderer::{RenderResult, RenderedImage};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::time::{SystemTime, UNIX_EPOCH};

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(image: &RenderedImage) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.rgba_data)?;
    }
    Ok(png_data)
}

/// `data:image/png;base64,...` form of encoded PNG bytes.
pub fn data_url(png_data: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_data))
}

/// Download file name for an export taken at `time`.
pub fn export_file_name_at(time: SystemTime) -> String {
    let millis = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("pumpkin-{}.png", millis)
}

/// Download file name for an export taken now.
pub fn export_file_name() -> String {
    export_file_name_at(SystemTime::now())
}
