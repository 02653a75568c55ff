//! Decoding asset files into RGBA pixels.

use jackpatch_core::{AssetError, AssetResult, ImageData};
use std::path::Path;

/// Decode PNG, JPEG or WebP bytes.
pub fn decode_image(bytes: &[u8]) -> AssetResult<ImageData> {
    if bytes.is_empty() {
        return Err(AssetError::Decode("no image data".to_string()));
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageData::new(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> AssetResult<ImageData> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
        _ => AssetError::Io(e.to_string()),
    })?;
    decode_image(&bytes)
}
