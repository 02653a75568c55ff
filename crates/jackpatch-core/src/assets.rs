//! Asset catalog, decoded image cache and the loader abstraction.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Asset errors.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),
    #[error("Asset source is empty")]
    EmptySource,
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Pixel buffer has {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Asset error: {0}")]
    Other(String),
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Boxed future for asynchronous loads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Decoded RGBA8 pixels. Cloning shares the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl ImageData {
    /// Wrap an RGBA8 buffer, checking its length against the dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> AssetResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AssetError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// An image filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels: Vec<u8> = std::iter::repeat_n(rgba, count).flatten().collect();
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height (1.0 for empty images).
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

/// A predefined asset that can be dropped onto the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Key used to load the asset and to reference it from snapshots.
    pub source: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Default size hint, relative to a 600px wide base.
    #[serde(default, rename = "size", deserialize_with = "deserialize_size")]
    pub default_size: Option<f64>,
}

/// Accept a size as a number or a numeric string. Anything unusable
/// becomes `None` instead of failing the whole entry.
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().filter(|s| usable_size(*s)),
        Some(serde_json::Value::String(s)) => Asset::parse_size(&s),
        _ => None,
    })
}

fn usable_size(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

impl Asset {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: source.clone(),
            source,
            default_size: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.default_size = Some(size);
        self
    }

    /// Parse a textual size hint. Unparseable, zero and non-finite values
    /// yield `None` so the configured default applies.
    pub fn parse_size(raw: &str) -> Option<f64> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|size| usable_size(*size))
    }
}

/// Ordered list of droppable assets.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, replacing any existing entry with the same source.
    pub fn insert(&mut self, asset: Asset) {
        if let Some(existing) = self.assets.iter_mut().find(|a| a.source == asset.source) {
            *existing = asset;
        } else {
            self.assets.push(asset);
        }
    }

    pub fn find(&self, source: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.source == source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<Asset> for AssetCatalog {
    fn from_iter<I: IntoIterator<Item = Asset>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for asset in iter {
            catalog.insert(asset);
        }
        catalog
    }
}

/// Decoded images keyed by source.
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    images: HashMap<String, ImageData>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<&ImageData> {
        self.images.get(source)
    }

    pub fn insert(&mut self, source: impl Into<String>, image: ImageData) {
        self.images.insert(source.into(), image);
    }

    pub fn contains(&self, source: &str) -> bool {
        self.images.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Trait for asset loading backends.
///
/// Implementations can read from disk, decode embedded bytes, or serve
/// prepared images from memory.
pub trait AssetLoader {
    /// Load and decode the asset behind `source`.
    fn load(&self, source: &str) -> BoxFuture<'_, AssetResult<ImageData>>;
}

/// In-memory loader for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryAssetLoader {
    images: RwLock<HashMap<String, ImageData>>,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under `source`.
    pub fn insert(&self, source: impl Into<String>, image: ImageData) -> AssetResult<()> {
        let mut images = self
            .images
            .write()
            .map_err(|e| AssetError::Other(format!("Lock error: {}", e)))?;
        images.insert(source.into(), image);
        Ok(())
    }
}

impl AssetLoader for MemoryAssetLoader {
    fn load(&self, source: &str) -> BoxFuture<'_, AssetResult<ImageData>> {
        let source = source.to_string();
        Box::pin(async move {
            if source.is_empty() {
                return Err(AssetError::EmptySource);
            }
            let images = self
                .images
                .read()
                .map_err(|e| AssetError::Other(format!("Lock error: {}", e)))?;
            images
                .get(&source)
                .cloned()
                .ok_or(AssetError::NotFound(source))
        })
    }
}
