//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of history snapshots to keep.
pub const MAX_HISTORY: usize = 50;

/// Tunable editor parameters.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of snapshots in the history log (at least 1).
    pub history_capacity: usize,
    /// Smallest side length of a freshly placed part, in pixels.
    pub min_part_size: f64,
    /// Largest side length of a freshly placed part, in pixels.
    pub max_part_size: f64,
    /// Base width that an asset's default size is expressed against.
    pub reference_width: f64,
    /// Default size used when an asset doesn't declare a usable one.
    pub default_asset_size: f64,
    /// Offset applied to duplicated parts.
    pub duplicate_offset: f64,
    /// Resizes that would shrink a part below this size are rejected.
    pub min_transform_size: f64,
    /// Distance of the rotation handle above the top edge.
    pub rotate_handle_offset: f64,
    /// Hit radius for transform handles.
    pub handle_tolerance: f64,
    /// Keep the aspect ratio when resizing from a corner.
    pub keep_ratio: bool,
    /// Pixel density multiplier for exported images.
    pub export_pixel_ratio: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY,
            min_part_size: 40.0,
            max_part_size: 150.0,
            reference_width: 600.0,
            default_asset_size: 80.0,
            duplicate_offset: 30.0,
            min_transform_size: 20.0,
            rotate_handle_offset: 40.0,
            handle_tolerance: 10.0,
            keep_ratio: true,
            export_pixel_ratio: 2.0,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// History capacity with the lower bound applied.
    pub fn effective_history_capacity(&self) -> usize {
        self.history_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"history_capacity": 5}"#).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.export_pixel_ratio, 2.0);
        assert!(config.keep_ratio);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = EditorConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_history_capacity(), 1);
    }
}
