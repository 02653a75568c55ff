//! Sizing rules for newly placed parts.

use crate::assets::ImageData;
use crate::config::EditorConfig;
use crate::part::{PartAttrs, PlacedPart};
use kurbo::{Point, Vec2};

/// Side length of the square a new part is fitted into.
///
/// The asset's size hint is expressed against `config.reference_width`
/// and scaled to the actual base width, then clamped to the configured
/// minimum and maximum.
pub fn target_size(default_size: Option<f64>, base_width: f64, config: &EditorConfig) -> f64 {
    let hint = default_size
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(config.default_asset_size);
    let scale = if config.reference_width > 0.0 {
        base_width / config.reference_width
    } else {
        1.0
    };
    (hint * scale).clamp(config.min_part_size, config.max_part_size)
}

/// Fit an image inside a `side` square, preserving its aspect ratio.
pub fn fit_within(image: &ImageData, side: f64) -> (f64, f64) {
    let aspect = image.aspect_ratio();
    if aspect >= 1.0 {
        (side, side / aspect)
    } else {
        (side * aspect, side)
    }
}

/// Build a new part centred on `position`.
pub fn place_part(
    source: &str,
    image: ImageData,
    position: Point,
    default_size: Option<f64>,
    base_width: f64,
    config: &EditorConfig,
) -> PlacedPart {
    let side = target_size(default_size, base_width, config);
    let (width, height) = fit_within(&image, side);
    PlacedPart::new(source, PartAttrs::centered(position, width, height), image)
}

/// Copy of `part` shifted by the configured duplicate offset.
pub fn duplicate_part(part: &PlacedPart, config: &EditorConfig) -> PlacedPart {
    let offset = config.duplicate_offset;
    part.duplicate(Vec2::new(offset, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_size_scales_with_base() {
        let config = EditorConfig::default();
        assert!((target_size(Some(80.0), 600.0, &config) - 80.0).abs() < 1e-9);
        assert!((target_size(Some(120.0), 300.0, &config) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_size_clamps() {
        let config = EditorConfig::default();
        assert_eq!(target_size(Some(10.0), 600.0, &config), 40.0);
        assert_eq!(target_size(Some(500.0), 600.0, &config), 150.0);
    }

    #[test]
    fn test_target_size_falls_back_to_default() {
        let config = EditorConfig::default();
        let expected = 80.0 * 426.0 / 600.0;
        assert!((target_size(None, 426.0, &config) - expected).abs() < 1e-9);
        assert!((target_size(Some(f64::NAN), 426.0, &config) - expected).abs() < 1e-9);
        assert!((target_size(Some(-3.0), 426.0, &config) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let wide = ImageData::solid(200, 100, [0; 4]);
        assert_eq!(fit_within(&wide, 80.0), (80.0, 40.0));
        let tall = ImageData::solid(50, 100, [0; 4]);
        assert_eq!(fit_within(&tall, 80.0), (40.0, 80.0));
    }

    #[test]
    fn test_place_part_is_centered() {
        let config = EditorConfig::default();
        let part = place_part(
            "eye.png",
            ImageData::solid(10, 10, [0; 4]),
            Point::new(100.0, 100.0),
            Some(80.0),
            600.0,
            &config,
        );
        assert_eq!(part.attrs.x, 100.0);
        assert_eq!(part.attrs.offset_x, part.attrs.width / 2.0);
        assert_eq!(part.attrs.offset_y, part.attrs.height / 2.0);
        let center = part.attrs.center();
        assert!((center.x - 100.0).abs() < 1e-9 && (center.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_keeps_transform() {
        let config = EditorConfig::default();
        let mut part = place_part(
            "eye.png",
            ImageData::solid(10, 10, [0; 4]),
            Point::new(100.0, 100.0),
            None,
            600.0,
            &config,
        );
        part.attrs.rotation = 45.0;
        part.attrs.scale_x = 2.0;
        let copy = duplicate_part(&part, &config);
        assert_eq!(copy.attrs.x, 130.0);
        assert_eq!(copy.attrs.y, 130.0);
        assert_eq!(copy.attrs.rotation, 45.0);
        assert_eq!(copy.attrs.scale_x, 2.0);
    }
}
