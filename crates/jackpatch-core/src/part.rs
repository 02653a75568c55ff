//! Overlay parts and the base image they are placed on.

use crate::assets::ImageData;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed parts.
pub type PartId = Uuid;

/// Geometric attributes of a placed part.
///
/// A part occupies the local box `(0, 0)..(width, height)`. The box is
/// shifted by `-offset`, scaled, rotated by `rotation` degrees and finally
/// translated to `(x, y)`, so `(x, y)` is where the offset pivot lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Rotation in degrees, clockwise in screen space.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for PartAttrs {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl PartAttrs {
    /// Attributes for a part of the given size centred on `position`.
    pub fn centered(position: Point, width: f64, height: f64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width,
            height,
            offset_x: width / 2.0,
            offset_y: height / 2.0,
            ..Default::default()
        }
    }

    /// Position of the pivot in world coordinates.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// Translation and rotation only: maps frame coordinates, where the
    /// pivot sits at the origin and axes follow the part's rotation.
    pub fn frame(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation_radians())
    }

    /// Full local-to-world transform.
    pub fn transform(&self) -> Affine {
        self.frame()
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate(Vec2::new(-self.offset_x, -self.offset_y))
    }

    /// The untransformed local box.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Convert a local point to frame coordinates (scaled, pivot-relative).
    pub fn local_to_frame(&self, local: Point) -> Point {
        Point::new(
            (local.x - self.offset_x) * self.scale_x,
            (local.y - self.offset_y) * self.scale_y,
        )
    }

    /// World positions of the four corners: top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let t = self.transform();
        [
            t * Point::new(0.0, 0.0),
            t * Point::new(self.width, 0.0),
            t * Point::new(self.width, self.height),
            t * Point::new(0.0, self.height),
        ]
    }

    /// Axis-aligned bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        let [a, b, c, d] = self.corners();
        Rect::from_points(a, b).union_pt(c).union_pt(d)
    }

    /// World position of the centre of the local box.
    pub fn center(&self) -> Point {
        self.transform() * Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// On-screen size of the box, ignoring rotation.
    pub fn display_size(&self) -> (f64, f64) {
        (
            self.width * self.scale_x.abs(),
            self.height * self.scale_y.abs(),
        )
    }

    /// Map a world point into the local box, if the transform is invertible.
    pub fn world_to_local(&self, point: Point) -> Option<Point> {
        let t = self.transform();
        if t.determinant().abs() < f64::EPSILON {
            return None;
        }
        Some(t.inverse() * point)
    }

    /// Check if a world point lies inside the transformed box.
    pub fn contains(&self, point: Point) -> bool {
        self.world_to_local(point)
            .is_some_and(|local| self.local_rect().contains(local))
    }
}

/// An overlay image placed on the base image.
#[derive(Debug, Clone)]
pub struct PlacedPart {
    pub(crate) id: PartId,
    /// Source key of the asset this part displays.
    pub source: String,
    /// Geometry.
    pub attrs: PartAttrs,
    /// Decoded pixels of the asset.
    pub image: ImageData,
}

impl PlacedPart {
    /// Create a part with a fresh id.
    pub fn new(source: impl Into<String>, attrs: PartAttrs, image: ImageData) -> Self {
        Self::with_id(Uuid::new_v4(), source, attrs, image)
    }

    /// Create a part with a known id (used when restoring history).
    pub fn with_id(id: PartId, source: impl Into<String>, attrs: PartAttrs, image: ImageData) -> Self {
        Self {
            id,
            source: source.into(),
            attrs,
            image,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn bounds(&self) -> Rect {
        self.attrs.bounds()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.attrs.contains(point)
    }

    /// Copy of this part with a new id, shifted by `offset`.
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let mut attrs = self.attrs;
        attrs.x += offset.x;
        attrs.y += offset.y;
        Self::new(self.source.clone(), attrs, self.image.clone())
    }
}

/// The background image. It is never selectable, never deletable and never
/// part of a history snapshot.
#[derive(Debug, Clone)]
pub struct BaseImage {
    /// Placement in world coordinates.
    pub rect: Rect,
    /// Decoded pixels.
    pub image: ImageData,
}

impl BaseImage {
    pub fn new(rect: Rect, image: ImageData) -> Self {
        Self { rect, image }
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_centered_part_bounds() {
        let attrs = PartAttrs::centered(Point::new(100.0, 100.0), 40.0, 20.0);
        let bounds = attrs.bounds();
        assert!(approx(bounds.x0, 80.0));
        assert!(approx(bounds.y0, 90.0));
        assert!(approx(bounds.x1, 120.0));
        assert!(approx(bounds.y1, 110.0));
        let center = attrs.center();
        assert!(approx(center.x, 100.0) && approx(center.y, 100.0));
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut attrs = PartAttrs::centered(Point::new(0.0, 0.0), 100.0, 10.0);
        // Unrotated: a thin horizontal bar.
        assert!(attrs.contains(Point::new(45.0, 0.0)));
        assert!(!attrs.contains(Point::new(0.0, 45.0)));

        attrs.rotation = 90.0;
        assert!(!attrs.contains(Point::new(45.0, 0.0)));
        assert!(attrs.contains(Point::new(0.0, 45.0)));
    }

    #[test]
    fn test_scale_affects_bounds() {
        let mut attrs = PartAttrs::centered(Point::new(0.0, 0.0), 10.0, 10.0);
        attrs.scale_x = 2.0;
        attrs.scale_y = 3.0;
        let bounds = attrs.bounds();
        assert!(approx(bounds.width(), 20.0));
        assert!(approx(bounds.height(), 30.0));
        assert_eq!(attrs.display_size(), (20.0, 30.0));
    }

    #[test]
    fn test_degenerate_scale_never_hits() {
        let mut attrs = PartAttrs::centered(Point::new(0.0, 0.0), 10.0, 10.0);
        attrs.scale_x = 0.0;
        assert!(attrs.world_to_local(Point::ZERO).is_none());
        assert!(!attrs.contains(Point::ZERO));
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let part = PlacedPart::new(
            "eye.png",
            PartAttrs::centered(Point::new(10.0, 10.0), 4.0, 4.0),
            ImageData::solid(1, 1, [0, 0, 0, 255]),
        );
        let copy = part.duplicate(Vec2::new(30.0, 30.0));
        assert_ne!(copy.id(), part.id());
        assert_eq!(copy.source, part.source);
        assert!(approx(copy.attrs.x, 40.0));
        assert!(approx(copy.attrs.y, 40.0));
    }
}
