//! Pointer gestures that move, resize or rotate the selected part.

use crate::part::{PartAttrs, PartId};
use crate::selection::HandleKind;
use kurbo::{Affine, Point, Vec2};

/// What an active gesture does to its part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Drag the whole part.
    Move,
    /// Drag a resize handle.
    Resize(HandleKind),
    /// Drag the rotation handle.
    Rotate,
}

impl GestureKind {
    /// Gesture started by grabbing `handle`.
    pub fn from_handle(handle: HandleKind) -> Self {
        match handle {
            HandleKind::Rotate => GestureKind::Rotate,
            other => GestureKind::Resize(other),
        }
    }
}

/// Parameters that shape resize and rotate gestures.
#[derive(Debug, Clone, Copy)]
pub struct GestureLimits {
    /// Keep the aspect ratio on corner resizes.
    pub keep_ratio: bool,
    /// Smallest allowed on-screen side length.
    pub min_size: f64,
}

/// State of an active manipulation of a single part.
#[derive(Debug, Clone)]
pub struct Gesture {
    /// The part being manipulated.
    pub part_id: PartId,
    /// What the gesture does.
    pub kind: GestureKind,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Attributes before the gesture began.
    pub original: PartAttrs,
}

impl Gesture {
    pub fn new(part_id: PartId, kind: GestureKind, start_point: Point, original: PartAttrs) -> Self {
        Self {
            part_id,
            kind,
            start_point,
            current_point: start_point,
            original,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Move the pointer and compute the resulting attributes.
    pub fn update(&mut self, point: Point, limits: GestureLimits) -> PartAttrs {
        self.current_point = point;
        match self.kind {
            GestureKind::Move => apply_move(&self.original, self.delta()),
            GestureKind::Resize(handle) => apply_resize(&self.original, handle, point, limits),
            GestureKind::Rotate => apply_rotation(&self.original, point),
        }
    }
}

/// Translate a part.
pub fn apply_move(attrs: &PartAttrs, delta: Vec2) -> PartAttrs {
    let mut moved = *attrs;
    moved.x += delta.x;
    moved.y += delta.y;
    moved
}

/// Resize a part by dragging `handle` to `pointer`, keeping the opposite
/// handle fixed in world space. Returns the original attributes unchanged
/// when the result would be smaller than `limits.min_size`.
pub fn apply_resize(
    attrs: &PartAttrs,
    handle: HandleKind,
    pointer: Point,
    limits: GestureLimits,
) -> PartAttrs {
    let (Some((du, dv)), Some((ou, ov))) = (handle.anchor(), handle.opposite_anchor()) else {
        return *attrs;
    };
    if attrs.width <= 0.0 || attrs.height <= 0.0 {
        return *attrs;
    }

    let opposite_local = Point::new(attrs.width * ou, attrs.height * ov);
    let opposite = attrs.local_to_frame(opposite_local);
    let dragged = attrs.local_to_frame(Point::new(attrs.width * du, attrs.height * dv));
    let frame = attrs.frame();
    let pointer_frame = frame.inverse() * pointer;

    let (old_w, old_h) = attrs.display_size();
    let (resize_x, resize_y) = handle.resizes();
    let corner = resize_x && resize_y;

    let (new_w, new_h) = if corner && limits.keep_ratio {
        let dir = dragged - opposite;
        let len_sq = dir.hypot2();
        if len_sq < f64::EPSILON {
            return *attrs;
        }
        let factor = (pointer_frame - opposite).dot(dir) / len_sq;
        (old_w * factor, old_h * factor)
    } else {
        let new_w = if resize_x {
            (pointer_frame.x - opposite.x) * (dragged.x - opposite.x).signum()
        } else {
            old_w
        };
        let new_h = if resize_y {
            (pointer_frame.y - opposite.y) * (dragged.y - opposite.y).signum()
        } else {
            old_h
        };
        (new_w, new_h)
    };

    if (resize_x && new_w < limits.min_size) || (resize_y && new_h < limits.min_size) {
        return *attrs;
    }

    let mut resized = *attrs;
    resized.scale_x = attrs.scale_x.signum() * new_w / attrs.width;
    resized.scale_y = attrs.scale_y.signum() * new_h / attrs.height;

    // Re-anchor so the opposite handle stays where it was
    let fixed_world = frame * opposite;
    let new_opposite = resized.local_to_frame(opposite_local);
    let rotated = Affine::rotate(attrs.rotation_radians()) * new_opposite;
    resized.x = fixed_world.x - rotated.x;
    resized.y = fixed_world.y - rotated.y;
    resized
}

/// Rotate a part about its box centre so its up-axis points at `pointer`.
pub fn apply_rotation(attrs: &PartAttrs, pointer: Point) -> PartAttrs {
    let center = attrs.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    if dx == 0.0 && dy == 0.0 {
        return *attrs;
    }
    // Offset so 0° is up, normalized to (-180, 180]
    let mut angle = dy.atan2(dx).to_degrees() + 90.0;
    if angle > 180.0 {
        angle -= 360.0;
    }

    let mut rotated = *attrs;
    rotated.rotation = angle;
    let center_frame =
        rotated.local_to_frame(Point::new(attrs.width / 2.0, attrs.height / 2.0));
    let offset = Affine::rotate(angle.to_radians()) * center_frame;
    rotated.x = center.x - offset.x;
    rotated.y = center.y - offset.y;
    rotated
}
