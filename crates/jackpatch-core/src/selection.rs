//! Single-part selection and transform handles.

use crate::part::{PartAttrs, PartId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle (resizes both axes).
    Corner(Corner),
    /// Edge midpoint handle (resizes one axis).
    Edge(Edge),
    /// Rotation handle (positioned above the top edge).
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleKind {
    /// All resize handles, followed by the rotation handle.
    pub const ALL: [HandleKind; 9] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Left),
        HandleKind::Rotate,
    ];

    /// Anchor of this handle in the part's local box, as fractions of
    /// width and height. `None` for the rotation handle.
    pub fn anchor(self) -> Option<(f64, f64)> {
        match self {
            HandleKind::Corner(Corner::TopLeft) => Some((0.0, 0.0)),
            HandleKind::Corner(Corner::TopRight) => Some((1.0, 0.0)),
            HandleKind::Corner(Corner::BottomRight) => Some((1.0, 1.0)),
            HandleKind::Corner(Corner::BottomLeft) => Some((0.0, 1.0)),
            HandleKind::Edge(Edge::Top) => Some((0.5, 0.0)),
            HandleKind::Edge(Edge::Right) => Some((1.0, 0.5)),
            HandleKind::Edge(Edge::Bottom) => Some((0.5, 1.0)),
            HandleKind::Edge(Edge::Left) => Some((0.0, 0.5)),
            HandleKind::Rotate => None,
        }
    }

    /// Anchor of the handle opposite this one (stays fixed while resizing).
    pub fn opposite_anchor(self) -> Option<(f64, f64)> {
        self.anchor().map(|(u, v)| (1.0 - u, 1.0 - v))
    }

    /// Which axes a resize from this handle changes.
    pub fn resizes(self) -> (bool, bool) {
        match self {
            HandleKind::Corner(_) => (true, true),
            HandleKind::Edge(Edge::Left | Edge::Right) => (true, false),
            HandleKind::Edge(Edge::Top | Edge::Bottom) => (false, true),
            HandleKind::Rotate => (false, false),
        }
    }
}

/// A transform handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in world coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// World position of a local anchor given as width/height fractions.
pub fn anchor_position(attrs: &PartAttrs, (u, v): (f64, f64)) -> Point {
    attrs.transform() * Point::new(attrs.width * u, attrs.height * v)
}

/// World position of the rotation handle: `offset` above the top-center,
/// along the part's rotated up-axis.
pub fn rotate_handle_position(attrs: &PartAttrs, offset: f64) -> Point {
    let top = attrs.local_to_frame(Point::new(attrs.width / 2.0, 0.0));
    let up = if attrs.scale_y < 0.0 { 1.0 } else { -1.0 };
    attrs.frame() * Point::new(top.x, top.y + up * offset)
}

/// Get every transform handle for a part.
pub fn get_handles(attrs: &PartAttrs, rotate_offset: f64) -> Vec<Handle> {
    HandleKind::ALL
        .iter()
        .map(|&kind| {
            let position = match kind.anchor() {
                Some(anchor) => anchor_position(attrs, anchor),
                None => rotate_handle_position(attrs, rotate_offset),
            };
            Handle::new(position, kind)
        })
        .collect()
}

/// Find which handle (if any) is hit at the given point.
/// The rotation handle wins over resize handles when both are in range.
pub fn hit_test_handles(
    attrs: &PartAttrs,
    point: Point,
    tolerance: f64,
    rotate_offset: f64,
) -> Option<HandleKind> {
    let handles = get_handles(attrs, rotate_offset);
    handles
        .iter()
        .rev()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Single-selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<PartId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a part exclusively.
    pub fn select(&mut self, id: PartId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<PartId> {
        self.selected
    }

    pub fn is_selected(&self, id: PartId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Forget a part that left the scene.
    pub fn remove(&mut self, id: PartId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
