//! Scene arena: the base image plus overlay parts in stacking order.

use crate::history::{PartDescriptor, Snapshot};
use crate::part::{BaseImage, PartId, PlacedPart};
use kurbo::Point;
use std::collections::HashMap;

/// The live scene.
///
/// Parts are stored by id; `z_order` lists them back to front. The base
/// image always sits beneath every part and has no removal API.
#[derive(Debug, Clone)]
pub struct Scene {
    base: BaseImage,
    parts: HashMap<PartId, PlacedPart>,
    z_order: Vec<PartId>,
}

impl Scene {
    /// Create a scene with a base image and no parts.
    pub fn new(base: BaseImage) -> Self {
        Self {
            base,
            parts: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    pub fn base(&self) -> &BaseImage {
        &self.base
    }

    /// Add a part on top of the stack.
    pub fn add_part(&mut self, part: PlacedPart) {
        let id = part.id();
        if self.parts.insert(id, part).is_some() {
            self.z_order.retain(|&pid| pid != id);
        }
        self.z_order.push(id);
    }

    /// Remove a part.
    pub fn remove_part(&mut self, id: PartId) -> Option<PlacedPart> {
        self.z_order.retain(|&pid| pid != id);
        self.parts.remove(&id)
    }

    /// Remove every overlay part. The base image stays.
    pub fn clear_parts(&mut self) {
        self.parts.clear();
        self.z_order.clear();
    }

    pub fn get(&self, id: PartId) -> Option<&PlacedPart> {
        self.parts.get(&id)
    }

    pub fn get_mut(&mut self, id: PartId) -> Option<&mut PlacedPart> {
        self.parts.get_mut(&id)
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains_key(&id)
    }

    /// Parts in stacking order (back to front).
    pub fn parts_ordered(&self) -> impl Iterator<Item = &PlacedPart> {
        self.z_order.iter().filter_map(|id| self.parts.get(id))
    }

    pub fn z_order(&self) -> &[PartId] {
        &self.z_order
    }

    /// Topmost part under a point. The base image is never returned.
    pub fn part_at_point(&self, point: Point) -> Option<PartId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|id| self.parts.get(id).is_some_and(|p| p.hit_test(point)))
    }

    /// Describe every overlay part, back to front.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.parts_ordered().map(PartDescriptor::from).collect())
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageData;
    use crate::part::PartAttrs;
    use kurbo::Rect;

    fn base() -> BaseImage {
        BaseImage::new(
            Rect::new(0.0, 0.0, 400.0, 400.0),
            ImageData::solid(1, 1, [255, 140, 0, 255]),
        )
    }

    fn part_at(x: f64, y: f64) -> PlacedPart {
        PlacedPart::new(
            "eye.png",
            PartAttrs::centered(Point::new(x, y), 100.0, 100.0),
            ImageData::solid(1, 1, [0, 0, 0, 255]),
        )
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new(base());
        assert!(scene.is_empty());
        assert!(scene.snapshot().is_empty());
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new(base());
        let part = part_at(50.0, 50.0);
        let id = part.id();
        scene.add_part(part);
        assert_eq!(scene.len(), 1);
        assert!(scene.remove_part(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.z_order().is_empty());
    }

    #[test]
    fn test_part_at_point_front_first() {
        let mut scene = Scene::new(base());
        let back = part_at(50.0, 50.0);
        let front = part_at(100.0, 100.0);
        let (back_id, front_id) = (back.id(), front.id());
        scene.add_part(back);
        scene.add_part(front);

        assert_eq!(scene.part_at_point(Point::new(75.0, 75.0)), Some(front_id));
        assert_eq!(scene.part_at_point(Point::new(10.0, 10.0)), Some(back_id));
        // Only the base image is here
        assert_eq!(scene.part_at_point(Point::new(300.0, 300.0)), None);
    }

    #[test]
    fn test_snapshot_excludes_base_and_keeps_order() {
        let mut scene = Scene::new(base());
        let a = part_at(10.0, 10.0);
        let b = part_at(20.0, 20.0);
        let (a_id, b_id) = (a.id(), b.id());
        scene.add_part(a);
        scene.add_part(b);

        let snapshot = scene.snapshot();
        let ids: Vec<_> = snapshot.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a_id, b_id]);
    }

    #[test]
    fn test_clear_keeps_base() {
        let mut scene = Scene::new(base());
        scene.add_part(part_at(10.0, 10.0));
        scene.clear_parts();
        assert!(scene.is_empty());
        assert_eq!(scene.base().width(), 400.0);
    }

    #[test]
    fn test_re_adding_part_moves_it_to_top() {
        let mut scene = Scene::new(base());
        let a = part_at(10.0, 10.0);
        let b = part_at(20.0, 20.0);
        let a_id = a.id();
        scene.add_part(a.clone());
        scene.add_part(b);
        scene.add_part(a);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.z_order().last(), Some(&a_id));
    }
}
