//! The editor session: scene, history, selection and in-flight loads.

use crate::assets::{AssetCache, AssetCatalog, AssetLoader, AssetResult, ImageData};
use crate::config::EditorConfig;
use crate::gesture::{Gesture, GestureKind, GestureLimits};
use crate::history::{History, Snapshot};
use crate::input::{EditorCommand, KeyContext, Modifiers, PointerEvent, ShortcutRegistry};
use crate::loading::{LoadPurpose, LoadRequest, LoadTicket, LoadTracker};
use crate::part::{BaseImage, PartId, PlacedPart};
use crate::placement::{duplicate_part, place_part};
use crate::scene::Scene;
use crate::selection::{Handle, Selection, get_handles, hit_test_handles};
use kurbo::Point;

/// Result of dropping an asset onto the stage.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The image was cached and the part is already on the stage.
    Placed(PartId),
    /// The image must be loaded first; the part appears on completion.
    Pending(LoadRequest),
    /// Empty or unknown drag data.
    Ignored,
}

/// An editing session.
///
/// Owns the scene, the history log, the selection and the bookkeeping for
/// asset loads. A fresh session records the empty overlay set as its first
/// history entry.
#[derive(Debug, Clone)]
pub struct Editor {
    config: EditorConfig,
    scene: Scene,
    history: History,
    selection: Selection,
    catalog: AssetCatalog,
    cache: AssetCache,
    loads: LoadTracker,
    gesture: Option<Gesture>,
}

impl Editor {
    /// Start a session on `base` with the given droppable assets.
    pub fn new(config: EditorConfig, base: BaseImage, catalog: AssetCatalog) -> Self {
        let history = History::new(config.effective_history_capacity());
        let mut editor = Self {
            config,
            scene: Scene::new(base),
            history,
            selection: Selection::new(),
            catalog,
            cache: AssetCache::new(),
            loads: LoadTracker::new(),
            gesture: None,
        };
        editor.snapshot();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    /// Currently selected part.
    pub fn selected(&self) -> Option<PartId> {
        self.selection.selected()
    }

    /// Gesture in progress, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Outstanding loads, in issue order.
    pub fn pending_loads(&self) -> Vec<LoadRequest> {
        self.loads.requests()
    }

    /// Put a decoded image into the cache so drops and restores of
    /// `source` complete immediately.
    pub fn preload(&mut self, source: impl Into<String>, image: ImageData) {
        self.cache.insert(source, image);
    }

    // --- History -----------------------------------------------------------

    /// Record the current overlay set as a new history entry.
    pub fn snapshot(&mut self) {
        self.history.push(self.scene.snapshot());
        log::debug!(
            "Snapshot recorded ({} parts, entry {:?} of {})",
            self.scene.len(),
            self.history.cursor(),
            self.history.len()
        );
    }

    /// Step back one history entry. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        log::info!("Undo ({} parts)", self.scene.len());
        true
    }

    /// Step forward one history entry. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        log::info!("Redo ({} parts)", self.scene.len());
        true
    }

    /// Replace the overlay set with the parts described by `snapshot`.
    ///
    /// Parts whose image is cached come back immediately, in snapshot
    /// order. The rest are requested from the host and stacked on top as
    /// their loads complete. Empty sources are skipped.
    fn restore(&mut self, snapshot: Snapshot) {
        self.reset_overlay();
        for descriptor in snapshot.parts {
            if descriptor.source.is_empty() {
                log::debug!("Skipping part {} with empty source", descriptor.id);
                continue;
            }
            match self.cache.get(&descriptor.source).cloned() {
                Some(image) => self.scene.add_part(PlacedPart::with_id(
                    descriptor.id,
                    descriptor.source,
                    descriptor.attrs,
                    image,
                )),
                None => {
                    let source = descriptor.source.clone();
                    self.loads.issue(source, LoadPurpose::Restore { descriptor });
                }
            }
        }
    }

    /// Drop every part, the selection, any gesture and all pending loads.
    fn reset_overlay(&mut self) {
        let cancelled = self.loads.bump_generation();
        if cancelled > 0 {
            log::debug!("Cancelled {} pending loads", cancelled);
        }
        self.gesture = None;
        self.selection.clear();
        self.scene.clear_parts();
    }

    // --- Loading -----------------------------------------------------------

    /// Handle a drop of `source` at `position`.
    pub fn drop_asset(&mut self, source: &str, position: Point) -> DropOutcome {
        if source.trim().is_empty() {
            log::debug!("Ignoring drop with empty data");
            return DropOutcome::Ignored;
        }
        let Some(asset) = self.catalog.find(source) else {
            log::debug!("Ignoring drop of unknown asset {:?}", source);
            return DropOutcome::Ignored;
        };
        let default_size = asset.default_size;

        match self.cache.get(source).cloned() {
            Some(image) => DropOutcome::Placed(self.place(source, image, position, default_size)),
            None => DropOutcome::Pending(self.loads.issue(
                source,
                LoadPurpose::Place {
                    position,
                    default_size,
                },
            )),
        }
    }

    /// Feed a finished load back into the session.
    ///
    /// Returns the id of the part that appeared, or `None` when the load
    /// was stale, cancelled, failed or produced an empty image.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: AssetResult<ImageData>,
    ) -> Option<PartId> {
        let Some((source, purpose)) = self.loads.resolve(ticket) else {
            log::debug!("Discarding stale load {} (generation {})", ticket.id, ticket.generation);
            return None;
        };
        let image = match result {
            Ok(image) if !image.is_empty() => image,
            Ok(_) => {
                log::debug!("Skipping empty image {:?}", source);
                return None;
            }
            Err(e) => {
                log::warn!("Failed to load {:?}: {}", source, e);
                return None;
            }
        };
        self.cache.insert(source.clone(), image.clone());

        match purpose {
            LoadPurpose::Place {
                position,
                default_size,
            } => Some(self.place(&source, image, position, default_size)),
            LoadPurpose::Restore { descriptor } => {
                let id = descriptor.id;
                self.scene.add_part(PlacedPart::with_id(
                    id,
                    descriptor.source,
                    descriptor.attrs,
                    image,
                ));
                Some(id)
            }
        }
    }

    /// Perform every outstanding load with `loader`, in issue order.
    /// Returns the number of parts that appeared.
    pub async fn drive_loads(&mut self, loader: &dyn AssetLoader) -> usize {
        let mut applied = 0;
        loop {
            let requests = self.loads.requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                let result = loader.load(&request.source).await;
                if self.complete_load(request.ticket, result).is_some() {
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Cancel every outstanding load. Returns how many were cancelled.
    pub fn cancel_pending_loads(&mut self) -> usize {
        self.loads.bump_generation()
    }

    fn place(
        &mut self,
        source: &str,
        image: ImageData,
        position: Point,
        default_size: Option<f64>,
    ) -> PartId {
        let base_width = self.scene.base().width();
        let part = place_part(source, image, position, default_size, base_width, &self.config);
        let id = part.id();
        self.scene.add_part(part);
        self.snapshot();
        log::info!("Placed {:?} at ({:.0}, {:.0})", source, position.x, position.y);
        id
    }

    // --- Selection and editing ----------------------------------------------

    /// Select the topmost part under `point`; empty canvas or the base
    /// image clears the selection.
    pub fn click(&mut self, point: Point) -> Option<PartId> {
        match self.scene.part_at_point(point) {
            Some(id) => {
                self.selection.select(id);
                Some(id)
            }
            None => {
                self.selection.clear();
                None
            }
        }
    }

    /// Select a part by id. Returns false for unknown ids.
    pub fn select(&mut self, id: PartId) -> bool {
        if self.scene.contains(id) {
            self.selection.select(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Transform handles of the selected part.
    pub fn handles(&self) -> Vec<Handle> {
        self.selection
            .selected()
            .and_then(|id| self.scene.get(id))
            .map(|part| get_handles(&part.attrs, self.config.rotate_handle_offset))
            .unwrap_or_default()
    }

    /// Delete the selected part. Returns false if nothing was selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.selected() else {
            return false;
        };
        self.gesture = None;
        self.selection.remove(id);
        if self.scene.remove_part(id).is_none() {
            return false;
        }
        self.snapshot();
        log::info!("Deleted part {}", id);
        true
    }

    /// Duplicate the selected part. The copy is stacked on top and the
    /// selection is cleared.
    pub fn duplicate_selected(&mut self) -> Option<PartId> {
        let id = self.selection.selected()?;
        let copy = duplicate_part(self.scene.get(id)?, &self.config);
        let copy_id = copy.id();
        self.scene.add_part(copy);
        self.selection.clear();
        self.snapshot();
        log::info!("Duplicated part {} as {}", id, copy_id);
        Some(copy_id)
    }

    /// Remove every part. Callers are expected to have confirmed with the
    /// user. The base image stays and the clear is recorded in history.
    pub fn clear_all(&mut self) {
        self.reset_overlay();
        self.snapshot();
        log::info!("Cleared all parts");
    }

    // --- Gestures ----------------------------------------------------------

    fn limits(&self) -> GestureLimits {
        GestureLimits {
            keep_ratio: self.config.keep_ratio,
            min_size: self.config.min_transform_size,
        }
    }

    /// Start a gesture. Grabbing a handle of the selected part resizes or
    /// rotates it; grabbing a part selects and moves it; anything else
    /// clears the selection.
    pub fn pointer_down(&mut self, point: Point) {
        self.gesture = None;

        if let Some(part) = self.selection.selected().and_then(|id| self.scene.get(id)) {
            if let Some(handle) = hit_test_handles(
                &part.attrs,
                point,
                self.config.handle_tolerance,
                self.config.rotate_handle_offset,
            ) {
                self.gesture = Some(Gesture::new(
                    part.id(),
                    GestureKind::from_handle(handle),
                    point,
                    part.attrs,
                ));
                return;
            }
        }

        if let Some(id) = self.click(point) {
            if let Some(part) = self.scene.get(id) {
                self.gesture = Some(Gesture::new(id, GestureKind::Move, point, part.attrs));
            }
        }
    }

    /// Update the active gesture. Moves without one are ignored.
    pub fn pointer_move(&mut self, point: Point) {
        let limits = self.limits();
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let attrs = gesture.update(point, limits);
        match self.scene.get_mut(gesture.part_id) {
            Some(part) => part.attrs = attrs,
            None => self.gesture = None,
        }
    }

    /// Finish the active gesture. Returns true if the part changed, in
    /// which case a snapshot was recorded.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        if self.gesture.is_none() {
            return false;
        }
        self.pointer_move(point);
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let changed = self
            .scene
            .get(gesture.part_id)
            .is_some_and(|part| part.attrs != gesture.original);
        if changed {
            self.snapshot();
            log::debug!("{:?} gesture finished on {}", gesture.kind, gesture.part_id);
        }
        changed
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => {
                self.pointer_up(position);
            }
        }
    }

    // --- Commands ----------------------------------------------------------

    /// Apply an editing command. Export commands are left to the host and
    /// return false, as does any command with nothing to act on.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        match command {
            EditorCommand::Delete => self.delete_selected(),
            EditorCommand::Duplicate => self.duplicate_selected().is_some(),
            EditorCommand::ClearAll => {
                self.clear_all();
                true
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Download | EditorCommand::Share => false,
        }
    }

    /// Keyboard context for shortcut resolution.
    pub fn key_context(&self, in_text_input: bool) -> KeyContext {
        KeyContext {
            in_text_input,
            has_selection: !self.selection.is_empty(),
        }
    }

    /// Resolve and apply a key press. Returns the command it triggered.
    pub fn handle_key(
        &mut self,
        key: &str,
        modifiers: Modifiers,
        in_text_input: bool,
    ) -> Option<EditorCommand> {
        let command = ShortcutRegistry::resolve(key, modifiers, self.key_context(in_text_input))?;
        self.execute(command);
        Some(command)
    }
}
