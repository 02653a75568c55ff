//! Jackpatch Core Library
//!
//! Platform-agnostic editor session for decorating a base image with
//! overlay parts: scene arena, selection, transform gestures, placement,
//! asset loading and snapshot-based undo/redo.

pub mod assets;
pub mod config;
pub mod editor;
pub mod gesture;
pub mod history;
pub mod input;
pub mod layout;
pub mod loading;
pub mod part;
pub mod placement;
pub mod scene;
pub mod selection;

pub use assets::{
    Asset, AssetCache, AssetCatalog, AssetError, AssetLoader, AssetResult, BoxFuture, ImageData,
    MemoryAssetLoader,
};
pub use config::EditorConfig;
pub use editor::{DropOutcome, Editor};
pub use gesture::{Gesture, GestureKind, GestureLimits};
pub use history::{History, PartDescriptor, Snapshot};
pub use input::{
    EditorCommand, KeyContext, Modifiers, PointerEvent, Shortcut, ShortcutRegistry,
};
pub use layout::StageLayout;
pub use loading::{LoadPurpose, LoadRequest, LoadTicket, LoadTracker};
pub use part::{BaseImage, PartAttrs, PartId, PlacedPart};
pub use scene::Scene;
pub use selection::{Corner, Edge, Handle, HandleKind, Selection};
