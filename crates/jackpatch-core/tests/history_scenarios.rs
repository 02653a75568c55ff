//! End-to-end undo/redo scenarios driven through the public editor API.

use jackpatch_core::{
    Asset, AssetCatalog, BaseImage, DropOutcome, Editor, EditorCommand, EditorConfig, ImageData,
    PartId,
};
use kurbo::{Point, Rect};

const SOURCES: [&str; 4] = ["eye.png", "nose.png", "mouth.png", "hat.png"];

fn editor_with(config: EditorConfig) -> Editor {
    let base = BaseImage::new(
        Rect::new(47.0, 43.5, 473.0, 436.5),
        ImageData::solid(8, 8, [255, 140, 0, 255]),
    );
    let catalog: AssetCatalog = SOURCES.into_iter().map(Asset::new).collect();
    let mut editor = Editor::new(config, base, catalog);
    for source in SOURCES {
        editor.preload(source, ImageData::solid(16, 8, [20, 20, 20, 255]));
    }
    editor
}

fn editor() -> Editor {
    editor_with(EditorConfig::default())
}

fn drop(editor: &mut Editor, source: &str, x: f64, y: f64) -> PartId {
    match editor.drop_asset(source, Point::new(x, y)) {
        DropOutcome::Placed(id) => id,
        other => panic!("drop of {} was not placed: {:?}", source, other),
    }
}

fn sources(editor: &Editor) -> Vec<String> {
    editor
        .scene()
        .parts_ordered()
        .map(|part| part.source.clone())
        .collect()
}

#[test]
fn test_n_placements_then_n_undos_empty_the_scene() {
    let mut editor = editor();
    for (i, source) in SOURCES.iter().enumerate() {
        drop(&mut editor, source, 100.0 + i as f64 * 20.0, 150.0);
    }
    assert_eq!(editor.scene().len(), SOURCES.len());

    for _ in SOURCES {
        assert!(editor.undo());
    }
    assert!(editor.scene().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn test_redo_restores_exact_overlay_set() {
    let mut editor = editor();
    let eye = drop(&mut editor, "eye.png", 120.0, 140.0);
    drop(&mut editor, "nose.png", 200.0, 200.0);
    editor.select(eye);
    editor.execute(EditorCommand::Duplicate);
    let before = editor.scene().snapshot();

    editor.undo();
    editor.undo();
    editor.redo();
    editor.redo();
    assert_eq!(editor.scene().snapshot(), before);
}

#[test]
fn test_new_action_after_undo_discards_redo_branch() {
    let mut editor = editor();
    drop(&mut editor, "eye.png", 100.0, 100.0);
    drop(&mut editor, "nose.png", 200.0, 200.0);
    editor.undo();
    drop(&mut editor, "mouth.png", 150.0, 250.0);

    assert!(!editor.can_redo());
    assert!(!editor.redo());
    assert_eq!(sources(&editor), vec!["eye.png", "mouth.png"]);
    let history_mentions_nose = editor
        .history()
        .entries()
        .iter()
        .flat_map(|snapshot| snapshot.parts.iter())
        .any(|part| part.source == "nose.png");
    assert!(!history_mentions_nose);
}

#[test]
fn test_single_drop_scenario() {
    let mut editor = editor();
    let id = drop(&mut editor, "eye.png", 100.0, 100.0);
    assert_eq!(editor.history().len(), 2);

    editor.undo();
    assert!(editor.scene().is_empty());

    editor.redo();
    let part = editor.scene().get(id).expect("part restored with its id");
    assert_eq!(part.attrs.position(), Point::new(100.0, 100.0));
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn test_history_stays_within_capacity() {
    let config = EditorConfig {
        history_capacity: 5,
        ..EditorConfig::default()
    };
    let mut editor = editor_with(config);
    for i in 0..12 {
        drop(&mut editor, SOURCES[i % SOURCES.len()], 100.0 + i as f64, 100.0);
        let history = editor.history();
        assert!(history.len() <= 5);
        assert!(history.cursor().is_some_and(|c| c < history.len()));
    }

    // Only four steps back remain after eviction
    let mut undos = 0;
    while editor.undo() {
        undos += 1;
    }
    assert_eq!(undos, 4);
    assert_eq!(editor.scene().len(), 8);
}

#[test]
fn test_base_image_survives_every_command() {
    let mut editor = editor();
    drop(&mut editor, "eye.png", 100.0, 100.0);
    let base_rect = editor.scene().base().rect;

    // Clicking the base never selects it
    editor.click(Point::new(400.0, 400.0));
    assert_eq!(editor.selected(), None);

    for command in [
        EditorCommand::Delete,
        EditorCommand::Duplicate,
        EditorCommand::ClearAll,
        EditorCommand::Undo,
        EditorCommand::Redo,
    ] {
        editor.execute(command);
        assert_eq!(editor.scene().base().rect, base_rect);
    }
}

#[test]
fn test_clear_all_then_undo_brings_parts_back() {
    let mut editor = editor();
    drop(&mut editor, "eye.png", 100.0, 100.0);
    drop(&mut editor, "hat.png", 250.0, 80.0);
    editor.execute(EditorCommand::ClearAll);
    assert!(editor.scene().is_empty());

    editor.execute(EditorCommand::Undo);
    assert_eq!(sources(&editor), vec!["eye.png", "hat.png"]);
}
