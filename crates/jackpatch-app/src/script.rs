//! Scripted user interactions.

use crate::error::{AppError, AppResult};
use jackpatch_core::{EditorCommand, Modifiers};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One user interaction, in stage coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Drop an asset from the toolbox.
    Drop { asset: String, x: f64, y: f64 },
    /// Press and release without moving.
    Click { x: f64, y: f64 },
    /// Press at `from`, move and release at `to`.
    Drag { from: [f64; 2], to: [f64; 2] },
    /// Key press.
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        meta: bool,
        /// Focus is in a text field.
        #[serde(default)]
        in_text_input: bool,
    },
    /// Toolbar button.
    Command { command: EditorCommand },
}

impl Action {
    /// Modifier state of a key action.
    pub fn modifiers(&self) -> Modifiers {
        match *self {
            Action::Key {
                ctrl,
                shift,
                alt,
                meta,
                ..
            } => Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
            _ => Modifiers::default(),
        }
    }
}

pub(crate) fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}

/// Read a script file: a JSON array of actions.
pub fn load_script(path: &Path) -> AppResult<Vec<Action>> {
    let content = std::fs::read_to_string(path)?;
    let actions: Vec<Action> = serde_json::from_str(&content).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} actions from {:?}", actions.len(), path);
    Ok(actions)
}
