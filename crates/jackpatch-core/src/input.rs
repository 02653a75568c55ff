//! Pointer events, editor commands and keyboard shortcuts.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

/// Toolbar and shortcut commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorCommand {
    Delete,
    Duplicate,
    ClearAll,
    Undo,
    Redo,
    Download,
    Share,
}

impl EditorCommand {
    pub fn name(self) -> &'static str {
        match self {
            EditorCommand::Delete => "Delete",
            EditorCommand::Duplicate => "Duplicate",
            EditorCommand::ClearAll => "Clear all",
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
            EditorCommand::Download => "Download",
            EditorCommand::Share => "Share",
        }
    }
}

/// Where keyboard focus currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// Focus is in a text field; deletion keys belong to it.
    pub in_text_input: bool,
    /// A part is selected.
    pub has_selection: bool,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub action: EditorCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        action: EditorCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check whether a key press triggers this shortcut. Every modifier the
    /// shortcut names must be held; extra modifiers are allowed.
    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && (!self.command || modifiers.command())
            && (!self.shift || modifiers.shift)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts, most specific first.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, EditorCommand::Delete, "Delete selected part"),
            Shortcut::new("Backspace", false, false, EditorCommand::Delete, "Delete selected part"),
            Shortcut::new("Z", true, true, EditorCommand::Redo, "Redo"),
            Shortcut::new("Z", true, false, EditorCommand::Undo, "Undo"),
            Shortcut::new("Y", true, false, EditorCommand::Redo, "Redo"),
        ]
    }

    /// Resolve a key press to a command.
    ///
    /// Deletion keys only act when a part is selected and focus is not in a
    /// text field. Cmd is treated as Ctrl.
    pub fn resolve(key: &str, modifiers: Modifiers, context: KeyContext) -> Option<EditorCommand> {
        let command = Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))?
            .action;
        if command == EditorCommand::Delete && (context.in_text_input || !context.has_selection) {
            return None;
        }
        Some(command)
    }

    /// Render the shortcut table for help output.
    pub fn help_text() -> String {
        let mut out = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::all() {
            out.push_str(&format!("  {:20} {}\n", shortcut.format(), shortcut.description));
        }
        out
    }
}
