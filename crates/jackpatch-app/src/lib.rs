//! Jackpatch Application
//!
//! Headless host for the editor session: loads assets from disk, replays a
//! scripted sequence of user interactions and writes exported images.

mod app;
mod cli;
mod error;
mod host;
mod loader;
mod script;

pub use app::{App, ShareOutcome, run};
pub use cli::{CliArgs, parse_window};
pub use error::{AppError, AppResult};
pub use host::{ArboardClipboard, ClipboardSink, ConsoleHost, Host};
pub use loader::{FileAssetLoader, load_config, scan_catalog};
pub use script::{Action, load_script};
