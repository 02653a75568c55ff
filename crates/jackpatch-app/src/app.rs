//! The headless application: owns the editor session and carries out
//! scripted actions and toolbar commands.

use crate::cli::CliArgs;
use crate::error::{AppError, AppResult};
use crate::host::{ArboardClipboard, ClipboardSink, ConsoleHost, Host};
use crate::loader::{FileAssetLoader, load_config, scan_catalog};
use crate::script::{Action, load_script, point};
use jackpatch_core::{
    AssetCatalog, AssetLoader, DropOutcome, Editor, EditorCommand, EditorConfig, ShortcutRegistry,
    StageLayout,
};
use jackpatch_render::{
    CpuRenderer, RenderContext, RenderedImage, Renderer, data_url, encode_png, export_file_name,
    pumpkin_base,
};
use std::path::PathBuf;

const CLEAR_PROMPT: &str = "Clear all parts?";
const COPIED_MESSAGE: &str = "Image copied to clipboard!";

/// How a share ended up reaching the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The flattened image is on the clipboard.
    Image,
    /// The data URL is on the clipboard as text.
    Text,
    /// The data URL was shown for manual copying.
    Manual,
}

/// Application state.
pub struct App {
    editor: Editor,
    layout: StageLayout,
    loader: Box<dyn AssetLoader>,
    out_dir: PathBuf,
    downloads: Vec<PathBuf>,
}

impl App {
    /// Start a session with a freshly drawn pumpkin for `layout`.
    pub fn new(
        config: EditorConfig,
        layout: StageLayout,
        catalog: AssetCatalog,
        loader: Box<dyn AssetLoader>,
        out_dir: impl Into<PathBuf>,
    ) -> AppResult<Self> {
        let base = pumpkin_base(layout.base)?;
        log::info!(
            "Stage {}x{}, pumpkin {}x{}",
            layout.stage.width,
            layout.stage.height,
            layout.base.width(),
            layout.base.height()
        );
        Ok(Self {
            editor: Editor::new(config, base, catalog),
            layout,
            loader,
            out_dir: out_dir.into(),
            downloads: Vec::new(),
        })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    /// Files written by downloads, oldest first.
    pub fn downloads(&self) -> &[PathBuf] {
        &self.downloads
    }

    /// Let every outstanding load finish.
    async fn settle(&mut self) {
        let applied = self.editor.drive_loads(self.loader.as_ref()).await;
        if applied > 0 {
            log::debug!("{} loads completed", applied);
        }
    }

    /// Carry out one scripted action.
    pub async fn apply(
        &mut self,
        action: &Action,
        host: &mut dyn Host,
        clipboard: &mut dyn ClipboardSink,
    ) -> AppResult<()> {
        match action {
            Action::Drop { asset, x, y } => {
                if let DropOutcome::Ignored = self.editor.drop_asset(asset, point([*x, *y])) {
                    log::warn!("Drop of {:?} ignored", asset);
                }
                self.settle().await;
            }
            Action::Click { x, y } => {
                let position = point([*x, *y]);
                self.editor.pointer_down(position);
                self.editor.pointer_up(position);
            }
            Action::Drag { from, to } => {
                self.editor.pointer_down(point(*from));
                self.editor.pointer_move(point(*to));
                self.editor.pointer_up(point(*to));
            }
            Action::Key {
                key, in_text_input, ..
            } => {
                match self
                    .editor
                    .handle_key(key, action.modifiers(), *in_text_input)
                {
                    Some(command) => log::debug!("Key {:?} ran {}", key, command.name()),
                    None => log::debug!("Key {:?} had no effect", key),
                }
                self.settle().await;
            }
            Action::Command { command } => self.run_command(*command, host, clipboard).await?,
        }
        Ok(())
    }

    /// Toolbar button handler.
    pub async fn run_command(
        &mut self,
        command: EditorCommand,
        host: &mut dyn Host,
        clipboard: &mut dyn ClipboardSink,
    ) -> AppResult<()> {
        match command {
            EditorCommand::ClearAll => {
                if host.confirm(CLEAR_PROMPT) {
                    self.editor.clear_all();
                } else {
                    log::info!("Clear all cancelled");
                }
            }
            EditorCommand::Download => {
                self.download()?;
            }
            EditorCommand::Share => {
                self.share(host, clipboard)?;
            }
            other => {
                if !self.editor.execute(other) {
                    log::debug!("{} had nothing to do", other.name());
                }
                self.settle().await;
            }
        }
        Ok(())
    }

    /// Flatten the stage at the export pixel ratio, without selection
    /// handles.
    pub fn export(&self) -> AppResult<RenderedImage> {
        let ctx = RenderContext::new(self.editor.scene(), self.layout.stage)
            .with_scale_factor(self.editor.config().export_pixel_ratio);
        Ok(CpuRenderer::new().render(&ctx)?)
    }

    /// Write the flattened image to a timestamped PNG in the output
    /// directory.
    pub fn download(&mut self) -> AppResult<PathBuf> {
        let png_data = encode_png(&self.export()?)?;
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(export_file_name());
        std::fs::write(&path, &png_data)?;
        log::info!("Exported PNG to: {:?} ({} bytes)", path, png_data.len());
        self.downloads.push(path.clone());
        Ok(path)
    }

    /// Copy the flattened image to the clipboard, falling back to the data
    /// URL as text and finally to showing it for manual copying.
    pub fn share(
        &self,
        host: &mut dyn Host,
        clipboard: &mut dyn ClipboardSink,
    ) -> AppResult<ShareOutcome> {
        let image = self.export()?;

        if let Err(e) = clipboard.set_image(&image) {
            log::warn!("Failed to copy image to clipboard: {}", e);
        } else {
            host.notify(COPIED_MESSAGE);
            return Ok(ShareOutcome::Image);
        }

        let url = data_url(&encode_png(&image)?);
        if let Err(e) = clipboard.set_text(&url) {
            log::warn!("Failed to copy data URL to clipboard: {}", e);
        } else {
            host.notify(COPIED_MESSAGE);
            return Ok(ShareOutcome::Text);
        }

        host.manual_copy(&url);
        Ok(ShareOutcome::Manual)
    }
}

/// Run the headless host with parsed arguments.
pub async fn run(args: CliArgs) -> AppResult<()> {
    if args.keys {
        print!("{}", ShortcutRegistry::help_text());
        return Ok(());
    }
    let assets = args
        .assets
        .ok_or_else(|| AppError::Usage("--assets is required".to_string()))?;
    let script = args
        .script
        .ok_or_else(|| AppError::Usage("--script is required".to_string()))?;

    let config = load_config(args.config.as_deref())?;
    let catalog = scan_catalog(&assets)?;
    let actions = load_script(&script)?;
    let layout = StageLayout::for_window(args.window);
    let loader = Box::new(FileAssetLoader::new(&assets));
    let mut app = App::new(config, layout, catalog, loader, args.out)?;

    let mut host = ConsoleHost::new(args.yes);
    let mut clipboard = ArboardClipboard::new();
    for (index, action) in actions.iter().enumerate() {
        log::debug!("Action {}: {:?}", index + 1, action);
        app.apply(action, &mut host, &mut clipboard).await?;
    }

    log::info!(
        "Finished with {} parts, {} history entries, {} downloads",
        app.editor().scene().len(),
        app.editor().history().len(),
        app.downloads().len()
    );
    Ok(())
}
