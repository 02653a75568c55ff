//! The user-facing side of the host: prompts, notifications and the
//! system clipboard.

use jackpatch_render::RenderedImage;
use std::borrow::Cow;

/// Prompts and messages shown to the user.
pub trait Host {
    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
    /// Show a transient message.
    fn notify(&mut self, message: &str);
    /// Show data the user has to copy by hand.
    fn manual_copy(&mut self, data: &str);
}

/// Clipboard targets used by share.
pub trait ClipboardSink {
    fn set_image(&mut self, image: &RenderedImage) -> Result<(), String>;
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// Terminal host. Confirmations are answered by `--yes`.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHost {
    pub assume_yes: bool,
}

impl ConsoleHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Host for ConsoleHost {
    fn confirm(&mut self, message: &str) -> bool {
        log::info!("{} {}", message, if self.assume_yes { "yes" } else { "no" });
        self.assume_yes
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }

    fn manual_copy(&mut self, data: &str) {
        println!("Copy this image data:");
        println!("{}", data);
    }
}

/// System clipboard via arboard, opened on first use.
#[derive(Default)]
pub struct ArboardClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, String> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| "clipboard unavailable".to_string())
    }
}

impl ClipboardSink for ArboardClipboard {
    fn set_image(&mut self, image: &RenderedImage) -> Result<(), String> {
        let data = arboard::ImageData {
            width: image.width as usize,
            height: image.height as usize,
            bytes: Cow::Borrowed(&image.rgba_data),
        };
        self.clipboard()?.set_image(data).map_err(|e| e.to_string())
    }

    fn set_text(&mut self, text: &str) -> Result<(), String> {
        self.clipboard()?
            .set_text(text.to_string())
            .map_err(|e| e.to_string())
    }
}
