//! Stage and base image sizing for a given window size.

use kurbo::{Rect, Size};

const HEADER_HEIGHT: f64 = 70.0;
const FOOTER_HEIGHT: f64 = 70.0;
const TOOLBOX_WIDTH: f64 = 180.0;
const TOOLS_PANEL_HEIGHT: f64 = 60.0;
const PADDING: f64 = 32.0;
const GAP: f64 = 16.0;

const MAX_STAGE_WIDTH: f64 = 520.0;
const MAX_STAGE_HEIGHT: f64 = 480.0;
const STAGE_HEIGHT_RATIO: f64 = 0.92;
const BASE_RATIO: f64 = 0.82;

/// Computed stage and base image geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageLayout {
    /// Size of the drawing stage.
    pub stage: Size,
    /// Where the base image sits inside the stage.
    pub base: Rect,
}

impl StageLayout {
    /// Lay out the stage for a window, leaving room for header, footer,
    /// toolbox and tools panel.
    pub fn for_window(window: Size) -> Self {
        let available_height =
            window.height - HEADER_HEIGHT - FOOTER_HEIGHT - TOOLS_PANEL_HEIGHT - PADDING - GAP;
        let available_width = window.width - TOOLBOX_WIDTH - PADDING - GAP;
        let max_size = available_width.min(available_height).max(0.0);

        let stage_width = MAX_STAGE_WIDTH.min(max_size).floor();
        let stage_height = MAX_STAGE_HEIGHT.min(max_size * STAGE_HEIGHT_RATIO).floor();
        Self::for_stage(Size::new(stage_width, stage_height))
    }

    /// Lay out the base image centred in a stage of known size.
    pub fn for_stage(stage: Size) -> Self {
        let base_width = (stage.width * BASE_RATIO).floor();
        let base_height = (stage.height * BASE_RATIO).floor();
        let x = (stage.width - base_width) / 2.0;
        let y = (stage.height - base_height) / 2.0;
        Self {
            stage,
            base: Rect::new(x, y, x + base_width, y + base_height),
        }
    }
}

impl Default for StageLayout {
    fn default() -> Self {
        Self::for_stage(Size::new(MAX_STAGE_WIDTH, MAX_STAGE_HEIGHT))
    }
}
