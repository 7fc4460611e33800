//! Compiled-in application settings.

use ratatui::style::Color;
use std::time::Duration;

/// Application settings. There is no configuration file; `RUST_LOG` is the only
/// environment input (see [`crate::logging`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Window title.
    pub title: &'static str,
    /// Minimum window size in pixels (width, height).
    pub min_size_px: (u16, u16),
    /// Pixel size of one terminal cell (width, height) used to translate pixel sizes.
    pub cell_size_px: (u16, u16),
    /// Tab stop in columns.
    pub tab_stop: usize,
    /// Editor background.
    pub editor_background: Color,
    /// Editor foreground for unhighlighted text.
    pub editor_foreground: Color,
    /// Gutter background.
    pub gutter_background: Color,
    /// Gutter foreground.
    pub gutter_foreground: Color,
    /// Selection background.
    pub selection_background: Color,
    /// Typing pause after which the current undo group is closed.
    pub undo_group_idle: Duration,
}

impl AppConfig {
    /// Minimum window size in terminal cells (columns, rows).
    pub fn min_size_cells(&self) -> (u16, u16) {
        let (cell_w, cell_h) = self.cell_size_px;
        (
            self.min_size_px.0.div_ceil(cell_w.max(1)),
            self.min_size_px.1.div_ceil(cell_h.max(1)),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pythonico",
            min_size_px: (640, 400),
            cell_size_px: (8, 16),
            tab_stop: 4,
            editor_background: Color::Rgb(253, 246, 227),
            editor_foreground: Color::Rgb(0x20, 0x20, 0x20),
            gutter_background: Color::Rgb(0xf0, 0xf0, 0xf0),
            gutter_foreground: Color::Rgb(0x80, 0x80, 0x80),
            selection_background: Color::Rgb(0xcc, 0xdd, 0xf5),
            undo_group_idle: Duration::from_millis(500),
        }
    }
}
