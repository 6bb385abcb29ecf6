// src/config/state.rs
use super::options::ConsoleOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Sidebar icon last clicked (None until the first click)
    pub sidebar_label: Option<String>,

    /// Options sidebar visible
    pub show_menu: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1280,
            window_h: 800,
            sidebar_label: None,
            show_menu: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: ConsoleOptions,
    pub gui: GuiState,
}

impl AppState {
    pub fn new(options: ConsoleOptions) -> Self {
        Self { options, gui: GuiState::default() }
    }
}
