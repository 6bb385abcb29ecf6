// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::ViewportBuilder;
use finsim_console::config::state::GuiState;
use finsim_console::gui;

fn main() {
    let window = GuiState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Financial Simulator")
            .with_inner_size([window.window_w as f32, window.window_h as f32]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
