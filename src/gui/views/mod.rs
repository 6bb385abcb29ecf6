// src/gui/views/mod.rs
//
// egui views for the renderer tabs. Each view draws from a snapshot of the
// renderer's state and calls back into the renderer after drawing, so no
// state lock is held while a renderer method runs.

pub mod market_analysis;
pub mod market_export;
pub mod market_import;
pub mod routes;
pub mod supply_chain;
pub mod user_management;

use eframe::egui::{self, RichText};

use crate::dispatch::kind::RendererKind;
use crate::gui::app::App;
use crate::renderers::{StatusLine, Tone};

pub fn draw(ui: &mut egui::Ui, app: &mut App, kind: RendererKind) {
    let renderers = app.tabs.dispatcher_mut().renderers_mut();
    match kind {
        RendererKind::MarketAnalysis => market_analysis::draw(ui, &renderers.market_analysis),
        RendererKind::Import => market_import::draw(ui, &renderers.import),
        RendererKind::Export => market_export::draw(ui, &renderers.export),
        RendererKind::Routes => routes::draw(ui, &renderers.routes),
        RendererKind::UserManagement => user_management::draw(ui, &renderers.users),
    }
}

pub(crate) fn status_line(ui: &mut egui::Ui, line: &StatusLine) {
    let color = match line.tone {
        Tone::Info => ui.visuals().text_color(),
        Tone::Success => egui::Color32::from_rgb(0x4c, 0xaf, 0x50),
        Tone::Error => ui.visuals().error_fg_color,
    };
    ui.label(RichText::new(&line.text).color(color));
}

/// Combo box over `(value, label)` pairs. Returns the newly picked value.
pub(crate) fn picker(
    ui: &mut egui::Ui,
    id: &str,
    current: &str,
    placeholder: &str,
    options: &[(String, String)],
    enabled: bool,
) -> Option<String> {
    let shown = options
        .iter()
        .find(|(v, _)| v == current)
        .map(|(_, l)| l.as_str())
        .unwrap_or(placeholder);
    let mut picked = None;

    ui.add_enabled_ui(enabled, |ui| {
        egui::ComboBox::from_id_salt(id)
            .selected_text(shown)
            .width(200.0)
            .show_ui(ui, |ui| {
                for (value, label) in options {
                    if ui.selectable_label(value == current, label).clicked() && value != current {
                        picked = Some(value.clone());
                    }
                }
            });
    });
    picked
}
