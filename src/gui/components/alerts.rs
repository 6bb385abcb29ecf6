// src/gui/components/alerts.rs
//
// Blocking dialogs raised by renderers: plain alerts and yes/no confirms.
// Only the renderer on screen may raise one.

use eframe::egui;

use crate::core::lock;
use crate::dispatch::content::Content;
use crate::dispatch::kind::RendererKind;
use crate::gui::app::App;
use crate::renderers::market_import::COUNTRY_CHANGE_WARNING;

enum Dialog {
    Alert(String),
    Confirm { text: String, yes: &'static str, no: &'static str },
}

pub fn draw(ctx: &egui::Context, app: &mut App) {
    let Content::Renderer(kind) = app.tabs.region().content() else { return };
    let renderers = app.tabs.dispatcher_mut().renderers_mut();

    let dialog = match kind {
        RendererKind::MarketAnalysis => {
            let st = renderers.market_analysis.state();
            let pending = lock(&st).pending_confirm.clone();
            pending.map(|text| Dialog::Confirm { text, yes: "OK", no: "Cancel" })
        }
        RendererKind::Import => {
            let st = renderers.import.state();
            let st = lock(&st);
            if st.pending_country.is_some() {
                Some(Dialog::Confirm { text: s!(COUNTRY_CHANGE_WARNING), yes: "Change Country", no: "Cancel" })
            } else {
                st.alert.clone().map(Dialog::Alert)
            }
        }
        RendererKind::Export => renderers.export.alert().map(Dialog::Alert),
        RendererKind::UserManagement => lock(&renderers.users.state()).alert.clone().map(Dialog::Alert),
        RendererKind::Routes => None,
    };
    let Some(dialog) = dialog else { return };

    let mut answer = None;
    egui::Window::new("Financial Simulator")
        .id(egui::Id::new(("alert", kind)))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            match &dialog {
                Dialog::Alert(text) => {
                    ui.label(text);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        answer = Some(true);
                    }
                }
                Dialog::Confirm { text, yes, no } => {
                    ui.label(text);
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        if ui.button(*no).clicked() {
                            answer = Some(false);
                        }
                        if ui.button(*yes).clicked() {
                            answer = Some(true);
                        }
                    });
                }
            }
        });

    let Some(yes) = answer else { return };
    match (kind, &dialog) {
        (RendererKind::MarketAnalysis, _) => renderers.market_analysis.confirm_search(yes),
        (RendererKind::Import, Dialog::Confirm { .. }) => renderers.import.confirm_country_change(yes),
        (RendererKind::Import, Dialog::Alert(_)) => renderers.import.dismiss_alert(),
        (RendererKind::Export, _) => renderers.export.dismiss_alert(),
        (RendererKind::UserManagement, _) => renderers.users.dismiss_alert(),
        (RendererKind::Routes, _) => {}
    }
}
