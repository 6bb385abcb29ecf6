// src/gui/components/tabs.rs
//
// Tab bar of the current workspace: click a label to activate, × to close.
// Non-closable home tabs get no close button.

use eframe::egui;

use crate::gui::app::App;
use crate::workspace::TabId;

enum Click {
    Activate(String),
    Close(TabId),
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut click = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        if app.tabs.current_label().is_none() {
            ui.weak("No workspace selected");
            return;
        }

        for tab in app.tabs.tab_bar() {
            egui::Frame::group(ui.style()).inner_margin(egui::Margin::symmetric(6, 2)).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.selectable_label(tab.active, &tab.name).clicked() && !tab.active {
                        click = Some(Click::Activate(tab.name.clone()));
                    }
                    if tab.closable && ui.small_button("×").on_hover_text("Close tab").clicked() {
                        click = Some(Click::Close(tab.id));
                    }
                });
            });
        }
    });

    match click {
        Some(Click::Activate(name)) => {
            logd!("UI: tab {:?}", name);
            app.fragment_pick = None;
            app.tabs.set_active_tab(&name);
        }
        Some(Click::Close(id)) => {
            app.fragment_pick = None;
            app.tabs.close_tab(id);
        }
        None => {}
    }
}
