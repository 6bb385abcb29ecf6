// src/gui/components/sidebar.rs
//
// Icon strip plus the options panel of the selected icon. The icon strip
// switches workspaces; the panel opens tabs in the current one.

use eframe::egui::{self, RichText};

use crate::gui::{app::App, router};

pub fn draw_icons(ui: &mut egui::Ui, app: &mut App) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui| {
        for icon in router::icons() {
            let selected = app.sidebar_label() == Some(icon.label);
            let resp = ui
                .selectable_label(selected, RichText::new(icon.glyph).size(22.0))
                .on_hover_text(icon.label);
            if resp.clicked() {
                if selected {
                    // second click folds the options panel
                    app.state.gui.show_menu = !app.state.gui.show_menu;
                } else {
                    app.select_icon(icon.label);
                }
            }
            ui.add_space(6.0);
        }
    });
}

pub fn draw_menu(ui: &mut egui::Ui, app: &mut App) {
    let Some(label) = app.sidebar_label().map(String::from) else {
        ui.weak("Pick an icon");
        return;
    };
    ui.heading(router::options_title(&label));
    ui.separator();

    let mut clicked = None;
    for group in router::menu_for(&label) {
        egui::CollapsingHeader::new(group.title)
            .default_open(true)
            .show(ui, |ui| {
                for item in group.items {
                    let active = app.tabs.active_tab().is_some_and(|t| t.name == *item);
                    if ui.selectable_label(active, *item).clicked() {
                        clicked = Some(*item);
                    }
                }
            });
    }

    if let Some(name) = clicked {
        logd!("UI: menu {:?} → {:?}", label, name);
        app.open_menu_item(name);
    }
}
