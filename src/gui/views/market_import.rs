// src/gui/views/market_import.rs
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::renderers::MarketImport;
use crate::renderers::market_import::{COLUMNS, COUNTRY_PLACEHOLDER, HEADING, ImportState, SAVE_LABEL};

use super::picker;

enum Action {
    Country(String),
    Search(String),
    Price(String, String),
    Toggle(String),
    Save,
}

pub fn draw(ui: &mut egui::Ui, renderer: &MarketImport) {
    let st = renderer.snapshot();
    let mut actions = Vec::new();

    ui.heading(HEADING);
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label("Country");
            let countries: Vec<(String, String)> =
                st.countries.iter().map(|c| (c.code.clone(), c.name.clone())).collect();
            if let Some(v) = picker(ui, "import_country", &st.filter.country, COUNTRY_PLACEHOLDER, &countries, true) {
                actions.push(Action::Country(v));
            }
        });
        ui.vertical(|ui| {
            ui.label("Search by Product Name");
            let mut term = st.filter.search.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut term).hint_text("Start typing..."))
                .changed()
            {
                actions.push(Action::Search(term));
            }
        });
    });
    ui.add_space(8.0);

    if let Some(rate) = st.rate_label() {
        ui.label(RichText::new(rate).weak());
    }
    match st.view.message() {
        Some(msg) => {
            ui.label(RichText::new(msg).italics());
        }
        None => products_table(ui, &st, &mut actions),
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if st.save_visible() && ui.button(SAVE_LABEL).clicked() {
            actions.push(Action::Save);
        }
        if st.saving {
            ui.add_enabled(false, egui::Button::new("Saving..."));
        }
        let label = st.search_label();
        match st.search_link() {
            Some(url) => {
                ui.hyperlink_to(label, url);
            }
            None => {
                ui.add_enabled(false, egui::Button::new(label));
            }
        }
    });

    for a in actions {
        match a {
            Action::Country(v) => renderer.select_country(&v),
            Action::Search(v) => renderer.set_search(&v),
            Action::Price(code, v) => renderer.set_price(&code, &v),
            Action::Toggle(code) => renderer.toggle_selected(&code),
            Action::Save => renderer.save(),
        }
    }
}

fn products_table(ui: &mut egui::Ui, st: &ImportState, actions: &mut Vec<Action>) {
    let products: Vec<_> = st.visible_products().collect();

    TableBuilder::new(ui)
        .id_salt("import_products")
        .striped(true)
        .vscroll(false)
        .column(Column::exact(24.0))
        .columns(Column::auto().resizable(true), COLUMNS.len() - 1)
        .column(Column::exact(100.0))
        .header(22.0, |mut h| {
            h.col(|_| {});
            for title in COLUMNS {
                h.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for p in products {
                let code = &p.product_code;
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        let mut on = st.selected.as_deref() == Some(code.as_str());
                        if ui.checkbox(&mut on, "").clicked() {
                            actions.push(Action::Toggle(code.clone()));
                        }
                    });
                    let cells = [
                        code.clone(),
                        p.name.clone(),
                        p.product_type.clone(),
                        p.country_name.clone(),
                        p.trade_unit.clone(),
                        p.packaging.clone(),
                        s!("USD"),
                        st.fob_price(p),
                        st.last_price(code),
                        st.last_date(code),
                    ];
                    for c in cells {
                        row.col(|ui| {
                            ui.label(c);
                        });
                    }
                    row.col(|ui| {
                        let mut v = st.entered.get(code).cloned().unwrap_or_default();
                        let edit = egui::TextEdit::singleline(&mut v).hint_text("$ value").desired_width(90.0);
                        if ui.add(edit).changed() {
                            actions.push(Action::Price(code.clone(), v));
                        }
                    });
                });
            }
        });
}
