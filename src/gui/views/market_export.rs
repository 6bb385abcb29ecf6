// src/gui/views/market_export.rs
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::renderers::MarketExport;
use crate::renderers::market_export::{COLUMNS, HEADING, PRODUCT_CATEGORIES};

use super::picker;

enum Action {
    Country(String),
    Category(String),
    Search(String),
    Toggle(String),
    Add,
    Edit,
    AddSupplier,
}

pub fn draw(ui: &mut egui::Ui, renderer: &MarketExport) {
    let st = renderer.snapshot();
    let mut actions = Vec::new();

    ui.heading(HEADING);
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        let mut countries = vec![(s!(), s!("Select Country"))];
        countries.extend(st.countries());
        if let Some(v) = picker(ui, "export_country", &st.country, "Select Country", &countries, true) {
            actions.push(Action::Country(v));
        }

        let mut cats = vec![(s!(), s!("All Categories"))];
        cats.extend(PRODUCT_CATEGORIES.iter().map(|c| (s!(*c), s!(*c))));
        if let Some(v) = picker(ui, "export_category", &st.category, "All Categories", &cats, true) {
            actions.push(Action::Category(v));
        }

        let mut term = st.search.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut term).hint_text("Start typing..."))
            .changed()
        {
            actions.push(Action::Search(term));
        }

        if ui.button("Add Product").clicked() {
            actions.push(Action::Add);
        }
        if ui.button("Edit Product").clicked() {
            actions.push(Action::Edit);
        }
        if ui.button("Add Supplier").clicked() {
            actions.push(Action::AddSupplier);
        }
    });
    ui.add_space(8.0);

    if st.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading products...");
        });
    } else if let Some(err) = &st.error {
        ui.colored_label(ui.visuals().error_fg_color, err);
    } else {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            for line in st.summary_lines() {
                ui.label(RichText::new(line));
            }
        });
        ui.add_space(8.0);

        TableBuilder::new(ui)
            .id_salt("export_products")
            .striped(true)
            .vscroll(false)
            .column(Column::exact(24.0))
            .columns(Column::auto().resizable(true), COLUMNS.len())
            .header(22.0, |mut h| {
                h.col(|_| {});
                for title in COLUMNS {
                    h.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for p in st.visible_products() {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            let mut on = st.selected.as_deref() == Some(p.product_code.as_str());
                            if ui.checkbox(&mut on, "").clicked() {
                                actions.push(Action::Toggle(p.product_code.clone()));
                            }
                        });
                        for c in [
                            p.product_code.as_str(),
                            &p.name,
                            &p.product_type,
                            &p.country_name,
                            &p.trade_unit,
                            &p.packaging,
                            "USD",
                        ] {
                            row.col(|ui| {
                                ui.label(c);
                            });
                        }
                    });
                }
            });

        super::supply_chain::draw(ui, renderer.supply());
    }

    for a in actions {
        match a {
            Action::Country(v) => renderer.set_country(&v),
            Action::Category(v) => renderer.set_category(&v),
            Action::Search(v) => renderer.set_search(&v),
            Action::Toggle(code) => renderer.toggle_selected(&code),
            Action::Add => renderer.add_product(),
            Action::Edit => renderer.edit_product(),
            Action::AddSupplier => renderer.add_supplier(),
        }
    }
}
