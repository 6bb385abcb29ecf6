// src/gui/views/market_analysis.rs
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::renderers::MarketAnalysis;
use crate::renderers::market_analysis::AnalysisState;

use super::{picker, status_line};

enum Action {
    Country(String),
    Supermarket(String),
    Category(String),
    Subcategory(String),
    Value(String),
    Search,
    RawData(String),
}

pub fn draw(ui: &mut egui::Ui, renderer: &MarketAnalysis) {
    let st = renderer.snapshot();
    let mut actions = Vec::new();

    ui.heading("Market Analysis");
    ui.add_space(6.0);

    egui::Grid::new("analysis_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
        ui.label("Country");
        let countries: Vec<(String, String)> =
            st.countries.iter().map(|c| (c.code.clone(), c.name.clone())).collect();
        if let Some(v) = picker(ui, "analysis_country", &st.country, "Select Country", &countries, true) {
            actions.push(Action::Country(v));
        }
        ui.end_row();

        ui.label(st.supermarket_label());
        let markets: Vec<(String, String)> = st
            .supermarkets
            .iter()
            .map(|s| (s.module_name.clone(), AnalysisState::supermarket_option_label(s)))
            .collect();
        let enabled = !markets.is_empty();
        if let Some(v) = picker(ui, "analysis_market", &st.supermarket, "Select Supermarket", &markets, enabled) {
            actions.push(Action::Supermarket(v));
        }
        ui.end_row();

        ui.label("Category");
        let cats: Vec<(String, String)> =
            st.category_options().into_iter().map(|c| (c.clone(), c)).collect();
        if let Some(v) = picker(ui, "analysis_category", &st.category, "", &cats, !cats.is_empty()) {
            actions.push(Action::Category(v));
        }
        ui.end_row();

        if st.is_shopndrop() {
            ui.label("Subcategory");
            let subs: Vec<(String, String)> =
                st.subcategory_options().into_iter().map(|c| (c.clone(), c)).collect();
            if let Some(v) = picker(ui, "analysis_subcategory", &st.subcategory, "", &subs, !subs.is_empty()) {
                actions.push(Action::Subcategory(v));
            }
            ui.end_row();
        }

        ui.label("Value");
        let mut value = st.value.clone();
        let edit = ui.add_enabled(
            st.value_editable(),
            egui::TextEdit::singleline(&mut value).hint_text("Enter search term"),
        );
        if edit.changed() {
            actions.push(Action::Value(value));
        }
        ui.end_row();
    });

    ui.add_space(6.0);
    if ui.button("Search").clicked() {
        actions.push(Action::Search);
    }
    if let Some(line) = &st.status {
        status_line(ui, line);
    }

    let raw = st.raw_data_categories();
    if let (Some(domain), false) = (st.selected_domain(), raw.is_empty()) {
        ui.add_space(8.0);
        ui.horizontal_wrapped(|ui| {
            ui.label(format!("Raw data from {domain} for:"));
            for cat in &raw {
                if ui.link(cat).clicked() {
                    actions.push(Action::RawData(cat.clone()));
                }
            }
        });
    }

    if !st.meta.is_empty() {
        ui.add_space(8.0);
        ui.strong(&st.meta);
    }
    if !st.records.is_empty() {
        results_table(ui, &st);
    }

    for a in actions {
        match a {
            Action::Country(v) => renderer.select_country(&v),
            Action::Supermarket(v) => renderer.select_supermarket(&v),
            Action::Category(v) => renderer.select_category(&v),
            Action::Subcategory(v) => renderer.select_subcategory(&v),
            Action::Value(v) => renderer.set_value(&v),
            Action::Search => renderer.search(),
            Action::RawData(c) => renderer.open_raw_data(&c),
        }
    }
}

fn results_table(ui: &mut egui::Ui, st: &AnalysisState) {
    TableBuilder::new(ui)
        .id_salt("analysis_results")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(200.0).resizable(true))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder().clip(true))
        .column(Column::auto())
        .header(22.0, |mut h| {
            for title in ["Name", "Price", "Description", "URL"] {
                h.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for rec in &st.records {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&rec.name);
                    });
                    row.col(|ui| {
                        ui.label(&rec.price);
                    });
                    row.col(|ui| {
                        ui.label(&rec.description);
                    });
                    row.col(|ui| {
                        if !rec.url.is_empty() {
                            ui.hyperlink_to("Link", &rec.url);
                        }
                    });
                });
            }
        });
}
