// src/gui/views/routes.rs
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::renderers::Routes;
use crate::renderers::routes::RecordsView;

use super::picker;

enum Action {
    Departure(String),
    Arrival(String),
}

pub fn draw(ui: &mut egui::Ui, renderer: &Routes) {
    let st = renderer.snapshot();
    let mut actions = Vec::new();

    ui.heading("Routes");
    ui.add_space(6.0);

    ui.horizontal(|ui| {
        let mut deps = vec![(s!(), s!("Select departure airport"))];
        deps.extend(st.departure_options());
        if let Some(v) = picker(ui, "routes_departure", &st.selection.departure, "Select departure airport", &deps, true) {
            actions.push(Action::Departure(v));
        }

        let mut arrs = vec![(s!(), s!("Select arrival airport"))];
        arrs.extend(st.arrival_options());
        if let Some(v) = picker(
            ui,
            "routes_arrival",
            &st.selection.arrival,
            "Select arrival airport",
            &arrs,
            st.arrival_enabled(),
        ) {
            actions.push(Action::Arrival(v));
        }

        if st.airports_loading {
            ui.spinner();
        }
    });
    ui.add_space(8.0);

    match &st.records {
        RecordsView::Ready(table) => {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                TableBuilder::new(ui)
                    .id_salt("route_records")
                    .striped(true)
                    .vscroll(false)
                    .columns(Column::auto().resizable(true), table.fields.len())
                    .header(22.0, |mut h| {
                        for title in table.headers() {
                            h.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|mut body| {
                        for cells in &table.rows {
                            body.row(20.0, |mut row| {
                                for c in cells {
                                    row.col(|ui| {
                                        ui.label(c);
                                    });
                                }
                            });
                        }
                    });
            });
        }
        other => {
            if let Some(msg) = other.message() {
                if other.is_error() {
                    ui.colored_label(ui.visuals().error_fg_color, msg);
                } else {
                    ui.label(msg);
                }
            }
        }
    }

    for a in actions {
        match a {
            Action::Departure(v) => renderer.set_departure(&v),
            Action::Arrival(v) => renderer.set_arrival(&v),
        }
    }
}
