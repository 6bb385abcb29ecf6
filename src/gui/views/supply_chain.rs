// src/gui/views/supply_chain.rs
use eframe::egui::{self, RichText};

use crate::api::types::SupplierForm;
use crate::renderers::supply_chain::{DELIVERY_OPTIONS, DetailsView, HEADING, SummaryView, SupplyChain};

use super::picker;

enum Action {
    Edit(String),
    Form(SupplierForm),
    Submit,
    Cancel,
}

pub fn draw(ui: &mut egui::Ui, supply: &SupplyChain) {
    let st = supply.snapshot();
    let mut actions = Vec::new();

    if let Some(editor) = &st.editor {
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(editor.title());
            let mut form = editor.form.clone();

            egui::Grid::new("supplier_form").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
                ui.label("Product");
                ui.label(&form.product_name);
                ui.end_row();

                for (label, value) in [
                    ("Supplier Name", &mut form.supplier_name),
                    ("Location", &mut form.location),
                    ("Crop Area", &mut form.crop_area),
                    ("Crop Yield", &mut form.crop_yield),
                    ("Delivery Time", &mut form.delivery_time),
                ] {
                    ui.label(label);
                    ui.text_edit_singleline(value);
                    ui.end_row();
                }

                ui.label("Assigned Branch");
                let mut branches = vec![(s!(), s!("Select Branch (Airport)"))];
                branches.extend(editor.branch_options());
                if let Some(v) = picker(ui, "supplier_branch", &form.assigned_branch, "Select Branch (Airport)", &branches, true) {
                    form.assigned_branch = v;
                }
                ui.end_row();

                ui.label("Delivery");
                let options: Vec<(String, String)> =
                    DELIVERY_OPTIONS.iter().map(|d| (s!(*d), s!(*d))).collect();
                if let Some(v) = picker(ui, "supplier_delivery", &form.delivery, "Select Delivery", &options, true) {
                    form.delivery = v;
                }
                ui.end_row();

                if editor.shows_shelf_days() {
                    ui.label("Ready for shelf (Days)");
                    ui.text_edit_singleline(&mut form.ready_for_shelf_days);
                    ui.end_row();
                }
            });

            if form != editor.form {
                actions.push(Action::Form(form));
            }
            ui.horizontal(|ui| {
                if ui.add_enabled(!editor.saving, egui::Button::new("Save")).clicked() {
                    actions.push(Action::Submit);
                }
                if ui.button("Cancel").clicked() {
                    actions.push(Action::Cancel);
                }
                if editor.saving {
                    ui.spinner();
                }
            });
        });
    }

    if st.summary != SummaryView::Hidden {
        ui.add_space(12.0);
        ui.heading(HEADING);
        match &st.summary {
            SummaryView::Loading => {
                ui.spinner();
            }
            SummaryView::Ready(row) => {
                egui::Grid::new("supply_summary").striped(true).show(ui, |ui| {
                    for title in ["Product", "Suppliers", "Branches", "Total Yield"] {
                        ui.strong(title);
                    }
                    ui.end_row();
                    ui.label(&row.product_name);
                    ui.label(row.num_suppliers.to_string());
                    ui.label(row.num_branches.to_string());
                    ui.label(row.total_yield.to_string());
                    ui.end_row();
                });
                ui.add_space(6.0);
                draw_details(ui, &st.details, &mut actions);
            }
            other => {
                if let Some(msg) = other.message() {
                    ui.colored_label(ui.visuals().error_fg_color, msg);
                }
            }
        }
    }

    for a in actions {
        match a {
            Action::Edit(name) => supply.open_edit(&name),
            Action::Form(form) => supply.edit_form(|f| *f = form),
            Action::Submit => supply.submit(),
            Action::Cancel => supply.close_editor(),
        }
    }
}

fn draw_details(ui: &mut egui::Ui, details: &DetailsView, actions: &mut Vec<Action>) {
    let none = |ui: &mut egui::Ui| {
        ui.label(RichText::new("None").weak());
    };
    match details {
        DetailsView::Idle => {}
        DetailsView::Loading => {
            ui.label(RichText::new("Loading...").weak());
        }
        DetailsView::Failed => {
            ui.colored_label(ui.visuals().error_fg_color, "Failed to load");
        }
        DetailsView::Ready(d) => {
            ui.columns(3, |cols| {
                cols[0].strong("Suppliers");
                if d.suppliers.is_empty() {
                    none(&mut cols[0]);
                }
                for name in &d.suppliers {
                    cols[0].horizontal(|ui| {
                        ui.label(name);
                        if ui.small_button("✏").on_hover_text("Edit Supplier").clicked() {
                            actions.push(Action::Edit(name.clone()));
                        }
                    });
                }

                cols[1].strong("Branches");
                if d.branches.is_empty() {
                    none(&mut cols[1]);
                }
                for b in &d.branches {
                    cols[1].label(b);
                }

                cols[2].strong("Yields");
                if d.yields.is_empty() {
                    none(&mut cols[2]);
                }
                for y in &d.yields {
                    cols[2].label(y.unwrap_or(0.0).to_string());
                }
            });
        }
    }
}
