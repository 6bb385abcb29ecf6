// src/gui/views/user_management.rs
use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::api::types::StructureRegion;
use crate::renderers::UserManagement;
use crate::renderers::user_management::{HEADING, Level, ManagementState, NO_STRUCTURE};

use super::picker;

enum Action {
    Select(Level, String),
    Manager(Level, String),
    User(Level, String),
    Save(Level),
}

pub fn draw(ui: &mut egui::Ui, renderer: &UserManagement) {
    let st = renderer.snapshot();
    let mut actions = Vec::new();

    ui.heading(HEADING);
    ui.add_space(6.0);

    egui::Grid::new("management_form").num_columns(5).spacing([12.0, 6.0]).show(ui, |ui| {
        let regions: Vec<(String, String)> = st.regions.iter().map(|r| (r.clone(), r.clone())).collect();
        level_row(ui, &st, Level::Region, "Select Region", "-- Select --", &regions, true, &mut actions);

        let countries: Vec<(String, String)> =
            st.countries.iter().map(|c| (c.code.clone(), c.name.clone())).collect();
        level_row(
            ui,
            &st,
            Level::Country,
            "Country",
            st.country_placeholder(),
            &countries,
            st.countries_enabled(),
            &mut actions,
        );

        let airports: Vec<(String, String)> =
            st.airports.iter().map(|a| (a.iata_code.clone(), a.label())).collect();
        level_row(
            ui,
            &st,
            Level::Branch,
            "Airport",
            st.airport_placeholder(),
            &airports,
            st.airports_enabled(),
            &mut actions,
        );
    });

    ui.add_space(12.0);
    match &st.structure {
        None => {}
        Some(rows) if rows.is_empty() => {
            ui.label(NO_STRUCTURE);
        }
        Some(rows) => structure_table(ui, rows),
    }

    for a in actions {
        match a {
            Action::Select(level, v) => renderer.select(level, &v),
            Action::Manager(level, v) => renderer.set_manager(level, &v),
            Action::User(level, v) => renderer.set_user(level, &v),
            Action::Save(level) => renderer.save(level),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn level_row(
    ui: &mut egui::Ui,
    st: &ManagementState,
    level: Level,
    label: &str,
    placeholder: &str,
    options: &[(String, String)],
    enabled: bool,
    actions: &mut Vec<Action>,
) {
    let form = st.form(level);
    ui.label(label);
    if let Some(v) = picker(ui, &format!("mgmt_{level:?}"), &form.selected, placeholder, options, enabled) {
        actions.push(Action::Select(level, v));
    }

    let mut manager = form.manager.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut manager).hint_text("Enter manager name"))
        .changed()
    {
        actions.push(Action::Manager(level, manager));
    }
    let mut user = form.user.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut user).hint_text("Enter user name"))
        .changed()
    {
        actions.push(Action::User(level, user));
    }
    if ui.button(form.button).clicked() {
        actions.push(Action::Save(level));
    }
    ui.end_row();
}

/// Flattened overview: one line per branch, region and country cells
/// only on their first line.
fn structure_table(ui: &mut egui::Ui, rows: &[StructureRegion]) {
    let mut lines: Vec<[String; 9]> = Vec::new();
    for r in rows {
        let region = [r.region.clone(), r.regional_manager.clone(), r.region_user.clone()];
        if r.countries.is_empty() {
            lines.push(line(&region, &[s!("No countries added yet"), s!(), s!()], &[s!(), s!(), s!()]));
        }
        for (ci, c) in r.countries.iter().enumerate() {
            let region = if ci == 0 { region.clone() } else { Default::default() };
            let country = [c.country_name.clone(), c.country_manager.clone(), c.country_user.clone()];
            if c.branches.is_empty() {
                lines.push(line(&region, &country, &[s!("No branches added yet"), s!(), s!()]));
            }
            for (bi, b) in c.branches.iter().enumerate() {
                let (region, country) = if bi == 0 {
                    (region.clone(), country.clone())
                } else {
                    (Default::default(), Default::default())
                };
                let branch = [
                    format!("{} - {}", b.airport_code, b.airport_city),
                    b.branch_manager.clone(),
                    b.branch_user.clone(),
                ];
                lines.push(line(&region, &country, &branch));
            }
        }
    }

    ui.strong("Commercial Structure Overview");
    TableBuilder::new(ui)
        .id_salt("management_structure")
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), 9)
        .header(22.0, |mut h| {
            for title in [
                "Region",
                "Regional Manager",
                "Region User",
                "Country",
                "Country Manager",
                "Country User",
                "Airport",
                "Branch Manager",
                "Branch User",
            ] {
                h.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for l in &lines {
                body.row(20.0, |mut row| {
                    for cell in l {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

fn line(region: &[String; 3], country: &[String; 3], branch: &[String; 3]) -> [String; 9] {
    let mut out: [String; 9] = Default::default();
    for (i, v) in region.iter().chain(country).chain(branch).enumerate() {
        out[i] = v.clone();
    }
    out
}
