// src/gui/components/content.rs
//
// The shared content region. Simple panels are drawn here; fragments are
// drawn block by block; renderer tabs hand over to their view.

use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::config::consts::LOADING_TEXT;
use crate::dispatch::actions;
use crate::dispatch::content::{Content, Ticket};
use crate::dispatch::fragment::{Block, Fragment, Table};
use crate::gui::{app::App, views};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let region = app.tabs.region().clone();
    let ticket = region.current_ticket();
    let content = region.content();

    egui::ScrollArea::vertical()
        .id_salt("content_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| match &content {
            Content::Welcome | Content::Placeholder { .. } | Content::Unavailable { .. } => {
                panel(ui, &content);
            }
            Content::Loading { title } => {
                ui.heading(title);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOADING_TEXT);
                });
            }
            Content::Fragment { title, fragment } => {
                let refresh = app.tabs.active_tab().and_then(|t| actions::refresh_event(&t.kind));
                if let Some(ev) = refresh {
                    if ui.button("Refresh list").clicked() {
                        app.fragment_pick = None;
                        app.tabs.handle_event(ev);
                    }
                }
                if fragment.first_heading().is_none() {
                    ui.heading(title);
                }
                draw_fragment(ui, app, ticket, fragment);
            }
            Content::Renderer(kind) => views::draw(ui, app, *kind),
        });
}

fn panel(ui: &mut egui::Ui, content: &Content) {
    if let Some(title) = content.title() {
        ui.heading(title);
    }
    if let Some(msg) = content.message() {
        let text = RichText::new(msg);
        match content {
            Content::Unavailable { .. } => ui.colored_label(ui.visuals().error_fg_color, text),
            _ => ui.label(text),
        };
    }
}

fn draw_fragment(ui: &mut egui::Ui, app: &mut App, ticket: Ticket, fragment: &Fragment) {
    let picked = app
        .fragment_pick
        .filter(|(t, _)| *t == ticket)
        .map(|(_, row)| row);
    let mut table_ix = 0;
    let mut pressed: Option<String> = None;

    for block in &fragment.blocks {
        match block {
            Block::Heading { level, text } => {
                let size = match level {
                    1 => 24.0,
                    2 => 20.0,
                    3 => 17.0,
                    _ => 15.0,
                };
                ui.label(RichText::new(text).size(size).strong());
            }
            Block::Paragraph(t) => {
                ui.label(t);
            }
            Block::Field { label, kind, value, .. } => {
                ui.horizontal(|ui| {
                    ui.label(label);
                    match kind.as_str() {
                        "checkbox" | "radio" => {
                            let mut on = value == "yes";
                            ui.add_enabled(false, egui::Checkbox::without_text(&mut on));
                        }
                        _ => {
                            let mut v = value.clone();
                            ui.add_enabled(false, egui::TextEdit::singleline(&mut v));
                        }
                    }
                });
            }
            Block::Select { label, options, .. } => {
                let chosen = options
                    .iter()
                    .find(|o| o.selected)
                    .or(options.first())
                    .map(|o| o.text.as_str())
                    .unwrap_or("");
                ui.horizontal(|ui| {
                    ui.label(label);
                    ui.add_enabled(false, egui::Button::new(chosen));
                });
            }
            Block::Button { id, label } => {
                let id = id.as_deref().unwrap_or("");
                let enabled = actions::is_wired(id) && (!actions::needs_selection(id) || picked.is_some());
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    pressed = Some(s!(id));
                }
            }
            Block::Table(table) => {
                // only the first table's rows are pickable
                let pickable = table_ix == 0 && table.rows.iter().any(|r| r.value.is_some());
                if let Some(row) = draw_table(ui, table, table_ix, pickable.then_some(picked).flatten()) {
                    app.fragment_pick = if picked == Some(row) { None } else { Some((ticket, row)) };
                }
                table_ix += 1;
            }
        }
        ui.add_space(4.0);
    }

    if let Some(id) = pressed {
        let row = picked.and_then(|ix| fragment.tables().next()?.rows.get(ix));
        if let Some(ev) = actions::button_event(&id, row) {
            app.fragment_pick = None;
            app.tabs.handle_event(ev);
        }
    }
}

/// Draws `table`; returns the row index clicked this frame.
fn draw_table(ui: &mut egui::Ui, table: &Table, salt: usize, picked: Option<usize>) -> Option<usize> {
    let cols = table
        .headers
        .len()
        .max(table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0));
    if cols == 0 {
        return None;
    }
    let pickable = table.rows.iter().any(|r| r.value.is_some());
    let mut clicked = None;

    TableBuilder::new(ui)
        .id_salt(("fragment_table", salt))
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), cols)
        .header(22.0, |mut header| {
            for i in 0..cols {
                header.col(|ui| {
                    ui.strong(table.headers.get(i).map(String::as_str).unwrap_or(""));
                });
            }
        })
        .body(|mut body| {
            for (ix, row) in table.rows.iter().enumerate() {
                body.row(20.0, |mut r| {
                    for i in 0..cols {
                        r.col(|ui| {
                            let text = row.cells.get(i).map(String::as_str).unwrap_or("");
                            if i == 0 && pickable && row.value.is_some() {
                                let mut on = picked == Some(ix);
                                if ui.checkbox(&mut on, text).clicked() {
                                    clicked = Some(ix);
                                }
                            } else {
                                ui.label(text);
                            }
                        });
                    }
                });
            }
        });
    clicked
}
