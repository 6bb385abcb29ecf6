// src/gui/app.rs
use std::{error::Error, sync::Arc};

use eframe::egui;

use crate::{
    config::{options::ConsoleOptions, state::AppState},
    core::net::{Backend, HttpBackend},
    dispatch::content::Ticket,
    events::Repaint,
    storage::LocalStore,
    workspace::TabManager,
};

use super::components;

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    let console = ConsoleOptions::from_env();
    crate::log::init(&console.store_dir, crate::log::level_from_env());
    logf!("Init: backend {}", console.net.base_url());

    eframe::run_native(
        "Financial Simulator",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(&cc.egui_ctx, AppState::new(console))))),
    )?;
    Ok(())
}

pub struct App {
    // UI-thread state
    pub state: AppState,

    // workspaces, tabs and the content region workers publish into
    pub tabs: TabManager,

    // row picked in the fragment table on screen, tied to its render
    pub fragment_pick: Option<(Ticket, usize)>,
}

impl App {
    pub fn new(ctx: &egui::Context, state: AppState) -> Self {
        let store = match LocalStore::open(&state.options.store_dir) {
            Ok(s) => s,
            Err(e) => {
                loge!("Init: local storage unavailable ({}), using memory", e);
                LocalStore::in_memory()
            }
        };
        store.clear_on_start();

        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(state.options.net.clone()));
        let mut tabs = TabManager::with_backend(
            backend,
            Arc::new(store),
            &state.options,
            Repaint::from_ctx(ctx),
        );
        tabs.dispatcher_mut().preload();

        Self { state, tabs, fragment_pick: None }
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn sidebar_label(&self) -> Option<&str> {
        self.state.gui.sidebar_label.as_deref()
    }

    /// Sidebar icon click.
    pub fn select_icon(&mut self, label: &str) {
        logf!("UI: workspace {:?}", label);
        self.state.gui.sidebar_label = Some(s!(label));
        self.state.gui.show_menu = true;
        self.fragment_pick = None;
        self.tabs.switch_workspace(label);
    }

    /// Menu option click.
    pub fn open_menu_item(&mut self, name: &str) {
        self.fragment_pick = None;
        self.tabs.open_tab(name, Default::default());
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tabs.pump_events();

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(48.0)
            .show(ctx, |ui| {
                components::sidebar::draw_icons(ui, self);
            });

        if self.state.gui.show_menu {
            egui::SidePanel::left("options")
                .resizable(true)
                .default_width(200.0)
                .show(ctx, |ui| {
                    components::sidebar::draw_menu(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            components::tabs::draw(ui, self);

            ui.separator();

            components::content::draw(ui, self);
        });

        components::alerts::draw(ctx, self);
    }
}
