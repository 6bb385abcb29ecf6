// src/workspace/mod.rs
//
// Tab manager: per-sidebar-icon workspaces, their tab registries, the
// visible tab bar and the dispatcher that renders the active tab.
// Every operation is a silent no-op until a workspace is current.

mod store;
mod tab;

pub use store::Workspace;
pub use tab::{TabHandle, TabId, TabOptions};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use crate::config::options::ConsoleOptions;
use crate::core::net::Backend;
use crate::dispatch::Dispatcher;
use crate::dispatch::content::ContentRegion;
use crate::dispatch::kind::TabKind;
use crate::events::{self, ConsoleEvent, Repaint};
use crate::renderers::{RenderEnv, Renderers};
use crate::storage::LocalStore;

pub struct TabManager {
    workspaces: HashMap<String, Workspace>,
    current: Option<String>,
    tab_bar: Vec<TabId>,
    next_tab_id: u64,
    dispatcher: Dispatcher,
    events: Option<Receiver<ConsoleEvent>>,
}

impl TabManager {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            workspaces: HashMap::new(),
            current: None,
            tab_bar: Vec::new(),
            next_tab_id: 1,
            dispatcher,
            events: None,
        }
    }

    /// Full wiring: content region, event channel, renderers, dispatcher.
    pub fn with_backend(
        backend: Arc<dyn Backend>,
        store: Arc<LocalStore>,
        options: &ConsoleOptions,
        repaint: Repaint,
    ) -> Self {
        let (tx, rx) = events::channel();
        let region = ContentRegion::new(repaint.clone());
        let env = RenderEnv::new(Arc::clone(&backend), store, tx, repaint, options.poll);
        let dispatcher = Dispatcher::new(backend, region, Renderers::new(env));
        let mut mgr = Self::new(dispatcher);
        mgr.events = Some(rx);
        mgr
    }

    /* ---------- queries ---------- */

    pub fn current_label(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Workspace> {
        self.workspaces.get(self.current.as_deref()?)
    }

    pub fn workspace(&self, label: &str) -> Option<&Workspace> {
        self.workspaces.get(label)
    }

    pub fn workspace_labels(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.workspaces.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }

    /// Visible tabs, left to right.
    pub fn tab_bar(&self) -> Vec<&TabHandle> {
        let Some(ws) = self.current() else { return Vec::new() };
        self.tab_bar.iter().filter_map(|id| ws.get(*id)).collect()
    }

    pub fn tab_bar_names(&self) -> Vec<&str> {
        self.tab_bar().into_iter().map(|t| t.name.as_str()).collect()
    }

    pub fn active_tab(&self) -> Option<&TabHandle> {
        self.current()?.active_tab()
    }

    pub fn region(&self) -> &ContentRegion {
        self.dispatcher.region()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /* ---------- workspace store ---------- */

    pub fn switch_workspace(&mut self, label: &str) {
        if !self.workspaces.contains_key(label) {
            logf!("Workspace: create {:?}", label);
            self.workspaces.insert(s!(label), Workspace::new(label));
        }
        self.current = Some(s!(label));

        let has_home = self.workspaces.get(label).is_some_and(|ws| ws.find(label).is_some());
        if !has_home {
            if let Some(id) = self.create_tab(label, TabOptions::home()) {
                // the home tab only takes over an empty selection
                if let Some(ws) = self.workspaces.get_mut(label).filter(|ws| ws.active_id().is_none()) {
                    ws.set_active(id);
                }
            }
        }

        let Some(ws) = self.workspaces.get(label) else { return };
        self.tab_bar = ws.tabs().iter().map(|t| t.id).collect();

        let target = ws
            .active_tab()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| s!(label));
        logd!("Workspace: switch {:?} ({} tab(s), active {:?})", label, self.tab_bar.len(), target);
        self.set_active_tab(&target);
    }

    /* ---------- tab registry ---------- */

    /// Id of the tab named `name` in the current workspace, creating it if
    /// needed. An already open tab keeps its options, except that a new
    /// record id or product code re-points it ("Edit Aircraft" for another
    /// aircraft).
    pub fn create_tab(&mut self, name: &str, opts: TabOptions) -> Option<TabId> {
        let label = self.current.as_deref()?;
        let ws = self.workspaces.get_mut(label)?;
        if let Some(existing) = ws.find(name) {
            let id = existing.id;
            if existing.is_retarget(&opts) {
                if let Some(tab) = ws.get_mut(id) {
                    tab.retarget(&opts);
                    logd!("Tabs: {} {:?} re-pointed, kind={:?}", id, name, tab.kind);
                }
            }
            return Some(id);
        }

        let id = TabId(self.next_tab_id);
        self.next_tab_id += 1;
        let tab = TabHandle::new(id, name, opts);
        logd!("Tabs: create {} {:?} kind={:?} in {:?}", id, name, tab.kind, label);
        ws.push(tab);
        self.tab_bar.push(id);
        Some(id)
    }

    /// Close a tab of the current workspace. Non-closable tabs refuse.
    /// Returns whether a tab was removed.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(tab) = self.current().and_then(|ws| ws.get(id)) else {
            return false;
        };
        if !tab.closable {
            logd!("Tabs: {} {:?} is not closable", id, tab.name);
            return false;
        }
        self.remove_and_fallback(id)
    }

    /// Close whatever tab is active in the current workspace.
    pub fn close_current_tab(&mut self) -> bool {
        match self.current().and_then(|ws| ws.active_id()) {
            Some(id) => self.remove_and_fallback(id),
            None => false,
        }
    }

    fn remove_and_fallback(&mut self, id: TabId) -> bool {
        let Some(label) = self.current.clone() else { return false };
        let Some(ws) = self.workspaces.get_mut(&label) else { return false };

        let was_active = ws.active_id() == Some(id);
        let Some(removed) = ws.remove(id) else { return false };
        self.tab_bar.retain(|t| *t != id);
        logd!("Tabs: closed {} {:?}", id, removed.name);
        if let TabKind::Renderer(kind) = removed.kind {
            self.dispatcher.renderers_mut().get_mut(kind).on_close();
        }

        if was_active {
            match ws.last().map(|t| t.name.clone()) {
                Some(name) => {
                    self.set_active_tab(&name);
                }
                None => {
                    ws.clear_active();
                    self.dispatcher.show_welcome();
                }
            }
        }
        true
    }

    /* ---------- dispatch ---------- */

    /// Activate `name` in the current workspace and render it. Returns false
    /// when no such tab is open.
    pub fn set_active_tab(&mut self, name: &str) -> bool {
        let Some(label) = self.current.as_deref() else { return false };
        let Some(ws) = self.workspaces.get_mut(label) else { return false };
        let Some(tab) = ws.find(name).cloned() else { return false };

        ws.set_active(tab.id);
        self.dispatcher.render(&tab);
        true
    }

    /// Menu click: create if absent, then activate.
    pub fn open_tab(&mut self, name: &str, opts: TabOptions) -> Option<TabId> {
        let id = self.create_tab(name, opts)?;
        self.set_active_tab(name);
        Some(id)
    }

    /// Re-fetch the home page; if the Airports tab is on screen it is
    /// re-rendered from the fresh copy.
    pub fn refresh_airport_list(&mut self) {
        let follow = self
            .active_tab()
            .filter(|t| t.kind == TabKind::AirportList)
            .map(|t| (self.dispatcher.region().current_ticket(), t.name.clone()));
        self.dispatcher.refresh_cache(follow);
    }

    pub fn handle_event(&mut self, ev: ConsoleEvent) {
        logd!("Events: {:?}", ev);
        match ev {
            ConsoleEvent::OpenTab { name, options } => {
                self.open_tab(&name, options);
            }
            ConsoleEvent::RefreshAirportList => self.refresh_airport_list(),
        }
    }

    /// Drain queued renderer events. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let Some(rx) = self.events.take() else { return 0 };
        let mut n = 0;
        while let Ok(ev) = rx.try_recv() {
            self.handle_event(ev);
            n += 1;
        }
        self.events = Some(rx);
        n
    }

    /// Wait for outstanding fetches, fragment and renderer alike.
    pub fn wait_idle(&mut self) {
        self.dispatcher.wait_idle();
        self.dispatcher.renderers().wait_idle();
    }
}
