// src/workspace/store.rs
//
// One workspace per sidebar icon. Tabs keep insertion order; names are
// unique inside a workspace.

use super::tab::{TabHandle, TabId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    pub label: String,
    tabs: Vec<TabHandle>,
    active_tab: Option<TabId>,
}

impl Workspace {
    pub fn new(label: &str) -> Self {
        Self { label: s!(label), tabs: Vec::new(), active_tab: None }
    }

    pub fn tabs(&self) -> &[TabHandle] {
        &self.tabs
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn active_tab(&self) -> Option<&TabHandle> {
        let id = self.active_tab?;
        self.get(id)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active_tab
    }

    pub fn get(&self, id: TabId) -> Option<&TabHandle> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&TabHandle> {
        self.tabs.iter().find(|t| t.name == name)
    }

    pub fn home(&self) -> Option<&TabHandle> {
        self.find(&self.label)
    }

    pub(crate) fn push(&mut self, tab: TabHandle) {
        debug_assert!(self.find(&tab.name).is_none());
        self.tabs.push(tab);
    }

    pub(crate) fn remove(&mut self, id: TabId) -> Option<TabHandle> {
        let idx = self.tabs.iter().position(|t| t.id == id)?;
        if self.active_tab == Some(id) {
            self.active_tab = None;
        }
        Some(self.tabs.remove(idx))
    }

    pub(crate) fn get_mut(&mut self, id: TabId) -> Option<&mut TabHandle> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Most recently inserted tab still open.
    pub fn last(&self) -> Option<&TabHandle> {
        self.tabs.last()
    }

    /// Mark `id` active and every other tab inactive. Unknown ids are ignored.
    pub(crate) fn set_active(&mut self, id: TabId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        for t in &mut self.tabs {
            t.active = t.id == id;
        }
        self.active_tab = Some(id);
        true
    }

    pub(crate) fn clear_active(&mut self) {
        for t in &mut self.tabs {
            t.active = false;
        }
        self.active_tab = None;
    }
}
