// src/renderers/user_management.rs
//
// Administrator › User Management: who manages which region, country and
// airport branch. The three levels cascade; a level only unlocks once the
// one above it has saved info.

use std::sync::{Arc, Mutex};

use crate::api::{
    self,
    types::{Airport, BranchInfo, Country, CountryInfo, InfoCheck, RegionInfo, SaveReply, StructureRegion},
};
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::content::{Content, ContentRegion, Ticket};
use crate::dispatch::kind::RendererKind;
use crate::error::Result;

use super::{RenderEnv, Renderer};

pub const HEADING: &str = "Commercial Structure Management";
pub const REGIONS_FAILED: &str = "Could not load regions.";
pub const NO_STRUCTURE: &str = "No management data yet. Start by selecting a region and saving info.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Region,
    Country,
    Branch,
}

impl Level {
    fn noun(self) -> &'static str {
        match self {
            Level::Region => "regional",
            Level::Country => "country",
            Level::Branch => "branch",
        }
    }

    fn saved(self) -> &'static str {
        match self {
            Level::Region => "Region info saved successfully",
            Level::Country => "Country info saved successfully",
            Level::Branch => "Branch info saved successfully",
        }
    }

    /// Button label while nothing is selected, once info exists, and
    /// before any was saved.
    fn labels(self) -> [&'static str; 3] {
        match self {
            Level::Region => ["Edit Region", "Edit Region", "Save Region Info"],
            Level::Country => ["Add Country", "Edit Country", "Save Country Info"],
            Level::Branch => ["Region Core Data", "Branch Information", "Save Branch Info"],
        }
    }
}

/// One row of the cascade: the selection, its two names and the button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelForm {
    pub level: Level,
    pub selected: String,
    pub manager: String,
    pub user: String,
    pub exists: bool,
    pub button: &'static str,
}

impl LevelForm {
    fn new(level: Level) -> Self {
        Self {
            level,
            selected: s!(),
            manager: s!(),
            user: s!(),
            exists: false,
            button: level.labels()[0],
        }
    }

    fn clear(&mut self) {
        *self = Self::new(self.level);
    }

    fn apply(&mut self, check: &InfoCheck) {
        let [_, existing, fresh] = self.level.labels();
        self.exists = check.exists;
        if check.exists {
            self.button = existing;
            self.manager = check.manager.clone();
            self.user = check.user.clone();
        } else {
            self.button = fresh;
            self.manager.clear();
            self.user.clear();
        }
    }

    fn complete(&self) -> bool {
        !self.selected.is_empty() && !self.manager.trim().is_empty() && !self.user.trim().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ManagementState {
    pub regions: Vec<String>,
    pub countries: Vec<Country>,
    pub airports: Vec<Airport>,
    pub region: LevelForm,
    pub country: LevelForm,
    pub branch: LevelForm,
    pub structure: Option<Vec<StructureRegion>>,
    pub alert: Option<String>,
}

impl Default for ManagementState {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            countries: Vec::new(),
            airports: Vec::new(),
            region: LevelForm::new(Level::Region),
            country: LevelForm::new(Level::Country),
            branch: LevelForm::new(Level::Branch),
            structure: None,
            alert: None,
        }
    }
}

impl ManagementState {
    pub fn form(&self, level: Level) -> &LevelForm {
        match level {
            Level::Region => &self.region,
            Level::Country => &self.country,
            Level::Branch => &self.branch,
        }
    }

    pub fn form_mut(&mut self, level: Level) -> &mut LevelForm {
        match level {
            Level::Region => &mut self.region,
            Level::Country => &mut self.country,
            Level::Branch => &mut self.branch,
        }
    }

    pub fn countries_enabled(&self) -> bool {
        self.region.exists && !self.countries.is_empty()
    }

    pub fn airports_enabled(&self) -> bool {
        self.country.exists && !self.airports.is_empty()
    }

    pub fn country_placeholder(&self) -> &'static str {
        if self.countries.is_empty() { "Select a region first" } else { "-- Select --" }
    }

    pub fn airport_placeholder(&self) -> &'static str {
        if self.airports.is_empty() { "Select a country first" } else { "-- Select --" }
    }
}

/* ---------- blocking loaders ---------- */

/// Regions for the first dropdown. A failure replaces the whole tab with
/// the "could not load" panel.
pub fn load_regions(backend: &dyn Backend, state: &Mutex<ManagementState>, region: &ContentRegion, ticket: Ticket) {
    match api::regions(backend) {
        Ok(r) => lock(state).regions = r,
        Err(e) => {
            loge!("UserManagement: regions failed: {}", e);
            let panel = Content::Unavailable { title: s!(HEADING), message: s!(REGIONS_FAILED) };
            region.complete(ticket, panel);
        }
    }
}

pub fn load_structure(backend: &dyn Backend, state: &Mutex<ManagementState>) {
    match api::management_table(backend) {
        Ok(rows) => lock(state).structure = Some(rows),
        Err(e) => logw!("UserManagement: structure table failed: {}", e),
    }
}

/// Check info for the selection at `level` and, for region and country,
/// fetch the level below.
pub fn load_level(backend: &dyn Backend, state: &Mutex<ManagementState>, level: Level, key: &str) {
    let check = match level {
        Level::Region => api::check_region_info(backend, key),
        Level::Country => api::check_country_info(backend, key),
        Level::Branch => api::check_branch_info(backend, key),
    };
    match check {
        Ok(c) => {
            let mut st = lock(state);
            let form = st.form_mut(level);
            if form.selected == key {
                form.apply(&c);
            }
        }
        Err(e) => loge!("UserManagement: check {:?} {:?} failed: {}", level, key, e),
    }

    match level {
        Level::Region => {
            let countries = api::countries_by_region(backend, key).unwrap_or_else(|e| {
                loge!("UserManagement: countries of {:?} failed: {}", key, e);
                Vec::new()
            });
            let mut st = lock(state);
            if st.region.selected == key {
                st.countries = countries;
            }
        }
        Level::Country => {
            let airports = api::airports_by_country(backend, key).unwrap_or_else(|e| {
                loge!("UserManagement: airports of {:?} failed: {}", key, e);
                Vec::new()
            });
            let mut st = lock(state);
            if st.country.selected == key {
                st.airports = airports;
            }
        }
        Level::Branch => {}
    }
}

fn post_level(backend: &dyn Backend, level: Level, st: &ManagementState) -> Result<SaveReply> {
    let manager = s!(st.form(level).manager.trim());
    let user = s!(st.form(level).user.trim());
    match level {
        Level::Region => api::save_region_info(
            backend,
            &RegionInfo { region: st.region.selected.clone(), regional_manager: manager, region_user: user },
        ),
        Level::Country => api::save_country_info(
            backend,
            &CountryInfo {
                country: st.country.selected.clone(),
                region: st.region.selected.clone(),
                country_manager: manager,
                country_user: user,
            },
        ),
        Level::Branch => api::save_branch_info(
            backend,
            &BranchInfo {
                airport: st.branch.selected.clone(),
                country: st.country.selected.clone(),
                branch_manager: manager,
                branch_user: user,
            },
        ),
    }
}

/// POST the form at `level` and publish the alert. Returns whether it saved.
pub fn save_level(backend: &dyn Backend, state: &Mutex<ManagementState>, level: Level, snapshot: &ManagementState) -> bool {
    let reply = post_level(backend, level, snapshot);
    let mut st = lock(state);
    match reply {
        Ok(r) if r.success => {
            logf!("UserManagement: saved {:?} {:?}", level, snapshot.form(level).selected);
            st.alert = Some(s!(level.saved()));
            let form = st.form_mut(level);
            form.exists = true;
            form.button = level.labels()[1];
            true
        }
        Ok(r) => {
            let err = r.error.unwrap_or_else(|| s!("Unknown error"));
            st.alert = Some(format!("Error: {err}"));
            false
        }
        Err(e) => {
            loge!("UserManagement: save {:?} failed: {}", level, e);
            st.alert = Some(format!("Error: {e}"));
            false
        }
    }
}

/* ---------- renderer ---------- */

pub struct UserManagement {
    env: RenderEnv,
    state: Arc<Mutex<ManagementState>>,
}

impl UserManagement {
    pub fn new(env: RenderEnv) -> Self {
        Self { env, state: Arc::default() }
    }

    pub fn env(&self) -> &RenderEnv {
        &self.env
    }

    pub fn state(&self) -> Arc<Mutex<ManagementState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> ManagementState {
        lock(&self.state).clone()
    }

    /// Pick a region, country or airport. Everything below it resets.
    pub fn select(&self, level: Level, key: &str) {
        {
            let mut st = lock(&self.state);
            match level {
                Level::Region => {
                    st.region.clear();
                    st.country.clear();
                    st.branch.clear();
                    st.countries.clear();
                    st.airports.clear();
                }
                Level::Country => {
                    st.country.clear();
                    st.branch.clear();
                    st.airports.clear();
                }
                Level::Branch => st.branch.clear(),
            }
            st.form_mut(level).selected = s!(key);
        }
        if key.is_empty() {
            return;
        }

        let state = self.state();
        let key = s!(key);
        self.env.spawn(move |b| load_level(b, &state, level, &key));
    }

    pub fn set_manager(&self, level: Level, name: &str) {
        lock(&self.state).form_mut(level).manager = s!(name);
    }

    pub fn set_user(&self, level: Level, name: &str) {
        lock(&self.state).form_mut(level).user = s!(name);
    }

    pub fn dismiss_alert(&self) {
        lock(&self.state).alert = None;
    }

    pub fn save(&self, level: Level) {
        let snapshot = {
            let mut st = lock(&self.state);
            let parents_ok = match level {
                Level::Region => true,
                Level::Country => !st.region.selected.is_empty(),
                Level::Branch => !st.country.selected.is_empty(),
            };
            if !parents_ok || !st.form(level).complete() {
                st.alert = Some(format!("Please fill in all {} fields", level.noun()));
                return;
            }
            st.clone()
        };

        let state = self.state();
        self.env.spawn(move |b| {
            if save_level(b, &state, level, &snapshot) {
                load_structure(b, &state);
            }
        });
    }
}

impl Renderer for UserManagement {
    fn kind(&self) -> RendererKind {
        RendererKind::UserManagement
    }

    fn render_tab(&mut self, container: &ContentRegion) {
        *lock(&self.state) = ManagementState::default();
        let ticket = container.show(Content::Renderer(self.kind()));

        let state = self.state();
        let region = container.clone();
        self.env.spawn(move |b| {
            load_regions(b, &state, &region, ticket);
            load_structure(b, &state);
        });
    }
}
