// src/renderers/routes.rs
//
// Fleet › Routes: departure/arrival pickers over `/api/airports/` and the
// route records of the chosen pair. The last pair is remembered in the
// local store and looked up again when the tab comes back.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{
    self,
    types::{RouteAirport, RouteRecord},
};
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::content::{Content, ContentRegion};
use crate::dispatch::kind::RendererKind;
use crate::storage::{LocalStore, ROUTES_TAB_STATE};

use super::{RenderEnv, Renderer};

pub const PAGE_FAILURE: &str = "Routes content could not be loaded.";
/// Cost breakdown fields kept off the table.
pub const HIDDEN_FIELDS: [&str; 5] =
    ["route_fuel_gls", "fuel_cost", "overflight_fee", "overflight_cost", "airport_fees_cost"];

/// Persisted under `routes_tab_state`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    #[serde(default)]
    pub departure: String,
    #[serde(default)]
    pub arrival: String,
}

impl RouteSelection {
    pub fn is_complete(&self) -> bool {
        !self.departure.is_empty() && !self.arrival.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    /// Record keys in server order.
    pub fields: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RouteTable {
    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.replace('_', " ").to_uppercase()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RecordsView {
    #[default]
    Idle,
    Incomplete,
    Loading,
    Ready(RouteTable),
    OutOfRange,
    Empty,
    Failed,
}

impl RecordsView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            RecordsView::Incomplete => Some("Please select both departure and arrival airports."),
            RecordsView::Loading => Some("Loading route records..."),
            RecordsView::OutOfRange => Some(
                "No route records found for this pair (all routes exceed aircraft max range with max fuel).",
            ),
            RecordsView::Empty => Some("No route records found for this pair."),
            RecordsView::Failed => Some("Failed to load route records."),
            RecordsView::Idle | RecordsView::Ready(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RecordsView::Incomplete | RecordsView::Failed)
    }

    pub fn from_routes(routes: Vec<RouteRecord>) -> Self {
        if routes.is_empty() {
            return RecordsView::Empty;
        }
        let routes: Vec<RouteRecord> = routes.into_iter().filter(within_range).collect();
        let Some(first) = routes.first() else { return RecordsView::OutOfRange };

        let fields: Vec<String> = first
            .keys()
            .filter(|k| !HIDDEN_FIELDS.contains(&k.as_str()))
            .cloned()
            .collect();
        let rows = routes
            .iter()
            .map(|r| fields.iter().map(|f| cell_text(r.get(f))).collect())
            .collect();
        RecordsView::Ready(RouteTable { fields, rows })
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// A route the aircraft cannot fly on a full tank is dropped; missing
/// figures let it through.
fn within_range(route: &RouteRecord) -> bool {
    let present = |k: &str| route.get(k).filter(|v| !v.is_null());
    match (present("distance"), present("max_range_with_max_fuel")) {
        (Some(d), Some(max)) => match (number(d), number(max)) {
            (Some(d), Some(max)) => d <= max,
            _ => false,
        },
        _ => true,
    }
}

/// Numbers, and strings that read as numbers, get two decimals.
pub fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => s!(),
        Some(v) => match number(v) {
            Some(n) => format!("{n:.2}"),
            None => match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        },
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutesState {
    pub airports: Vec<RouteAirport>,
    pub airports_loading: bool,
    pub selection: RouteSelection,
    pub records: RecordsView,
    page_gen: u64,
    /// Bumped per lookup; only the latest may publish records.
    pub lookup_gen: u64,
}

impl RoutesState {
    pub fn departure_options(&self) -> Vec<(String, String)> {
        self.airports.iter().map(|a| (a.code.clone(), a.label())).collect()
    }

    /// Every airport but the departure.
    pub fn arrival_options(&self) -> Vec<(String, String)> {
        self.airports
            .iter()
            .filter(|a| a.code != self.selection.departure)
            .map(|a| (a.code.clone(), a.label()))
            .collect()
    }

    pub fn arrival_enabled(&self) -> bool {
        !self.selection.departure.is_empty()
    }

    fn begin_lookup(&mut self) -> Option<(u64, RouteSelection)> {
        self.lookup_gen += 1;
        if !self.selection.is_complete() {
            self.records = RecordsView::Incomplete;
            return None;
        }
        self.records = RecordsView::Loading;
        Some((self.lookup_gen, self.selection.clone()))
    }
}

pub fn run_lookup(backend: &dyn Backend, state: &Mutex<RoutesState>, lookup_gen: u64, pair: &RouteSelection) {
    let res = api::route_records(backend, &pair.departure, &pair.arrival);
    let mut st = lock(state);
    if st.lookup_gen != lookup_gen {
        return;
    }
    st.records = match res {
        Ok(r) => {
            if let Some(e) = &r.error {
                logw!("Routes: {} - {}: {}", pair.departure, pair.arrival, e);
            }
            logd!("Routes: {} record(s) for {} - {}", r.routes.len(), pair.departure, pair.arrival);
            RecordsView::from_routes(r.routes)
        }
        Err(e) => {
            loge!("Routes: records failed: {}", e);
            RecordsView::Failed
        }
    };
}

/// Airports, then the remembered pair if both ends are still set.
pub fn load_airports(backend: &dyn Backend, state: &Mutex<RoutesState>, page_gen: u64) {
    let res = api::route_airports(backend);
    let lookup = {
        let mut st = lock(state);
        if st.page_gen != page_gen {
            return;
        }
        st.airports_loading = false;
        match res {
            Ok(a) => {
                logd!("Routes: {} airport(s)", a.len());
                st.airports = a;
            }
            Err(e) => loge!("Routes: airports failed: {}", e),
        }
        if st.selection.is_complete() { st.begin_lookup() } else { None }
    };
    if let Some((lookup_gen, pair)) = lookup {
        run_lookup(backend, state, lookup_gen, &pair);
    }
}

pub struct Routes {
    env: RenderEnv,
    state: Arc<Mutex<RoutesState>>,
}

impl Routes {
    pub fn new(env: RenderEnv) -> Self {
        Self { env, state: Arc::default() }
    }

    pub fn state(&self) -> Arc<Mutex<RoutesState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> RoutesState {
        lock(&self.state).clone()
    }

    fn store(&self) -> &LocalStore {
        &self.env.store
    }

    /// A new departure clears the arrival.
    pub fn set_departure(&self, code: &str) {
        let selection = {
            let mut st = lock(&self.state);
            st.selection = RouteSelection { departure: s!(code), arrival: s!() };
            st.selection.clone()
        };
        self.store().set_json(ROUTES_TAB_STATE, &selection);
        self.lookup();
    }

    pub fn set_arrival(&self, code: &str) {
        let selection = {
            let mut st = lock(&self.state);
            st.selection.arrival = s!(code);
            st.selection.clone()
        };
        self.store().set_json(ROUTES_TAB_STATE, &selection);
        self.lookup();
    }

    fn lookup(&self) {
        let Some((lookup_gen, pair)) = lock(&self.state).begin_lookup() else { return };
        let state = self.state();
        self.env.spawn(move |b| run_lookup(b, &state, lookup_gen, &pair));
    }
}

impl Renderer for Routes {
    fn kind(&self) -> RendererKind {
        RendererKind::Routes
    }

    fn render_tab(&mut self, container: &ContentRegion) {
        let selection: RouteSelection = self.store().get_json(ROUTES_TAB_STATE).unwrap_or_default();
        let page_gen = {
            let mut st = lock(&self.state);
            let (page_gen, lookup_gen) = (st.page_gen + 1, st.lookup_gen + 1);
            *st = RoutesState { selection, airports_loading: true, page_gen, lookup_gen, ..RoutesState::default() };
            page_gen
        };
        let ticket = container.show(Content::Renderer(self.kind()));

        let state = self.state();
        let container = container.clone();
        self.env.spawn(move |b| {
            if let Err(e) = api::fragment(b, api::ROUTES_PAGE) {
                loge!("Routes: page failed: {}", e);
                container.complete(
                    ticket,
                    Content::Unavailable { title: s!("Routes"), message: s!(PAGE_FAILURE) },
                );
                return;
            }
            load_airports(b, &state, page_gen);
        });
    }

    fn on_close(&mut self) {
        let mut st = lock(&self.state);
        st.page_gen += 1;
        st.lookup_gen += 1;
    }
}
