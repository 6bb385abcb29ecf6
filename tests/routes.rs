// tests/routes.rs

mod common;

use common::{fast_options, harness, harness_with};
use finsim_console::core::net::{HttpReply, MemoryBackend, Method};
use finsim_console::dispatch::content::Content;
use finsim_console::dispatch::kind::{RendererKind, TabKind};
use finsim_console::renderers::Routes;
use finsim_console::renderers::routes::{RecordsView, RouteSelection};
use finsim_console::storage::{LocalStore, ROUTES_TAB_STATE};
use finsim_console::workspace::TabOptions;

const PAGE: &str = "/static/Routes.html";
const AIRPORTS: &str = "/api/airports/";
const RECORDS: &str = "/api/route-records/";

const AIRPORTS_JSON: &str = r#"{"airports": [
    {"code": "AUA", "name": "Reina Beatrix"},
    {"code": "CUR", "name": "Hato"},
    {"code": "BON", "name": "Flamingo"}
]}"#;

const RECORDS_JSON: &str = r#"{"routes": [
    {"id": 1, "leg": "AUA - CUR", "distance": 450, "aircraft_type": "ATR 72", "fuel_cost": 900.0,
     "max_range_with_max_fuel": 1500, "block_hours_cost": "12.5", "service_type": null},
    {"id": 2, "leg": "AUA - CUR", "distance": 450, "aircraft_type": "Twin Otter", "fuel_cost": 300.0,
     "max_range_with_max_fuel": 400, "block_hours_cost": "8", "service_type": "Cargo"}
]}"#;

fn backend(records: &str) -> MemoryBackend {
    MemoryBackend::new()
        .on_get(PAGE, HttpReply::ok("<div id=\"routes\"></div>"))
        .on_get(AIRPORTS, HttpReply::ok(AIRPORTS_JSON))
        .on_post(RECORDS, HttpReply::ok(records))
}

fn open(h: &mut common::Harness) {
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Routes", TabOptions::default());
    h.tabs.wait_idle();
}

fn routes(h: &common::Harness) -> &Routes {
    &h.tabs.dispatcher().renderers().routes
}

fn pick(h: &mut common::Harness, departure: &str, arrival: &str) {
    routes(h).set_departure(departure);
    h.tabs.wait_idle();
    routes(h).set_arrival(arrival);
    h.tabs.wait_idle();
}

#[test]
fn routes_tab_is_a_renderer() {
    assert_eq!(
        TabKind::resolve("Routes", &TabOptions::default()),
        TabKind::Renderer(RendererKind::Routes)
    );
}

#[test]
fn missing_page_shows_unavailable() {
    let mut h = harness(MemoryBackend::new().on_get(AIRPORTS, HttpReply::ok(AIRPORTS_JSON)));
    open(&mut h);

    assert_eq!(
        h.tabs.region().content(),
        Content::Unavailable {
            title: "Routes".into(),
            message: "Routes content could not be loaded.".into(),
        }
    );
    assert_eq!(h.backend.call_count(AIRPORTS), 0);
}

#[test]
fn departure_unlocks_arrival_without_itself() {
    let mut h = harness(backend(RECORDS_JSON));
    open(&mut h);

    let st = routes(&h).snapshot();
    assert_eq!(h.tabs.region().content(), Content::Renderer(RendererKind::Routes));
    assert!(!st.arrival_enabled());
    assert_eq!(st.departure_options().len(), 3);
    assert_eq!(st.records, RecordsView::Idle);

    routes(&h).set_departure("AUA");
    h.tabs.wait_idle();
    let st = routes(&h).snapshot();
    assert!(st.arrival_enabled());
    let arrivals: Vec<String> = st.arrival_options().into_iter().map(|(_, label)| label).collect();
    assert_eq!(arrivals, vec!["CUR - Hato", "BON - Flamingo"]);
    assert_eq!(st.records.message(), Some("Please select both departure and arrival airports."));
    assert_eq!(h.backend.call_count(RECORDS), 0);

    let saved: RouteSelection = h.store.get_json(ROUTES_TAB_STATE).expect("pair persisted");
    assert_eq!(saved, RouteSelection { departure: "AUA".into(), arrival: String::new() });
}

#[test]
fn pair_loads_records_in_range() {
    let mut h = harness(backend(RECORDS_JSON));
    open(&mut h);
    pick(&mut h, "AUA", "CUR");

    let post = h.backend.calls().into_iter().find(|c| c.method == Method::Post).expect("records posted");
    assert_eq!(post.body.as_deref(), Some(r#"{"departure":"AUA","arrival":"CUR"}"#));

    let RecordsView::Ready(table) = routes(&h).snapshot().records else { panic!("no table") };
    assert_eq!(
        table.headers(),
        vec!["ID", "LEG", "DISTANCE", "AIRCRAFT TYPE", "MAX RANGE WITH MAX FUEL", "BLOCK HOURS COST", "SERVICE TYPE"]
    );
    assert_eq!(table.rows, vec![vec!["1.00", "AUA - CUR", "450.00", "ATR 72", "1500.00", "12.50", ""]]);

    let saved: RouteSelection = h.store.get_json(ROUTES_TAB_STATE).expect("pair persisted");
    assert_eq!(saved, RouteSelection { departure: "AUA".into(), arrival: "CUR".into() });
}

#[test]
fn all_routes_out_of_range() {
    let records = r#"{"routes": [{"id": 2, "distance": "450", "max_range_with_max_fuel": "400"}]}"#;
    let mut h = harness(backend(records));
    open(&mut h);
    pick(&mut h, "AUA", "CUR");

    assert_eq!(
        routes(&h).snapshot().records.message(),
        Some("No route records found for this pair (all routes exceed aircraft max range with max fuel).")
    );
}

#[test]
fn empty_and_failed_lookups() {
    let mut h = harness(backend(r#"{"routes": []}"#));
    open(&mut h);
    pick(&mut h, "AUA", "CUR");
    assert_eq!(routes(&h).snapshot().records, RecordsView::Empty);

    let mut h = harness(MemoryBackend::new().on_get(PAGE, HttpReply::ok("")).on_get(AIRPORTS, HttpReply::ok(AIRPORTS_JSON)));
    open(&mut h);
    pick(&mut h, "AUA", "CUR");
    let st = routes(&h).snapshot();
    assert_eq!(st.records.message(), Some("Failed to load route records."));
    assert!(st.records.is_error());
}

#[test]
fn new_departure_clears_arrival() {
    let mut h = harness(backend(RECORDS_JSON));
    open(&mut h);
    pick(&mut h, "AUA", "CUR");

    routes(&h).set_departure("BON");
    h.tabs.wait_idle();
    let st = routes(&h).snapshot();
    assert_eq!(st.selection, RouteSelection { departure: "BON".into(), arrival: String::new() });
    assert_eq!(st.records, RecordsView::Incomplete);
    assert_eq!(h.backend.call_count(RECORDS), 1);
}

#[test]
fn remembered_pair_is_looked_up_on_open() {
    let store = LocalStore::in_memory();
    store.set_json(ROUTES_TAB_STATE, &RouteSelection { departure: "AUA".into(), arrival: "CUR".into() });
    let mut h = harness_with(backend(RECORDS_JSON), store, &fast_options());
    open(&mut h);

    let st = routes(&h).snapshot();
    assert_eq!(st.selection.arrival, "CUR");
    assert!(matches!(st.records, RecordsView::Ready(_)));
    assert_eq!(h.backend.call_count(RECORDS), 1);
}
