// tests/user_management.rs

mod common;

use common::harness;
use finsim_console::core::net::{HttpReply, MemoryBackend};
use finsim_console::dispatch::content::Content;
use finsim_console::dispatch::kind::RendererKind;
use finsim_console::renderers::user_management::{Level, REGIONS_FAILED};
use finsim_console::workspace::TabOptions;

const TABLE: &str = "/api/get-management-table-data/";

fn backend() -> MemoryBackend {
    MemoryBackend::new()
        .on_get("/api/regions/", HttpReply::ok(r#"{"regions": ["Caribbean", "Europe"]}"#))
        .on_get(TABLE, HttpReply::ok(r#"{"data": []}"#))
        .on_get(
            "/api/check-region-info/?region=Caribbean",
            HttpReply::ok(r#"{"exists": true, "regional_manager": "Ana", "region_user": "ana01"}"#),
        )
        .on_get(
            "/api/countries-by-region/?region=Caribbean",
            HttpReply::ok(r#"{"countries": [{"code": "AW", "name": "Aruba"}]}"#),
        )
        .on_get("/api/check-region-info/?region=Europe", HttpReply::ok(r#"{"exists": false}"#))
        .on_get("/api/countries-by-region/?region=Europe", HttpReply::ok(r#"{"countries": []}"#))
        .on_get("/api/check-country-info/?country=AW", HttpReply::ok(r#"{"exists": false}"#))
        .on_get(
            "/api/airports-by-country/?country=AW",
            HttpReply::ok(r#"{"airports": [{"iata_code": "AUA", "city": "Oranjestad"}]}"#),
        )
}

fn open(b: MemoryBackend) -> common::Harness {
    let mut h = harness(b);
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("User Management", TabOptions::default());
    h.tabs.wait_idle();
    h
}

#[test]
fn regions_load_and_structure_is_empty() {
    let h = open(backend());
    assert_eq!(h.tabs.region().content(), Content::Renderer(RendererKind::UserManagement));

    let st = h.tabs.dispatcher().renderers().users.snapshot();
    assert_eq!(st.regions, vec!["Caribbean", "Europe"]);
    assert_eq!(st.structure, Some(Vec::new()));
    assert!(!st.countries_enabled());
    assert_eq!(st.form(Level::Region).button, "Edit Region");
}

#[test]
fn regions_failure_replaces_tab() {
    let b = MemoryBackend::new().on_get(TABLE, HttpReply::ok(r#"{"data": []}"#));
    let h = open(b);
    assert_eq!(
        h.tabs.region().content(),
        Content::Unavailable { title: "Commercial Structure Management".into(), message: REGIONS_FAILED.into() }
    );
}

#[test]
fn cascade_unlocks_levels() {
    let mut h = open(backend());
    h.tabs.dispatcher().renderers().users.select(Level::Region, "Caribbean");
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().users.snapshot();
    let region = st.form(Level::Region);
    assert!(region.exists);
    assert_eq!(region.manager, "Ana");
    assert_eq!(region.user, "ana01");
    assert_eq!(region.button, "Edit Region");
    assert!(st.countries_enabled());

    h.tabs.dispatcher().renderers().users.select(Level::Country, "AW");
    h.tabs.wait_idle();
    let st = h.tabs.dispatcher().renderers().users.snapshot();
    let country = st.form(Level::Country);
    assert!(!country.exists);
    assert_eq!(country.button, "Save Country Info");
    assert_eq!(st.airports.len(), 1);
    // airports stay locked until country info is saved
    assert!(!st.airports_enabled());

    h.tabs.dispatcher().renderers().users.select(Level::Region, "Europe");
    h.tabs.wait_idle();
    let st = h.tabs.dispatcher().renderers().users.snapshot();
    assert!(st.form(Level::Country).selected.is_empty());
    assert!(st.airports.is_empty());
    assert_eq!(st.form(Level::Region).button, "Save Region Info");
}

#[test]
fn incomplete_form_alerts_without_posting() {
    let mut h = open(backend());
    h.tabs.dispatcher().renderers().users.select(Level::Region, "Europe");
    h.tabs.wait_idle();

    let users = &h.tabs.dispatcher().renderers().users;
    users.set_manager(Level::Region, "Bo");
    users.save(Level::Region);
    assert_eq!(users.snapshot().alert.as_deref(), Some("Please fill in all regional fields"));
    assert_eq!(h.backend.call_count("/api/save-region-info/"), 0);
}

#[test]
fn save_success_marks_existing_and_reloads_structure() {
    let b = backend()
        .on_post("/api/save-country-info/", HttpReply::ok(r#"{"success": true}"#))
        .on_get(
            TABLE,
            HttpReply::ok(
                r#"{"data": [{"region": "Caribbean", "regional_manager": "Ana", "region_user": "ana01",
                    "countries": [{"country_name": "Aruba", "country_code": "AW", "country_manager": "Cas",
                    "country_user": "cas01", "branches": []}]}]}"#,
            ),
        );
    let mut h = open(b);
    h.tabs.dispatcher().renderers().users.select(Level::Region, "Caribbean");
    h.tabs.wait_idle();
    h.tabs.dispatcher().renderers().users.select(Level::Country, "AW");
    h.tabs.wait_idle();

    let users = &h.tabs.dispatcher().renderers().users;
    users.set_manager(Level::Country, "Cas");
    users.set_user(Level::Country, "cas01");
    users.save(Level::Country);
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().users.snapshot();
    assert_eq!(st.alert.as_deref(), Some("Country info saved successfully"));
    assert!(st.form(Level::Country).exists);
    assert_eq!(st.form(Level::Country).button, "Edit Country");
    assert!(st.airports_enabled());
    let structure = st.structure.expect("structure");
    assert_eq!(structure[0].countries[0].country_manager, "Cas");

    let post = h
        .backend
        .calls()
        .into_iter()
        .find(|c| c.path == "/api/save-country-info/")
        .expect("posted");
    let body: serde_json::Value = serde_json::from_str(post.body.as_deref().unwrap_or("")).unwrap();
    assert_eq!(body["country"], "AW");
    assert_eq!(body["region"], "Caribbean");
    assert_eq!(body["country_manager"], "Cas");
}

#[test]
fn save_failure_shows_server_error() {
    let b = backend().on_post(
        "/api/save-region-info/",
        HttpReply::with_status(400, r#"{"success": false, "error": "Region locked"}"#),
    );
    let mut h = open(b);
    h.tabs.dispatcher().renderers().users.select(Level::Region, "Europe");
    h.tabs.wait_idle();

    let users = &h.tabs.dispatcher().renderers().users;
    users.set_manager(Level::Region, "Bo");
    users.set_user(Level::Region, "bo01");
    users.save(Level::Region);
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().users.snapshot();
    assert_eq!(st.alert.as_deref(), Some("Error: Region locked"));
    assert!(!st.form(Level::Region).exists);
}
