// tests/market_import.rs

mod common;

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use common::harness;
use finsim_console::Result;
use finsim_console::core::net::{Backend, HttpReply, MemoryBackend};
use finsim_console::events::Repaint;
use finsim_console::renderers::market_import::{FilterState, ProductsView};
use finsim_console::storage::{IMPORT_ENTERED_PRICES, IMPORT_TAB_STATE, LocalStore};
use finsim_console::workspace::{TabManager, TabOptions};

const PRODUCTS_ALL: &str = "/api/products/";
const PRODUCTS_AW: &str = "/api/products/?country=AW";
const SAVED_AW: &str = "/api/get-saved-price-comparison/?country_code=AW";
const SAVE: &str = "/api/save-price-comparison/";

const PRODUCTS_JSON: &str = r#"{"products": [
    {"product_code": "P001", "name": "Apples", "product_type": "Produce", "country_name": "Aruba", "country_code": "AW", "trade_unit": "kg", "packaging": "box"},
    {"product_code": "P002", "name": "Rice", "product_type": "Dry Goods", "country_name": "Aruba", "country_code": "AW", "trade_unit": "kg", "packaging": "bag"}
]}"#;

fn backend() -> MemoryBackend {
    MemoryBackend::new()
        .on_get("/api/countries/", HttpReply::ok(r#"{"countries": [{"code": "AW", "name": "Aruba"}]}"#))
        .on_get(PRODUCTS_ALL, HttpReply::ok(r#"{"products": []}"#))
        .on_get(PRODUCTS_AW, HttpReply::ok(PRODUCTS_JSON))
        .on_get(
            SAVED_AW,
            HttpReply::ok(r#"{"results": [{"product_code": "P001", "last_updated_price": "2.10", "last_updated_date": "2024-04-30"}]}"#),
        )
}

fn open(h: &mut common::Harness) {
    h.tabs.switch_workspace("User");
    h.tabs.open_tab("Import", TabOptions::default());
    h.tabs.wait_idle();
}

fn pick_aruba(h: &mut common::Harness) {
    h.tabs.dispatcher().renderers().import.select_country("AW");
    h.tabs.wait_idle();
}

#[test]
fn no_country_lists_empty() {
    let mut h = harness(backend());
    open(&mut h);

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.countries.len(), 1);
    assert_eq!(st.view, ProductsView::Empty);
    assert_eq!(st.view.message(), Some("No products found."));
}

#[test]
fn country_loads_products_and_saved_prices() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.view, ProductsView::Ready);
    assert_eq!(st.products.len(), 2);
    assert_eq!(st.last_price("P001"), "2.10");
    assert_eq!(st.last_date("P001"), "2024-04-30");
    assert_eq!(st.last_price("P002"), "-");
    assert_eq!(st.last_date("P002"), "-");

    let saved: FilterState = h.store.get_json(IMPORT_TAB_STATE).expect("filter persisted");
    assert_eq!(saved.country, "AW");
}

#[test]
fn save_button_follows_entered_prices() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;

    assert!(!import.snapshot().save_visible());
    import.set_price("P001", "2.25");
    assert!(import.snapshot().save_visible());
    import.set_price("P001", "   ");
    assert!(!import.snapshot().save_visible());
}

#[test]
fn name_filter_narrows_rows() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;

    import.set_search("APP");
    let st = import.snapshot();
    let names: Vec<&str> = st.visible_products().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Apples"]);
}

#[test]
fn country_change_with_prices_asks_first() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;
    import.set_price("P002", "1.15");

    import.select_country("");
    let st = import.snapshot();
    assert_eq!(st.pending_country.as_deref(), Some(""));
    assert_eq!(st.filter.country, "AW");

    import.confirm_country_change(false);
    assert_eq!(import.snapshot().entered.get("P002").map(String::as_str), Some("1.15"));

    import.select_country("");
    import.confirm_country_change(true);
    let st = import.snapshot();
    assert!(st.entered.is_empty());
    assert_eq!(st.filter.country, "");
    assert!(h.store.get(IMPORT_ENTERED_PRICES).is_none());
    h.tabs.wait_idle();
}

#[test]
fn save_posts_only_filled_rows() {
    let b = backend().on_post(SAVE, HttpReply::ok(r#"{"results": [{"success": true}]}"#));
    let mut h = harness(b);
    open(&mut h);
    pick_aruba(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;
    import.set_price("P001", "2.25");
    import.set_price("P002", "");
    import.save();
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.alert.as_deref(), Some("Prices saved successfully!"));
    assert!(st.entered.is_empty());
    assert!(!st.saving);
    assert_eq!(st.view, ProductsView::Ready);

    let call = h.backend.calls().into_iter().find(|c| c.path == SAVE).expect("posted");
    let body: serde_json::Value = serde_json::from_str(call.body.as_deref().unwrap_or("")).unwrap();
    assert_eq!(body["country_code"], "AW");
    let updates = body["updates"].as_array().expect("updates");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["product_code"], "P001");
    assert_eq!(updates[0]["new_price"], "2.25");
    assert_eq!(updates[0]["currency"], "USD");
}

#[test]
fn save_without_country_alerts() {
    let mut h = harness(backend());
    open(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;
    import.save();
    assert_eq!(import.snapshot().alert.as_deref(), Some("Please select a country before saving."));
    import.dismiss_alert();
    assert!(import.snapshot().alert.is_none());
    assert_eq!(h.backend.call_count(SAVE), 0);
}

#[test]
fn partial_save_keeps_entered_prices() {
    let b = backend().on_post(SAVE, HttpReply::ok(r#"{"results": [{"success": false}]}"#));
    let mut h = harness(b);
    open(&mut h);
    pick_aruba(&mut h);
    h.tabs.dispatcher().renderers().import.set_price("P001", "2.25");
    h.tabs.dispatcher().renderers().import.save();
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.alert.as_deref(), Some("Some prices could not be saved. Please try again."));
    assert_eq!(st.entered.len(), 1);
}

#[test]
fn web_search_link_needs_product_and_country() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);
    let import = &h.tabs.dispatcher().renderers().import;

    assert_eq!(import.snapshot().search_link(), None);
    import.toggle_selected("P002");
    let st = import.snapshot();
    assert_eq!(st.search_label(), "Search for Rice in Aruba");
    let link = st.search_link().expect("link");
    assert!(link.starts_with("https://www.bing.com/search?q="));
    assert!(link.contains("Rice+price+in+Aruba+supermarket+USD"));

    import.toggle_selected("P002");
    assert_eq!(import.snapshot().selected, None);
}

#[test]
fn entered_prices_survive_tab_switch_but_not_close() {
    let mut h = harness(backend());
    open(&mut h);
    pick_aruba(&mut h);
    h.tabs.dispatcher().renderers().import.set_price("P001", "3.00");

    h.tabs.open_tab("Export", TabOptions::default());
    h.tabs.set_active_tab("Import");
    h.tabs.wait_idle();
    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.filter.country, "AW");
    assert_eq!(st.entered.get("P001").map(String::as_str), Some("3.00"));

    let id = h.tabs.active_tab().map(|t| t.id).expect("import tab");
    assert!(h.tabs.close_tab(id));
    h.tabs.wait_idle();
    assert!(h.store.get(IMPORT_ENTERED_PRICES).is_none());
}

const PRODUCTS_CW: &str = "/api/products/?country=CW";
const SAVED_CW: &str = "/api/get-saved-price-comparison/?country_code=CW";

/// Canned replies; every POST waits until the test lets it through.
struct HeldSaves {
    inner: Arc<MemoryBackend>,
    gate: Mutex<Receiver<()>>,
}

impl Backend for HeldSaves {
    fn get(&self, path: &str) -> Result<HttpReply> {
        self.inner.get(path)
    }

    fn post_json(&self, path: &str, body: &str) -> Result<HttpReply> {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.post_json(path, body)
    }

    fn post_form(&self, path: &str, body: &str) -> Result<HttpReply> {
        let _ = self.gate.lock().unwrap().recv();
        self.inner.post_form(path, body)
    }
}

fn held_saves(backend: MemoryBackend) -> (TabManager, Arc<MemoryBackend>, Arc<LocalStore>, Sender<()>) {
    let inner = Arc::new(backend);
    let (tx, rx) = mpsc::channel();
    let held = HeldSaves { inner: Arc::clone(&inner), gate: Mutex::new(rx) };
    let store = Arc::new(LocalStore::in_memory());
    let tabs = TabManager::with_backend(Arc::new(held), Arc::clone(&store), &common::fast_options(), Repaint::none());
    (tabs, inner, store, tx)
}

fn with_curacao(b: MemoryBackend) -> MemoryBackend {
    b.on_get(
        PRODUCTS_CW,
        HttpReply::ok(r#"{"products": [{"product_code": "P101", "name": "Bananas", "country_code": "CW", "currency": "USD"}]}"#),
    )
    .on_get(SAVED_CW, HttpReply::ok(r#"{"results": []}"#))
    .on_post(SAVE, HttpReply::ok(r#"{"results": [{"success": true}]}"#))
}

#[test]
fn country_switched_during_save_is_not_overwritten() {
    let (mut tabs, backend, _store, release) = held_saves(with_curacao(backend()));
    tabs.switch_workspace("User");
    tabs.open_tab("Import", TabOptions::default());
    tabs.wait_idle();
    let import = &tabs.dispatcher().renderers().import;
    import.select_country("AW");
    tabs.wait_idle();

    let import = &tabs.dispatcher().renderers().import;
    import.set_price("P001", "2.25");
    import.save();
    import.select_country("CW");
    import.confirm_country_change(true);
    release.send(()).unwrap();
    tabs.wait_idle();

    let st = tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.filter.country, "CW");
    assert_eq!(st.view, ProductsView::Ready);
    let names: Vec<&str> = st.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bananas"]);
    assert_eq!(st.alert.as_deref(), Some("Prices saved successfully!"));
    assert_eq!(backend.call_count(PRODUCTS_AW), 1);
}

#[test]
fn prices_typed_during_save_are_kept() {
    let (mut tabs, _backend, store, release) = held_saves(with_curacao(backend()));
    tabs.switch_workspace("User");
    tabs.open_tab("Import", TabOptions::default());
    tabs.wait_idle();
    tabs.dispatcher().renderers().import.select_country("AW");
    tabs.wait_idle();

    let import = &tabs.dispatcher().renderers().import;
    import.set_price("P001", "2.25");
    import.save();
    import.set_price("P002", "1.10");
    release.send(()).unwrap();
    tabs.wait_idle();

    let st = tabs.dispatcher().renderers().import.snapshot();
    assert!(!st.saving);
    assert_eq!(st.entered.len(), 1);
    assert_eq!(st.entered.get("P002").map(String::as_str), Some("1.10"));
    assert!(st.save_visible());
    let kept: BTreeMap<String, String> = store.get_json(IMPORT_ENTERED_PRICES).expect("still persisted");
    assert_eq!(kept.get("P002").map(String::as_str), Some("1.10"));
    assert!(!kept.contains_key("P001"));
}

const PRODUCTS_GUILDER: &str = r#"{"products": [
    {"product_code": "P201", "name": "Cheese", "country_code": "CW", "currency": "XCG", "fca_cost_per_wu": 10.0},
    {"product_code": "P202", "name": "Flour", "country_code": "CW", "currency": "USD", "fca_cost_per_wu": 3.5},
    {"product_code": "P203", "name": "Salt", "country_code": "CW", "currency": "XCG"}
]}"#;

#[test]
fn foreign_currency_prices_are_converted() {
    let b = backend()
        .on_get(PRODUCTS_CW, HttpReply::ok(PRODUCTS_GUILDER))
        .on_get(SAVED_CW, HttpReply::ok(r#"{"results": []}"#))
        .on_get(
            "/api/exchange-rate/?from=XCG&to=USD",
            HttpReply::ok(r#"{"rate": 0.56, "from": "XCG", "to": "USD"}"#),
        );
    let mut h = harness(b);
    open(&mut h);
    h.tabs.dispatcher().renderers().import.select_country("CW");
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.rate_label().as_deref(), Some("XCG→USD: 0.56"));
    assert_eq!(st.fob_price(&st.products[0]), "5.60 USD");
    assert_eq!(st.fob_price(&st.products[1]), "3.5");
    assert_eq!(st.fob_price(&st.products[2]), "-");
}

#[test]
fn missing_rate_leaves_prices_unconverted() {
    let b = backend()
        .on_get(PRODUCTS_CW, HttpReply::ok(PRODUCTS_GUILDER))
        .on_get(SAVED_CW, HttpReply::ok(r#"{"results": []}"#))
        .on_get("/api/exchange-rate/?from=XCG&to=USD", HttpReply::with_status(500, r#"{"error": "rate service down"}"#));
    let mut h = harness(b);
    open(&mut h);
    h.tabs.dispatcher().renderers().import.select_country("CW");
    h.tabs.wait_idle();

    let st = h.tabs.dispatcher().renderers().import.snapshot();
    assert_eq!(st.view, ProductsView::Ready);
    assert_eq!(st.rate_label(), None);
    assert_eq!(st.fob_price(&st.products[0]), "10");
}
