// tests/supply_chain.rs

mod common;

use common::harness;
use finsim_console::api::types::SupplyChainRow;
use finsim_console::core::net::{HttpReply, MemoryBackend};
use finsim_console::renderers::MarketExport;
use finsim_console::renderers::supply_chain::{DetailsView, SummaryView, SupplyChain};
use finsim_console::workspace::TabOptions;

const SUMMARY: &str = "/api/supply-chain/";
const DETAILS_APPLES: &str = "/api/supply-chain-details/?product_name=Apples";
const AIRPORTS_AW: &str = "/api/airports-by-country/?country=AW";
const SUPPLIER_FARMCO: &str = "/api/supplier-details/?product_name=Apples&supplier_name=FarmCo";
const ADD: &str = "/add-supplier/";
const EDIT: &str = "/edit-supplier/";

const PRODUCTS_JSON: &str = r#"{"products": [
    {"product_code": "P001", "name": "Apples", "product_type": "Produce", "country_name": "Aruba", "country_code": "AW"},
    {"product_code": "P002", "name": "Rice", "product_type": "Dry Goods", "country_name": "Aruba", "country_code": "AW"}
]}"#;

const SUMMARY_JSON: &str = r#"{"supply_chain": [
    {"product_name": "Apples", "num_suppliers": 2, "num_branches": 1, "total_yield": 1500.5}
]}"#;

fn backend() -> MemoryBackend {
    MemoryBackend::new()
        .on_get("/api/products/", HttpReply::ok(PRODUCTS_JSON))
        .on_get(SUMMARY, HttpReply::ok(SUMMARY_JSON))
        .on_get(
            DETAILS_APPLES,
            HttpReply::ok(r#"{"suppliers": ["FarmCo", "Orchard"], "branches": ["AUA", null], "yields": [1000.5, null]}"#),
        )
        .on_get(AIRPORTS_AW, HttpReply::ok(r#"{"airports": [{"iata_code": "AUA", "city": "Oranjestad"}]}"#))
}

fn open(backend: MemoryBackend) -> common::Harness {
    let mut h = harness(backend);
    h.tabs.switch_workspace("User");
    h.tabs.open_tab("Export", TabOptions::default());
    h.tabs.wait_idle();
    h
}

fn export(h: &common::Harness) -> &MarketExport {
    &h.tabs.dispatcher().renderers().export
}

fn supply(h: &common::Harness) -> &SupplyChain {
    export(h).supply()
}

fn select(h: &mut common::Harness, code: &str) {
    export(h).toggle_selected(code);
    h.tabs.wait_idle();
}

fn open_form(h: &mut common::Harness, code: &str) {
    select(h, code);
    export(h).add_supplier();
    h.tabs.wait_idle();
}

#[test]
fn selecting_a_product_shows_its_supply_chain() {
    let mut h = open(backend());
    select(&mut h, "P001");

    let st = supply(&h).snapshot();
    assert_eq!(st.product.as_deref(), Some("Apples"));
    assert_eq!(
        st.summary,
        SummaryView::Ready(SupplyChainRow {
            product_name: "Apples".into(),
            num_suppliers: 2,
            num_branches: 1,
            total_yield: 1500.5,
        })
    );
    let DetailsView::Ready(d) = st.details else { panic!("details not loaded: {:?}", st.details) };
    assert_eq!(d.suppliers, vec!["FarmCo", "Orchard"]);
    assert_eq!(d.branches, vec!["AUA", ""]);
    assert_eq!(d.yields, vec![Some(1000.5), None]);
}

#[test]
fn product_without_supply_chain_says_so() {
    let mut h = open(backend());
    select(&mut h, "P002");

    let st = supply(&h).snapshot();
    assert_eq!(st.summary, SummaryView::Missing);
    assert_eq!(st.summary.message(), Some("No supply chain data found for the selected product."));
    assert_eq!(h.backend.call_count("/api/supply-chain-details/?product_name=Rice"), 0);
}

#[test]
fn summary_failure_and_deselect() {
    let backend = MemoryBackend::new()
        .on_get("/api/products/", HttpReply::ok(PRODUCTS_JSON))
        .on_get(SUMMARY, HttpReply::with_status(500, "boom"));
    let mut h = open(backend);

    select(&mut h, "P001");
    let st = supply(&h).snapshot();
    assert_eq!(st.summary.message(), Some("Failed to load supply chain summary."));

    select(&mut h, "P001");
    let st = supply(&h).snapshot();
    assert_eq!(st.summary, SummaryView::Hidden);
    assert_eq!(st.product, None);
}

#[test]
fn details_failure_keeps_summary() {
    let backend = MemoryBackend::new()
        .on_get("/api/products/", HttpReply::ok(PRODUCTS_JSON))
        .on_get(SUMMARY, HttpReply::ok(SUMMARY_JSON));
    let mut h = open(backend);
    select(&mut h, "P001");

    let st = supply(&h).snapshot();
    assert!(matches!(st.summary, SummaryView::Ready(_)));
    assert_eq!(st.details, DetailsView::Failed);
}

#[test]
fn add_supplier_needs_a_selection() {
    let mut h = open(backend());

    export(&h).add_supplier();
    assert_eq!(
        export(&h).alert().as_deref(),
        Some("Please select a product in the table to add a supplier for.")
    );
    export(&h).dismiss_alert();
    assert_eq!(export(&h).alert(), None);
    h.tabs.wait_idle();
    assert_eq!(h.backend.call_count(AIRPORTS_AW), 0);
}

#[test]
fn add_supplier_posts_form_and_reloads_summary() {
    let mut h = open(backend().on_post(ADD, HttpReply::ok(r#"{"success": true}"#)));
    open_form(&mut h, "P001");

    let editor = supply(&h).snapshot().editor.expect("form open");
    assert_eq!(editor.title(), "Add Supplier");
    assert_eq!(editor.form.product_name, "Apples");
    assert_eq!(editor.form.country, "AW");
    assert!(editor.shows_shelf_days());
    assert_eq!(editor.branch_options(), vec![("AUA".to_string(), "AUA - Oranjestad".to_string())]);

    supply(&h).edit_form(|f| {
        f.supplier_name = "Sun Farms".into();
        f.location = "Noord".into();
        f.assigned_branch = "AUA".into();
        f.crop_area = "12".into();
        f.crop_yield = "300".into();
        f.delivery = "Seasonal".into();
    });
    supply(&h).submit();
    h.tabs.wait_idle();

    let post = h.backend.calls().into_iter().find(|c| c.path == ADD).expect("supplier posted");
    let body = post.body.expect("form body");
    assert!(body.starts_with("product_name=Apples&supplier_name=Sun+Farms&country=AW"), "{body}");
    assert!(!body.contains("supplier_id"));

    let st = supply(&h).snapshot();
    assert_eq!(st.alert.as_deref(), Some("Supplier added to supply chain"));
    assert_eq!(st.editor, None);
    assert_eq!(h.backend.call_count(SUMMARY), 2);
}

#[test]
fn incomplete_supplier_form_is_not_sent() {
    let mut h = open(backend());
    open_form(&mut h, "P001");

    supply(&h).edit_form(|f| f.supplier_name = "Sun Farms".into());
    supply(&h).submit();
    h.tabs.wait_idle();

    assert_eq!(h.backend.call_count(ADD), 0);
    let alert = supply(&h).snapshot().alert.expect("alerted");
    assert!(alert.starts_with("Please fill in: Location"), "{alert}");
}

#[test]
fn rejected_supplier_keeps_form_open() {
    let mut h = open(backend().on_post(ADD, HttpReply::ok(r#"{"success": false, "error": "Duplicate supplier"}"#)));
    open_form(&mut h, "P001");

    supply(&h).edit_form(|f| {
        f.supplier_name = "FarmCo".into();
        f.location = "Noord".into();
        f.assigned_branch = "AUA".into();
        f.crop_area = "1".into();
        f.crop_yield = "2".into();
        f.delivery = "On Order".into();
    });
    supply(&h).submit();
    h.tabs.wait_idle();

    let st = supply(&h).snapshot();
    assert_eq!(st.alert.as_deref(), Some("Error: Duplicate supplier"));
    let editor = st.editor.expect("still open");
    assert!(!editor.saving);
}

#[test]
fn editing_a_supplier_posts_to_edit() {
    let details = r#"{"id": 9, "product_name": "Apples", "supplier_name": "FarmCo", "country": "AW",
        "location": "Noord", "assigned_branch": "AUA", "crop_area": 12, "crop_yield": 300,
        "delivery": "Seasonal", "delivery_time": "", "ready_for_shelf_days": 3, "product_type": "Produce",
        "airports": [{"iata_code": "AUA", "city": "Oranjestad"}]}"#;
    let mut h = open(
        backend()
            .on_get(SUPPLIER_FARMCO, HttpReply::ok(details))
            .on_post(EDIT, HttpReply::ok(r#"{"success": true}"#)),
    );
    select(&mut h, "P001");
    supply(&h).open_edit("FarmCo");
    h.tabs.wait_idle();

    let editor = supply(&h).snapshot().editor.expect("form open");
    assert_eq!(editor.title(), "Edit Supplier");
    assert_eq!(editor.form.supplier_id.as_deref(), Some("9"));
    assert_eq!(editor.form.crop_area, "12");
    assert_eq!(editor.form.ready_for_shelf_days, "3");

    supply(&h).submit();
    h.tabs.wait_idle();

    let post = h.backend.calls().into_iter().find(|c| c.path == EDIT).expect("edit posted");
    assert!(post.body.expect("form body").starts_with("supplier_id=9&"));
    assert_eq!(h.backend.call_count(ADD), 0);
    assert_eq!(supply(&h).snapshot().alert.as_deref(), Some("Supplier updated successfully"));
}

#[test]
fn dry_goods_form_hides_shelf_days() {
    let mut h = open(backend());
    open_form(&mut h, "P002");

    let editor = supply(&h).snapshot().editor.expect("form open");
    assert_eq!(editor.form.product_name, "Rice");
    assert!(!editor.shows_shelf_days());
}
