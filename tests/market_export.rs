// tests/market_export.rs

mod common;

use common::harness;
use finsim_console::core::net::{HttpReply, MemoryBackend};
use finsim_console::dispatch::kind::TabKind;
use finsim_console::workspace::TabOptions;

const PRODUCTS_JSON: &str = r#"{"products": [
    {"product_code": "P001", "name": "Apples", "product_type": "Produce", "country_name": "Aruba", "country_code": "AW"},
    {"product_code": "P002", "name": "Rice", "product_type": "Dry Goods", "country_name": "Aruba", "country_code": "AW"},
    {"product_code": "P003", "name": "Laptops", "product_type": "Technology", "country_name": "Curacao", "country_code": "CW"}
]}"#;

fn open(products: &str) -> common::Harness {
    let backend = MemoryBackend::new()
        .on_get("/api/products/", HttpReply::ok(products))
        .on_get("/add-product-form/", HttpReply::ok(r#"<div class="tab-content-inner"><h2>Add Product</h2></div>"#))
        .on_get("/edit-product-form/P002/", HttpReply::ok(r#"<div class="tab-content-inner"><h2>Edit Product</h2></div>"#));
    let mut h = harness(backend);
    h.tabs.switch_workspace("User");
    h.tabs.open_tab("Export", TabOptions::default());
    h.tabs.wait_idle();
    h
}

#[test]
fn summary_counts_products() {
    let h = open(PRODUCTS_JSON);
    let st = h.tabs.dispatcher().renderers().export.snapshot();

    assert!(!st.loading);
    assert_eq!(
        st.summary_lines(),
        vec![
            "3 products available".to_string(),
            "2 from Aruba, 1 from Curacao".to_string(),
            "1 are Dry Goods, 1 are Produce, 1 are Technology".to_string(),
        ]
    );
    assert_eq!(
        st.countries(),
        vec![("AW".to_string(), "Aruba".to_string()), ("CW".to_string(), "Curacao".to_string())]
    );
}

#[test]
fn filters_combine() {
    let h = open(PRODUCTS_JSON);
    let export = &h.tabs.dispatcher().renderers().export;

    export.set_country("AW");
    let st = export.snapshot();
    assert_eq!(st.visible_products().count(), 2);

    export.set_category("dry goods");
    let st = export.snapshot();
    let names: Vec<&str> = st.visible_products().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Rice"]);

    export.set_search("apple");
    assert_eq!(export.snapshot().visible_products().count(), 0);
}

#[test]
fn failed_load_shows_error() {
    let h = open("not json");
    let st = h.tabs.dispatcher().renderers().export.snapshot();
    assert_eq!(st.error.as_deref(), Some("Failed to load products."));
}

#[test]
fn edit_without_selection_alerts() {
    let mut h = open(PRODUCTS_JSON);
    h.tabs.dispatcher().renderers().export.edit_product();
    assert_eq!(h.tabs.pump_events(), 0);

    let st = h.tabs.dispatcher().renderers().export.snapshot();
    assert_eq!(st.alert.as_deref(), Some("Please select a product to edit."));
}

#[test]
fn edit_opens_product_form_tab() {
    let mut h = open(PRODUCTS_JSON);
    h.tabs.dispatcher().renderers().export.toggle_selected("P002");
    h.tabs.dispatcher().renderers().export.edit_product();
    assert_eq!(h.tabs.pump_events(), 1);
    h.tabs.wait_idle();

    let tab = h.tabs.active_tab().cloned().expect("edit tab");
    assert_eq!(tab.name, "Edit Rice");
    assert_eq!(tab.product_code.as_deref(), Some("P002"));
    assert_eq!(tab.kind, TabKind::EditProduct { code: "P002".into() });
    assert_eq!(h.backend.call_count("/edit-product-form/P002/"), 1);
}

#[test]
fn add_product_opens_form_tab() {
    let mut h = open(PRODUCTS_JSON);
    h.tabs.dispatcher().renderers().export.add_product();
    h.tabs.pump_events();
    h.tabs.wait_idle();

    assert_eq!(h.tabs.tab_bar_names(), vec!["User", "Export", "Add Products"]);
    assert_eq!(h.tabs.active_tab().map(|t| t.kind.clone()), Some(TabKind::AddProduct));
}
