// src/renderers/market_export.rs
//
// User › Export: the product portfolio with country/category/name filters,
// the buttons that open the add/edit product form tabs, and the supply-chain
// panel of the selected product.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::api::{self, types::Product};
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::content::{Content, ContentRegion};
use crate::dispatch::kind::RendererKind;
use crate::events::ConsoleEvent;
use crate::workspace::TabOptions;

use super::supply_chain::SupplyChain;
use super::{RenderEnv, Renderer};

pub const HEADING: &str = "Export User Market Data";
pub const PRODUCT_CATEGORIES: [&str; 6] =
    ["Produce", "Meats", "Other Perishable", "Dry Goods", "Technology", "Other"];
pub const ADD_PRODUCT_TAB: &str = "Add Products";
pub const COLUMNS: [&str; 7] =
    ["Code", "Name", "Type", "Country", "Trade Unit", "Packaging", "Currency"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportState {
    pub products: Vec<Product>,
    /// Country code or name; empty shows all.
    pub country: String,
    pub category: String,
    pub search: String,
    pub selected: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub alert: Option<String>,
}

impl ExportState {
    /// Distinct `(value, label)` pairs in first-seen order.
    pub fn countries(&self) -> Vec<(String, String)> {
        let mut seen = Vec::<(String, String)>::new();
        for p in &self.products {
            if p.country_code.is_empty() && p.country_name.is_empty() {
                continue;
            }
            let key = (p.country_code.clone(), p.country_name.clone());
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen.into_iter()
            .map(|(code, name)| {
                let value = if code.is_empty() { name.clone() } else { code.clone() };
                let label = if name.is_empty() { code } else { name };
                (value, label)
            })
            .collect()
    }

    pub fn matches(&self, p: &Product) -> bool {
        if !self.country.is_empty()
            && p.country_code != self.country
            && p.country_name != self.country
        {
            return false;
        }
        if !self.category.is_empty()
            && p.product_type.trim().to_lowercase() != self.category.trim().to_lowercase()
        {
            return false;
        }
        let term = self.search.to_lowercase();
        term.is_empty() || p.name.to_lowercase().contains(&term)
    }

    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| self.matches(p))
    }

    /// "<n> products available", per-country and per-category lines.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut by_country = BTreeMap::<String, usize>::new();
        let mut by_category = BTreeMap::<String, usize>::new();
        for p in &self.products {
            let country = [&p.country_name, &p.country_code]
                .into_iter()
                .find(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| s!("Unknown"));
            let cat = match p.product_type.trim() {
                "" => s!("Unknown"),
                t => s!(t),
            };
            *by_country.entry(country).or_default() += 1;
            *by_category.entry(cat).or_default() += 1;
        }

        let countries: Vec<String> = by_country.iter().map(|(n, c)| format!("{c} from {n}")).collect();
        let categories: Vec<String> = by_category.iter().map(|(n, c)| format!("{c} are {n}")).collect();
        vec![
            format!("{} products available", self.products.len()),
            countries.join(", "),
            categories.join(", "),
        ]
    }

    pub fn selected_product(&self) -> Option<&Product> {
        let code = self.selected.as_deref()?;
        self.products.iter().find(|p| p.product_code == code)
    }
}

pub fn load_products(backend: &dyn Backend, state: &Mutex<ExportState>) {
    let res = api::products(backend, None);
    let mut st = lock(state);
    st.loading = false;
    match res {
        Ok(p) if p.is_empty() => {
            st.products.clear();
            st.error = Some(s!("No products found."));
        }
        Ok(p) => {
            logd!("Export: {} product(s)", p.len());
            st.products = p;
            st.error = None;
        }
        Err(e) => {
            loge!("Export: products failed: {}", e);
            st.error = Some(s!("Failed to load products."));
        }
    }
}

pub struct MarketExport {
    env: RenderEnv,
    state: Arc<Mutex<ExportState>>,
    supply: SupplyChain,
}

impl MarketExport {
    pub fn new(env: RenderEnv) -> Self {
        let supply = SupplyChain::new(env.clone());
        Self { env, state: Arc::default(), supply }
    }

    pub fn supply(&self) -> &SupplyChain {
        &self.supply
    }

    pub fn state(&self) -> Arc<Mutex<ExportState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> ExportState {
        lock(&self.state).clone()
    }

    pub fn set_country(&self, country: &str) {
        lock(&self.state).country = s!(country);
    }

    pub fn set_category(&self, category: &str) {
        lock(&self.state).category = s!(category);
    }

    pub fn set_search(&self, term: &str) {
        lock(&self.state).search = s!(term);
    }

    /// Single selection; the supply-chain panel follows it.
    pub fn toggle_selected(&self, code: &str) {
        let product = {
            let mut st = lock(&self.state);
            if st.selected.as_deref() == Some(code) {
                st.selected = None;
            } else {
                st.selected = Some(s!(code));
            }
            st.selected_product().map(|p| p.name.clone())
        };
        match product {
            Some(name) => self.supply.show_product(&name),
            None => self.supply.clear(),
        }
    }

    /// The export alert, else the supply panel's.
    pub fn alert(&self) -> Option<String> {
        let own = lock(&self.state).alert.clone();
        own.or_else(|| lock(&self.supply.state()).alert.clone())
    }

    pub fn dismiss_alert(&self) {
        let mut st = lock(&self.state);
        if st.alert.take().is_none() {
            drop(st);
            self.supply.dismiss_alert();
        }
    }

    pub fn add_supplier(&self) {
        let mut st = lock(&self.state);
        let Some(p) = st.selected_product().cloned() else {
            st.alert = Some(s!("Please select a product in the table to add a supplier for."));
            return;
        };
        drop(st);
        self.supply.open_add(&p);
    }

    pub fn add_product(&self) {
        self.env.events.send(ConsoleEvent::open(ADD_PRODUCT_TAB));
    }

    /// Opens `Edit <name>` carrying the product code.
    pub fn edit_product(&self) {
        let mut st = lock(&self.state);
        let Some(p) = st.selected_product() else {
            st.alert = Some(s!("Please select a product to edit."));
            return;
        };
        let name = join!("Edit ", &p.name);
        let options = TabOptions::product(p.product_code.clone());
        drop(st);
        self.env.events.send(ConsoleEvent::OpenTab { name, options });
    }
}

impl Renderer for MarketExport {
    fn kind(&self) -> RendererKind {
        RendererKind::Export
    }

    fn render_tab(&mut self, container: &ContentRegion) {
        *lock(&self.state) = ExportState { loading: true, ..ExportState::default() };
        self.supply.reset();
        container.show(Content::Renderer(self.kind()));

        let state = self.state();
        self.env.spawn(move |b| load_products(b, &state));
    }
}
