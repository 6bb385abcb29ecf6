// src/renderers/market_import.rs
//
// User › Import: competitor price entry per product for a chosen country.
// Filter state and typed-in prices survive tab switches through LocalStore.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::{
    self,
    types::{Country, PriceUpdate, Product, SavedPrice},
};
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::content::{Content, ContentRegion};
use crate::dispatch::kind::RendererKind;
use crate::storage::{IMPORT_ENTERED_PRICES, IMPORT_TAB_STATE, LocalStore};

use super::{RenderEnv, Renderer};

pub const HEADING: &str = "Import User Market Data";
pub const COUNTRY_PLACEHOLDER: &str = "Select Country to Analize";
pub const SAVE_LABEL: &str = "Save updated Prices";
pub const COLUMNS: [&str; 11] = [
    "Code",
    "Name",
    "Type",
    "Country",
    "Trade Unit",
    "Packaging",
    "Currency",
    "FOB Price",
    "Last Updated Price",
    "Last Updated Date",
    "Enter New Price",
];
pub const COUNTRY_CHANGE_WARNING: &str =
    "Updated Prices are still not saved, if you change country for market comparision, data will be erased";

const SEARCH_ENGINE: &str = "https://www.bing.com/search";

/// Persisted under `importTabState`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub search: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductsView {
    Idle,
    Loading,
    Empty,
    Error,
    Ready,
}

impl ProductsView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ProductsView::Loading => Some("Loading products..."),
            ProductsView::Empty => Some("No products found."),
            ProductsView::Error => Some("Error loading products."),
            _ => None,
        }
    }
}

/// Rate from a product currency into USD.
#[derive(Clone, Debug, PartialEq)]
pub struct RateQuote {
    pub currency: String,
    pub rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportState {
    pub countries: Vec<Country>,
    pub filter: FilterState,
    pub products: Vec<Product>,
    pub saved: BTreeMap<String, SavedPrice>,
    /// Set when the listed products are priced in something other than USD.
    pub rate: Option<RateQuote>,
    /// Product code → typed price, mirrored to `importTabEnteredPrices`.
    pub entered: BTreeMap<String, String>,
    pub selected: Option<String>,
    pub view: ProductsView,
    pub saving: bool,
    /// Blocking message for the alert dialog.
    pub alert: Option<String>,
    /// Country waiting for the "data will be erased" confirmation.
    pub pending_country: Option<String>,
    load_gen: u64,
}

impl Default for ImportState {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            filter: FilterState::default(),
            products: Vec::new(),
            saved: BTreeMap::new(),
            rate: None,
            entered: BTreeMap::new(),
            selected: None,
            view: ProductsView::Idle,
            saving: false,
            alert: None,
            pending_country: None,
            load_gen: 0,
        }
    }
}

impl ImportState {
    pub fn any_price_entered(&self) -> bool {
        self.entered.values().any(|v| !v.trim().is_empty())
    }

    /// The save button only exists while some price is typed in.
    pub fn save_visible(&self) -> bool {
        self.any_price_entered() && !self.saving
    }

    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        let term = self.filter.search.trim().to_lowercase();
        self.products
            .iter()
            .filter(move |p| term.is_empty() || p.name.to_lowercase().contains(&term))
    }

    pub fn last_price(&self, code: &str) -> String {
        self.saved
            .get(code)
            .and_then(|s| s.last_updated_price.clone())
            .unwrap_or_else(|| s!("-"))
    }

    pub fn last_date(&self, code: &str) -> String {
        self.saved
            .get(code)
            .and_then(|s| s.last_updated_date.clone())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| s!("-"))
    }

    /// "XCG→USD: 0.56" above the table.
    pub fn rate_label(&self) -> Option<String> {
        self.rate.as_ref().map(|q| format!("{}→USD: {}", q.currency, q.rate))
    }

    /// FCA cost per weight unit, converted to USD when a rate for the
    /// product's currency is known.
    pub fn fob_price(&self, p: &Product) -> String {
        let Some(fca) = p.fca_cost_per_wu else { return s!("-") };
        match &self.rate {
            Some(q) if q.currency.eq_ignore_ascii_case(&p.currency) => format!("{:.2} USD", fca * q.rate),
            _ => fca.to_string(),
        }
    }

    pub fn country_name(&self) -> Option<&str> {
        if self.filter.country.is_empty() {
            return None;
        }
        self.countries
            .iter()
            .find(|c| c.code == self.filter.country)
            .map(|c| c.name.as_str())
    }

    /// One row per visible product with a non-blank typed price.
    pub fn price_updates(&self) -> Vec<PriceUpdate> {
        self.visible_products()
            .filter_map(|p| {
                let price = self.entered.get(&p.product_code)?;
                if price.trim().is_empty() {
                    return None;
                }
                Some(PriceUpdate {
                    product_code: p.product_code.clone(),
                    product_name: p.name.clone(),
                    product_type: p.product_type.clone(),
                    trade_unit: p.trade_unit.clone(),
                    packaging: p.packaging.clone(),
                    currency: s!("USD"),
                    new_price: price.clone(),
                })
            })
            .collect()
    }

    /// Label of the web price search button.
    pub fn search_label(&self) -> String {
        match (self.selected_product(), self.country_name()) {
            (Some(p), Some(c)) => format!("Search for {} in {}", p.name, c),
            _ => s!("Search"),
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        let code = self.selected.as_deref()?;
        self.products.iter().find(|p| p.product_code == code)
    }

    /// Web search for the selected product's shelf price in the country.
    pub fn search_link(&self) -> Option<String> {
        let product = self.selected_product()?;
        let country = self.country_name()?;
        let q = format!("{} price in {} supermarket USD", product.name, country);
        Some(query!(SEARCH_ENGINE, "q" => &q))
    }
}

/* ---------- blocking loaders ---------- */

pub fn load_countries(backend: &dyn Backend, state: &Mutex<ImportState>) {
    match api::countries(backend) {
        Ok(c) => lock(state).countries = c,
        Err(e) => loge!("Import: countries failed: {}", e),
    }
}

/// Products for the filter country plus that country's saved prices.
pub fn load_products(backend: &dyn Backend, state: &Mutex<ImportState>, load_gen: u64, country: &str) {
    let country_opt = (!country.is_empty()).then_some(country);
    let products = api::products(backend, country_opt);

    let products = match products {
        Err(e) => {
            loge!("Import: products for {:?} failed: {}", country, e);
            let mut st = lock(state);
            if st.load_gen == load_gen {
                st.view = ProductsView::Error;
            }
            return;
        }
        Ok(p) if p.is_empty() => {
            let mut st = lock(state);
            if st.load_gen == load_gen {
                st.products.clear();
                st.view = ProductsView::Empty;
            }
            return;
        }
        Ok(p) => p,
    };

    let saved = api::saved_prices(backend, country)
        .map(|s| s.by_code())
        .unwrap_or_else(|e| {
            logw!("Import: saved prices for {:?} failed: {}", country, e);
            BTreeMap::new()
        });
    let rate = load_rate(backend, &products);

    let mut st = lock(state);
    if st.load_gen != load_gen {
        return;
    }
    logd!("Import: {} product(s), {} saved price(s)", products.len(), saved.len());
    st.products = products;
    st.saved = saved;
    st.rate = rate;
    st.view = ProductsView::Ready;
}

/// USD rate for the first product not priced in USD. Failures leave prices
/// unconverted.
pub fn load_rate(backend: &dyn Backend, products: &[Product]) -> Option<RateQuote> {
    let currency = products
        .iter()
        .map(|p| p.currency.trim())
        .find(|c| !c.is_empty() && !c.eq_ignore_ascii_case("USD"))?;
    match api::exchange_rate(backend, currency, "USD") {
        Ok(r) => r.rate.map(|rate| RateQuote { currency: s!(currency), rate }),
        Err(e) => {
            logw!("Import: {}→USD rate failed: {}", currency, e);
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Partial,
    Failed,
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Saved => "Prices saved successfully!",
            SaveOutcome::Partial => "Some prices could not be saved. Please try again.",
            SaveOutcome::Failed => "Error saving prices. Please try again.",
        }
    }
}

pub fn save_prices(backend: &dyn Backend, updates: &[PriceUpdate], country: &str) -> SaveOutcome {
    match api::save_prices(backend, updates, country) {
        Ok(reply) if reply.all_saved() => SaveOutcome::Saved,
        Ok(_) => SaveOutcome::Partial,
        Err(e) => {
            loge!("Import: saving {} price(s) failed: {}", updates.len(), e);
            SaveOutcome::Failed
        }
    }
}

/// Publish a save result. After a full save into the country still on
/// screen, the saved prices are dropped (ones typed meanwhile stay) and a
/// reload generation is claimed; returns it with the remaining prices.
/// A country switched while the save was in flight gets nothing.
pub fn finish_save(
    state: &Mutex<ImportState>,
    outcome: &SaveOutcome,
    updates: &[PriceUpdate],
    country: &str,
) -> Option<(u64, BTreeMap<String, String>)> {
    let mut st = lock(state);
    st.saving = false;
    st.alert = Some(s!(outcome.message()));
    if !matches!(outcome, SaveOutcome::Saved) {
        return None;
    }
    if st.filter.country != country {
        logd!("Import: country changed during save, {:?} not reloaded", country);
        return None;
    }
    for u in updates {
        if st.entered.get(&u.product_code) == Some(&u.new_price) {
            st.entered.remove(&u.product_code);
        }
    }
    st.entered.retain(|_, v| !v.trim().is_empty());
    st.load_gen += 1;
    st.view = ProductsView::Loading;
    Some((st.load_gen, st.entered.clone()))
}

/* ---------- renderer ---------- */

pub struct MarketImport {
    env: RenderEnv,
    state: Arc<Mutex<ImportState>>,
}

impl MarketImport {
    pub fn new(env: RenderEnv) -> Self {
        Self { env, state: Arc::default() }
    }

    pub fn state(&self) -> Arc<Mutex<ImportState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> ImportState {
        lock(&self.state).clone()
    }

    fn store(&self) -> &LocalStore {
        &self.env.store
    }

    fn persist_filter(&self, filter: &FilterState) {
        self.store().set_json(IMPORT_TAB_STATE, filter);
    }

    fn reload(&self) {
        let (load_gen, country) = {
            let mut st = lock(&self.state);
            st.load_gen += 1;
            st.view = ProductsView::Loading;
            st.selected = None;
            (st.load_gen, st.filter.country.clone())
        };
        let state = self.state();
        self.env.spawn(move |b| load_products(b, &state, load_gen, &country));
    }

    /// Ask first when typed prices would be lost.
    pub fn select_country(&self, code: &str) {
        let filter = {
            let mut st = lock(&self.state);
            if st.filter.country == code {
                return;
            }
            if st.any_price_entered() {
                st.pending_country = Some(s!(code));
                return;
            }
            st.filter.country = s!(code);
            st.filter.clone()
        };
        self.persist_filter(&filter);
        self.reload();
    }

    pub fn confirm_country_change(&self, proceed: bool) {
        let filter = {
            let mut st = lock(&self.state);
            let Some(code) = st.pending_country.take() else { return };
            if !proceed {
                return;
            }
            st.entered.clear();
            st.filter.country = code;
            st.filter.clone()
        };
        self.store().remove(IMPORT_ENTERED_PRICES);
        self.persist_filter(&filter);
        self.reload();
    }

    /// Name filter; applied locally, persisted like the country.
    pub fn set_search(&self, term: &str) {
        let filter = {
            let mut st = lock(&self.state);
            st.filter.search = s!(term);
            st.filter.clone()
        };
        self.persist_filter(&filter);
    }

    pub fn set_price(&self, code: &str, value: &str) {
        let entered = {
            let mut st = lock(&self.state);
            st.entered.insert(s!(code), s!(value));
            st.entered.clone()
        };
        self.store().set_json(IMPORT_ENTERED_PRICES, &entered);
    }

    /// Single selection; selecting the checked row again clears it.
    pub fn toggle_selected(&self, code: &str) {
        let mut st = lock(&self.state);
        if st.selected.as_deref() == Some(code) {
            st.selected = None;
        } else {
            st.selected = Some(s!(code));
        }
    }

    pub fn dismiss_alert(&self) {
        lock(&self.state).alert = None;
    }

    pub fn save(&self) {
        let (updates, country) = {
            let mut st = lock(&self.state);
            if st.filter.country.is_empty() {
                st.alert = Some(s!("Please select a country before saving."));
                return;
            }
            let updates = st.price_updates();
            if updates.is_empty() {
                st.alert = Some(s!("No prices entered to save."));
                return;
            }
            st.saving = true;
            (updates, st.filter.country.clone())
        };

        let state = self.state();
        let store = Arc::clone(&self.env.store);
        self.env.spawn(move |b| {
            let outcome = save_prices(b, &updates, &country);
            let Some((reload, entered)) = finish_save(&state, &outcome, &updates, &country) else {
                return;
            };
            if entered.is_empty() {
                store.remove(IMPORT_ENTERED_PRICES);
            } else {
                store.set_json(IMPORT_ENTERED_PRICES, &entered);
            }
            load_products(b, &state, reload, &country);
        });
    }

    /// Tab closed: typed prices do not outlive it.
    pub fn forget_entered(&self) {
        lock(&self.state).entered.clear();
        self.store().remove(IMPORT_ENTERED_PRICES);
    }
}

impl Renderer for MarketImport {
    fn kind(&self) -> RendererKind {
        RendererKind::Import
    }

    fn render_tab(&mut self, container: &ContentRegion) {
        let filter: FilterState = self.store().get_json(IMPORT_TAB_STATE).unwrap_or_default();
        let entered: BTreeMap<String, String> =
            self.store().get_json(IMPORT_ENTERED_PRICES).unwrap_or_default();
        {
            let mut st = lock(&self.state);
            let load_gen = st.load_gen;
            *st = ImportState { filter, entered, load_gen, ..ImportState::default() };
        }
        container.show(Content::Renderer(self.kind()));

        let state = self.state();
        self.env.spawn(move |b| load_countries(b, &state));
        self.reload();
    }

    fn on_close(&mut self) {
        self.forget_entered();
    }
}
