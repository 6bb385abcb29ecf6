// src/renderers/supply_chain.rs
//
// Supply-chain panel under the Export product table: the summary of the
// selected product, its suppliers/branches/yields, and the add/edit
// supplier form.

use std::sync::{Arc, Mutex};

use crate::api::{
    self,
    types::{Airport, Product, SupplierForm, SupplyChainDetails, SupplyChainRow},
};
use crate::core::lock;
use crate::core::net::Backend;

use super::RenderEnv;

pub const HEADING: &str = "Supply Chain Summary";
pub const DELIVERY_OPTIONS: [&str; 4] = ["Year-round", "Seasonal", "On Order", "On Shelf"];
/// Product types whose suppliers report a shelf-ready lead time.
pub const PERISHABLE_TYPES: [&str; 3] = ["produce", "meats", "other perishable"];

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SummaryView {
    #[default]
    Hidden,
    Loading,
    Missing,
    Failed,
    Ready(SupplyChainRow),
}

impl SummaryView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            SummaryView::Missing => Some("No supply chain data found for the selected product."),
            SummaryView::Failed => Some("Failed to load supply chain summary."),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DetailsView {
    #[default]
    Idle,
    Loading,
    Ready(SupplyChainDetails),
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplierEditor {
    pub form: SupplierForm,
    pub airports: Vec<Airport>,
    pub product_type: String,
    pub saving: bool,
}

impl SupplierEditor {
    pub fn title(&self) -> &'static str {
        if self.form.is_edit() { "Edit Supplier" } else { "Add Supplier" }
    }

    pub fn shows_shelf_days(&self) -> bool {
        let t = self.product_type.trim().to_lowercase();
        PERISHABLE_TYPES.contains(&t.as_str())
    }

    /// `(iata, "IATA - City")` pairs for the branch picker.
    pub fn branch_options(&self) -> Vec<(String, String)> {
        self.airports
            .iter()
            .map(|a| {
                let label = if a.iata_code.is_empty() { a.city.clone() } else { a.label() };
                (a.iata_code.clone(), label)
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SupplyState {
    /// Product name the panel follows; `None` hides it.
    pub product: Option<String>,
    pub summary: SummaryView,
    pub details: DetailsView,
    pub editor: Option<SupplierEditor>,
    pub alert: Option<String>,
    /// Bumped on every summary load; stale workers drop their replies.
    pub load_gen: u64,
}

impl SupplyState {
    fn begin_load(&mut self, product: &str) -> u64 {
        self.load_gen += 1;
        self.product = Some(s!(product));
        self.summary = SummaryView::Loading;
        self.details = DetailsView::Idle;
        self.load_gen
    }
}

/// Summary first, then the per-supplier details of the matching row.
pub fn load_summary(backend: &dyn Backend, state: &Mutex<SupplyState>, load_gen: u64, product: &str) {
    let res = api::supply_chain(backend);
    let row = {
        let mut st = lock(state);
        if st.load_gen != load_gen {
            return;
        }
        match res {
            Ok(rows) => match rows.into_iter().find(|r| r.product_name == product) {
                Some(row) => {
                    st.summary = SummaryView::Ready(row.clone());
                    st.details = DetailsView::Loading;
                    row
                }
                None => {
                    st.summary = SummaryView::Missing;
                    return;
                }
            },
            Err(e) => {
                loge!("Supply chain: summary failed: {}", e);
                st.summary = SummaryView::Failed;
                return;
            }
        }
    };

    let res = api::supply_chain_details(backend, &row.product_name);
    let mut st = lock(state);
    if st.load_gen != load_gen {
        return;
    }
    st.details = match res {
        Ok(d) => {
            logd!("Supply chain: {} supplier(s) for {}", d.suppliers.len(), row.product_name);
            DetailsView::Ready(d)
        }
        Err(e) => {
            logw!("Supply chain: details for {} failed: {}", row.product_name, e);
            DetailsView::Failed
        }
    };
}

pub struct SupplyChain {
    env: RenderEnv,
    state: Arc<Mutex<SupplyState>>,
}

impl SupplyChain {
    pub fn new(env: RenderEnv) -> Self {
        Self { env, state: Arc::default() }
    }

    pub fn state(&self) -> Arc<Mutex<SupplyState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> SupplyState {
        lock(&self.state).clone()
    }

    /// Back to an empty panel; running loads are retired.
    pub fn reset(&self) {
        let mut st = lock(&self.state);
        let load_gen = st.load_gen + 1;
        *st = SupplyState { load_gen, ..SupplyState::default() };
    }

    pub fn show_product(&self, product: &str) {
        let load_gen = lock(&self.state).begin_load(product);
        let state = self.state();
        let product = s!(product);
        self.env.spawn(move |b| load_summary(b, &state, load_gen, &product));
    }

    /// Nothing selected: hide the summary, keep any open form.
    pub fn clear(&self) {
        let mut st = lock(&self.state);
        st.load_gen += 1;
        st.product = None;
        st.summary = SummaryView::Hidden;
        st.details = DetailsView::Idle;
    }

    /// Opens an empty form for `product` with its country's airports.
    pub fn open_add(&self, product: &Product) {
        let form = SupplierForm {
            product_name: product.name.clone(),
            country: product.country_code.clone(),
            ..SupplierForm::default()
        };
        let product_type = product.product_type.clone();
        let country = product.country_code.clone();
        let state = self.state();
        self.env.spawn(move |b| {
            let airports = api::airports_by_country(b, &country).unwrap_or_else(|e| {
                logw!("Supply chain: airports for {} failed: {}", country, e);
                Vec::new()
            });
            lock(&state).editor = Some(SupplierEditor { form, airports, product_type, saving: false });
        });
    }

    /// Loads `supplier` of the followed product into the form.
    pub fn open_edit(&self, supplier: &str) {
        let Some(product) = lock(&self.state).product.clone() else { return };
        let supplier = s!(supplier);
        let state = self.state();
        self.env.spawn(move |b| {
            let res = api::supplier_details(b, &product, &supplier);
            let mut st = lock(&state);
            match res {
                Ok(d) => {
                    st.editor = Some(SupplierEditor {
                        form: SupplierForm::from_details(&d),
                        airports: d.airports,
                        product_type: d.product_type,
                        saving: false,
                    });
                }
                Err(e) => {
                    loge!("Supply chain: supplier {} failed: {}", supplier, e);
                    st.alert = Some(s!("Failed to load supplier details."));
                }
            }
        });
    }

    pub fn edit_form(&self, f: impl FnOnce(&mut SupplierForm)) {
        if let Some(editor) = lock(&self.state).editor.as_mut() {
            f(&mut editor.form);
        }
    }

    pub fn close_editor(&self) {
        lock(&self.state).editor = None;
    }

    pub fn dismiss_alert(&self) {
        lock(&self.state).alert = None;
    }

    pub fn submit(&self) {
        let form = {
            let mut st = lock(&self.state);
            let Some(editor) = st.editor.as_mut() else { return };
            if editor.saving {
                return;
            }
            let missing = editor.form.missing();
            if !missing.is_empty() {
                st.alert = Some(format!("Please fill in: {}", missing.join(", ")));
                return;
            }
            editor.saving = true;
            editor.form.clone()
        };

        let state = self.state();
        self.env.spawn(move |b| {
            let res = api::save_supplier(b, &form);
            let reload = {
                let mut st = lock(&state);
                if let Some(editor) = st.editor.as_mut() {
                    editor.saving = false;
                }
                match res {
                    Ok(reply) if reply.success => {
                        logf!("Supply chain: saved {} for {}", form.supplier_name, form.product_name);
                        st.alert = Some(s!(if form.is_edit() {
                            "Supplier updated successfully"
                        } else {
                            "Supplier added to supply chain"
                        }));
                        st.editor = None;
                        Some(st.begin_load(&form.product_name))
                    }
                    Ok(reply) => {
                        let reason = reply.error.unwrap_or_else(|| s!("Unknown error"));
                        st.alert = Some(join!("Error: ", &reason));
                        None
                    }
                    Err(e) => {
                        loge!("Supply chain: save failed: {}", e);
                        st.alert = Some(s!(if form.is_edit() {
                            "Error updating supplier"
                        } else {
                            "Error saving supplier"
                        }));
                        None
                    }
                }
            };
            if let Some(load_gen) = reload {
                load_summary(b, &state, load_gen, &form.product_name);
            }
        });
    }
}
