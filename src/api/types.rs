// src/api/types.rs
//
// Wire types for the JSON endpoints. The backend is loose about field names
// (`code` vs `country_code`, `records` vs `results`) and about numbers
// arriving as strings, so most fields default and accept both spellings.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept a string, a number, a bool or null and hand back display text.
pub fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => s!(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

fn de_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let text = de_text(d)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

/* ---------- geography ---------- */

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RegionList {
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Country {
    #[serde(default, alias = "country_code", deserialize_with = "de_text")]
    pub code: String,
    #[serde(default, alias = "country_name", deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CountryList {
    #[serde(default)]
    pub countries: Vec<Country>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Airport {
    #[serde(default, deserialize_with = "de_text")]
    pub iata_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub city: String,
}

impl Airport {
    /// "AUA - Oranjestad"
    pub fn label(&self) -> String {
        format!("{} - {}", self.iata_code, self.city)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AirportList {
    #[serde(default)]
    pub airports: Vec<Airport>,
}

/* ---------- management info ---------- */

/// Reply of the three `check-*-info` endpoints. Manager and user come back
/// under level-specific names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InfoCheck {
    #[serde(default)]
    pub exists: bool,
    #[serde(
        default,
        alias = "regional_manager",
        alias = "country_manager",
        alias = "branch_manager",
        deserialize_with = "de_text"
    )]
    pub manager: String,
    #[serde(
        default,
        alias = "region_user",
        alias = "country_user",
        alias = "branch_user",
        deserialize_with = "de_text"
    )]
    pub user: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RegionInfo {
    pub region: String,
    pub regional_manager: String,
    pub region_user: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CountryInfo {
    pub country: String,
    pub region: String,
    pub country_manager: String,
    pub country_user: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BranchInfo {
    pub airport: String,
    pub country: String,
    pub branch_manager: String,
    pub branch_user: String,
}

/// `{success, error?, message?}` shared by the save endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SaveReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub message: Option<String>,
}

/// One region of the commercial structure overview, countries and
/// branches nested.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StructureRegion {
    #[serde(default, deserialize_with = "de_text")]
    pub region: String,
    #[serde(default, deserialize_with = "de_text")]
    pub regional_manager: String,
    #[serde(default, deserialize_with = "de_text")]
    pub region_user: String,
    #[serde(default)]
    pub countries: Vec<StructureCountry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StructureCountry {
    #[serde(default, deserialize_with = "de_text")]
    pub country_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country_manager: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country_user: String,
    #[serde(default)]
    pub branches: Vec<StructureBranch>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StructureBranch {
    #[serde(default, deserialize_with = "de_text")]
    pub airport_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub airport_city: String,
    #[serde(default, deserialize_with = "de_text")]
    pub branch_manager: String,
    #[serde(default, deserialize_with = "de_text")]
    pub branch_user: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StructureTable {
    #[serde(default)]
    pub data: Vec<StructureRegion>,
}

/* ---------- products & prices ---------- */

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "de_text")]
    pub product_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub product_type: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country_code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub trade_unit: String,
    #[serde(default, deserialize_with = "de_text")]
    pub packaging: String,
    #[serde(default, deserialize_with = "de_text")]
    pub currency: String,
    #[serde(default)]
    pub fca_cost_per_wu: Option<f64>,
    #[serde(default, deserialize_with = "de_text")]
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SavedPrice {
    #[serde(default, deserialize_with = "de_text")]
    pub product_code: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub last_updated_price: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub last_updated_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SavedPrices {
    #[serde(default)]
    pub results: Vec<SavedPrice>,
}

impl SavedPrices {
    pub fn by_code(self) -> BTreeMap<String, SavedPrice> {
        self.results
            .into_iter()
            .map(|p| (p.product_code.clone(), p))
            .collect()
    }
}

/// One row of `POST /api/save-price-comparison/`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PriceUpdate {
    pub product_code: String,
    pub product_name: String,
    pub product_type: String,
    pub trade_unit: String,
    pub packaging: String,
    pub currency: String,
    pub new_price: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PriceUpdateBatch<'a> {
    pub updates: &'a [PriceUpdate],
    pub country_code: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PriceSaveResult {
    #[serde(default)]
    pub success: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PriceSaveReply {
    #[serde(default)]
    pub results: Option<Vec<PriceSaveResult>>,
}

impl PriceSaveReply {
    /// Every row saved. A reply without `results` counts as a failure.
    pub fn all_saved(&self) -> bool {
        self.results
            .as_ref()
            .map(|r| r.iter().all(|x| x.success))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExchangeRate {
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "de_text")]
    pub from: String,
    #[serde(default, deserialize_with = "de_text")]
    pub to: String,
}

/* ---------- market scraping ---------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Supermarket {
    #[serde(default, deserialize_with = "de_text")]
    pub display_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub module_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SupermarketList {
    #[serde(default)]
    pub supermarkets: Vec<Supermarket>,
}

/// Domain → categories that already have raw data on the server.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ScrapeSummary {
    #[serde(default)]
    pub summary: BTreeMap<String, Vec<String>>,
}

impl ScrapeSummary {
    /// Case-insensitive check used before overwriting a category.
    pub fn has_category(&self, domain: &str, category: &str) -> bool {
        let wanted = category.trim().to_lowercase();
        self.summary
            .get(domain)
            .map(|cats| cats.iter().any(|c| c.trim().to_lowercase() == wanted))
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NavCategory {
    #[serde(default, alias = "Top", deserialize_with = "de_text")]
    pub top: String,
    #[serde(default, alias = "Subcategories")]
    pub subcategories: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NavCategoryList {
    #[serde(default)]
    pub categories: Vec<NavCategory>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub country_code: String,
    pub module_name: String,
    pub query: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapeStarted {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapeRecord {
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub price: String,
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScrapeResults {
    #[serde(default, alias = "results")]
    pub records: Vec<ScrapeRecord>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "de_text")]
    pub category: String,
    #[serde(default, deserialize_with = "de_text")]
    pub domain: String,
    #[serde(default, deserialize_with = "de_text")]
    pub date: String,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
}

impl ScrapeResults {
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(self.records.len() as u64)
    }

    /// "<total> <Category> products from <domain>[ updated on <date>]"
    pub fn meta_line(&self, category: &str, fallback_domain: &str) -> String {
        let domain = if self.domain.is_empty() { fallback_domain } else { &self.domain };
        let mut line = format!(
            "{} {} products from {}",
            self.total(),
            crate::core::sanitize::capitalize(category),
            domain
        );
        if !self.date.is_empty() {
            line.push_str(" updated on ");
            line.push_str(&self.date);
        }
        line
    }
}

/* ---------- supply chain ---------- */

fn de_text_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items = Vec::<Value>::deserialize(d)?;
    Ok(items
        .into_iter()
        .map(|v| match v {
            Value::Null => s!(),
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// One product's line of `GET /api/supply-chain/`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SupplyChainRow {
    #[serde(default, deserialize_with = "de_text")]
    pub product_name: String,
    #[serde(default)]
    pub num_suppliers: u64,
    #[serde(default)]
    pub num_branches: u64,
    #[serde(default)]
    pub total_yield: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SupplyChainList {
    #[serde(default)]
    pub supply_chain: Vec<SupplyChainRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SupplyChainDetails {
    #[serde(default, deserialize_with = "de_text_list")]
    pub suppliers: Vec<String>,
    #[serde(default, deserialize_with = "de_text_list")]
    pub branches: Vec<String>,
    #[serde(default)]
    pub yields: Vec<Option<f64>>,
}

/// A supplier as `GET /api/supplier-details/` returns it, with the airports
/// of its country for the branch picker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SupplierDetails {
    #[serde(default, deserialize_with = "de_text")]
    pub id: String,
    #[serde(default, deserialize_with = "de_text")]
    pub product_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub supplier_name: String,
    #[serde(default, deserialize_with = "de_text")]
    pub country: String,
    #[serde(default, deserialize_with = "de_text")]
    pub location: String,
    #[serde(default, deserialize_with = "de_text")]
    pub assigned_branch: String,
    #[serde(default, deserialize_with = "de_text")]
    pub crop_area: String,
    #[serde(default, deserialize_with = "de_text")]
    pub crop_yield: String,
    #[serde(default, deserialize_with = "de_text")]
    pub delivery: String,
    #[serde(default, deserialize_with = "de_text")]
    pub delivery_time: String,
    #[serde(default, deserialize_with = "de_text")]
    pub ready_for_shelf_days: String,
    #[serde(default, deserialize_with = "de_text")]
    pub product_type: String,
    #[serde(default)]
    pub airports: Vec<Airport>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
}

/// Body of `POST /add-supplier/` (no id) or `/edit-supplier/` (with id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplierForm {
    pub supplier_id: Option<String>,
    pub product_name: String,
    pub supplier_name: String,
    pub country: String,
    pub location: String,
    pub assigned_branch: String,
    pub crop_area: String,
    pub crop_yield: String,
    pub delivery: String,
    pub delivery_time: String,
    pub ready_for_shelf_days: String,
}

impl SupplierForm {
    pub fn from_details(d: &SupplierDetails) -> Self {
        Self {
            supplier_id: (!d.id.is_empty()).then(|| d.id.clone()),
            product_name: d.product_name.clone(),
            supplier_name: d.supplier_name.clone(),
            country: d.country.clone(),
            location: d.location.clone(),
            assigned_branch: d.assigned_branch.clone(),
            crop_area: d.crop_area.clone(),
            crop_yield: d.crop_yield.clone(),
            delivery: d.delivery.clone(),
            delivery_time: d.delivery_time.clone(),
            ready_for_shelf_days: d.ready_for_shelf_days.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.supplier_id.is_some()
    }

    /// Required fields left blank, by label.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("Product Name", &self.product_name),
            ("Supplier Name", &self.supplier_name),
            ("Country", &self.country),
            ("Location", &self.location),
            ("Assigned Branch", &self.assigned_branch),
            ("Crop Area", &self.crop_area),
            ("Crop Yield", &self.crop_yield),
            ("Delivery", &self.delivery),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(s!());
        if let Some(id) = &self.supplier_id {
            ser.append_pair("supplier_id", id);
        }
        ser.append_pair("product_name", &self.product_name)
            .append_pair("supplier_name", &self.supplier_name)
            .append_pair("country", &self.country)
            .append_pair("location", &self.location)
            .append_pair("assigned_branch", &self.assigned_branch)
            .append_pair("crop_area", &self.crop_area)
            .append_pair("crop_yield", &self.crop_yield)
            .append_pair("delivery", &self.delivery)
            .append_pair("delivery_time", &self.delivery_time)
            .append_pair("ready_for_shelf_days", &self.ready_for_shelf_days);
        ser.finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SupplierReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
}

/* ---------- routes ---------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RouteAirport {
    #[serde(default, alias = "iata_code", deserialize_with = "de_text")]
    pub code: String,
    #[serde(default, deserialize_with = "de_text")]
    pub name: String,
}

impl RouteAirport {
    /// "AUA - Reina Beatrix"
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RouteAirportList {
    #[serde(default)]
    pub airports: Vec<RouteAirport>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RouteQuery<'a> {
    pub departure: &'a str,
    pub arrival: &'a str,
}

/// Route records keep their server field order; only a few fields are
/// looked at by name.
pub type RouteRecord = serde_json::Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RouteRecords {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub error: Option<String>,
}
