// src/api/mod.rs
//
// Typed calls over a `Backend`. Every endpoint answers JSON, including its
// 4xx/5xx replies (`{"error": "..."}`), so the body is decoded first and the
// status only matters when decoding fails.

pub mod types;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::net::{Backend, HttpReply};
use crate::error::{ConsoleError, Result};
use types::*;

pub const REGIONS: &str = "/api/regions/";
pub const COUNTRIES_BY_REGION: &str = "/api/countries-by-region/";
pub const AIRPORTS_BY_COUNTRY: &str = "/api/airports-by-country/";
pub const COUNTRIES: &str = "/api/countries/";
pub const COUNTRIES_IN_COUNTRYINFO: &str = "/api/countries-in-countryinfo/";

pub const CHECK_REGION_INFO: &str = "/api/check-region-info/";
pub const SAVE_REGION_INFO: &str = "/api/save-region-info/";
pub const CHECK_COUNTRY_INFO: &str = "/api/check-country-info/";
pub const SAVE_COUNTRY_INFO: &str = "/api/save-country-info/";
pub const CHECK_BRANCH_INFO: &str = "/api/check-branch-info/";
pub const SAVE_BRANCH_INFO: &str = "/api/save-branch-info/";
pub const MANAGEMENT_TABLE: &str = "/api/get-management-table-data/";

pub const PRODUCTS: &str = "/api/products/";
pub const SAVED_PRICES: &str = "/api/get-saved-price-comparison/";
pub const SAVE_PRICES: &str = "/api/save-price-comparison/";
pub const EXCHANGE_RATE: &str = "/api/exchange-rate/";

pub const AVAILABLE_SUPERMARKETS: &str = "/api/available-supermarkets/";
pub const SCRAPE_SUMMARY: &str = "/api/scrape-summary/";
pub const SCRAPE_RESULTS: &str = "/api/scrape-results/";
pub const SHOPNDROP_CATEGORIES: &str = "/api/shopndrop-categories/";
pub const SCRAPE_SUPERMARKET: &str = "/api/scrape-supermarket/";

pub const SUPPLY_CHAIN: &str = "/api/supply-chain/";
pub const SUPPLY_CHAIN_DETAILS: &str = "/api/supply-chain-details/";
pub const SUPPLIER_DETAILS: &str = "/api/supplier-details/";
pub const ADD_SUPPLIER: &str = "/add-supplier/";
pub const EDIT_SUPPLIER: &str = "/edit-supplier/";

pub const ROUTES_PAGE: &str = "/static/Routes.html";
pub const ROUTE_AIRPORTS: &str = "/api/airports/";
pub const ROUTE_RECORDS: &str = "/api/route-records/";

/// Home page; source of the cached list sections.
pub const HOME_PAGE: &str = "/";

pub fn decode<T: DeserializeOwned>(path: &str, reply: HttpReply) -> Result<T> {
    match serde_json::from_str::<T>(&reply.body) {
        Ok(v) => Ok(v),
        Err(_) if !reply.is_success() => Err(ConsoleError::Status {
            status: reply.status,
            path: s!(path),
        }),
        Err(source) => Err(ConsoleError::Decode { path: s!(path), source }),
    }
}

pub fn get_json<T: DeserializeOwned>(backend: &dyn Backend, path: &str) -> Result<T> {
    let reply = backend.get(path)?;
    decode(path, reply)
}

pub fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
    backend: &dyn Backend,
    path: &str,
    body: &B,
) -> Result<T> {
    let payload = serde_json::to_string(body)?;
    let reply = backend.post_json(path, &payload)?;
    decode(path, reply)
}

/// Form-encoded POST; the reply is JSON like every other endpoint.
pub fn post_form<T: DeserializeOwned>(backend: &dyn Backend, path: &str, body: &str) -> Result<T> {
    let reply = backend.post_form(path, body)?;
    decode(path, reply)
}

/// Raw HTML of a fragment endpoint; non-2xx is an error.
pub fn fragment(backend: &dyn Backend, path: &str) -> Result<String> {
    backend.get_text(path)
}

/* ---------- geography ---------- */

pub fn regions(backend: &dyn Backend) -> Result<Vec<String>> {
    Ok(get_json::<RegionList>(backend, REGIONS)?.regions)
}

pub fn countries_by_region(backend: &dyn Backend, region: &str) -> Result<Vec<Country>> {
    let path = query!(COUNTRIES_BY_REGION, "region" => region);
    Ok(get_json::<CountryList>(backend, &path)?.countries)
}

pub fn airports_by_country(backend: &dyn Backend, country: &str) -> Result<Vec<Airport>> {
    let path = query!(AIRPORTS_BY_COUNTRY, "country" => country);
    Ok(get_json::<AirportList>(backend, &path)?.airports)
}

pub fn countries(backend: &dyn Backend) -> Result<Vec<Country>> {
    Ok(get_json::<CountryList>(backend, COUNTRIES)?.countries)
}

/// Countries that have a CountryInfo row (the market tabs' country pickers).
pub fn info_countries(backend: &dyn Backend) -> Result<Vec<Country>> {
    Ok(get_json::<CountryList>(backend, COUNTRIES_IN_COUNTRYINFO)?.countries)
}

/* ---------- management info ---------- */

pub fn check_region_info(backend: &dyn Backend, region: &str) -> Result<InfoCheck> {
    get_json(backend, &query!(CHECK_REGION_INFO, "region" => region))
}

pub fn check_country_info(backend: &dyn Backend, country: &str) -> Result<InfoCheck> {
    get_json(backend, &query!(CHECK_COUNTRY_INFO, "country" => country))
}

pub fn check_branch_info(backend: &dyn Backend, airport: &str) -> Result<InfoCheck> {
    get_json(backend, &query!(CHECK_BRANCH_INFO, "airport" => airport))
}

pub fn save_region_info(backend: &dyn Backend, info: &RegionInfo) -> Result<SaveReply> {
    post_json(backend, SAVE_REGION_INFO, info)
}

pub fn save_country_info(backend: &dyn Backend, info: &CountryInfo) -> Result<SaveReply> {
    post_json(backend, SAVE_COUNTRY_INFO, info)
}

pub fn save_branch_info(backend: &dyn Backend, info: &BranchInfo) -> Result<SaveReply> {
    post_json(backend, SAVE_BRANCH_INFO, info)
}

pub fn management_table(backend: &dyn Backend) -> Result<Vec<StructureRegion>> {
    Ok(get_json::<StructureTable>(backend, MANAGEMENT_TABLE)?.data)
}

/* ---------- products & prices ---------- */

/// All products, or (with `country`) the ones imported into that country.
pub fn products(backend: &dyn Backend, country: Option<&str>) -> Result<Vec<Product>> {
    let path = match country {
        Some(c) => query!(PRODUCTS, "country" => c),
        None => s!(PRODUCTS),
    };
    Ok(get_json::<ProductList>(backend, &path)?.products)
}

pub fn saved_prices(backend: &dyn Backend, country_code: &str) -> Result<SavedPrices> {
    get_json(backend, &query!(SAVED_PRICES, "country_code" => country_code))
}

pub fn save_prices(
    backend: &dyn Backend,
    updates: &[PriceUpdate],
    country_code: &str,
) -> Result<PriceSaveReply> {
    post_json(backend, SAVE_PRICES, &PriceUpdateBatch { updates, country_code })
}

pub fn exchange_rate(backend: &dyn Backend, from: &str, to: &str) -> Result<ExchangeRate> {
    get_json(backend, &query!(EXCHANGE_RATE, "from" => from, "to" => to))
}

/* ---------- market scraping ---------- */

pub fn available_supermarkets(backend: &dyn Backend, country: &str) -> Result<Vec<Supermarket>> {
    let path = query!(AVAILABLE_SUPERMARKETS, "country" => country);
    Ok(get_json::<SupermarketList>(backend, &path)?.supermarkets)
}

pub fn scrape_summary(backend: &dyn Backend) -> Result<ScrapeSummary> {
    get_json(backend, SCRAPE_SUMMARY)
}

pub fn shopndrop_categories(backend: &dyn Backend) -> Result<Vec<NavCategory>> {
    Ok(get_json::<NavCategoryList>(backend, SHOPNDROP_CATEGORIES)?.categories)
}

/// `None` when the server answered JSON `null`.
pub fn start_scrape(backend: &dyn Backend, req: &ScrapeRequest) -> Result<Option<ScrapeStarted>> {
    post_json(backend, SCRAPE_SUPERMARKET, req)
}

pub fn scrape_results_path(module_name: &str, category: &str) -> String {
    query!(SCRAPE_RESULTS, "module_name" => module_name, "category" => category)
}

pub fn scrape_results(backend: &dyn Backend, module_name: &str, category: &str) -> Result<ScrapeResults> {
    get_json(backend, &scrape_results_path(module_name, category))
}

/* ---------- supply chain ---------- */

pub fn supply_chain(backend: &dyn Backend) -> Result<Vec<SupplyChainRow>> {
    Ok(get_json::<SupplyChainList>(backend, SUPPLY_CHAIN)?.supply_chain)
}

pub fn supply_chain_details(backend: &dyn Backend, product_name: &str) -> Result<SupplyChainDetails> {
    get_json(backend, &query!(SUPPLY_CHAIN_DETAILS, "product_name" => product_name))
}

pub fn supplier_details(backend: &dyn Backend, product_name: &str, supplier_name: &str) -> Result<SupplierDetails> {
    let path = query!(SUPPLIER_DETAILS, "product_name" => product_name, "supplier_name" => supplier_name);
    let details: SupplierDetails = get_json(backend, &path)?;
    match details.error {
        Some(message) => Err(ConsoleError::Server(message)),
        None => Ok(details),
    }
}

/// Adds or updates depending on whether the form carries a supplier id.
pub fn save_supplier(backend: &dyn Backend, form: &SupplierForm) -> Result<SupplierReply> {
    let path = if form.is_edit() { EDIT_SUPPLIER } else { ADD_SUPPLIER };
    post_form(backend, path, &form.encode())
}

/* ---------- routes ---------- */

pub fn route_airports(backend: &dyn Backend) -> Result<Vec<RouteAirport>> {
    Ok(get_json::<RouteAirportList>(backend, ROUTE_AIRPORTS)?.airports)
}

pub fn route_records(backend: &dyn Backend, departure: &str, arrival: &str) -> Result<RouteRecords> {
    post_json(backend, ROUTE_RECORDS, &RouteQuery { departure, arrival })
}
