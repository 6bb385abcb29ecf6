// src/renderers/market_analysis.rs
//
// Administrator › Market Analysis: pick a country and a supermarket
// scraper, choose a category (or type a term), start a background scrape
// and poll for its CSV results.

use std::sync::{Arc, Mutex};
use std::thread;

use crate::api::{
    self,
    types::{Country, NavCategory, ScrapeRecord, ScrapeRequest, ScrapeResults, ScrapeSummary, Supermarket},
};
use crate::config::options::PollOptions;
use crate::core::lock;
use crate::core::net::Backend;
use crate::core::sanitize::{display_domain, slugify, trailing_paren};
use crate::dispatch::content::{Content, ContentRegion};
use crate::dispatch::kind::RendererKind;
use crate::progress::Progress;

use super::{RenderEnv, Renderer, StatusLine};

pub const CATEGORIES: [&str; 10] = [
    "search new", "beef", "pork", "chicken", "lamb", "fruits", "vegetables", "dairy", "cheese", "nuts",
];
pub const SEARCH_NEW: &str = "search new";

/// Scraper whose categories come from the shop's navigation bar.
pub const SHOPNDROP_MODULE: &str = "sxm_shopndrop";

pub const NOT_AVAILABLE: &str = "retail price finder not available";
pub const MISSING_INPUT: &str = "Please select a country, supermarket, and enter a value.";
pub const NO_RESULTS_YET: &str = "No results available yet. Please try again later.";

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisState {
    pub countries: Vec<Country>,
    pub country: String,
    pub supermarkets: Vec<Supermarket>,
    /// Module name of the selected scraper.
    pub supermarket: String,
    pub category: String,
    pub subcategory: String,
    /// Free text, used while `category` is "search new".
    pub value: String,
    pub nav_categories: Option<Vec<NavCategory>>,
    pub summary: ScrapeSummary,
    pub records: Vec<ScrapeRecord>,
    pub meta: String,
    pub status: Option<StatusLine>,
    /// Confirmation text waiting for a yes/no before a scrape starts.
    pub pending_confirm: Option<String>,
    /// Bumped by every new search (and by re-rendering the tab); a poll
    /// loop stops once its generation is no longer current.
    pub search_gen: u64,
    render_gen: u64,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            country: s!(),
            supermarkets: Vec::new(),
            supermarket: s!(),
            category: s!(SEARCH_NEW),
            subcategory: s!(),
            value: s!(),
            nav_categories: None,
            summary: ScrapeSummary::default(),
            records: Vec::new(),
            meta: s!(),
            status: None,
            pending_confirm: None,
            search_gen: 0,
            render_gen: 0,
        }
    }
}

impl AnalysisState {
    pub fn supermarket_label(&self) -> &'static str {
        if self.country.is_empty() || self.supermarkets.is_empty() {
            NOT_AVAILABLE
        } else {
            "Supermarket"
        }
    }

    /// "Display Name (domain)" when the scraper has a url.
    pub fn supermarket_option_label(s: &Supermarket) -> String {
        if s.url.is_empty() {
            s.display_name.clone()
        } else {
            format!("{} ({})", s.display_name, display_domain(&s.url))
        }
    }

    pub fn selected_supermarket(&self) -> Option<&Supermarket> {
        self.supermarkets.iter().find(|s| s.module_name == self.supermarket)
    }

    /// Domain shown in the selected supermarket's label, if any.
    pub fn selected_domain(&self) -> Option<String> {
        let label = Self::supermarket_option_label(self.selected_supermarket()?);
        trailing_paren(&label).map(String::from)
    }

    pub fn is_shopndrop(&self) -> bool {
        self.supermarket == SHOPNDROP_MODULE
    }

    /// Top-level navbar categories, sorted case-insensitively.
    pub fn nav_tops(&self) -> Vec<String> {
        let mut tops: Vec<String> = self
            .nav_categories
            .iter()
            .flatten()
            .filter(|c| !c.top.is_empty())
            .map(|c| c.top.clone())
            .collect();
        tops.sort_by_key(|t| t.to_lowercase());
        tops
    }

    pub fn category_options(&self) -> Vec<String> {
        if self.is_shopndrop() {
            self.nav_tops()
        } else {
            CATEGORIES.iter().map(|c| s!(*c)).collect()
        }
    }

    pub fn subcategory_options(&self) -> Vec<String> {
        if !self.is_shopndrop() {
            return Vec::new();
        }
        self.nav_categories
            .iter()
            .flatten()
            .find(|c| c.top == self.category)
            .map(|c| c.subcategories.clone())
            .unwrap_or_default()
    }

    pub fn value_editable(&self) -> bool {
        !self.is_shopndrop() && self.category == SEARCH_NEW
    }

    /// What gets sent as the scrape query.
    pub fn query(&self) -> String {
        if self.is_shopndrop() {
            if self.category.is_empty() || self.subcategory.is_empty() {
                s!()
            } else {
                format!("{} / {}", self.category, self.subcategory)
            }
        } else if self.category == SEARCH_NEW {
            s!(self.value.trim())
        } else {
            self.category.clone()
        }
    }

    /// Categories with raw data on the server for the selected supermarket.
    pub fn raw_data_categories(&self) -> Vec<String> {
        self.selected_domain()
            .and_then(|d| self.summary.summary.get(&d).cloned())
            .unwrap_or_default()
    }

    fn reset_categories(&mut self) {
        if self.is_shopndrop() {
            self.category = self.nav_tops().into_iter().next().unwrap_or_default();
            self.subcategory = self.subcategory_options().into_iter().next().unwrap_or_default();
        } else {
            self.category = s!(SEARCH_NEW);
            self.subcategory.clear();
        }
        self.value.clear();
    }
}

pub fn overwrite_warning(query: &str) -> String {
    format!(
        "Warning: Raw data for category \"{query}\" already exists for this supermarket. \
         If you continue, all values will be replaced with the new search.\n\nDo you want to continue?"
    )
}

/* ---------- polling ---------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Ready(ScrapeResults),
    /// The server reported an error for this module/category.
    Failed(String),
    GaveUp,
    /// Transport or decode failure.
    Error,
    Cancelled,
}

impl PollOutcome {
    pub fn message(&self) -> &str {
        match self {
            PollOutcome::Ready(_) => "Search completed.",
            PollOutcome::Failed(e) => e,
            PollOutcome::GaveUp => NO_RESULTS_YET,
            PollOutcome::Error => "Error loading scrape results.",
            PollOutcome::Cancelled => "Search cancelled.",
        }
    }
}

/// Fetch results until records show up. One first fetch plus up to
/// `poll.attempts` retries, `poll.interval` apart. `keep_going` is checked
/// before every fetch.
pub fn poll_scrape_results(
    backend: &dyn Backend,
    module_name: &str,
    category: &str,
    poll: PollOptions,
    progress: &mut dyn Progress,
    keep_going: &dyn Fn() -> bool,
) -> PollOutcome {
    progress.begin(poll.attempts as usize + 1);
    let mut attempts_left = poll.attempts;
    let mut done = 0;

    let outcome = loop {
        if !keep_going() {
            break PollOutcome::Cancelled;
        }
        let res = api::scrape_results(backend, module_name, category);
        done += 1;
        progress.step(done);

        match res {
            Err(e) => {
                loge!("Scrape: poll {} / {} failed: {}", module_name, category, e);
                break PollOutcome::Error;
            }
            Ok(r) => {
                if let Some(err) = r.error {
                    logw!("Scrape: server error for {} / {}: {}", module_name, category, err);
                    break PollOutcome::Failed(err);
                }
                if !r.records.is_empty() {
                    logf!("Scrape: {} record(s) for {} / {}", r.records.len(), module_name, category);
                    break PollOutcome::Ready(r);
                }
                if attempts_left == 0 {
                    break PollOutcome::GaveUp;
                }
                progress.log(&format!("Waiting for scrape to finish ({attempts_left})..."));
                attempts_left -= 1;
                thread::sleep(poll.interval);
            }
        }
    };

    progress.finish();
    outcome
}

/// Writes poll progress into the tab while the search is still current.
struct SearchProgress<'a> {
    state: &'a Mutex<AnalysisState>,
    generation: u64,
}

impl Progress for SearchProgress<'_> {
    fn log(&mut self, msg: &str) {
        let mut st = lock(self.state);
        if st.search_gen == self.generation {
            st.status = Some(StatusLine::info(msg));
        }
    }
}

/* ---------- blocking loaders (run on workers) ---------- */

pub fn load_countries(backend: &dyn Backend, state: &Mutex<AnalysisState>, render_gen: u64) {
    let res = api::info_countries(backend);
    let mut st = lock(state);
    if st.render_gen != render_gen {
        return;
    }
    match res {
        Ok(countries) => st.countries = countries,
        Err(e) => loge!("MarketAnalysis: countries failed: {}", e),
    }
}

pub fn load_supermarkets(backend: &dyn Backend, state: &Mutex<AnalysisState>, country: &str) {
    let res = api::available_supermarkets(backend, country);
    let mut st = lock(state);
    if st.country != country {
        return;
    }
    st.supermarkets = res.unwrap_or_else(|e| {
        loge!("MarketAnalysis: supermarkets for {} failed: {}", country, e);
        Vec::new()
    });
}

pub fn load_summary(backend: &dyn Backend, state: &Mutex<AnalysisState>) {
    match api::scrape_summary(backend) {
        Ok(summary) => lock(state).summary = summary,
        Err(e) => logw!("MarketAnalysis: scrape summary failed: {}", e),
    }
}

pub fn load_nav_categories(backend: &dyn Backend, state: &Mutex<AnalysisState>) {
    let cats = api::shopndrop_categories(backend).unwrap_or_else(|e| {
        loge!("MarketAnalysis: navbar categories failed: {}", e);
        Vec::new()
    });
    let mut st = lock(state);
    st.nav_categories = Some(cats);
    if st.is_shopndrop() {
        st.reset_categories();
    }
}

/// Show the stored CSV for a category listed under "Raw data".
pub fn load_raw_data(
    backend: &dyn Backend,
    state: &Mutex<AnalysisState>,
    generation: u64,
    module_name: &str,
    domain: &str,
    category: &str,
) {
    let res = api::scrape_results(backend, module_name, category);
    let mut st = lock(state);
    if st.search_gen != generation {
        return;
    }
    match res {
        Err(e) => {
            loge!("MarketAnalysis: raw data {} / {} failed: {}", module_name, category, e);
            st.status = Some(StatusLine::error("Error loading raw data."));
        }
        Ok(r) if r.error.is_some() => {
            st.status = Some(StatusLine::error("No raw data found for this category."));
        }
        Ok(r) => {
            st.meta = r.meta_line(category, domain);
            if r.records.is_empty() {
                st.status = Some(StatusLine::error("No records to display."));
            } else {
                st.records = r.records;
            }
        }
    }
}

/// POST the scrape, then poll for its results.
pub fn run_search(
    backend: &dyn Backend,
    state: &Mutex<AnalysisState>,
    generation: u64,
    req: &ScrapeRequest,
    domain: &str,
    poll: PollOptions,
) -> PollOutcome {
    let set_status = |line: StatusLine| {
        let mut st = lock(state);
        if st.search_gen == generation {
            st.status = Some(line);
        }
    };

    let started = match api::start_scrape(backend, req) {
        Err(e) => {
            loge!("MarketAnalysis: scrape request failed: {}", e);
            set_status(StatusLine::error("Error running scraper."));
            return PollOutcome::Error;
        }
        Ok(None) => {
            set_status(StatusLine::error("Search failed."));
            return PollOutcome::Failed(s!("Search failed."));
        }
        Ok(Some(s)) => s,
    };
    if let Some(err) = started.error {
        set_status(StatusLine::error(err.clone()));
        return PollOutcome::Failed(err);
    }

    let category = started.category.unwrap_or_else(|| slugify(&req.query));
    logf!("MarketAnalysis: scrape scheduled {} / {:?} → {}", req.module_name, req.query, category);
    set_status(StatusLine::info("Scrape running in background, waiting for results..."));

    let mut progress = SearchProgress { state, generation };
    let keep_going = || lock(state).search_gen == generation;
    let outcome = poll_scrape_results(backend, &req.module_name, &category, poll, &mut progress, &keep_going);

    match &outcome {
        PollOutcome::Cancelled => {}
        PollOutcome::Ready(r) => {
            {
                let mut st = lock(state);
                if st.search_gen != generation {
                    return PollOutcome::Cancelled;
                }
                st.records = r.records.clone();
                st.meta = r.meta_line(&category, domain);
            }
            load_summary(backend, state);
            set_status(StatusLine::success(outcome.message()));
        }
        other => set_status(StatusLine::error(other.message())),
    }
    outcome
}

/* ---------- renderer ---------- */

pub struct MarketAnalysis {
    env: RenderEnv,
    state: Arc<Mutex<AnalysisState>>,
}

impl MarketAnalysis {
    pub fn new(env: RenderEnv) -> Self {
        Self { env, state: Arc::default() }
    }

    pub fn state(&self) -> Arc<Mutex<AnalysisState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> AnalysisState {
        lock(&self.state).clone()
    }

    pub fn select_country(&self, code: &str) {
        {
            let mut st = lock(&self.state);
            st.country = s!(code);
            st.supermarkets.clear();
            st.supermarket.clear();
            st.reset_categories();
        }
        if code.is_empty() {
            return;
        }
        let state = self.state();
        let code = s!(code);
        self.env.spawn(move |b| load_supermarkets(b, &state, &code));
    }

    pub fn select_supermarket(&self, module_name: &str) {
        let need_nav = {
            let mut st = lock(&self.state);
            st.supermarket = s!(module_name);
            st.reset_categories();
            st.is_shopndrop() && st.nav_categories.is_none()
        };

        let state = self.state();
        self.env.spawn(move |b| {
            if need_nav {
                load_nav_categories(b, &state);
            }
            load_summary(b, &state);
        });
    }

    pub fn select_category(&self, category: &str) {
        let mut st = lock(&self.state);
        st.category = s!(category);
        st.subcategory = st.subcategory_options().into_iter().next().unwrap_or_default();
        if st.category != SEARCH_NEW {
            st.value.clear();
        }
    }

    pub fn select_subcategory(&self, sub: &str) {
        lock(&self.state).subcategory = s!(sub);
    }

    pub fn set_value(&self, value: &str) {
        let mut st = lock(&self.state);
        if st.value_editable() {
            st.value = s!(value);
        }
    }

    /// Validate, maybe ask before overwriting existing raw data, then start.
    pub fn search(&self) {
        let mut st = lock(&self.state);
        let query = st.query();
        if st.country.is_empty() || st.supermarket.is_empty() || query.is_empty() {
            st.status = Some(StatusLine::error(MISSING_INPUT));
            return;
        }
        let exists = st
            .raw_data_categories()
            .iter()
            .any(|c| c.to_lowercase() == query.to_lowercase());
        if exists {
            st.pending_confirm = Some(overwrite_warning(&query));
            return;
        }
        drop(st);
        self.start_search();
    }

    /// Answer to the overwrite confirmation.
    pub fn confirm_search(&self, proceed: bool) {
        {
            let mut st = lock(&self.state);
            if st.pending_confirm.take().is_none() {
                return;
            }
            if !proceed {
                st.status = Some(StatusLine::error("Search cancelled."));
                return;
            }
        }
        self.start_search();
    }

    fn start_search(&self) {
        let (generation, req, domain) = {
            let mut st = lock(&self.state);
            st.search_gen += 1;
            st.records.clear();
            st.meta.clear();
            st.status = Some(StatusLine::info("Starting scrape..."));
            let req = ScrapeRequest {
                country_code: st.country.clone(),
                module_name: st.supermarket.clone(),
                query: st.query(),
            };
            (st.search_gen, req, st.selected_domain().unwrap_or_default())
        };

        let state = self.state();
        let poll = self.env.poll;
        self.env.spawn(move |b| {
            run_search(b, &state, generation, &req, &domain, poll);
        });
    }

    /// Click on a category under "Raw data from <domain> for:".
    pub fn open_raw_data(&self, category: &str) {
        let (generation, module, domain) = {
            let mut st = lock(&self.state);
            if st.supermarket.is_empty() {
                return;
            }
            st.search_gen += 1;
            st.records.clear();
            st.meta.clear();
            st.status = None;
            (st.search_gen, st.supermarket.clone(), st.selected_domain().unwrap_or_default())
        };

        let state = self.state();
        let category = s!(category);
        self.env.spawn(move |b| load_raw_data(b, &state, generation, &module, &domain, &category));
    }
}

impl Renderer for MarketAnalysis {
    fn kind(&self) -> RendererKind {
        RendererKind::MarketAnalysis
    }

    fn render_tab(&mut self, container: &ContentRegion) {
        let render_gen = {
            let mut st = lock(&self.state);
            let next = AnalysisState {
                search_gen: st.search_gen + 1,
                render_gen: st.render_gen + 1,
                nav_categories: st.nav_categories.take(),
                ..AnalysisState::default()
            };
            *st = next;
            st.render_gen
        };
        container.show(Content::Renderer(self.kind()));

        let state = self.state();
        self.env.spawn(move |b| {
            load_countries(b, &state, render_gen);
            load_summary(b, &state);
        });
    }

    /// Stops any running poll; its results have nowhere to go.
    fn on_close(&mut self) {
        lock(&self.state).search_gen += 1;
    }
}
