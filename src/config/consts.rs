// src/config/consts.rs

// Net config
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const USER_AGENT: &str = "finsim_console/0.3";

// Env overrides
pub const BASE_URL_ENV: &str = "FINSIM_BASE_URL";
pub const STORE_DIR_ENV: &str = "FINSIM_STORE_DIR";
pub const POLL_ATTEMPTS_ENV: &str = "FINSIM_POLL_ATTEMPTS";
pub const POLL_INTERVAL_ENV: &str = "FINSIM_POLL_INTERVAL_MS";
pub const LOG_ENV: &str = "FINSIM_LOG";

// Local store
pub const STORE_DIR: &str = ".store";
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";
pub const LOG_FILE: &str = "debug.log";

// Scrape polling: ~2 minutes
pub const POLL_ATTEMPTS: u32 = 40;
pub const POLL_INTERVAL_MS: u64 = 3_000;

// Content
pub const WELCOME_HEADING: &str = "Welcome to the Financial Simulator";
pub const WELCOME_BODY: &str =
    "This is your home page. The UI uses a dark, cold color palette inspired by VS Code.";
pub const LOADING_TEXT: &str = "Loading...";

/// Marker class wrapping the useful part of every fragment endpoint.
pub const FRAGMENT_MARKER: &str = "tab-content-inner";

// Sidebar
pub const ADMIN_LABEL: &str = "Administrator";
pub const USER_LABEL: &str = "User";
