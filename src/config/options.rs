// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleOptions {
    pub net: NetOptions,
    pub poll: PollOptions,
    pub store_dir: PathBuf,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            net: NetOptions::default(),
            poll: PollOptions::default(),
            store_dir: PathBuf::from(STORE_DIR),
        }
    }
}

impl ConsoleOptions {
    /// Defaults, then `FINSIM_*` environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` but with an injectable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(url) = get(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            opts.net.set_base_url(&url);
        }
        if let Some(dir) = get(STORE_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            opts.store_dir = PathBuf::from(dir.trim());
        }
        if let Some(n) = get(POLL_ATTEMPTS_ENV).and_then(|v| v.trim().parse().ok()) {
            opts.poll.attempts = n;
        }
        if let Some(ms) = get(POLL_INTERVAL_ENV).and_then(|v| v.trim().parse().ok()) {
            opts.poll.interval = Duration::from_millis(ms);
        }
        opts
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    base_url: String,
    pub user_agent: String,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            base_url: s!(DEFAULT_BASE_URL),
            user_agent: s!(USER_AGENT),
        }
    }
}

impl NetOptions {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stored without a trailing slash; endpoint paths bring their own.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = s!(url.trim().trim_end_matches('/'));
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            join!(&self.base_url, path)
        } else {
            join!(&self.base_url, "/", path)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOptions {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            attempts: POLL_ATTEMPTS,
            interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}
