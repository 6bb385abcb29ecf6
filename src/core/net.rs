// src/core/net.rs
//
// Backend seam. The GUI and CLI talk to `HttpBackend` (ureq); tests and
// offline runs use `MemoryBackend` with canned replies.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use crate::config::options::NetOptions;
use crate::core::lock;
use crate::error::{ConsoleError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a 2xx reply, or a `Status` error.
    pub fn into_text(self, path: &str) -> Result<String> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ConsoleError::Status { status: self.status, path: s!(path) })
        }
    }
}

/// Everything the console needs from the server. Paths are absolute
/// (`/api/regions/`), query string included.
pub trait Backend: Send + Sync {
    fn get(&self, path: &str) -> Result<HttpReply>;
    fn post_json(&self, path: &str, body: &str) -> Result<HttpReply>;
    /// POST an already urlencoded form body (the supplier endpoints).
    fn post_form(&self, path: &str, body: &str) -> Result<HttpReply>;

    /// GET and demand a 2xx.
    fn get_text(&self, path: &str) -> Result<String> {
        self.get(path)?.into_text(path)
    }
}

/* ---------- ureq ---------- */

pub struct HttpBackend {
    agent: Agent,
    net: NetOptions,
}

impl HttpBackend {
    pub fn new(net: NetOptions) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        // No global timeout: a hung request keeps its tab on "Loading...".
        let agent: Agent = Agent::config_builder()
            .tls_config(tls_config)
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, net }
    }

    pub fn base_url(&self) -> &str {
        self.net.base_url()
    }

    fn finish(path: &str, res: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>) -> Result<HttpReply> {
        let resp = res.map_err(|source| ConsoleError::Transport { path: s!(path), source })?;
        let status = resp.status().as_u16();
        let body = resp
            .into_body()
            .read_to_string()
            .map_err(|source| ConsoleError::Transport { path: s!(path), source })?;
        logd!("Net: {} ← {} ({} bytes)", path, status, body.len());
        Ok(HttpReply { status, body })
    }
}

impl Backend for HttpBackend {
    fn get(&self, path: &str) -> Result<HttpReply> {
        let url = self.net.url_for(path);
        logd!("Net: GET {}", url);
        let res = self
            .agent
            .get(&url)
            .header("User-Agent", &self.net.user_agent)
            .call();
        Self::finish(path, res)
    }

    fn post_json(&self, path: &str, body: &str) -> Result<HttpReply> {
        let url = self.net.url_for(path);
        logd!("Net: POST {} ({} bytes)", url, body.len());
        let res = self
            .agent
            .post(&url)
            .header("User-Agent", &self.net.user_agent)
            .header("Content-Type", "application/json")
            .send(body);
        Self::finish(path, res)
    }

    fn post_form(&self, path: &str, body: &str) -> Result<HttpReply> {
        let url = self.net.url_for(path);
        logd!("Net: POST form {} ({} bytes)", url, body.len());
        let res = self
            .agent
            .post(&url)
            .header("User-Agent", &self.net.user_agent)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-Requested-With", "XMLHttpRequest")
            .send(body);
        Self::finish(path, res)
    }
}

/* ---------- in-memory ---------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
}

/// Canned replies keyed by (method, path). A route holding several replies
/// hands them out in order and then keeps repeating the last one.
#[derive(Default)]
pub struct MemoryBackend {
    routes: Mutex<HashMap<(Method, String), VecDeque<HttpReply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, reply: HttpReply) -> Self {
        self.push(Method::Get, path, reply);
        self
    }

    pub fn on_post(self, path: &str, reply: HttpReply) -> Self {
        self.push(Method::Post, path, reply);
        self
    }

    pub fn push(&self, method: Method, path: &str, reply: HttpReply) {
        lock(&self.routes)
            .entry((method, s!(path)))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.path == path).count()
    }

    fn answer(&self, method: Method, path: &str, body: Option<&str>) -> Result<HttpReply> {
        lock(&self.calls).push(RecordedCall {
            method,
            path: s!(path),
            body: body.map(String::from),
        });

        let mut routes = lock(&self.routes);
        let queue = routes
            .get_mut(&(method, s!(path)))
            .ok_or_else(|| ConsoleError::NoRoute(s!(path)))?;
        let reply = if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() };
        reply.ok_or_else(|| ConsoleError::NoRoute(s!(path)))
    }
}

impl Backend for MemoryBackend {
    fn get(&self, path: &str) -> Result<HttpReply> {
        self.answer(Method::Get, path, None)
    }

    fn post_json(&self, path: &str, body: &str) -> Result<HttpReply> {
        self.answer(Method::Post, path, Some(body))
    }

    fn post_form(&self, path: &str, body: &str) -> Result<HttpReply> {
        self.answer(Method::Post, path, Some(body))
    }
}
