// src/renderers/mod.rs
//
// Self-contained tab renderers. Each owns its fetch/submit lifecycle and
// keeps its state behind `Arc<Mutex<_>>` so worker threads can publish
// into it; the egui views read that state every frame.

pub mod market_analysis;
pub mod market_export;
pub mod market_import;
pub mod routes;
pub mod supply_chain;
pub mod user_management;

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::config::options::PollOptions;
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::content::ContentRegion;
use crate::dispatch::kind::RendererKind;
use crate::events::{EventSender, Repaint};
use crate::storage::LocalStore;

pub use market_analysis::MarketAnalysis;
pub use market_export::MarketExport;
pub use market_import::MarketImport;
pub use routes::Routes;
pub use user_management::UserManagement;

pub trait Renderer: Send {
    fn kind(&self) -> RendererKind;

    /// Take over `container` and (re)load whatever the tab needs.
    fn render_tab(&mut self, container: &ContentRegion);

    /// The renderer's tab was closed.
    fn on_close(&mut self) {}
}

/// What every renderer gets handed at construction.
#[derive(Clone)]
pub struct RenderEnv {
    pub backend: Arc<dyn Backend>,
    pub store: Arc<LocalStore>,
    pub events: EventSender,
    pub repaint: Repaint,
    pub poll: PollOptions,
    workers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl RenderEnv {
    pub fn new(
        backend: Arc<dyn Backend>,
        store: Arc<LocalStore>,
        events: EventSender,
        repaint: Repaint,
        poll: PollOptions,
    ) -> Self {
        Self { backend, store, events, repaint, poll, workers: Arc::default() }
    }

    /// Run `job` on a worker thread and repaint when it is done.
    pub fn spawn(&self, job: impl FnOnce(&dyn Backend) + Send + 'static) {
        let backend = Arc::clone(&self.backend);
        let repaint = self.repaint.clone();
        let handle = thread::spawn(move || {
            job(backend.as_ref());
            repaint.request();
        });
        let mut workers = lock(&self.workers);
        workers.retain(|h| !h.is_finished());
        workers.push(handle);
    }

    /// Join every worker, including ones started while waiting.
    pub fn wait_idle(&self) {
        loop {
            let batch: Vec<_> = lock(&self.workers).drain(..).collect();
            if batch.is_empty() {
                break;
            }
            for h in batch {
                if h.join().is_err() {
                    loge!("Renderer: worker panicked");
                }
            }
        }
    }
}

/// Tone of an inline status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: Tone,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self { tone: Tone::Info, text: text.into() }
    }
    pub fn success(text: impl Into<String>) -> Self {
        Self { tone: Tone::Success, text: text.into() }
    }
    pub fn error(text: impl Into<String>) -> Self {
        Self { tone: Tone::Error, text: text.into() }
    }
}

pub struct Renderers {
    pub market_analysis: MarketAnalysis,
    pub import: MarketImport,
    pub export: MarketExport,
    pub routes: Routes,
    pub users: UserManagement,
}

impl Renderers {
    /// Join outstanding renderer workers (they share one pool).
    pub fn wait_idle(&self) {
        self.users.env().wait_idle();
    }

    pub fn new(env: RenderEnv) -> Self {
        Self {
            market_analysis: MarketAnalysis::new(env.clone()),
            import: MarketImport::new(env.clone()),
            export: MarketExport::new(env.clone()),
            routes: Routes::new(env.clone()),
            users: UserManagement::new(env),
        }
    }

    pub fn get_mut(&mut self, kind: RendererKind) -> &mut dyn Renderer {
        match kind {
            RendererKind::MarketAnalysis => &mut self.market_analysis,
            RendererKind::Import => &mut self.import,
            RendererKind::Export => &mut self.export,
            RendererKind::Routes => &mut self.routes,
            RendererKind::UserManagement => &mut self.users,
        }
    }
}
