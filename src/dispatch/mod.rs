// src/dispatch/mod.rs
//
// Turns an activated tab into content: a cached home-page section, a
// fetched fragment, a renderer module, or the placeholder panel.
// Fetches run on worker threads and publish through the content region.

pub mod actions;
pub mod cache;
pub mod content;
pub mod fragment;
pub mod kind;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::api;
use crate::core::net::Backend;
use crate::renderers::Renderers;
use crate::workspace::TabHandle;

use cache::PageCache;
use content::{Content, ContentRegion, Ticket};
use fragment::Fragment;
use kind::{CachedSection, FragmentRoute, RenderAction};

pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    region: ContentRegion,
    cache: PageCache,
    renderers: Renderers,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, region: ContentRegion, renderers: Renderers) -> Self {
        Self {
            backend,
            region,
            cache: PageCache::new(),
            renderers,
            workers: Vec::new(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn region(&self) -> &ContentRegion {
        &self.region
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn renderers(&self) -> &Renderers {
        &self.renderers
    }

    pub fn renderers_mut(&mut self) -> &mut Renderers {
        &mut self.renderers
    }

    pub fn show_welcome(&self) {
        self.region.show(Content::Welcome);
    }

    /// Render `tab` into the content region. Never fails; problems end up
    /// as an inline panel.
    pub fn render(&mut self, tab: &TabHandle) {
        let action = tab.kind.action();
        logd!("Dispatch: {} {:?} → {:?}", tab.id, tab.name, action);

        match action {
            RenderAction::Placeholder => {
                self.region.show(Content::Placeholder { title: tab.name.clone() });
            }
            RenderAction::Cached(section) => self.render_cached(&tab.name, section),
            RenderAction::Fetch(route) => self.render_fetch(&tab.name, route),
            RenderAction::Delegate(kind) => {
                self.renderers.get_mut(kind).render_tab(&self.region);
            }
        }
    }

    fn render_cached(&mut self, title: &str, section: CachedSection) {
        if let Some(fragment) = self.cache.section(section) {
            self.region.show(Content::Fragment { title: s!(title), fragment });
            return;
        }

        // Home page not loaded yet: fetch it once, then show the section.
        let ticket = self.region.show(Content::Loading { title: s!(title) });
        let backend = Arc::clone(&self.backend);
        let cache = self.cache.clone();
        let region = self.region.clone();
        let title = s!(title);

        self.spawn(move || {
            if let Err(e) = cache.load(backend.as_ref()) {
                loge!("Dispatch: home page load failed: {}", e);
            }
            let content = match cache.section(section) {
                Some(fragment) => Content::Fragment { title, fragment },
                None => Content::Unavailable {
                    message: format!("{} could not be loaded.", section.title()),
                    title,
                },
            };
            region.complete(ticket, content);
        });
    }

    fn render_fetch(&mut self, title: &str, route: FragmentRoute) {
        let ticket = self.region.show(Content::Loading { title: s!(title) });
        let backend = Arc::clone(&self.backend);
        let region = self.region.clone();
        let title = s!(title);

        self.spawn(move || {
            let content = match api::fragment(backend.as_ref(), &route.path) {
                Ok(html) => {
                    let fragment = Fragment::extract(&html, Some(route.marker));
                    if fragment.scripts_dropped > 0 {
                        logd!("Dispatch: {} dropped {} script(s)", route.path, fragment.scripts_dropped);
                    }
                    Content::Fragment { title, fragment }
                }
                Err(e) => {
                    loge!("Dispatch: {} failed: {}", route.path, e);
                    Content::Unavailable { title: route.title, message: s!(route.failure) }
                }
            };
            region.complete(ticket, content);
        });
    }

    /// Re-read the home page into the cache. With `follow`, the refreshed
    /// airport list replaces what is on screen unless the user moved on.
    pub fn refresh_cache(&mut self, follow: Option<(Ticket, String)>) {
        let backend = Arc::clone(&self.backend);
        let cache = self.cache.clone();
        let region = self.region.clone();

        self.spawn(move || {
            if let Err(e) = cache.load(backend.as_ref()) {
                loge!("Dispatch: airport list refresh failed: {}", e);
                return;
            }
            if let Some((ticket, title)) = follow {
                if let Some(fragment) = cache.section(CachedSection::AirportList) {
                    region.complete(ticket, Content::Fragment { title, fragment });
                }
            }
        });
    }

    /// Warm the page cache in the background.
    pub fn preload(&mut self) {
        self.refresh_cache(None);
    }

    fn spawn(&mut self, job: impl FnOnce() + Send + 'static) {
        self.workers.retain(|h| !h.is_finished());
        self.workers.push(thread::spawn(job));
    }

    /// Block until every worker started so far has finished.
    pub fn wait_idle(&mut self) {
        for h in self.workers.drain(..) {
            if h.join().is_err() {
                loge!("Dispatch: worker panicked");
            }
        }
    }

    pub fn busy(&self) -> bool {
        self.workers.iter().any(|h| !h.is_finished())
    }
}
