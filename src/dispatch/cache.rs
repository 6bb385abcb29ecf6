// src/dispatch/cache.rs
//
// Sections of the home page (airport and aircraft lists) kept parsed so the
// list tabs show instantly. Filled from `GET /`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api;
use crate::core::lock;
use crate::core::net::Backend;
use crate::dispatch::fragment::Fragment;
use crate::dispatch::kind::CachedSection;
use crate::error::Result;

#[derive(Clone, Default)]
pub struct PageCache {
    sections: Arc<Mutex<HashMap<CachedSection, Fragment>>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, section: CachedSection) -> Option<Fragment> {
        lock(&self.sections).get(&section).cloned()
    }

    pub fn is_loaded(&self, section: CachedSection) -> bool {
        lock(&self.sections).contains_key(&section)
    }

    /// Take every section present in `html`. Sections missing from the page
    /// keep their previous copy. Returns how many were found.
    pub fn ingest(&self, html: &str) -> usize {
        let mut found = 0;
        let mut sections = lock(&self.sections);
        for section in CachedSection::ALL {
            if let Some(frag) = Fragment::from_element_id(html, section.element_id()) {
                sections.insert(section, frag);
                found += 1;
            }
        }
        found
    }

    /// Blocking fetch of the home page.
    pub fn load(&self, backend: &dyn Backend) -> Result<usize> {
        let html = api::fragment(backend, api::HOME_PAGE)?;
        let found = self.ingest(&html);
        logf!("PageCache: {} section(s) from home page", found);
        Ok(found)
    }
}
