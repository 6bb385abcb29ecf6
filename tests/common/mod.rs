// tests/common/mod.rs
//
// Shared wiring: a TabManager over canned backend replies, no GUI.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use finsim_console::config::options::ConsoleOptions;
use finsim_console::core::net::{Backend, MemoryBackend};
use finsim_console::events::Repaint;
use finsim_console::storage::LocalStore;
use finsim_console::workspace::TabManager;

pub const HOME_PAGE: &str = r#"<html><body>
<div id="airport-list-container">
  <h2>Airports</h2>
  <button id="add-airport-btn">Add Airport</button>
  <button id="edit-airport-btn-airport">Edit Airport</button>
  <table>
    <tr><th></th><th>Name</th><th>City</th><th>Country</th><th>IATA</th></tr>
    <tr><td><input type="checkbox" value="17"></td><td>Reina Beatrix</td><td>Oranjestad</td><td>Aruba</td><td>AUA</td></tr>
    <tr><td><input type="checkbox" value="18"></td><td>Hato</td><td>Willemstad</td><td>Curacao</td><td>CUR</td></tr>
  </table>
</div>
<div id="aircraft-list-container">
  <h2>Aircraft</h2>
  <table>
    <tr><th></th><th>Registration</th><th>Type</th></tr>
    <tr><td><input type="checkbox" value="5"></td><td>P4-AAA</td><td>B737</td></tr>
  </table>
</div>
<script>document.querySelector('#add-airport-btn').onclick = () => {};</script>
</body></html>"#;

/// Options with instant polling so scrape tests never sleep.
pub fn fast_options() -> ConsoleOptions {
    let mut opts = ConsoleOptions::default();
    opts.poll.interval = Duration::ZERO;
    opts
}

pub struct Harness {
    pub tabs: TabManager,
    pub backend: Arc<MemoryBackend>,
    pub store: Arc<LocalStore>,
}

pub fn harness(backend: MemoryBackend) -> Harness {
    harness_with(backend, LocalStore::in_memory(), &fast_options())
}

pub fn harness_with(backend: MemoryBackend, store: LocalStore, opts: &ConsoleOptions) -> Harness {
    let backend = Arc::new(backend);
    let store = Arc::new(store);
    let shared: Arc<dyn Backend> = backend.clone();
    let tabs = TabManager::with_backend(shared, Arc::clone(&store), opts, Repaint::none());
    Harness { tabs, backend, store }
}
