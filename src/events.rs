// src/events.rs
//
// Cross-cutting requests from renderers and forms back to the tab manager,
// plus the repaint hook workers call after publishing state.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::workspace::TabOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// Open (or focus) a tab in the current workspace.
    OpenTab { name: String, options: TabOptions },
    /// An airport was added or edited; refresh the cached list.
    RefreshAirportList,
}

impl ConsoleEvent {
    pub fn open(name: impl Into<String>) -> Self {
        ConsoleEvent::OpenTab { name: name.into(), options: TabOptions::default() }
    }

    /// Map the `openTab` detail forms send ("add_airport") to an event.
    pub fn from_open_tab_detail(detail: &str) -> Option<Self> {
        match detail.trim() {
            "add_airport" => Some(Self::open("Add Airport")),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EventSender(Sender<ConsoleEvent>);

impl EventSender {
    /// Fire and forget. A dropped receiver means the console is shutting down.
    pub fn send(&self, ev: ConsoleEvent) {
        if self.0.send(ev).is_err() {
            logd!("Events: receiver gone, event dropped");
        }
    }
}

pub fn channel() -> (EventSender, Receiver<ConsoleEvent>) {
    let (tx, rx) = mpsc::channel();
    (EventSender(tx), rx)
}

/// Wakes the UI after a worker thread publishes. Headless callers use
/// `Repaint::none()`.
#[derive(Clone, Default)]
pub struct Repaint(Option<Arc<dyn Fn() + Send + Sync>>);

impl Repaint {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(f)))
    }

    pub fn from_ctx(ctx: &eframe::egui::Context) -> Self {
        let ctx = ctx.clone();
        Self::new(move || ctx.request_repaint())
    }

    pub fn request(&self) {
        if let Some(f) = &self.0 {
            f();
        }
    }
}

impl std::fmt::Debug for Repaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0.is_some() { "Repaint(ctx)" } else { "Repaint(none)" })
    }
}
