// src/dispatch/content.rs
//
// The single content area every tab renders into. Each write takes a
// ticket; a worker finishing after the user moved on holds a stale ticket
// and its result is dropped.

use std::sync::{Arc, Mutex};

use crate::config::consts::{WELCOME_BODY, WELCOME_HEADING};
use crate::core::lock;
use crate::dispatch::fragment::Fragment;
use crate::dispatch::kind::RendererKind;
use crate::events::Repaint;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Welcome,
    Loading { title: String },
    Placeholder { title: String },
    Fragment { title: String, fragment: Fragment },
    Unavailable { title: String, message: String },
    Renderer(RendererKind),
}

impl Content {
    pub fn placeholder_text(title: &str) -> String {
        format!("Content for {title}.")
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Content::Welcome => Some(WELCOME_HEADING),
            Content::Loading { title }
            | Content::Placeholder { title }
            | Content::Fragment { title, .. }
            | Content::Unavailable { title, .. } => Some(title),
            Content::Renderer(kind) => Some(kind.tab_name()),
        }
    }

    /// Body text for the simple panels (welcome, placeholder, failure).
    pub fn message(&self) -> Option<String> {
        match self {
            Content::Welcome => Some(s!(WELCOME_BODY)),
            Content::Placeholder { title } => Some(Self::placeholder_text(title)),
            Content::Unavailable { message, .. } => Some(message.clone()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Content::Loading { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
struct RegionState {
    generation: u64,
    content: Content,
}

#[derive(Clone, Debug)]
pub struct ContentRegion {
    state: Arc<Mutex<RegionState>>,
    repaint: Repaint,
}

impl ContentRegion {
    pub fn new(repaint: Repaint) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegionState { generation: 0, content: Content::Welcome })),
            repaint,
        }
    }

    /// Replace the content now; earlier tickets become stale.
    pub fn show(&self, content: Content) -> Ticket {
        let ticket = {
            let mut st = lock(&self.state);
            st.generation += 1;
            st.content = content;
            Ticket(st.generation)
        };
        self.repaint.request();
        ticket
    }

    /// Publish a worker result. Returns false (and changes nothing) when a
    /// later `show` superseded the ticket.
    pub fn complete(&self, ticket: Ticket, content: Content) -> bool {
        {
            let mut st = lock(&self.state);
            if st.generation != ticket.0 {
                logd!("Content: drop stale result (ticket {} < {})", ticket.0, st.generation);
                return false;
            }
            st.content = content;
        }
        self.repaint.request();
        true
    }

    /// Ticket for whatever is on screen, without replacing it.
    pub fn current_ticket(&self) -> Ticket {
        Ticket(lock(&self.state).generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        lock(&self.state).generation == ticket.0
    }

    pub fn generation(&self) -> u64 {
        lock(&self.state).generation
    }

    pub fn content(&self) -> Content {
        lock(&self.state).content.clone()
    }

    pub fn with_content<R>(&self, f: impl FnOnce(&Content) -> R) -> R {
        f(&lock(&self.state).content)
    }

    pub fn repaint(&self) -> &Repaint {
        &self.repaint
    }
}
