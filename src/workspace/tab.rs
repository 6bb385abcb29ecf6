// src/workspace/tab.rs

use std::fmt;

use crate::dispatch::kind::TabKind;

/// Handle id, unique across every workspace of a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TabOptions {
    pub non_closable: bool,
    /// Product being edited ("Edit <name>" tabs from the Export list).
    pub product_code: Option<String>,
    /// Backend record id (airport or aircraft being edited).
    pub record_id: Option<String>,
}

impl TabOptions {
    pub fn home() -> Self {
        Self { non_closable: true, ..Self::default() }
    }

    pub fn product(code: impl Into<String>) -> Self {
        Self { product_code: Some(code.into()), ..Self::default() }
    }

    pub fn record(id: impl Into<String>) -> Self {
        Self { record_id: Some(id.into()), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabHandle {
    pub id: TabId,
    pub name: String,
    pub closable: bool,
    pub product_code: Option<String>,
    pub record_id: Option<String>,
    pub kind: TabKind,
    /// Highlighted in the tab bar.
    pub active: bool,
}

impl TabHandle {
    pub fn new(id: TabId, name: &str, opts: TabOptions) -> Self {
        let kind = TabKind::resolve(name, &opts);
        Self {
            id,
            name: s!(name),
            closable: !opts.non_closable,
            product_code: opts.product_code,
            record_id: opts.record_id,
            kind,
            active: false,
        }
    }
}

impl TabHandle {
    /// True when `opts` names a different record or product than this tab.
    pub fn is_retarget(&self, opts: &TabOptions) -> bool {
        (opts.record_id.is_some() && opts.record_id != self.record_id)
            || (opts.product_code.is_some() && opts.product_code != self.product_code)
    }

    /// Point the tab at the record/product in `opts`; its kind follows.
    pub(crate) fn retarget(&mut self, opts: &TabOptions) {
        if opts.record_id.is_some() {
            self.record_id = opts.record_id.clone();
        }
        if opts.product_code.is_some() {
            self.product_code = opts.product_code.clone();
        }
        let current = TabOptions {
            non_closable: !self.closable,
            product_code: self.product_code.clone(),
            record_id: self.record_id.clone(),
        };
        self.kind = TabKind::resolve(&self.name, &current);
    }
}
