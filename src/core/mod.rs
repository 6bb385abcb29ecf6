// src/core/mod.rs

pub mod html;
pub mod net;
pub mod sanitize;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock that shrugs off poisoning; worker panics must not take the UI down.
#[inline]
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
