// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod gui;
pub mod progress;
pub mod renderers;
pub mod storage;
pub mod workspace;

pub use error::{ConsoleError, Result};
