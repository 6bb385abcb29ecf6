// src/gui/mod.rs
pub mod app;
pub mod components;
pub mod router;
pub mod views;

pub use app::run;
