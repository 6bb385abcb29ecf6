// src/gui/components/mod.rs
pub mod alerts;
pub mod content;
pub mod sidebar;
pub mod tabs;
