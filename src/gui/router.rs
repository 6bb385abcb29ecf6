// src/gui/router.rs
//
// Sidebar icons and the menu each one opens. Menu items are tab names;
// clicking one opens (or focuses) that tab in the icon's workspace.

use crate::config::consts::{ADMIN_LABEL, USER_LABEL};

pub struct MenuGroup {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

pub struct SidebarIcon {
    pub label: &'static str,
    pub glyph: &'static str,
    pub menu: &'static [MenuGroup],
}

static ADMIN_MENU: &[MenuGroup] = &[
    MenuGroup { title: "Fleet", items: &["Aircraft", "Airports", "Routes"] },
    MenuGroup { title: "Operations", items: &["Mode"] },
    MenuGroup {
        title: "Commercial Structure",
        items: &["User Management", "Region Core Data", "Branch Information"],
    },
    MenuGroup { title: "Market", items: &["Market Analysis"] },
];

static USER_MENU: &[MenuGroup] = &[MenuGroup { title: "User Market", items: &["Import", "Export"] }];

pub static SIDEBAR: &[SidebarIcon] = &[
    SidebarIcon { label: ADMIN_LABEL, glyph: "⚙", menu: ADMIN_MENU },
    SidebarIcon { label: USER_LABEL, glyph: "👤", menu: USER_MENU },
];

pub fn icons() -> &'static [SidebarIcon] {
    SIDEBAR
}

pub fn icon_for(label: &str) -> Option<&'static SidebarIcon> {
    SIDEBAR.iter().find(|i| i.label == label)
}

/// Menu shown in the options panel for `label`; empty for unknown icons.
pub fn menu_for(label: &str) -> &'static [MenuGroup] {
    icon_for(label).map(|i| i.menu).unwrap_or(&[])
}

pub fn options_title(label: &str) -> String {
    join!(label, " Options")
}
