// src/dispatch/kind.rs
//
// What a tab shows, decided once from its name and options when the tab is
// created, then mapped to a concrete render action on every activation.

use crate::workspace::TabOptions;

/// Renderer modules the dispatcher delegates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RendererKind {
    UserManagement,
    MarketAnalysis,
    Import,
    Export,
    Routes,
}

impl RendererKind {
    pub const ALL: [RendererKind; 5] = [
        RendererKind::UserManagement,
        RendererKind::MarketAnalysis,
        RendererKind::Import,
        RendererKind::Export,
        RendererKind::Routes,
    ];

    pub fn tab_name(self) -> &'static str {
        match self {
            RendererKind::UserManagement => "User Management",
            RendererKind::MarketAnalysis => "Market Analysis",
            RendererKind::Import => "Import",
            RendererKind::Export => "Export",
            RendererKind::Routes => "Routes",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TabKind {
    AircraftList,
    AirportList,
    Mode,
    AddAircraft,
    EditAircraft { id: String },
    AddAirport,
    EditAirport { id: String },
    AddProduct,
    EditProduct { code: String },
    RegionCoreData,
    BranchInformation,
    Renderer(RendererKind),
    /// Home tabs and unknown names.
    Generic,
}

impl TabKind {
    pub fn resolve(name: &str, opts: &TabOptions) -> TabKind {
        match name {
            "Aircraft" => return TabKind::AircraftList,
            "Airports" => return TabKind::AirportList,
            "Mode" => return TabKind::Mode,
            "Add Aircraft" => return TabKind::AddAircraft,
            "Add Airport" => return TabKind::AddAirport,
            "Add Products" | "Add Product" => return TabKind::AddProduct,
            "Region Core Data" => return TabKind::RegionCoreData,
            "Branch Information" => return TabKind::BranchInformation,
            "Edit Aircraft" => {
                return match &opts.record_id {
                    Some(id) => TabKind::EditAircraft { id: id.clone() },
                    None => TabKind::Generic,
                };
            }
            _ => {}
        }

        if let Some(kind) = RendererKind::ALL.into_iter().find(|k| k.tab_name() == name) {
            return TabKind::Renderer(kind);
        }

        if name.starts_with("Edit ") {
            if let Some(code) = &opts.product_code {
                return TabKind::EditProduct { code: code.clone() };
            }
            if let Some(id) = &opts.record_id {
                return TabKind::EditAirport { id: id.clone() };
            }
        }

        TabKind::Generic
    }

    pub fn action(&self) -> RenderAction {
        use FragmentRoute as R;
        match self {
            TabKind::AircraftList => RenderAction::Cached(CachedSection::AircraftList),
            TabKind::AirportList => RenderAction::Cached(CachedSection::AirportList),
            TabKind::Mode => RenderAction::Fetch(R::form("/mode-tab/", "Mode")),
            TabKind::AddAircraft => RenderAction::Fetch(R::form("/add-aircraft/", "Add Aircraft")),
            TabKind::EditAircraft { id } => {
                RenderAction::Fetch(R::form(&format!("/edit-aircraft/{}/", enc(id)), "Edit Aircraft"))
            }
            TabKind::AddAirport => RenderAction::Fetch(R::form("/add-airport/", "Add Airport")),
            TabKind::EditAirport { id } => {
                RenderAction::Fetch(R::form(&format!("/edit-airport/{}/", enc(id)), "Edit Airport"))
            }
            TabKind::AddProduct => RenderAction::Fetch(R::product("/add-product-form/", "Add Product")),
            TabKind::EditProduct { code } => RenderAction::Fetch(R::product(
                &format!("/edit-product-form/{}/", enc(code)),
                "Edit Product",
            )),
            TabKind::RegionCoreData => {
                RenderAction::Fetch(R::form("/region-core-data-tab/", "Region Core Data"))
            }
            TabKind::BranchInformation => {
                RenderAction::Fetch(R::form("/branch-information-tab/", "Branch Information"))
            }
            TabKind::Renderer(kind) => RenderAction::Delegate(*kind),
            TabKind::Generic => RenderAction::Placeholder,
        }
    }
}

/// Path segment encoding for ids and product codes.
fn enc(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Sections of the home page kept around for instant display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CachedSection {
    AirportList,
    AircraftList,
}

impl CachedSection {
    pub const ALL: [CachedSection; 2] = [CachedSection::AirportList, CachedSection::AircraftList];

    pub fn element_id(self) -> &'static str {
        match self {
            CachedSection::AirportList => "airport-list-container",
            CachedSection::AircraftList => "aircraft-list-container",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CachedSection::AirportList => "Airports",
            CachedSection::AircraftList => "Aircraft",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentRoute {
    pub path: String,
    /// Class of the element to keep.
    pub marker: &'static str,
    pub title: String,
    pub failure: &'static str,
}

impl FragmentRoute {
    fn form(path: &str, title: &str) -> Self {
        Self {
            path: s!(path),
            marker: crate::config::consts::FRAGMENT_MARKER,
            title: s!(title),
            failure: "Form could not be loaded.",
        }
    }

    fn product(path: &str, title: &str) -> Self {
        Self { failure: "Could not load product form.", ..Self::form(path, title) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderAction {
    Cached(CachedSection),
    Fetch(FragmentRoute),
    Delegate(RendererKind),
    Placeholder,
}
