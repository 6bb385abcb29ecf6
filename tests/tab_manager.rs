// tests/tab_manager.rs
//
// Workspaces, tab registry and dispatch over canned backend replies.

mod common;

use common::{HOME_PAGE, harness};
use finsim_console::core::net::{HttpReply, MemoryBackend};
use finsim_console::dispatch::content::Content;
use finsim_console::dispatch::fragment::Block;
use finsim_console::dispatch::kind::{RendererKind, TabKind};
use finsim_console::events::ConsoleEvent;
use finsim_console::workspace::TabOptions;

fn home_backend() -> MemoryBackend {
    MemoryBackend::new().on_get("/", HttpReply::ok(HOME_PAGE))
}

#[test]
fn no_workspace_means_no_op() {
    let mut h = harness(home_backend());

    assert_eq!(h.tabs.create_tab("Airports", TabOptions::default()), None);
    assert!(!h.tabs.close_current_tab());
    assert!(!h.tabs.set_active_tab("Airports"));
    assert!(h.tabs.tab_bar().is_empty());
    assert_eq!(h.tabs.region().content(), Content::Welcome);
}

#[test]
fn switching_creates_home_tab_once() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    h.tabs.switch_workspace("Administrator");

    let bar = h.tabs.tab_bar();
    assert_eq!(bar.len(), 1);
    let home = bar[0];
    assert_eq!(home.name, "Administrator");
    assert!(!home.closable);
    assert!(home.active);
    assert_eq!(home.kind, TabKind::Generic);

    assert_eq!(
        h.tabs.region().content(),
        Content::Placeholder { title: "Administrator".into() }
    );
    assert_eq!(
        h.tabs.region().content().message().as_deref(),
        Some("Content for Administrator.")
    );
}

#[test]
fn open_airports_then_close_returns_home() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Airports", TabOptions::default());
    h.tabs.wait_idle();

    assert_eq!(h.tabs.tab_bar_names(), vec!["Administrator", "Airports"]);
    let airports = h.tabs.active_tab().cloned().expect("airports active");
    assert_eq!(airports.name, "Airports");
    assert!(airports.closable);
    assert_eq!(airports.kind, TabKind::AirportList);

    match h.tabs.region().content() {
        Content::Fragment { title, fragment } => {
            assert_eq!(title, "Airports");
            let table = fragment.tables().next().expect("airport table");
            assert_eq!(table.rows.len(), 2);
            assert_eq!(table.rows[0].value.as_deref(), Some("17"));
        }
        other => panic!("unexpected content {other:?}"),
    }

    assert!(h.tabs.close_tab(airports.id));
    assert_eq!(h.tabs.tab_bar_names(), vec!["Administrator"]);
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Administrator"));
    assert_eq!(
        h.tabs.region().content(),
        Content::Placeholder { title: "Administrator".into() }
    );
}

#[test]
fn duplicate_names_reuse_the_handle() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");

    let a = h.tabs.create_tab("Mode", TabOptions::default());
    let b = h.tabs.create_tab("Mode", TabOptions::home());
    assert!(a.is_some());
    assert_eq!(a, b);
    assert_eq!(h.tabs.tab_bar_names(), vec!["Administrator", "Mode"]);
    // options of the first creation win
    assert!(h.tabs.tab_bar()[1].closable);
}

#[test]
fn home_tab_refuses_close_but_close_current_removes_it() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("User");
    let home = h.tabs.active_tab().map(|t| t.id).expect("home tab");

    assert!(!h.tabs.close_tab(home));
    assert_eq!(h.tabs.tab_bar_names(), vec!["User"]);

    assert!(h.tabs.close_current_tab());
    assert!(h.tabs.tab_bar().is_empty());
    assert!(h.tabs.active_tab().is_none());
    assert_eq!(h.tabs.region().content(), Content::Welcome);
}

#[test]
fn closing_active_picks_most_recent_remaining() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    h.tabs.create_tab("Routes-ish", TabOptions::default());
    h.tabs.create_tab("Something", TabOptions::default());
    let active = h.tabs.open_tab("Other", TabOptions::default()).expect("tab");

    assert!(h.tabs.close_tab(active));
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Something"));
    let actives = h.tabs.tab_bar().iter().filter(|t| t.active).count();
    assert_eq!(actives, 1);
}

#[test]
fn closing_inactive_tab_keeps_active() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    let first = h.tabs.create_tab("First", TabOptions::default()).expect("tab");
    h.tabs.open_tab("Second", TabOptions::default());

    assert!(h.tabs.close_tab(first));
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Second"));
}

#[test]
fn workspaces_do_not_leak_tabs() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Mode-like", TabOptions::default());

    h.tabs.switch_workspace("User");
    assert_eq!(h.tabs.tab_bar_names(), vec!["User"]);
    h.tabs.open_tab("Notes", TabOptions::default());

    h.tabs.switch_workspace("Administrator");
    assert_eq!(h.tabs.tab_bar_names(), vec!["Administrator", "Mode-like"]);
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Mode-like"));
    assert_eq!(
        h.tabs.region().content(),
        Content::Placeholder { title: "Mode-like".into() }
    );
}

#[test]
fn unknown_names_render_placeholder() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");
    for name in ["Fleet Planner", "", "Edit", "Edit Something"] {
        h.tabs.open_tab(name, TabOptions::default());
        assert_eq!(h.tabs.region().content(), Content::Placeholder { title: name.into() });
    }
}

#[test]
fn edit_prefix_routes_by_tab_options() {
    let backend = home_backend()
        .on_get(
            "/edit-product-form/P%2001/",
            HttpReply::ok(r#"<div class="tab-content-inner"><h2>Edit Product</h2></div>"#),
        )
        .on_get(
            "/edit-airport/17/",
            HttpReply::ok(r#"<div class="tab-content-inner"><h2>Edit Airport</h2></div>"#),
        );
    let mut h = harness(backend);
    h.tabs.switch_workspace("User");

    h.tabs.open_tab("Edit Apples", TabOptions::product("P 01"));
    h.tabs.wait_idle();
    assert_eq!(
        h.tabs.active_tab().map(|t| t.kind.clone()),
        Some(TabKind::EditProduct { code: "P 01".into() })
    );
    match h.tabs.region().content() {
        Content::Fragment { fragment, .. } => assert_eq!(fragment.first_heading(), Some("Edit Product")),
        other => panic!("unexpected content {other:?}"),
    }

    h.tabs.open_tab("Edit AUA", TabOptions::record("17"));
    h.tabs.wait_idle();
    assert_eq!(
        h.tabs.active_tab().map(|t| t.kind.clone()),
        Some(TabKind::EditAirport { id: "17".into() })
    );
    assert_eq!(h.backend.call_count("/edit-airport/17/"), 1);
}

#[test]
fn fragment_failure_shows_inline_message() {
    let backend = home_backend().on_get("/mode-tab/", HttpReply::with_status(500, "boom"));
    let mut h = harness(backend);
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Mode", TabOptions::default());
    h.tabs.wait_idle();

    assert_eq!(
        h.tabs.region().content(),
        Content::Unavailable { title: "Mode".into(), message: "Form could not be loaded.".into() }
    );
}

#[test]
fn fragment_scripts_are_dropped() {
    let html = r#"<div class="tab-content-inner">
        <h2>Add Aircraft</h2>
        <label>Registration</label><input name="registration" value="">
        <script>alert('x')</script>
        <button id="save">Save</button>
    </div>"#;
    let mut h = harness(home_backend().on_get("/add-aircraft/", HttpReply::ok(html)));
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Add Aircraft", TabOptions::default());
    h.tabs.wait_idle();

    let Content::Fragment { fragment, .. } = h.tabs.region().content() else {
        panic!("expected fragment");
    };
    assert_eq!(fragment.scripts_dropped, 1);
    assert!(!fragment.text().contains("alert"));
    assert!(fragment.blocks.iter().any(|b| matches!(b, Block::Field { name, .. } if name == "registration")));
}

#[test]
fn renderer_tabs_delegate() {
    let backend = home_backend().on_get("/api/products/", HttpReply::ok(r#"{"products": []}"#));
    let mut h = harness(backend);
    h.tabs.switch_workspace("User");
    h.tabs.open_tab("Export", TabOptions::default());

    assert_eq!(h.tabs.region().content(), Content::Renderer(RendererKind::Export));
    h.tabs.wait_idle();
    let st = h.tabs.dispatcher().renderers().export.snapshot();
    assert_eq!(st.error.as_deref(), Some("No products found."));
}

#[test]
fn events_open_tabs_in_current_workspace() {
    let mut h = harness(home_backend());
    h.tabs.switch_workspace("Administrator");

    let ev = ConsoleEvent::from_open_tab_detail("add_airport").expect("known detail");
    h.tabs.handle_event(ev);
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Add Airport"));
    assert!(ConsoleEvent::from_open_tab_detail("somewhere_else").is_none());
}

#[test]
fn refresh_updates_airports_on_screen() {
    let refreshed = HOME_PAGE.replace("Hato", "Hato Intl");
    let backend = MemoryBackend::new()
        .on_get("/", HttpReply::ok(HOME_PAGE))
        .on_get("/", HttpReply::ok(refreshed));
    let mut h = harness(backend);
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Airports", TabOptions::default());
    h.tabs.wait_idle();

    h.tabs.handle_event(ConsoleEvent::RefreshAirportList);
    h.tabs.wait_idle();

    let Content::Fragment { fragment, .. } = h.tabs.region().content() else {
        panic!("expected fragment");
    };
    assert!(fragment.text().contains("Hato Intl"));
    assert_eq!(h.backend.call_count("/"), 2);
}

#[test]
fn recreated_home_tab_keeps_recorded_active_tab() {
    let mut h = harness(home_backend().on_get("/mode-tab/", HttpReply::ok("<h2>Mode</h2>")));
    h.tabs.switch_workspace("Administrator");
    h.tabs.open_tab("Mode", TabOptions::default());
    h.tabs.set_active_tab("Administrator");
    assert!(h.tabs.close_current_tab());
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Mode"));

    h.tabs.switch_workspace("User");
    h.tabs.switch_workspace("Administrator");
    h.tabs.wait_idle();

    assert_eq!(h.tabs.tab_bar_names(), vec!["Mode", "Administrator"]);
    assert_eq!(h.tabs.active_tab().map(|t| t.name.as_str()), Some("Mode"));
    let actives: Vec<&str> = h.tabs.tab_bar().iter().filter(|t| t.active).map(|t| t.name.as_str()).collect();
    assert_eq!(actives, vec!["Mode"]);
}

#[test]
fn reopening_edit_aircraft_follows_the_new_record() {
    let backend = home_backend()
        .on_get("/edit-aircraft/5/", HttpReply::ok(r#"<div class="tab-content-inner"><h2>P4-AAA</h2></div>"#))
        .on_get("/edit-aircraft/6/", HttpReply::ok(r#"<div class="tab-content-inner"><h2>P4-BBB</h2></div>"#));
    let mut h = harness(backend);
    h.tabs.switch_workspace("Administrator");

    let first = h.tabs.open_tab("Edit Aircraft", TabOptions::record("5"));
    h.tabs.wait_idle();
    let second = h.tabs.open_tab("Edit Aircraft", TabOptions::record("6"));
    h.tabs.wait_idle();

    assert_eq!(first, second);
    assert_eq!(h.tabs.tab_bar_names(), vec!["Administrator", "Edit Aircraft"]);
    assert_eq!(
        h.tabs.active_tab().map(|t| t.kind.clone()),
        Some(TabKind::EditAircraft { id: "6".into() })
    );
    assert_eq!(h.backend.call_count("/edit-aircraft/6/"), 1);
    match h.tabs.region().content() {
        Content::Fragment { fragment, .. } => assert_eq!(fragment.first_heading(), Some("P4-BBB")),
        other => panic!("unexpected content {other:?}"),
    }

    // same record again: nothing to re-point, the tab just renders
    h.tabs.open_tab("Edit Aircraft", TabOptions::default());
    h.tabs.wait_idle();
    assert_eq!(h.backend.call_count("/edit-aircraft/6/"), 2);
}
