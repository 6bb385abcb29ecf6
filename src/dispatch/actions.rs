// src/dispatch/actions.rs
//
// Buttons inside fetched fragments used to be wired up by page scripts.
// The known ones are mapped here to console events; the rest stay inert.

use crate::dispatch::fragment::TableRow;
use crate::dispatch::kind::TabKind;
use crate::events::ConsoleEvent;
use crate::workspace::TabOptions;

pub const ADD_AIRPORT_BTN: &str = "add-airport-btn";
pub const ADD_AIRCRAFT_BTN: &str = "add-aircraft-btn";
pub const EDIT_AIRPORT_BTN: &str = "edit-airport-btn-airport";
pub const EDIT_AIRCRAFT_BTN: &str = "edit-aircraft-btn";

/// Column of the airport list holding the IATA code (after the checkbox).
const AIRPORT_CODE_CELL: usize = 4;

/// Whether the button does something in this console.
pub fn is_wired(button_id: &str) -> bool {
    matches!(button_id, ADD_AIRPORT_BTN | ADD_AIRCRAFT_BTN | EDIT_AIRPORT_BTN | EDIT_AIRCRAFT_BTN)
}

/// Edit buttons stay disabled until a row is picked.
pub fn needs_selection(button_id: &str) -> bool {
    matches!(button_id, EDIT_AIRPORT_BTN | EDIT_AIRCRAFT_BTN)
}

/// Event for a click on `button_id`, given the row picked in the
/// fragment's table (if any).
pub fn button_event(button_id: &str, selected: Option<&TableRow>) -> Option<ConsoleEvent> {
    match button_id {
        ADD_AIRPORT_BTN => Some(ConsoleEvent::open("Add Airport")),
        ADD_AIRCRAFT_BTN => Some(ConsoleEvent::open("Add Aircraft")),
        EDIT_AIRCRAFT_BTN => {
            let id = selected?.value.clone()?;
            Some(ConsoleEvent::OpenTab { name: s!("Edit Aircraft"), options: TabOptions::record(id) })
        }
        EDIT_AIRPORT_BTN => {
            let row = selected?;
            let id = row.value.clone()?;
            let code = row
                .cells
                .get(AIRPORT_CODE_CELL)
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .unwrap_or("Airport");
            Some(ConsoleEvent::OpenTab { name: join!("Edit ", code), options: TabOptions::record(id) })
        }
        _ => None,
    }
}

/// Console-side toolbar event for a tab showing a fragment.
pub fn refresh_event(kind: &TabKind) -> Option<ConsoleEvent> {
    match kind {
        TabKind::AirportList => Some(ConsoleEvent::RefreshAirportList),
        _ => None,
    }
}
