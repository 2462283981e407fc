//! Screen implementations. Each screen is a top-level Component.

pub mod detail;
pub mod insert;
pub mod list;
pub mod map;

use crate::component::Component;
use crate::screen::ScreenId;

/// One component per screen, in mode-switch order with Detail last.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Insert, Box::new(insert::InsertScreen::new())),
        (ScreenId::List, Box::new(list::ListScreen::new())),
        (ScreenId::Map, Box::new(map::MapScreen::new())),
        (ScreenId::Detail, Box::new(detail::DetailScreen::new())),
    ]
}
