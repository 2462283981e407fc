//! Screen identifiers and their mapping from routes.

use std::fmt;

use househunt_core::Route;

/// One per screen component. Detail has no tab of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Insert,
    List,
    Map,
    Detail,
}

impl ScreenId {
    /// The screen that shows `route`.
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Insert => Self::Insert,
            Route::List => Self::List,
            Route::Map { .. } => Self::Map,
            Route::Detail(_) => Self::Detail,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insert => "Insert",
            Self::List => "List",
            Self::Map => "Map",
            Self::Detail => "Detail",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use househunt_core::ListingId;

    use super::*;

    #[test]
    fn every_route_has_a_screen() {
        assert_eq!(ScreenId::for_route(&Route::parse("/nope")), ScreenId::List);
        assert_eq!(ScreenId::for_route(&Route::parse("/map?houseId=3")), ScreenId::Map);
        assert_eq!(
            ScreenId::for_route(&Route::detail(&ListingId::from("3"))),
            ScreenId::Detail
        );
        assert_eq!(ScreenId::for_route(&Route::Insert).to_string(), "Insert");
    }
}
