// ── Navigation ──
//
// Routes mirror the fragment paths a browser front end would use:
// `/insert`, `/list`, `/map?houseId=<id>`, `/houses/<id>`. Anything
// else resolves to the list.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumIter, IntoStaticStr};
use url::form_urlencoded;

use crate::model::ListingId;

/// Query parameter carrying the map selection.
pub const SELECTION_PARAM: &str = "houseId";

/// The three destinations offered by the mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Insert,
    List,
    Map,
}

impl Mode {
    /// Route reached by picking this mode in the switch.
    pub fn route(self) -> Route {
        match self {
            Self::Insert => Route::Insert,
            Self::List => Route::List,
            Self::Map => Route::Map { selected: None },
        }
    }
}

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    Insert,
    #[default]
    List,
    Map { selected: Option<ListingId> },
    /// Only reachable from list rows or links, never from the switch.
    Detail(ListingId),
}

impl Route {
    /// Resolve a path such as `#/map?houseId=2`. Never fails.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw);
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["insert"] => Self::Insert,
            ["list"] => Self::List,
            ["map"] => Self::Map {
                selected: selection_from_query(query),
            },
            ["houses", id] => Self::Detail(ListingId::from(decode_segment(id))),
            _ => Self::List,
        }
    }

    /// The switch destination highlighted for this route.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Insert => Mode::Insert,
            Self::List | Self::Detail(_) => Mode::List,
            Self::Map { .. } => Mode::Map,
        }
    }

    /// Map route with `id` pre-selected.
    pub fn map_selecting(id: &ListingId) -> Self {
        Self::Map {
            selected: Some(id.clone()),
        }
    }

    pub fn detail(id: &ListingId) -> Self {
        Self::Detail(id.clone())
    }
}

fn selection_from_query(query: &str) -> Option<ListingId> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == SELECTION_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .map(ListingId::from)
}

/// Form-style escaping, so ids holding `/`, `?` or `#` stay one segment.
fn encode_segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Inverse of [`encode_segment`]. Unescaped `&` and `=` in hand-written
/// paths are kept as they are.
fn decode_segment(raw: &str) -> String {
    raw.split('&')
        .map(|piece| match form_urlencoded::parse(piece.as_bytes()).next() {
            Some((key, value)) if piece.contains('=') => format!("{key}={value}"),
            Some((key, _)) => key.into_owned(),
            None => String::new(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("/insert"),
            Self::List => f.write_str("/list"),
            Self::Map { selected: None } => f.write_str("/map"),
            Self::Map { selected: Some(id) } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(SELECTION_PARAM, id.as_str())
                    .finish();
                write!(f, "/map?{query}")
            }
            Self::Detail(id) => write!(f, "/houses/{}", encode_segment(id.as_str())),
        }
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn known_routes_round_trip() {
        let routes = [
            Route::Insert,
            Route::List,
            Route::Map { selected: None },
            Route::map_selecting(&ListingId::from("2")),
            Route::detail(&ListingId::from("64b1f0c2a9")),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn detail_ids_with_reserved_characters_round_trip() {
        for raw in ["a/b", "x?y=1", "frag#ment", "with space", "q&a=b", "50%"] {
            let route = Route::detail(&ListingId::from(raw));
            let text = route.to_string();
            assert_eq!(text.matches('/').count(), 2, "{text}");
            assert_eq!(Route::parse(&text), route);
        }
        assert_eq!(
            Route::parse("/houses/a%2Fb"),
            Route::detail(&ListingId::from("a/b"))
        );
    }

    #[test]
    fn fragment_prefix_and_query_are_accepted() {
        assert_eq!(
            Route::parse("#/map?houseId=2"),
            Route::map_selecting(&ListingId::from("2"))
        );
        assert_eq!(Route::parse("#/map?houseId="), Route::Map { selected: None });
        assert_eq!(Route::parse("/insert/"), Route::Insert);
    }

    #[test]
    fn unknown_paths_fall_back_to_list() {
        for raw in ["", "/", "/nope", "/houses", "/houses/1/edit", "#/settings"] {
            assert_eq!(Route::parse(raw), Route::List, "path {raw:?}");
        }
    }

    #[test]
    fn detail_highlights_list() {
        assert_eq!(Route::detail(&ListingId::from("1")).mode(), Mode::List);
        assert_eq!(Route::parse("/map").mode(), Mode::Map);
    }

    #[test]
    fn each_mode_routes_to_itself() {
        for mode in Mode::iter() {
            assert_eq!(mode.route().mode(), mode);
        }
        assert_eq!(Mode::Insert.to_string(), "insert");
    }
}
