use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── ListingId ───────────────────────────────────────────────────────

/// Opaque identifier assigned by the server.
///
/// The server hands out hex object ids, but nothing here depends on
/// that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ListingId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<String> for ListingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ListingId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ListingId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Vote ────────────────────────────────────────────────────────────

/// A 0..=10 rating. Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Vote(u8);

impl Vote {
    pub const MIN: Vote = Vote(0);
    pub const MAX: Vote = Vote(10);
    /// Starting value of a fresh insert form.
    pub const DEFAULT: Vote = Vote(5);

    pub fn new(value: i64) -> Self {
        let clamped = value.clamp(0, 10);
        Self(u8::try_from(clamped).unwrap_or(0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Move by `delta` steps, staying inside 0..=10.
    pub fn nudge(self, delta: i64) -> Self {
        Self::new(i64::from(self.0) + delta)
    }
}

impl Default for Vote {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for Vote {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Vote> for u8 {
    fn from(vote: Vote) -> Self {
        vote.0
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Listing ─────────────────────────────────────────────────────────

/// A candidate house listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub link: String,
    pub vote: Option<Vote>,
    pub comment: Option<String>,
    pub city: Option<String>,
    pub zone: Option<String>,
    pub street: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rooms_number: Option<u32>,
    pub square_meters: Option<u32>,
}

impl Listing {
    /// `(lat, lng)` when both are known.
    ///
    /// A listing with only one coordinate counts as unmapped.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        self.coordinates().is_some()
    }

    /// "street (zone)" with `-` for missing parts.
    pub fn title(&self) -> String {
        format!(
            "{} ({})",
            placeholder(self.street.as_deref()),
            placeholder(self.zone.as_deref())
        )
    }

    /// "N rooms, M m²" with `-` for missing parts.
    pub fn size_summary(&self) -> String {
        format!(
            "{} rooms, {} m²",
            placeholder_num(self.rooms_number),
            placeholder_num(self.square_meters)
        )
    }
}

pub(crate) fn placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

pub(crate) fn placeholder_num(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

// ── Mutation payloads ───────────────────────────────────────────────

/// Payload of an insert. Discovery fields stay `None` unless a lookup
/// for this exact link succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub link: String,
    pub vote: Vote,
    pub comment: String,
    pub city: Option<String>,
    pub zone: Option<String>,
    pub street: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rooms_number: Option<u32>,
    pub square_meters: Option<u32>,
}

impl NewListing {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }
}

/// Partial update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPatch {
    pub comment: Option<String>,
    pub vote: Option<Vote>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.vote.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: ListingId::from("1"),
            link: "http://example.org/1/".into(),
            vote: None,
            comment: None,
            city: None,
            zone: None,
            street: None,
            lat: None,
            lng: None,
            rooms_number: None,
            square_meters: None,
        }
    }

    #[test]
    fn vote_clamps_out_of_range() {
        assert_eq!(Vote::new(-3), Vote::MIN);
        assert_eq!(Vote::new(42), Vote::MAX);
        assert_eq!(Vote::new(7).value(), 7);
        assert_eq!(Vote::new(9).nudge(5), Vote::MAX);
        assert_eq!(Vote::new(1).nudge(-2), Vote::MIN);
    }

    #[test]
    fn vote_deserializes_with_clamping() {
        let v: Vote = serde_json::from_str("12").unwrap();
        assert_eq!(v, Vote::MAX);
        assert_eq!(serde_json::to_string(&Vote::new(4)).unwrap(), "4");
    }

    #[test]
    fn one_coordinate_is_unmapped() {
        let mut l = listing();
        l.lat = Some(45.0);
        assert!(!l.is_mapped());
        l.lng = Some(9.0);
        assert_eq!(l.coordinates(), Some((45.0, 9.0)));
    }

    #[test]
    fn title_uses_placeholders() {
        let mut l = listing();
        assert_eq!(l.title(), "- (-)");
        l.street = Some("Via Roma 1".into());
        l.zone = Some("Centro".into());
        l.rooms_number = Some(3);
        assert_eq!(l.title(), "Via Roma 1 (Centro)");
        assert_eq!(l.size_summary(), "3 rooms, - m²");
    }
}
