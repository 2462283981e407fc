// Map view: markers for mapped listings, a viewport center, and the
// rule that opens the selected listing's popup.

use std::collections::HashSet;

use crate::model::{Listing, ListingId, Vote, placeholder, placeholder_num};

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Marker look. One variant per integer vote, plus one for no vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerStyle {
    Unvoted,
    Vote(Vote),
}

impl MarkerStyle {
    pub fn for_vote(vote: Option<Vote>) -> Self {
        vote.map_or(Self::Unvoted, Self::Vote)
    }

    /// Stable style name, e.g. `vote-7` or `vote-none`.
    pub fn class_name(self) -> String {
        match self {
            Self::Unvoted => "vote-none".to_owned(),
            Self::Vote(v) => format!("vote-{v}"),
        }
    }
}

/// Text shown when a marker's popup is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub link: String,
    pub vote: String,
    /// "street, N rooms, M m²"
    pub summary: String,
    pub comment: String,
}

impl PopupContent {
    fn for_listing(listing: &Listing) -> Self {
        Self {
            link: listing.link.clone(),
            vote: listing
                .vote
                .map_or_else(|| "-".to_owned(), |v| v.to_string()),
            summary: format!(
                "{}, {} rooms, {} m²",
                placeholder(listing.street.as_deref()),
                placeholder_num(listing.rooms_number),
                placeholder_num(listing.square_meters)
            ),
            comment: listing.comment.clone().unwrap_or_default(),
        }
    }

    pub fn lines(&self) -> [String; 4] {
        [
            self.link.clone(),
            format!("vote: {}", self.vote),
            self.summary.clone(),
            self.comment.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: ListingId,
    pub position: Coordinate,
    pub style: MarkerStyle,
    pub popup: PopupContent,
}

/// Everything the map screen draws for one collection snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MapModel {
    pub markers: Vec<Marker>,
    /// `None` when no listing has both coordinates.
    pub center: Option<Coordinate>,
    pub selected: Option<ListingId>,
}

impl MapModel {
    pub fn build(listings: &[Listing], selected: Option<&ListingId>) -> Self {
        let markers = listings
            .iter()
            .filter_map(|l| {
                let (lat, lng) = l.coordinates()?;
                Some(Marker {
                    id: l.id.clone(),
                    position: Coordinate { lat, lng },
                    style: MarkerStyle::for_vote(l.vote),
                    popup: PopupContent::for_listing(l),
                })
            })
            .collect();
        Self {
            markers,
            center: center(listings, selected),
            selected: selected.cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, id: &ListingId) -> Option<&Marker> {
        self.markers.iter().find(|m| &m.id == id)
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.as_ref().and_then(|id| self.marker(id))
    }

    /// South-west and north-east corners of all markers.
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let first = self.markers.first()?.position;
        let (mut min, mut max) = (first, first);
        for m in &self.markers[1..] {
            min.lat = min.lat.min(m.position.lat);
            min.lng = min.lng.min(m.position.lng);
            max.lat = max.lat.max(m.position.lat);
            max.lng = max.lng.max(m.position.lng);
        }
        Some((min, max))
    }

    pub fn marker_ids(&self) -> impl Iterator<Item = &ListingId> {
        self.markers.iter().map(|m| &m.id)
    }
}

/// Arithmetic mean of all mapped listings.
pub fn mean_center(listings: &[Listing]) -> Option<Coordinate> {
    let mut count: u32 = 0;
    let (mut lat, mut lng) = (0.0, 0.0);
    for (la, ln) in listings.iter().filter_map(Listing::coordinates) {
        lat += la;
        lng += ln;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = f64::from(count);
    Some(Coordinate {
        lat: lat / n,
        lng: lng / n,
    })
}

/// The selected listing's position if it is mapped, else the mean.
pub fn center(listings: &[Listing], selected: Option<&ListingId>) -> Option<Coordinate> {
    selected
        .and_then(|id| listings.iter().find(|l| &l.id == id))
        .and_then(Listing::coordinates)
        .map(|(lat, lng)| Coordinate { lat, lng })
        .or_else(|| mean_center(listings))
}

// ── Popup rule ──────────────────────────────────────────────────────

/// Change produced by [`PopupController::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupChange {
    Opened(ListingId),
    Closed,
}

/// Opens the selected marker's popup once the map is ready.
///
/// Re-evaluated whenever the selection, readiness or marker set
/// changes, in whatever order those arrive.
#[derive(Debug, Clone, Default)]
pub struct PopupController {
    selected: Option<ListingId>,
    map_ready: bool,
    markers: HashSet<ListingId>,
    open: Option<ListingId>,
    dismissed: bool,
}

impl PopupController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected(&mut self, selected: Option<ListingId>) -> Option<PopupChange> {
        if self.selected != selected {
            self.dismissed = false;
        }
        self.selected = selected;
        self.reconcile()
    }

    pub fn set_map_ready(&mut self, ready: bool) -> Option<PopupChange> {
        self.map_ready = ready;
        self.reconcile()
    }

    pub fn set_markers<I>(&mut self, ids: I) -> Option<PopupChange>
    where
        I: IntoIterator<Item = ListingId>,
    {
        self.markers = ids.into_iter().collect();
        self.reconcile()
    }

    /// Close the popup until the selection changes.
    pub fn dismiss(&mut self) -> Option<PopupChange> {
        self.dismissed = true;
        self.reconcile()
    }

    pub fn selected(&self) -> Option<&ListingId> {
        self.selected.as_ref()
    }

    pub fn is_map_ready(&self) -> bool {
        self.map_ready
    }

    pub fn open_popup(&self) -> Option<&ListingId> {
        self.open.as_ref()
    }

    /// Bring the open popup in line with the current inputs.
    pub fn reconcile(&mut self) -> Option<PopupChange> {
        let wanted = self
            .selected
            .as_ref()
            .filter(|id| self.map_ready && !self.dismissed && self.markers.contains(*id))
            .cloned();
        if wanted == self.open {
            return None;
        }
        self.open.clone_from(&wanted);
        Some(wanted.map_or(PopupChange::Closed, PopupChange::Opened))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(id: &str, lat: Option<f64>, lng: Option<f64>) -> Listing {
        Listing {
            id: ListingId::from(id),
            link: format!("http://example.org/{id}/"),
            vote: None,
            comment: None,
            city: None,
            zone: None,
            street: None,
            lat,
            lng,
            rooms_number: None,
            square_meters: None,
        }
    }

    fn two() -> Vec<Listing> {
        vec![
            at("1", Some(45.0), Some(9.0)),
            at("2", Some(46.0), Some(10.0)),
        ]
    }

    #[test]
    fn center_is_mean_without_selection() {
        let center = center(&two(), None);
        assert_eq!(center, Some(Coordinate { lat: 45.5, lng: 9.5 }));
    }

    #[test]
    fn selection_overrides_mean() {
        let id = ListingId::from("2");
        let model = MapModel::build(&two(), Some(&id));
        assert_eq!(model.center, Some(Coordinate { lat: 46.0, lng: 10.0 }));
        assert_eq!(model.selected_marker().map(|m| m.id.as_str()), Some("2"));
    }

    #[test]
    fn unknown_or_unmapped_selection_falls_back_to_mean() {
        let mut listings = two();
        listings.push(at("3", Some(50.0), None));
        for id in ["3", "99"] {
            let c = center(&listings, Some(&ListingId::from(id)));
            assert_eq!(c, Some(Coordinate { lat: 45.5, lng: 9.5 }));
        }
    }

    #[test]
    fn half_coordinates_are_not_markers() {
        let listings = vec![at("1", Some(45.0), None), at("2", None, Some(9.0))];
        let model = MapModel::build(&listings, None);
        assert!(model.is_empty());
        assert!(model.center.is_none());
        assert!(model.bounds().is_none());
    }

    #[test]
    fn marker_style_follows_vote() {
        let mut l = at("1", Some(1.0), Some(2.0));
        l.vote = Some(Vote::new(7));
        l.street = Some("Via Roma".into());
        l.rooms_number = Some(2);
        let model = MapModel::build(&[l], None);
        let marker = &model.markers[0];
        assert_eq!(marker.style, MarkerStyle::Vote(Vote::new(7)));
        assert_eq!(marker.style.class_name(), "vote-7");
        assert_eq!(marker.popup.summary, "Via Roma, 2 rooms, - m²");
        assert_eq!(MarkerStyle::for_vote(None).class_name(), "vote-none");
    }

    #[test]
    fn popup_opens_when_ready_arrives_last() {
        let mut popups = PopupController::new();
        let id = ListingId::from("2");
        assert_eq!(popups.set_selected(Some(id.clone())), None);
        assert_eq!(popups.set_markers([ListingId::from("1"), id.clone()]), None);
        assert_eq!(
            popups.set_map_ready(true),
            Some(PopupChange::Opened(id.clone()))
        );
        assert_eq!(popups.open_popup(), Some(&id));
    }

    #[test]
    fn popup_opens_when_selection_arrives_last() {
        let mut popups = PopupController::new();
        popups.set_map_ready(true);
        popups.set_markers([ListingId::from("1"), ListingId::from("2")]);
        assert_eq!(
            popups.set_selected(Some(ListingId::from("1"))),
            Some(PopupChange::Opened(ListingId::from("1")))
        );
        assert_eq!(
            popups.set_selected(Some(ListingId::from("2"))),
            Some(PopupChange::Opened(ListingId::from("2")))
        );
        assert_eq!(popups.set_selected(None), Some(PopupChange::Closed));
    }

    #[test]
    fn dismissed_popup_stays_closed_until_selection_changes() {
        let mut popups = PopupController::new();
        popups.set_map_ready(true);
        popups.set_markers([ListingId::from("1"), ListingId::from("2")]);
        popups.set_selected(Some(ListingId::from("1")));
        assert_eq!(popups.dismiss(), Some(PopupChange::Closed));
        assert_eq!(popups.set_map_ready(true), None);
        assert!(popups.set_selected(Some(ListingId::from("2"))).is_some());
    }
}
