use serde::{Deserialize, Serialize};

use super::NewListing;

/// Metadata found for a listing link.
///
/// Transient: it lives in the insert form until the link changes or
/// the form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub city: Option<String>,
    pub zone: Option<String>,
    pub street: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rooms_number: Option<u32>,
    pub square_meters: Option<u32>,
    /// Monthly cost. Shown to the user, never stored.
    pub cost: Option<u32>,
}

impl DiscoveryResult {
    /// Copy the discovered fields into `draft`.
    ///
    /// `link`, `vote` and `comment` are never touched.
    pub fn apply_to(&self, draft: &mut NewListing) {
        draft.city.clone_from(&self.city);
        draft.zone.clone_from(&self.zone);
        draft.street.clone_from(&self.street);
        draft.lat = self.lat;
        draft.lng = self.lng;
        draft.rooms_number = self.rooms_number;
        draft.square_meters = self.square_meters;
    }

    /// One-line description: "city street (zone)".
    pub fn headline(&self) -> String {
        let parts: Vec<&str> = [self.city.as_deref(), self.street.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        let mut line = if parts.is_empty() {
            "-".to_owned()
        } else {
            parts.join(" ")
        };
        if let Some(zone) = self.zone.as_deref().filter(|z| !z.trim().is_empty()) {
            line.push_str(&format!(" ({zone})"));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vote;

    #[test]
    fn apply_keeps_user_fields() {
        let found = DiscoveryResult {
            city: Some("Milano".into()),
            lat: Some(45.46),
            lng: Some(9.19),
            cost: Some(1200),
            ..DiscoveryResult::default()
        };
        let mut draft = NewListing {
            link: "http://x/".into(),
            vote: Vote::new(8),
            comment: "bright".into(),
            ..NewListing::default()
        };
        found.apply_to(&mut draft);
        assert_eq!(draft.link, "http://x/");
        assert_eq!(draft.vote, Vote::new(8));
        assert_eq!(draft.comment, "bright");
        assert_eq!(draft.city.as_deref(), Some("Milano"));
        assert_eq!(draft.lat, Some(45.46));
    }

    #[test]
    fn headline_skips_missing_parts() {
        let found = DiscoveryResult {
            city: Some("Milano".into()),
            zone: Some("Navigli".into()),
            ..DiscoveryResult::default()
        };
        assert_eq!(found.headline(), "Milano (Navigli)");
        assert_eq!(DiscoveryResult::default().headline(), "-");
    }
}
