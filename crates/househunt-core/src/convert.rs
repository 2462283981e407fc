// ── API-to-domain type conversions ──
//
// Bridges raw `househunt_api` wire types into `househunt_core::model`
// domain types and back. Blank strings are treated as missing and votes
// are clamped on the way in.

use househunt_api::{DiscoveryDto, HouseDto, NewHouseDto, UpdateHouseDto};

use crate::model::{DiscoveryResult, Listing, ListingId, ListingPatch, NewListing, Vote};

// ── Helpers ────────────────────────────────────────────────────────

/// Drop empty or whitespace-only strings.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Listing ────────────────────────────────────────────────────────

impl From<HouseDto> for Listing {
    fn from(dto: HouseDto) -> Self {
        Self {
            id: ListingId::from(dto.id),
            link: dto.link,
            vote: dto.vote.map(Vote::new),
            comment: non_blank(dto.comment),
            city: non_blank(dto.city),
            zone: non_blank(dto.zone),
            street: non_blank(dto.street),
            lat: dto.lat,
            lng: dto.lng,
            rooms_number: dto.rooms_number,
            square_meters: dto.square_meters,
        }
    }
}

// ── Discovery ──────────────────────────────────────────────────────

impl From<DiscoveryDto> for DiscoveryResult {
    fn from(dto: DiscoveryDto) -> Self {
        Self {
            city: non_blank(dto.city),
            zone: non_blank(dto.zone),
            street: non_blank(dto.street),
            lat: dto.lat,
            lng: dto.lng,
            rooms_number: dto.rooms_number,
            square_meters: dto.square_meters,
            cost: dto.cost,
        }
    }
}

// ── Mutation bodies ────────────────────────────────────────────────

impl From<&NewListing> for NewHouseDto {
    fn from(draft: &NewListing) -> Self {
        Self {
            link: draft.link.trim().to_owned(),
            vote: draft.vote.value(),
            comment: draft.comment.clone(),
            city: draft.city.clone(),
            lat: draft.lat,
            lng: draft.lng,
            rooms_number: draft.rooms_number,
            square_meters: draft.square_meters,
            street: draft.street.clone(),
            zone: draft.zone.clone(),
        }
    }
}

impl From<&ListingPatch> for UpdateHouseDto {
    fn from(patch: &ListingPatch) -> Self {
        Self {
            comment: patch.comment.clone(),
            vote: patch.vote.map(Vote::value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_dto_clamps_vote_and_blanks() {
        let dto = HouseDto {
            id: "abc".into(),
            link: "http://x/".into(),
            vote: Some(14),
            comment: Some("   ".into()),
            street: Some("Via Po".into()),
            ..HouseDto::default()
        };
        let listing = Listing::from(dto);
        assert_eq!(listing.id.as_str(), "abc");
        assert_eq!(listing.vote, Some(Vote::MAX));
        assert!(listing.comment.is_none());
        assert_eq!(listing.street.as_deref(), Some("Via Po"));
    }

    #[test]
    fn new_listing_without_discovery_has_no_extra_fields() {
        let draft = NewListing {
            link: " http://x/ ".into(),
            ..NewListing::default()
        };
        let dto = NewHouseDto::from(&draft);
        assert_eq!(dto.link, "http://x/");
        assert_eq!(dto.vote, 5);
        assert!(dto.city.is_none() && dto.lat.is_none() && dto.zone.is_none());
    }

    #[test]
    fn patch_keeps_only_drafted_fields() {
        let patch = ListingPatch {
            comment: None,
            vote: Some(Vote::new(0)),
        };
        let dto = UpdateHouseDto::from(&patch);
        assert_eq!(dto.vote, Some(0));
        assert!(dto.comment.is_none());
    }
}
