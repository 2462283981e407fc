// Wire types for the listings REST API.
//
// These mirror the JSON bodies exactly. Domain types with validation
// live in `househunt-core::model`.

use serde::{Deserialize, Serialize};

/// One listing as returned by `GET /api/houses` and `GET /api/houses/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseDto {
    pub id: String,
    pub link: String,
    #[serde(default)]
    pub vote: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rooms_number: Option<u32>,
    #[serde(default)]
    pub square_meters: Option<u32>,
}

/// Body of `POST /api/houses`.
///
/// `link`, `vote` and `comment` are always sent; discovered metadata is
/// omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewHouseDto {
    pub link: String,
    pub vote: u8,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_meters: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// Response of `POST /api/houses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedDto {
    pub id: String,
}

/// Body of `PATCH /api/houses/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHouseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote: Option<u8>,
}

/// Response of `GET /api/discover?url=...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryDto {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rooms_number: Option<u32>,
    #[serde(default)]
    pub square_meters: Option<u32>,
    #[serde(default)]
    pub cost: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn house_tolerates_missing_optionals() {
        let h: HouseDto =
            serde_json::from_value(json!({ "id": "1", "link": "http://example.org/1/" }))
                .unwrap();
        assert_eq!(h.id, "1");
        assert!(h.vote.is_none());
        assert!(h.lat.is_none());
    }

    #[test]
    fn new_house_omits_absent_discovery_fields() {
        let body = NewHouseDto {
            link: "http://x/".into(),
            vote: 5,
            comment: String::new(),
            ..NewHouseDto::default()
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({ "link": "http://x/", "vote": 5, "comment": "" }));
    }

    #[test]
    fn update_only_sends_present_fields() {
        let body = UpdateHouseDto {
            comment: None,
            vote: Some(8),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "vote": 8 }));
    }
}
