#![allow(clippy::unwrap_used)]
// Data-synchronization scenarios for `Controller` against a wiremock API.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use househunt_core::view::map::{Coordinate, MapModel};
use househunt_core::view::{InsertForm, ListContent, ListView, PopupController};
use househunt_core::{
    ClientConfig, Command, CommandResult, Controller, CoreError, ListingId, ListingPatch, Route,
    Vote,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        api_url: server.uri().parse().unwrap(),
        timeout: Duration::from_secs(5),
        stale_after: Duration::from_secs(300),
    };
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

fn house(id: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "id": id,
        "link": format!("http://example.org/{id}/"),
        "vote": 6,
        "street": format!("Via {id}"),
        "zone": "Centro",
        "lat": lat,
        "lng": lng,
        "rooms_number": 3,
        "square_meters": 80
    })
}

// ── Collection ──────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_reads_issue_one_request() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([house("1", 45.0, 9.0)]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b) = tokio::join!(controller.listings(), controller.listings());
    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);

    // Fresh data is served from the cache.
    controller.listings().await.unwrap();
}

#[tokio::test]
async fn delete_then_refetch_drops_only_that_row() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([house("1", 45.0, 9.0), house("2", 46.0, 10.0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/houses/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([house("2", 46.0, 10.0)])))
        .mount(&server)
        .await;

    controller.listings().await.unwrap();
    let stream = controller.subscribe_listings();

    let mut view = ListView::new();
    let ListContent::Rows(before) = view.content(&stream.latest()) else {
        panic!("expected rows");
    };
    assert_eq!(before.len(), 2);

    let cmd = view.begin_remove(&ListingId::from("1")).unwrap();
    let result = controller.execute(cmd).await;
    assert_eq!(
        result.as_ref().ok(),
        Some(&CommandResult::Removed {
            id: ListingId::from("1")
        })
    );
    view.finish_remove(&result);

    let ListContent::Rows(after) = view.content(&stream.latest()) else {
        panic!("expected rows");
    };
    assert_eq!(after.len(), 1);
    assert_eq!(after[0], before[1]);
}

#[tokio::test]
async fn load_failure_is_reported() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let err = controller.listings().await.unwrap_err();
    assert!(matches!(err, CoreError::Load { .. }), "got {err:?}");

    let view = ListView::new();
    assert!(matches!(
        view.content(&controller.subscribe_listings().latest()),
        ListContent::Error(_)
    ));
}

// ── Single listing ──────────────────────────────────────────────────

#[tokio::test]
async fn update_refetches_item_and_invalidates_collection() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([house("1", 45.0, 9.0)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/houses/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(house("1", 45.0, 9.0)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/houses/1"))
        .and(body_json(json!({ "vote": 9 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut updated = house("1", 45.0, 9.0);
    updated["vote"] = json!(9);
    Mock::given(method("GET"))
        .and(path("/api/houses/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&server)
        .await;

    controller.listings().await.unwrap();
    let id = ListingId::from("1");
    let before = controller.listing(&id).await.unwrap();
    assert_eq!(before.vote, Some(Vote::new(6)));

    let result = controller
        .execute(Command::UpdateListing {
            id: id.clone(),
            patch: ListingPatch {
                comment: None,
                vote: Some(Vote::new(9)),
            },
        })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::Updated { id: id.clone() });

    let item = controller.subscribe_listing(&id).latest();
    assert_eq!(item.data.unwrap().vote, Some(Vote::new(9)));
    assert!(controller.subscribe_listings().latest().invalidated);
}

#[tokio::test]
async fn missing_listing_is_not_found() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = controller.listing(&ListingId::from("404")).await.unwrap_err();
    assert!(matches!(err, CoreError::ListingNotFound { .. }), "got {err:?}");
}

// ── Insert ──────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_without_discovery_after_404() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/discover"))
        .and(query_param("url", "http://x/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/houses"))
        .and(body_json(json!({ "link": "http://x/", "vote": 5, "comment": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = InsertForm::new();
    form.set_link("http://x/");
    let link = form.begin_discovery().unwrap();
    let found = controller.discover(&link).await;
    assert!(matches!(found, Err(CoreError::DiscoveryNotFound { .. })));
    form.finish_discovery(&link, found);
    assert_eq!(form.discovery_message().as_deref(), Some("Not found"));

    let cmd = form.submit().unwrap();
    let result = controller.execute(cmd).await;
    assert_eq!(
        result.as_ref().ok(),
        Some(&CommandResult::Inserted {
            id: Some(ListingId::from("abc"))
        })
    );
    form.finish_submit(result);
    assert!(!form.is_editing());
}

#[tokio::test]
async fn insert_invalidates_collection() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/houses"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    controller.listings().await.unwrap();
    controller
        .execute(Command::InsertListing(househunt_core::NewListing::new(
            "http://y/",
        )))
        .await
        .unwrap();
    assert!(controller.subscribe_listings().latest().invalidated);

    // The next read goes back to the server.
    controller.listings().await.unwrap();
}

#[tokio::test]
async fn discovery_server_error_is_distinct_from_not_found() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/discover"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = controller.discover("http://x/").await.unwrap_err();
    assert!(matches!(err, CoreError::DiscoveryFailed { .. }), "got {err:?}");
    assert!(err.to_string().starts_with("Discovery failed:"));
}

// ── Map ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn map_centers_on_selected_listing() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/houses"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([house("1", 45.0, 9.0), house("2", 46.0, 10.0)])),
        )
        .mount(&server)
        .await;

    let listings = controller.listings().await.unwrap();

    let unselected = MapModel::build(&listings, None);
    assert_eq!(unselected.center, Some(Coordinate { lat: 45.5, lng: 9.5 }));

    let Route::Map { selected } = Route::parse("#/map?houseId=2") else {
        panic!("expected map route");
    };
    let model = MapModel::build(&listings, selected.as_ref());
    assert_eq!(model.center, Some(Coordinate { lat: 46.0, lng: 10.0 }));

    let mut popups = PopupController::new();
    popups.set_markers(model.marker_ids().cloned());
    popups.set_selected(selected);
    popups.set_map_ready(true);
    assert_eq!(popups.open_popup(), Some(&ListingId::from("2")));
}
