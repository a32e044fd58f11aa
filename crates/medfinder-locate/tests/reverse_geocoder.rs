//! Integration tests for `ReverseGeocoder::resolve`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the request shape (query parameters and
//! identifying headers), the extraction fallback chain, every error variant,
//! and the optional key-gated fallback endpoint.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medfinder_locate::{Coordinates, GeocodeError, ReverseGeocoder, UNKNOWN_AREA, UNKNOWN_PINCODE};

const BENGALURU: Coordinates = Coordinates {
    latitude: 12.9716,
    longitude: 77.5946,
};

/// Builds a geocoder pointed at a mock server: 5-second timeout, descriptive UA.
fn test_geocoder(server: &MockServer) -> ReverseGeocoder {
    ReverseGeocoder::with_base_url(&server.uri(), 5, "medfinder-test/0.1")
        .expect("failed to build test ReverseGeocoder")
}

/// A Nominatim-style reverse response with the given address object.
fn reverse_body(address: serde_json::Value) -> serde_json::Value {
    json!({
        "display_name": "Indiranagar, Bengaluru, Karnataka, 560038, India",
        "address": address
    })
}

// ---------------------------------------------------------------------------
// Test 1 – request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_sends_structured_detail_query_and_identifying_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("lat", "12.9716"))
        .and(query_param("lon", "77.5946"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("zoom", "18"))
        .and(query_param("accept-language", "en"))
        .and(header("Accept-Language", "en"))
        .and(header("User-Agent", "medfinder-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&reverse_body(json!({
            "suburb": "Indiranagar",
            "postcode": "560038"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let result = geocoder.resolve(BENGALURU).await;

    let summary = result.expect("expected Ok for a well-formed response");
    assert_eq!(summary.area, "Indiranagar");
    assert_eq!(summary.pincode, "560038");
}

// ---------------------------------------------------------------------------
// Test 2 – fallback chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_falls_back_to_city_when_finer_fields_are_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&reverse_body(json!({
            "city": "Bengaluru",
            "postcode": "560001"
        }))))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let summary = geocoder.resolve(BENGALURU).await.expect("expected Ok");
    assert_eq!(summary.area, "Bengaluru", "city is used, not the sentinel");
    assert_eq!(summary.pincode, "560001");
}

#[tokio::test]
async fn resolve_uses_display_name_segment_when_address_fields_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "display_name": "Koramangala, Bengaluru, Karnataka, India",
            "address": { "country": "India" }
        })))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let summary = geocoder.resolve(BENGALURU).await.expect("expected Ok");
    assert_eq!(summary.area, "Koramangala");
    assert_eq!(summary.pincode, UNKNOWN_PINCODE);
}

#[tokio::test]
async fn resolve_yields_sentinels_when_nothing_is_extractable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "address": { "country": "India" }
        })))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let summary = geocoder.resolve(BENGALURU).await.expect("expected Ok");
    assert_eq!(summary.area, UNKNOWN_AREA, "exhaustion is still a success");
    assert_eq!(summary.pincode, UNKNOWN_PINCODE);
}

// ---------------------------------------------------------------------------
// Test 3 – error variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_maps_missing_address_object_to_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "error": "Unable to geocode"
        })))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let result = geocoder.resolve(BENGALURU).await;
    assert!(
        matches!(result, Err(GeocodeError::MissingAddress)),
        "expected MissingAddress, got: {result:?}"
    );
}

#[tokio::test]
async fn resolve_maps_non_success_status_to_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let result = geocoder.resolve(BENGALURU).await;
    match result {
        Err(GeocodeError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected GeocodeError::Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn resolve_maps_wrong_shape_to_deserialize_error() {
    let server = MockServer::start().await;

    // `address` as an array is valid JSON but not the expected shape.
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "address": ["not", "an", "object"]
        })))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server);
    let result = geocoder.resolve(BENGALURU).await;
    assert!(
        matches!(result, Err(GeocodeError::Deserialize(_))),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 4 – key-gated fallback endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_tries_fallback_endpoint_when_primary_fails() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("key", "pk.test123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&reverse_body(json!({
            "suburb": "Indiranagar",
            "postcode": "560038"
        }))))
        .expect(1)
        .mount(&fallback)
        .await;

    let geocoder = test_geocoder(&primary).with_fallback(&fallback.uri(), Some("pk.test123"));
    let summary = geocoder
        .resolve(BENGALURU)
        .await
        .expect("expected Ok via fallback endpoint");
    assert_eq!(summary.area, "Indiranagar");
}

#[tokio::test]
async fn resolve_without_fallback_propagates_primary_failure() {
    let primary = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;

    let geocoder = test_geocoder(&primary);
    let result = geocoder.resolve(BENGALURU).await;
    assert!(
        matches!(result, Err(GeocodeError::Status { status: 500, .. })),
        "expected the primary failure, got: {result:?}"
    );
}

#[tokio::test]
async fn resolve_propagates_fallback_failure_when_both_endpoints_fail() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    for server in [&primary, &fallback] {
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(502))
            .mount(server)
            .await;
    }

    let geocoder = test_geocoder(&primary).with_fallback(&fallback.uri(), None);
    let result = geocoder.resolve(BENGALURU).await;
    assert!(
        matches!(result, Err(GeocodeError::Status { status: 502, .. })),
        "expected the fallback failure, got: {result:?}"
    );
}
