mod common;

use axum::http::StatusCode;
use common::{app, body_bytes, body_json, get, NASA_KEY, NASA_PREFIX, UNREACHABLE};
use neo_relay::handlers::neo::LOOKUP_NOT_FOUND_MESSAGE;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn lookup_relays_upstream_body() {
    let nasa = MockServer::start().await;
    let body = r#"{"id":"3542519","name":"(2010 PK9)","is_potentially_hazardous_asteroid":true}"#;
    Mock::given(method("GET"))
        .and(path(format!("{}/neo/3542519", NASA_PREFIX)))
        .and(query_param("api_key", NASA_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .expect(1)
        .mount(&nasa)
        .await;

    let response = get(app(&nasa.uri(), UNREACHABLE), "/neo-lookup/3542519").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, body.as_bytes());
}

#[tokio::test]
async fn lookup_passes_through_upstream_not_found() {
    let nasa = MockServer::start().await;
    let body = r#"{"code":404,"http_error":"NOT_FOUND"}"#;
    Mock::given(method("GET"))
        .and(path(format!("{}/neo/0", NASA_PREFIX)))
        .respond_with(ResponseTemplate::new(404).set_body_raw(body, "application/json"))
        .mount(&nasa)
        .await;

    let response = get(app(&nasa.uri(), UNREACHABLE), "/neo-lookup/0").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_bytes(response).await, body.as_bytes());
}

#[tokio::test]
async fn lookup_transport_failure_is_fixed_not_found() {
    let response = get(app(UNREACHABLE, UNREACHABLE), "/neo-lookup/3542519").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": LOOKUP_NOT_FOUND_MESSAGE })
    );
}

#[tokio::test]
async fn lookup_non_json_upstream_body_is_fixed_not_found() {
    let nasa = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/neo/42", NASA_PREFIX)))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&nasa)
        .await;

    let response = get(app(&nasa.uri(), UNREACHABLE), "/neo-lookup/42").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], LOOKUP_NOT_FOUND_MESSAGE);
}

#[tokio::test]
async fn lookup_id_is_sent_as_a_single_path_segment() {
    let nasa = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/neo/2000433%20Eros", NASA_PREFIX)))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&nasa)
        .await;

    let response = get(app(&nasa.uri(), UNREACHABLE), "/neo-lookup/2000433%20Eros").await;

    assert_eq!(response.status(), StatusCode::OK);
}
