//! Integration tests for the HTTP routes, driven in-process with `oneshot`.

mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::*;

async fn create_test_app(strategy: GeometryStrategy) -> (Router, StreetStore, tempfile::TempDir) {
    let (store, dir) = create_test_store(strategy).await;
    let app = streethub::http::router(Arc::new(store.clone()));
    (app, store, dir)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_returns_created_with_location() {
    let (app, _store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/streets",
            json!({"name": "Main St", "capacity": 2, "geometry": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location, format!("/streets/{id}"));
    assert_eq!(created["name"], "Main St");
    assert_eq!(created["capacity"], 2);
    assert_eq!(
        created["geometry"],
        json!({"type": "LineString", "coordinates": []})
    );

    let response = app.oneshot(empty_request(Method::GET, &location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn test_get_missing_street_is_404() {
    let (app, _store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;

    let response = app
        .oneshot(empty_request(Method::GET, "/streets/9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_204_regardless_of_existence() {
    let (app, store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;
    let street = store
        .create_street(&make_new_street("Main St", 2, &[]))
        .await
        .unwrap();
    let uri = format!("/streets/{}", street.id);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    let response = app
        .oneshot(empty_request(Method::DELETE, "/streets/9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.get_street_by_id(street.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_geometry_endpoint_appends_and_prepends() {
    for strategy in BOTH_STRATEGIES {
        let (app, store, _temp_dir) = create_test_app(strategy).await;
        let street = store
            .create_street(&make_new_street("Main St", 2, &[]))
            .await
            .unwrap();
        let uri = format!("/streets/{}/geometry", street.id);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &format!("{uri}?addToEnd=true"),
                json!({"x": 1.0, "y": 1.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // No addToEnd means prepend; GeoJSON point bodies are accepted too.
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &uri,
                json!({"type": "Point", "coordinates": [0.0, 0.0]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request(Method::GET, &format!("/streets/{}", street.id)))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await["geometry"]["coordinates"],
            json!([[0.0, 0.0], [1.0, 1.0]]),
            "{strategy}"
        );
    }
}

#[tokio::test]
async fn test_geometry_endpoint_on_missing_street_is_404() {
    let (app, store, _temp_dir) = create_test_app(GeometryStrategy::Database).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/streets/9999/geometry?addToEnd=false",
            json!({"x": 1.0, "y": 2.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store.get_streets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_put_replaces_street_or_404s() {
    let (app, store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;
    let street = store
        .create_street(&make_new_street("Old Rd", 1, &[(0.0, 0.0)]))
        .await
        .unwrap();
    let replacement = json!({
        "name": "New Rd",
        "capacity": 4,
        "geometry": {"type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]]}
    });

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/streets/{}", street.id),
            replacement.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], street.id);
    assert_eq!(updated["name"], "New Rd");

    let response = app
        .oneshot(json_request(Method::PUT, "/streets/9999", replacement))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_street_is_400() {
    let (app, store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/streets",
            json!({"name": "x".repeat(101), "capacity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.get_streets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_streets() {
    let (app, store, _temp_dir) = create_test_app(GeometryStrategy::InMemory).await;
    store.create_street(&make_new_street("A", 1, &[])).await.unwrap();
    store.create_street(&make_new_street("B", 2, &[(1.0, 1.0)])).await.unwrap();

    let response = app
        .oneshot(empty_request(Method::GET, "/streets"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let streets = body_json(response).await;
    let names: Vec<&str> = streets
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B"]);
}
