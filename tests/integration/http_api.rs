#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use reelgraph::{graph::demo, server::build_router, source::MemorySource, MovieService};
use serde_json::{json, Value};
use tower::ServiceExt;

const ORIGIN: &str = "http://127.0.0.1";

fn app() -> Router {
    let service = MovieService::new(Arc::new(MemorySource::new(demo::movie_graph())));
    build_router(Arc::new(service), &[ORIGIN.to_string()])
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn health_reports_backend() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "backend": "memory" }));
}

#[tokio::test]
async fn movie_by_title_returns_api_shape() {
    let (status, body) = get("/api/movie?title=Speed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Title": "Speed",
            "Cast": [
                { "Name": "Keanu Reeves", "Job": "acted", "Role": ["Jack Traven"] },
                { "Name": "Jan de Bont", "Job": "directed" }
            ]
        })
    );
}

#[tokio::test]
async fn encoded_title_is_decoded() {
    let (status, body) = get("/api/movie?title=Top%20Gun").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Title"], "Top Gun");
}

#[tokio::test]
async fn missing_movie_is_404() {
    let (status, body) = get("/api/movie?title=Unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "movie not found" }));
}

#[tokio::test]
async fn missing_query_argument_is_400() {
    let (status, _) = get("/api/movie").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_routes_return_movies() {
    let (status, body) = get("/api/movies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(7));

    let (_, body) = get("/api/movies/by-director?name=Lana%20Wachowski").await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["Title"].as_str())
        .collect();
    assert_eq!(titles, ["The Matrix", "The Matrix Reloaded", "Cloud Atlas"]);

    let (_, body) = get("/api/movies/by-actor?name=Tom%20Cruise").await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (_, body) = get("/api/movies/related?title=Top%20Gun").await;
    assert_eq!(body[0]["Title"], "Jerry Maguire");
}

#[tokio::test]
async fn empty_list_is_404() {
    let (status, body) = get("/api/movies/by-actor?name=Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no movies found");
}

#[tokio::test]
async fn query_endpoint_dispatches_operations() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "operation": "moviesByActor", "name": "Keanu Reeves" }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "operation": "movieByTitle", "title": "Nosferatu" }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Title": "Nosferatu", "Cast": [] }));
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/movies")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}
