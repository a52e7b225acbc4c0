//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response},
};
use chrono::{Duration, Utc};
use gateway_hex::{GatewayService, inbound::HttpServer};
use gateway_repo::{SqliteRepo, security::ApiKeyValidator};
use gateway_types::CardNumber;
use http_body_util::BodyExt;

pub const API_KEY: &str = "sk_test_gateway";
pub const VALID_CARD: &str = "1111-2222-3333";
pub const EXPIRED_CARD: &str = "2222-3333-4444";

/// Builds a server over in-memory SQLite with one valid and one expired card.
pub async fn create_test_server(requests_per_minute: u32) -> HttpServer<SqliteRepo> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let now = Utc::now();
    repo.register_card(&CardNumber::normalize(VALID_CARD), now + Duration::days(365))
        .await
        .unwrap();
    repo.register_card(&CardNumber::normalize(EXPIRED_CARD), now - Duration::days(1))
        .await
        .unwrap();

    let credentials = Arc::new(ApiKeyValidator::from_keys([API_KEY]));
    HttpServer::with_rate_limit(GatewayService::new(repo), credentials, requests_per_minute)
}

pub async fn create_test_app() -> Router {
    create_test_server(1000).await.router()
}

pub fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", API_KEY));

    match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri, None)
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
