//! Authentication middleware for bearer API keys.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use gateway_types::GatewayRepository;

use super::handlers::AppState;

/// Paths served without credentials.
const PUBLIC_PATHS: &[&str] = &["/health", "/api-docs/openapi.json"];

/// Extracts the API key from the Authorization header.
/// Expected format: "Bearer <api_key>" or just "<api_key>"
pub(crate) fn extract_api_key(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?.trim();
    let key = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!key.is_empty()).then_some(key)
}

/// Authentication middleware that validates API keys.
///
/// The key is taken from the Authorization header and handed to the
/// configured `CredentialValidator`. Missing or rejected keys get a 401;
/// a validator failure gets a 500.
pub async fn auth_middleware<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(api_key) = extract_api_key(auth_header) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match state.credentials.verify(api_key).await {
        Ok(true) => next.run(request).await,
        Ok(false) => unauthorized_response("Invalid API key"),
        Err(e) => {
            tracing::error!("API key verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "code": 500
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "kind": "UNAUTHORIZED",
            "code": 401
        })),
    )
        .into_response()
}
