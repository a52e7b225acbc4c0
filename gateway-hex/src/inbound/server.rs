//! HTTP Server configuration and startup.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use gateway_types::{CredentialValidator, GatewayRepository};

use super::auth::auth_middleware;
use super::handlers::{self, AppState};
use super::rate_limit::{RateLimiterState, rate_limit_middleware};
use crate::GatewayService;
use crate::openapi::ApiDoc;

/// HTTP Server for the payment gateway API.
pub struct HttpServer<R: GatewayRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
}

impl<R: GatewayRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service and credential check.
    pub fn new(service: GatewayService<R>, credentials: Arc<dyn CredentialValidator>) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                credentials,
            }),
            rate_limiter: Arc::new(RateLimiterState::default()), // 100 req/min default
        }
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(
        service: GatewayService<R>,
        credentials: Arc<dyn CredentialValidator>,
        requests_per_minute: u32,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                service,
                credentials,
            }),
            rate_limiter: Arc::new(RateLimiterState::new(
                requests_per_minute,
                Duration::from_secs(60),
            )),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api-docs/openapi.json",
                get(|| async { Json(ApiDoc::openapi()) }),
            )
            .route("/api/cards/{number}/brand", get(handlers::card_brand::<R>))
            .route("/api/cards/{number}/valid", get(handlers::card_validity::<R>))
            .route(
                "/api/payments/installments",
                post(handlers::quote_installments::<R>),
            )
            .route("/api/payments", post(handlers::create_payment::<R>))
            .route("/api/payments/{id}", get(handlers::get_payment::<R>))
            .route(
                "/api/payments/{id}/status",
                get(handlers::payment_status::<R>),
            )
            .route(
                "/api/payments/{id}/confirm",
                put(handlers::confirm_payment::<R>),
            )
            .route(
                "/api/payments/{id}/cancel",
                put(handlers::cancel_payment::<R>),
            )
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth_middleware::<R>,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
