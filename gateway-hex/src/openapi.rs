//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use gateway_types::domain::{CardBrand, Installment, PaymentStatus};
use gateway_types::dto::{
    CardBrandResponse, CardValidityResponse, CreatePaymentRequest, InstallmentQuoteRequest,
    PaymentCreatedResponse, PaymentResponse, PaymentStatusResponse, TransitionResponse,
};
use serde::Serialize;
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

/// Error body returned by every failing endpoint.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Payment not found: 42")]
    pub error: String,
    /// Stable machine-readable tag; `INVALID_REQUEST` for bodies or paths that fail to parse
    #[schema(example = "NOT_FOUND")]
    pub kind: String,
    /// HTTP status code
    #[schema(example = 404)]
    pub code: u16,
}

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Detect the brand of a card number
#[utoipa::path(
    get,
    path = "/api/cards/{number}/brand",
    tag = "cards",
    security(("bearer_auth" = [])),
    params(("number" = String, Path, description = "Card number, `-` separators allowed")),
    responses(
        (status = 200, description = "Brand detected", body = CardBrandResponse),
        (status = 400, description = "Card number too short", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No brand rule matched", body = ErrorResponse)
    )
)]
async fn card_brand() {}

/// Check whether a card is registered and unexpired
#[utoipa::path(
    get,
    path = "/api/cards/{number}/valid",
    tag = "cards",
    security(("bearer_auth" = [])),
    params(("number" = String, Path, description = "Card number, `-` separators allowed")),
    responses(
        (status = 200, description = "Admission result", body = CardValidityResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Card registry unreachable", body = ErrorResponse)
    )
)]
async fn card_validity() {}

/// Preview an installment schedule
#[utoipa::path(
    post,
    path = "/api/payments/installments",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = InstallmentQuoteRequest,
    responses(
        (status = 200, description = "Flat installment schedule", body = Vec<Installment>),
        (status = 400, description = "Negative argument, zero or too many installments, or malformed JSON", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Body is missing a field or has the wrong type", body = ErrorResponse)
    )
)]
async fn quote_installments() {}

/// Create a payment
#[utoipa::path(
    post,
    path = "/api/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created as PENDING", body = PaymentCreatedResponse),
        (status = 400, description = "Card not admissible or negative values", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn create_payment() {}

/// Get a payment
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment found", body = PaymentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
async fn get_payment() {}

/// Get the status of a payment
#[utoipa::path(
    get,
    path = "/api/payments/{id}/status",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Current status", body = PaymentStatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
async fn payment_status() {}

/// Confirm a payment
#[utoipa::path(
    put,
    path = "/api/payments/{id}/confirm",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment confirmed", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 409, description = "Payment already cancelled", body = ErrorResponse)
    )
)]
async fn confirm_payment() {}

/// Cancel a payment
#[utoipa::path(
    put,
    path = "/api/payments/{id}/cancel",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment cancelled", body = TransitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 409, description = "Payment already confirmed", body = ErrorResponse)
    )
)]
async fn cancel_payment() {}

/// OpenAPI documentation for the payment gateway API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Gateway API",
        version = "1.0.0",
        description = "Card brand detection, card admission, installment quotes and the payment ledger.\n\n## Authentication\n\nEvery endpoint except `/health` and this document requires a Bearer API key:\n\n```\nAuthorization: Bearer <api key>\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        card_brand,
        card_validity,
        quote_installments,
        create_payment,
        get_payment,
        payment_status,
        confirm_payment,
        cancel_payment,
    ),
    components(
        schemas(
            CardBrand,
            CardBrandResponse,
            CardValidityResponse,
            Installment,
            InstallmentQuoteRequest,
            CreatePaymentRequest,
            PaymentCreatedResponse,
            PaymentResponse,
            PaymentStatus,
            PaymentStatusResponse,
            TransitionResponse,
            ErrorResponse,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "cards", description = "Card brand and admission checks"),
        (name = "payments", description = "Installment quotes and the payment ledger"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
