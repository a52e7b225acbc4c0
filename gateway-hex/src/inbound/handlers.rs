//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use gateway_types::{
    AppError, CardBrandResponse, CardNumber, CardValidityResponse, CreatePaymentRequest,
    CredentialValidator, DomainError, GatewayRepository, InstallmentQuoteRequest,
    PaymentCreatedResponse, PaymentResponse, PaymentStatusResponse, TransitionResponse,
};

use super::extract::{ApiJson, IdPath};
use crate::GatewayService;

/// Application state shared across handlers.
pub struct AppState<R: GatewayRepository> {
    pub service: GatewayService<R>,
    pub credentials: Arc<dyn CredentialValidator>,
}

/// Body text returned for every 5xx; the underlying cause only goes to the log.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
///
/// `Rejected` carries axum extractor failures (bad JSON, non-numeric path ids)
/// so they share the `{error, kind, code}` body with application errors.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Rejected { status: StatusCode, message: String },
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::App(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::App(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::App(AppError::Domain(DomainError::BrandNotFound)) => StatusCode::NOT_FOUND,
            ApiError::App(AppError::Domain(DomainError::InvalidTransition { .. })) => {
                StatusCode::CONFLICT
            }
            ApiError::App(AppError::Domain(_)) => StatusCode::BAD_REQUEST,
            ApiError::App(AppError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::App(AppError::Lookup(_) | AppError::Persistence { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Rejected { status, .. } => *status,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::App(err) => err.kind(),
            ApiError::Rejected { .. } => "INVALID_REQUEST",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::App(err) => err.to_string(),
            ApiError::Rejected { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self.message(), "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message()
        };

        let body = serde_json::json!({
            "error": message,
            "kind": self.kind(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cards
// ─────────────────────────────────────────────────────────────────────────────

/// Detect the brand of a card number.
#[tracing::instrument(skip(state, number), fields(card = %CardNumber::normalize(&number)))]
pub async fn card_brand<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = state.service.detect_brand(&number)?;
    Ok(Json(CardBrandResponse {
        card: CardNumber::normalize(&number).masked(),
        brand,
    }))
}

/// Check whether a card is registered and unexpired.
#[tracing::instrument(skip(state, number), fields(card = %CardNumber::normalize(&number)))]
pub async fn card_validity<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = state.service.is_card_admissible(&number).await?;
    Ok(Json(CardValidityResponse {
        card: CardNumber::normalize(&number).masked(),
        valid,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

/// Preview an installment schedule.
#[tracing::instrument(skip(state))]
pub async fn quote_installments<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    ApiJson(req): ApiJson<InstallmentQuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = state.service.quote_installments(&req)?;
    Ok(Json(schedule))
}

/// Create a payment for an admissible card.
#[tracing::instrument(skip(state, req))]
pub async fn create_payment<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    ApiJson(req): ApiJson<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.service.submit_payment(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(PaymentCreatedResponse {
            message: "Payment created".to_string(),
            id,
        }),
    ))
}

/// Get a stored payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state.service.payment(id).await?;
    Ok(Json(PaymentResponse::from(payment)))
}

/// Get the status of a payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn payment_status<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.service.payment_status(id).await?;
    Ok(Json(PaymentStatusResponse::new(id, status)))
}

/// Confirm a pending payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn confirm_payment<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.service.confirm_payment(id).await?;
    Ok(Json(TransitionResponse {
        id,
        status,
        message: "Payment confirmed".to_string(),
    }))
}

/// Cancel a pending payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn cancel_payment<R: GatewayRepository>(
    State(state): State<Arc<AppState<R>>>,
    IdPath(id): IdPath,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.service.cancel_payment(id).await?;
    Ok(Json(TransitionResponse {
        id,
        status,
        message: "Payment cancelled".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_types::{PaymentId, PaymentStatus, Transition};

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                AppError::Domain(DomainError::InvalidCardFormat { min: 9, got: 4 }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::BrandNotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Domain(DomainError::DivisionByZero),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::CardNotAdmissible),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::InvalidTransition {
                    id: PaymentId::new(1),
                    current: PaymentStatus::Confirmed,
                    attempted: Transition::Cancel,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::NotFound(PaymentId::new(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Lookup("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::App(err).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_server_errors_hide_storage_detail() {
        let err = AppError::Persistence {
            context: "create payment".into(),
            message: "error returned from database: relation \"payments\" does not exist"
                .into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(body["kind"], "PERSISTENCE_ERROR");
        assert_eq!(body["code"], 500);
        assert!(!body.to_string().contains("relation"));
    }

    #[test]
    fn test_rejections_keep_their_status() {
        let err = ApiError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "missing field `total`".into(),
        };
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "INVALID_REQUEST");
    }
}
