//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CardBrand, Payment, PaymentId, PaymentStatus};

// ─────────────────────────────────────────────────────────────────────────────
// Card DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Brand detected for a card number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardBrandResponse {
    /// Masked card number
    #[schema(example = "********1333")]
    pub card: String,
    pub brand: CardBrand,
}

/// Whether a card is admissible for new payments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CardValidityResponse {
    /// Masked card number
    #[schema(example = "********3333")]
    pub card: String,
    pub valid: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to preview an installment schedule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstallmentQuoteRequest {
    /// Principal
    #[schema(value_type = String, example = "1000.00")]
    pub total: Decimal,
    /// Factor applied to the whole principal (1.1 means +10%)
    #[schema(value_type = String, example = "1.1")]
    pub interest_rate: Decimal,
    /// Number of installments
    #[schema(example = 10)]
    pub installments: i32,
}

/// Request to create a payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Principal
    #[schema(value_type = String, example = "1000.00")]
    pub total: Decimal,
    /// Factor applied to the whole principal
    #[schema(value_type = String, example = "0.1")]
    pub interest_rate: Decimal,
    /// Selected installment count
    #[serde(default = "default_installments")]
    #[schema(example = 1)]
    pub installments: i32,
    /// Card number, `-` separators allowed
    #[schema(example = "1111-2222-3333")]
    pub card: String,
    #[schema(example = "123")]
    pub cvv: String,
}

fn default_installments() -> i32 {
    1
}

/// Response after creating a payment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentCreatedResponse {
    #[schema(example = "Payment created")]
    pub message: String,
    #[schema(value_type = i64, example = 1)]
    pub id: PaymentId,
}

/// Current status of a payment, as ordinal and name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatusResponse {
    #[schema(value_type = i64, example = 1)]
    pub id: PaymentId,
    /// Storage ordinal: 1 pending, 2 confirmed, 3 cancelled
    #[schema(example = 1)]
    pub code: i16,
    pub status: PaymentStatus,
}

impl PaymentStatusResponse {
    pub fn new(id: PaymentId, status: PaymentStatus) -> Self {
        Self {
            id,
            code: status.code(),
            status,
        }
    }
}

/// Response after a successful confirm or cancel.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransitionResponse {
    #[schema(value_type = i64, example = 1)]
    pub id: PaymentId,
    pub status: PaymentStatus,
    #[schema(example = "Payment confirmed")]
    pub message: String,
}

/// A stored payment. The CVV is never returned.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = i64, example = 1)]
    pub id: PaymentId,
    #[schema(value_type = String, example = "1000.00")]
    pub total: Decimal,
    #[schema(value_type = String, example = "0.1")]
    pub interest_rate: Decimal,
    pub installments: i32,
    /// Masked card number
    #[schema(example = "********3333")]
    pub card: String,
    pub status: PaymentStatus,
    #[schema(value_type = String, example = "2024-01-01T00:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            total: payment.total,
            interest_rate: payment.interest_rate,
            installments: payment.installments,
            card: payment.card.masked(),
            status: payment.status,
            created_at: payment.created_at,
        }
    }
}
