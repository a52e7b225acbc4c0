//! Error types for the payment gateway.

use crate::domain::{PaymentId, PaymentStatus, Transition};

/// Domain-level errors (business rule violations and expected negative outcomes).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid card number format: expected at least {min} characters, got {got}")]
    InvalidCardFormat { min: usize, got: usize },

    #[error("Card brand invalid or not found")]
    BrandNotFound,

    #[error("Invalid argument: {0} cannot be negative")]
    NegativeArgument(&'static str),

    #[error("Division by zero: installment count must be greater than zero")]
    DivisionByZero,

    #[error("Invalid argument: at most {max} installments allowed, got {got}")]
    TooManyInstallments { max: i32, got: i32 },

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("Card is not registered or has expired")]
    CardNotAdmissible,

    #[error("Cannot {attempted} payment {id}: payment is already {current}")]
    InvalidTransition {
        id: PaymentId,
        current: PaymentStatus,
        attempted: Transition,
    },
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Application-level errors returned by the gateway services.
///
/// Storage failures are split by the component that hit them: card registry
/// lookups surface as [`AppError::Lookup`], ledger reads and writes as
/// [`AppError::Persistence`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Payment not found: {0}")]
    NotFound(PaymentId),

    #[error("Card lookup failed: {0}")]
    Lookup(String),

    #[error("Persistence failure ({context}): {message}")]
    Persistence { context: String, message: String },
}

impl AppError {
    pub fn persistence(context: impl Into<String>, err: RepoError) -> Self {
        AppError::Persistence {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Stable machine-readable tag for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::InvalidCardFormat { .. }) => "INVALID_FORMAT",
            AppError::Domain(DomainError::BrandNotFound) => "BRAND_NOT_FOUND",
            AppError::Domain(DomainError::NegativeArgument(_)) => "INVALID_ARGUMENT",
            AppError::Domain(DomainError::TooManyInstallments { .. }) => "INVALID_ARGUMENT",
            AppError::Domain(DomainError::Overflow(_)) => "INVALID_ARGUMENT",
            AppError::Domain(DomainError::DivisionByZero) => "DIVISION_BY_ZERO",
            AppError::Domain(DomainError::CardNotAdmissible) => "CARD_NOT_ADMISSIBLE",
            AppError::Domain(DomainError::InvalidTransition { .. }) => "INVALID_TRANSITION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Lookup(_) => "LOOKUP_ERROR",
            AppError::Persistence { .. } => "PERSISTENCE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_keeps_context() {
        let err = AppError::persistence(
            "confirm payment 42",
            RepoError::Database("connection refused".into()),
        );
        assert_eq!(err.kind(), "PERSISTENCE_ERROR");
        assert_eq!(
            err.to_string(),
            "Persistence failure (confirm payment 42): Database error: connection refused"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = DomainError::InvalidTransition {
            id: PaymentId::new(3),
            current: PaymentStatus::Cancelled,
            attempted: Transition::Confirm,
        };
        assert_eq!(
            err.to_string(),
            "Cannot confirm payment 3: payment is already CANCELLED"
        );
    }
}
