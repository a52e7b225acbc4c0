//! Payment ledger: creation, lookup and status transitions.

use std::sync::Arc;

use gateway_types::{
    AppError, DomainError, NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus,
    Transition, TransitionOutcome,
};

/// Records payments and moves them through their status lifecycle.
///
/// The ledger does not check card admission; callers that accept payments
/// from the outside go through [`GatewayService::submit_payment`].
///
/// [`GatewayService::submit_payment`]: crate::GatewayService::submit_payment
pub struct Ledger<R: PaymentRepository> {
    repo: Arc<R>,
}

impl<R: PaymentRepository> Ledger<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Persists a draft as a new `PENDING` payment.
    #[tracing::instrument(skip(self, payment), fields(card = %payment.card))]
    pub async fn create(&self, payment: NewPayment) -> Result<PaymentId, AppError> {
        let id = self
            .repo
            .insert_payment(payment)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to record payment");
                AppError::persistence("create payment", e)
            })?;

        tracing::info!(payment_id = %id, "payment created");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_status(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.repo
            .get_status(id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to read payment status");
                AppError::persistence(format!("status of payment {}", id), e)
            })?
            .ok_or(AppError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.repo
            .get_payment(id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to read payment");
                AppError::persistence(format!("read payment {}", id), e)
            })?
            .ok_or(AppError::NotFound(id))
    }

    /// Moves a payment to `CONFIRMED` unless it has been cancelled.
    pub async fn confirm(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.transition(id, Transition::Confirm).await
    }

    /// Moves a payment to `CANCELLED` unless it has been confirmed.
    pub async fn cancel(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.transition(id, Transition::Cancel).await
    }

    #[tracing::instrument(skip(self, transition), fields(transition = %transition))]
    async fn transition(
        &self,
        id: PaymentId,
        transition: Transition,
    ) -> Result<PaymentStatus, AppError> {
        let outcome = self
            .repo
            .apply_transition(id, transition)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to update payment status");
                AppError::persistence(format!("{} payment {}", transition, id), e)
            })?;

        match outcome {
            TransitionOutcome::Applied(status) => {
                tracing::info!(payment_id = %id, %status, "payment status updated");
                Ok(status)
            }
            TransitionOutcome::NotFound => Err(AppError::NotFound(id)),
            TransitionOutcome::Rejected(current) => {
                tracing::warn!(payment_id = %id, %current, "transition rejected");
                Err(DomainError::InvalidTransition {
                    id,
                    current,
                    attempted: transition,
                }
                .into())
            }
        }
    }
}
