//! Application services.
//!
//! Orchestrates domain operations through the port traits.
//! Contains NO infrastructure logic - pure business orchestration.

mod cards;
mod ledger;

use std::sync::Arc;

use gateway_types::{
    AppError, CardBrand, CardNumber, CreatePaymentRequest, DomainError, GatewayRepository,
    Installment, InstallmentQuoteRequest, NewPayment, Payment, PaymentId, PaymentStatus,
    compute_schedule,
};

pub use cards::CardValidator;
pub use ledger::Ledger;

/// Facade over the card validator, the installment calculator and the ledger.
///
/// Generic over `R: GatewayRepository` - the adapter is injected at compile time
/// and shared by both components.
pub struct GatewayService<R: GatewayRepository> {
    cards: CardValidator<R>,
    ledger: Ledger<R>,
}

impl<R: GatewayRepository> GatewayService<R> {
    /// Creates a new gateway service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self::from_arc(Arc::new(repo))
    }

    /// Creates a service over a repository that is also held elsewhere.
    pub fn from_arc(repo: Arc<R>) -> Self {
        Self {
            cards: CardValidator::new(repo.clone()),
            ledger: Ledger::new(repo),
        }
    }

    pub fn ledger(&self) -> &Ledger<R> {
        &self.ledger
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Card Operations
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn detect_brand(&self, raw: &str) -> Result<CardBrand, AppError> {
        Ok(self.cards.detect_brand(raw)?)
    }

    pub async fn is_card_admissible(&self, raw: &str) -> Result<bool, AppError> {
        self.cards.is_admissible(raw).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Previews the installment schedule for a principal.
    pub fn quote_installments(
        &self,
        req: &InstallmentQuoteRequest,
    ) -> Result<Vec<Installment>, AppError> {
        Ok(compute_schedule(
            req.total,
            req.interest_rate,
            req.installments,
        )?)
    }

    /// Admits and records a payment.
    ///
    /// The card number is normalized first, so the registry lookup and the
    /// stored record both see the bare digits.
    #[tracing::instrument(
        skip(self, req),
        fields(card = %CardNumber::normalize(&req.card), installments = req.installments)
    )]
    pub async fn submit_payment(&self, req: CreatePaymentRequest) -> Result<PaymentId, AppError> {
        let draft = NewPayment::new(
            req.total,
            req.interest_rate,
            req.installments,
            CardNumber::normalize(&req.card),
            req.cvv,
        )?;

        if !self.cards.check(&draft.card).await? {
            tracing::warn!("payment refused: card not admissible");
            return Err(DomainError::CardNotAdmissible.into());
        }

        self.ledger.create(draft).await
    }

    pub async fn payment_status(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.ledger.get_status(id).await
    }

    pub async fn payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.ledger.get_payment(id).await
    }

    pub async fn confirm_payment(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.ledger.confirm(id).await
    }

    pub async fn cancel_payment(&self, id: PaymentId) -> Result<PaymentStatus, AppError> {
        self.ledger.cancel(id).await
    }
}
