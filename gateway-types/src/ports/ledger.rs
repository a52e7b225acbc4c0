//! Payment ledger port.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement it.

use crate::domain::{NewPayment, Payment, PaymentId, PaymentStatus, Transition};
use crate::error::RepoError;

/// Result of an atomic guard-and-write on a payment's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The new status was written.
    Applied(PaymentStatus),
    /// No payment with the given id.
    NotFound,
    /// The guard refused the move; carries the status that blocked it.
    Rejected(PaymentStatus),
}

/// Persistence of payment records.
///
/// Status changes MUST go through [`PaymentRepository::apply_transition`],
/// which checks the guard and writes the new status as one atomic unit.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Persists a new payment with status `Pending` and returns its id.
    async fn insert_payment(&self, payment: NewPayment) -> Result<PaymentId, RepoError>;

    /// Gets a payment by ID.
    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Gets only the status of a payment.
    async fn get_status(&self, id: PaymentId) -> Result<Option<PaymentStatus>, RepoError>;

    /// Applies `transition` if its guard passes against the stored status.
    ///
    /// Two concurrent calls for the same id must never both observe `Pending`
    /// and both apply opposite transitions.
    async fn apply_transition(
        &self,
        id: PaymentId,
        transition: Transition,
    ) -> Result<TransitionOutcome, RepoError>;
}
