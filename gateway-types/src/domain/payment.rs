//! Payment ("pagamento") domain model and its status state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::card::CardNumber;
use crate::error::DomainError;

/// Ledger-assigned identifier of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Situational status of a payment.
///
/// The discriminants are the storage and wire ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum PaymentStatus {
    Pending = 1,
    Confirmed = 2,
    Cancelled = 3,
}

impl PaymentStatus {
    /// Storage ordinal (1, 2 or 3).
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(PaymentStatus::Pending),
            2 => Some(PaymentStatus::Confirmed),
            3 => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Confirmed => write!(f, "CONFIRMED"),
            PaymentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A status-changing request against an existing payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Confirm,
    Cancel,
}

impl Transition {
    /// Status written when the transition is applied.
    pub fn target(self) -> PaymentStatus {
        match self {
            Transition::Confirm => PaymentStatus::Confirmed,
            Transition::Cancel => PaymentStatus::Cancelled,
        }
    }

    /// The only status from which this transition is refused.
    ///
    /// Re-applying a transition to its own target is allowed: confirming a
    /// confirmed payment (or cancelling a cancelled one) rewrites the same
    /// status.
    pub fn blocked_by(self) -> PaymentStatus {
        match self {
            Transition::Confirm => PaymentStatus::Cancelled,
            Transition::Cancel => PaymentStatus::Confirmed,
        }
    }

    /// Checks the guard against `current` and returns the new status.
    pub fn apply(self, id: PaymentId, current: PaymentStatus) -> Result<PaymentStatus, DomainError> {
        if current == self.blocked_by() {
            return Err(DomainError::InvalidTransition {
                id,
                current,
                attempted: self,
            });
        }
        Ok(self.target())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Confirm => write!(f, "confirm"),
            Transition::Cancel => write!(f, "cancel"),
        }
    }
}

/// Draft of a payment, admitted but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub total: Decimal,
    pub interest_rate: Decimal,
    pub installments: i32,
    pub card: CardNumber,
    pub cvv: String,
}

impl NewPayment {
    /// Builds a draft, rejecting negative numeric fields.
    pub fn new(
        total: Decimal,
        interest_rate: Decimal,
        installments: i32,
        card: CardNumber,
        cvv: String,
    ) -> Result<Self, DomainError> {
        if total < Decimal::ZERO {
            return Err(DomainError::NegativeArgument("total"));
        }
        if interest_rate < Decimal::ZERO {
            return Err(DomainError::NegativeArgument("interest_rate"));
        }
        if installments < 0 {
            return Err(DomainError::NegativeArgument("installments"));
        }
        Ok(Self {
            total,
            interest_rate,
            installments,
            card,
            cvv,
        })
    }
}

/// A persisted payment.
///
/// Only `status` ever changes after creation, and only through a
/// [`Transition`].
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub total: Decimal,
    pub interest_rate: Decimal,
    pub installments: i32,
    pub card: CardNumber,
    pub cvv: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}
