//! Card registry port.

use chrono::{DateTime, Utc};

use crate::domain::CardNumber;
use crate::error::RepoError;

/// Read-only view of the registered cards.
#[async_trait::async_trait]
pub trait CardRegistry: Send + Sync + 'static {
    /// Returns true iff a card with exactly this number is registered and its
    /// expiry is strictly after `now`.
    async fn is_admissible(&self, card: &CardNumber, now: DateTime<Utc>)
    -> Result<bool, RepoError>;
}
