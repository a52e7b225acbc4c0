//! Card validation: brand detection and registry admission.

use std::sync::Arc;

use chrono::Utc;

use gateway_types::{AppError, CardBrand, CardNumber, CardRegistry, DomainError, detect_brand};

/// Classifies card numbers and checks them against the card registry.
pub struct CardValidator<C: CardRegistry> {
    registry: Arc<C>,
}

impl<C: CardRegistry> CardValidator<C> {
    pub fn new(registry: Arc<C>) -> Self {
        Self { registry }
    }

    /// Detects the brand of a raw card number. Never touches the registry.
    pub fn detect_brand(&self, raw: &str) -> Result<CardBrand, DomainError> {
        detect_brand(raw)
    }

    /// Normalizes `raw` and reports whether the registry holds an unexpired
    /// entry for it.
    pub async fn is_admissible(&self, raw: &str) -> Result<bool, AppError> {
        self.check(&CardNumber::normalize(raw)).await
    }

    /// Admission check on an already normalized number.
    #[tracing::instrument(skip(self, card), fields(card = %card))]
    pub async fn check(&self, card: &CardNumber) -> Result<bool, AppError> {
        let admissible = self
            .registry
            .is_admissible(card, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "card registry lookup failed");
                AppError::Lookup(format!("card {}: {}", card, e))
            })?;

        tracing::debug!(admissible, "card admission checked");
        Ok(admissible)
    }
}
