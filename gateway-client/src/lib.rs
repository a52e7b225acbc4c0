//! # Gateway Client SDK
//!
//! A typed Rust client for the payment gateway API.

use gateway_types::{
    CardBrandResponse, CardValidityResponse, CreatePaymentRequest, Installment,
    InstallmentQuoteRequest, PaymentCreatedResponse, PaymentId, PaymentResponse,
    PaymentStatusResponse, TransitionResponse,
};
use reqwest::{Client, Method};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        /// Machine-readable tag from the error body, when the server sent one
        kind: Option<String>,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The server's error tag, e.g. `INVALID_TRANSITION`.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Api { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }
}

/// Payment gateway API client.
pub struct GatewayClient {
    base_url: String,
    api_key: Option<String>,
    http: Client,
}

impl GatewayClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            http: Client::new(),
        }
    }

    /// Sets the API key sent as a bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cards
    // ─────────────────────────────────────────────────────────────────────────

    /// Detects the brand of a card number.
    pub async fn card_brand(&self, card: &str) -> Result<CardBrandResponse, ClientError> {
        self.get(&format!("/api/cards/{}/brand", card)).await
    }

    /// Checks whether a card is registered and unexpired.
    pub async fn card_validity(&self, card: &str) -> Result<CardValidityResponse, ClientError> {
        self.get(&format!("/api/cards/{}/valid", card)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payments
    // ─────────────────────────────────────────────────────────────────────────

    /// Previews an installment schedule.
    pub async fn quote_installments(
        &self,
        total: Decimal,
        interest_rate: Decimal,
        installments: i32,
    ) -> Result<Vec<Installment>, ClientError> {
        let req = InstallmentQuoteRequest {
            total,
            interest_rate,
            installments,
        };
        self.send(Method::POST, "/api/payments/installments", Some(&req))
            .await
    }

    /// Creates a payment.
    pub async fn create_payment(
        &self,
        req: &CreatePaymentRequest,
    ) -> Result<PaymentCreatedResponse, ClientError> {
        self.send(Method::POST, "/api/payments", Some(req)).await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<PaymentResponse, ClientError> {
        self.get(&format!("/api/payments/{}", id)).await
    }

    /// Gets the status of a payment.
    pub async fn payment_status(
        &self,
        id: PaymentId,
    ) -> Result<PaymentStatusResponse, ClientError> {
        self.get(&format!("/api/payments/{}/status", id)).await
    }

    /// Confirms a payment.
    pub async fn confirm_payment(&self, id: PaymentId) -> Result<TransitionResponse, ClientError> {
        self.send::<_, ()>(Method::PUT, &format!("/api/payments/{}/confirm", id), None)
            .await
    }

    /// Cancels a payment.
    pub async fn cancel_payment(&self, id: PaymentId) -> Result<TransitionResponse, ClientError> {
        self.send::<_, ()>(Method::PUT, &format!("/api/payments/{}/cancel", id), None)
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send::<_, ()>(Method::GET, path, None).await
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

fn api_error(status: u16, body: String) -> ClientError {
    let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|e| e.as_str())
            .map(String::from)
    };

    ClientError::Api {
        status,
        kind: field("kind"),
        message: field("error").unwrap_or(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GatewayClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = GatewayClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_api_key() {
        let client = GatewayClient::new("http://localhost:3000").with_api_key("test-key");
        assert_eq!(client.api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_api_error_reads_error_body() {
        let err = api_error(
            409,
            r#"{"error":"Cannot cancel payment 1: payment is already CONFIRMED","kind":"INVALID_TRANSITION","code":409}"#.to_string(),
        );

        assert_eq!(err.kind(), Some("INVALID_TRANSITION"));
        assert!(err.to_string().starts_with("API error: 409 - Cannot cancel payment 1"));
    }

    #[test]
    fn test_api_error_keeps_plain_body() {
        let err = api_error(400, "Invalid URL".to_string());

        assert_eq!(err.kind(), None);
        assert_eq!(err.to_string(), "API error: 400 - Invalid URL");
    }
}
