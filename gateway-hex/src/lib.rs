//! # Gateway Hex
//!
//! Application services and HTTP adapter for the payment gateway.
//!
//! ## Architecture
//!
//! - `service/` - Card validator, ledger and the gateway facade over both
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi`  - OpenAPI document served by the adapter
//!
//! Services are generic over the port traits from `gateway-types`, so any
//! adapter (SQL, in-memory) can be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::{CardValidator, GatewayService, Ledger};
