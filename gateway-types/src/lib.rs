//! # Gateway Types
//!
//! Domain types and port traits for the payment gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Card rules, installment calculator, payment state machine
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CardBrand, CardNumber, Installment, MAX_INSTALLMENTS, NewPayment, Payment, PaymentId, PaymentStatus,
    Transition, compute_schedule, detect_brand,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{
    CardRegistry, CredentialValidator, GatewayRepository, PaymentRepository, TransitionOutcome,
};
