//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod credentials;
mod ledger;
mod registry;

pub use credentials::CredentialValidator;
pub use ledger::{PaymentRepository, TransitionOutcome};
pub use registry::CardRegistry;

/// A single store that backs both the card registry and the payment ledger.
pub trait GatewayRepository: CardRegistry + PaymentRepository {}

impl<T: CardRegistry + PaymentRepository> GatewayRepository for T {}
