//! Domain models for the payment gateway.

pub mod card;
pub mod installment;
pub mod payment;

pub use card::{CardBrand, CardNumber, detect_brand};
pub use installment::{Installment, MAX_INSTALLMENTS, compute_schedule};
pub use payment::{NewPayment, Payment, PaymentId, PaymentStatus, Transition};
