//! Payment request construction and validation
//!
//! Turns loosely-typed caller input into typed gateway requests. Nothing in
//! this module performs I/O; the [`crate::client`] layer sends what it builds.

pub mod error;
pub mod factory;
pub mod lists;
pub mod mapper;
pub mod money;
pub mod service;
pub mod types;
pub mod validator;

pub use error::{EetMismatchKind, ValidationError, ValidationResult};
pub use factory::{
    PaymentFactory, PaymentRequest, PaymentVariant, RecurrentPaymentFactory,
    RecurringPaymentFactory,
};
pub use service::PaymentsService;
pub use validator::Validators;
