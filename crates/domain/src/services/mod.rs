//! Business-rule services for accounts and phone numbers, plus telemetry
//! wiring shared by the binary.
//!
//! Services are stateless values borrowing a storage handle for the duration
//! of one request; each operation performs at most one committed write.

pub mod account;
mod error;
pub mod phone_number;
pub mod telemetry;

#[cfg(test)]
mod memory;

pub use account::AccountService;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use phone_number::PhoneNumberService;
pub use telemetry::*;
