//! Domain-level building blocks shared across the storage and API crates:
//! account and phone number models, the storage contracts, the business-rule
//! services and the environment-driven configuration.

pub mod config;
pub mod model;
pub mod services;
pub mod storage;

pub use model::*;
pub use storage::*;
