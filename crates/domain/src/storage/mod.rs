//! Storage abstractions implemented by the SeaORM adapter.

mod traits;

pub use traits::*;
