//! Data models
//!
//! Wire types exchanged with the store backend. JSON field names are
//! camelCase; every monetary field is coerced through
//! [`crate::money::deserialize_amount`].

pub mod category;
pub mod invoice;
pub mod product;
pub mod stats;

// Re-exports
pub use category::*;
pub use invoice::*;
pub use product::*;
pub use stats::*;
