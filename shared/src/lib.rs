//! Shared types for the Till workspace
//!
//! Wire models exchanged with the store backend, request DTOs and the
//! amount helpers every inbound payload goes through.

pub mod models;
pub mod money;
pub mod validation;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    Category, CategoryCreate, CategoryUpdate, DashboardStats, Invoice, InvoiceCreate, InvoiceItem,
    InvoiceLineInput, InvoiceStats, InvoiceStatus, InvoiceUpdate, Product, ProductCreate,
    ProductUpdate, StockUpdate,
};
pub use validation::ValidationError;
