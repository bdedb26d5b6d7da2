//! Till Client - typed client and session layer for the store backend
//!
//! # Transports
//!
//! - **Network**: [`NetworkHttpClient`] talks to the backend over HTTP with reqwest
//! - **In-process**: [`OneshotHttpClient`] drives an axum `Router` directly
//!   (feature `in-process`, on by default)
//!
//! # Session layer
//!
//! [`Cart`] aggregates scanned products, [`BarcodeScanner`] resolves codes
//! into cart lines and [`Checkout`] turns a cart into a completed invoice.
//!
//! # Example
//!
//! ```ignore
//! use till_client::{BarcodeScanner, Cart, Checkout, ClientConfig, StoreApi};
//!
//! let api = StoreApi::new(ClientConfig::from_env().build_http_client()?);
//! let scanner = BarcodeScanner::new(api.clone());
//! let checkout = Checkout::new(api);
//!
//! let mut cart = Cart::new();
//! scanner.scan(&mut cart, "7501234567890").await?;
//! let invoice = checkout.submit(&mut cart).await?;
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;
pub mod scanner;

pub use api::StoreApi;
pub use cart::{Cart, CartLine, CustomerInfo, RoundingMode, TaxPolicy};
pub use checkout::{Checkout, OrphanPolicy, SubmissionState};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, PosError, PosResult};
pub use http::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
pub use scanner::BarcodeScanner;

// Re-export shared types for convenience
pub use shared::{
    Category, CategoryCreate, CategoryUpdate, DashboardStats, Invoice, InvoiceCreate, InvoiceItem,
    InvoiceStats, InvoiceStatus, InvoiceUpdate, Product, ProductCreate, ProductUpdate,
};
