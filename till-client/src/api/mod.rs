//! Typed REST API of the store backend
//!
//! One accessor per resource, mirroring the backend routes:
//!
//! ```ignore
//! let api = StoreApi::new(config.build_http_client()?);
//! let products = api.products().list().await?;
//! let invoice = api.invoices().complete("inv-1").await?;
//! ```
//!
//! Request DTOs are validated before they are sent. Response amounts are
//! already numeric (see `shared::money`).

mod categories;
mod invoices;
mod products;
mod statistics;

pub use categories::CategoriesApi;
pub use invoices::InvoicesApi;
pub use products::ProductsApi;
pub use statistics::StatisticsApi;

use crate::http::HttpClient;

/// Entry point to the backend API
#[derive(Debug, Clone)]
pub struct StoreApi<C: HttpClient> {
    http: C,
}

impl<C: HttpClient> StoreApi<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// The underlying transport
    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn products(&self) -> ProductsApi<'_, C> {
        ProductsApi::new(&self.http)
    }

    pub fn categories(&self) -> CategoriesApi<'_, C> {
        CategoriesApi::new(&self.http)
    }

    pub fn invoices(&self) -> InvoicesApi<'_, C> {
        InvoicesApi::new(&self.http)
    }

    pub fn statistics(&self) -> StatisticsApi<'_, C> {
        StatisticsApi::new(&self.http)
    }
}

/// Path segment for a resource id
pub(crate) fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

/// Fetch a list endpoint; JSON `null` is read as an empty list
pub(crate) async fn get_list<C, T>(http: &C, path: &str) -> crate::ClientResult<Vec<T>>
where
    C: HttpClient,
    T: serde::de::DeserializeOwned + Send,
{
    Ok(http.get::<Option<Vec<T>>>(path).await?.unwrap_or_default())
}
