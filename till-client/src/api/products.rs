//! Products endpoints

use shared::{Product, ProductCreate, ProductUpdate, StockUpdate};
use tracing::instrument;

use super::{get_list, segment};
use crate::ClientResult;
use crate::http::HttpClient;

/// `/products` resource
pub struct ProductsApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> ProductsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /products`
    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        get_list(self.http, "/products").await
    }

    /// `GET /products/{id}`
    pub async fn get(&self, id: &str) -> ClientResult<Product> {
        self.http.get(&format!("/products/{}", segment(id))).await
    }

    /// `GET /products/barcode?code=…`
    ///
    /// The code is sent exactly as given; trimming is the caller's job.
    #[instrument(skip(self))]
    pub async fn by_barcode(&self, code: &str) -> ClientResult<Product> {
        self.http
            .get(&format!("/products/barcode?code={}", urlencoding::encode(code)))
            .await
    }

    /// `POST /products`
    pub async fn create(&self, data: &ProductCreate) -> ClientResult<Product> {
        data.validate()?;
        self.http.post("/products", data).await
    }

    /// `PATCH /products/{id}`
    pub async fn update(&self, id: &str, data: &ProductUpdate) -> ClientResult<Product> {
        data.validate()?;
        self.http
            .patch(&format!("/products/{}", segment(id)), data)
            .await
    }

    /// `PATCH /products/{id}/stock`
    pub async fn update_stock(&self, id: &str, quantity: i64) -> ClientResult<Product> {
        self.http
            .patch(
                &format!("/products/{}/stock", segment(id)),
                &StockUpdate { quantity },
            )
            .await
    }

    /// `DELETE /products/{id}`
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete::<serde_json::Value>(&format!("/products/{}", segment(id)))
            .await
            .map(|_| ())
    }
}
