//! Invoices endpoints

use shared::{Invoice, InvoiceCreate, InvoiceStats, InvoiceUpdate};
use tracing::instrument;

use super::{get_list, segment};
use crate::ClientResult;
use crate::http::HttpClient;

/// `/invoices` resource
pub struct InvoicesApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> InvoicesApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /invoices` (with items)
    pub async fn list(&self) -> ClientResult<Vec<Invoice>> {
        get_list(self.http, "/invoices").await
    }

    /// `GET /invoices/{id}` (with items)
    pub async fn get(&self, id: &str) -> ClientResult<Invoice> {
        self.http.get(&format!("/invoices/{}", segment(id))).await
    }

    /// `GET /invoices/stats`
    pub async fn stats(&self) -> ClientResult<InvoiceStats> {
        self.http.get("/invoices/stats").await
    }

    /// `POST /invoices` - creates a pending invoice
    #[instrument(skip_all, fields(items = data.items.len()))]
    pub async fn create(&self, data: &InvoiceCreate) -> ClientResult<Invoice> {
        data.validate()?;
        self.http.post("/invoices", data).await
    }

    /// `PATCH /invoices/{id}`
    pub async fn update(&self, id: &str, data: &InvoiceUpdate) -> ClientResult<Invoice> {
        data.validate()?;
        self.http
            .patch(&format!("/invoices/{}", segment(id)), data)
            .await
    }

    /// `POST /invoices/{id}/complete` - the backend decrements stock
    #[instrument(skip(self))]
    pub async fn complete(&self, id: &str) -> ClientResult<Invoice> {
        self.http
            .post_empty(&format!("/invoices/{}/complete", segment(id)))
            .await
    }

    /// `POST /invoices/{id}/cancel`
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &str) -> ClientResult<Invoice> {
        self.http
            .post_empty(&format!("/invoices/{}/cancel", segment(id)))
            .await
    }

    /// `DELETE /invoices/{id}`
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete::<serde_json::Value>(&format!("/invoices/{}", segment(id)))
            .await
            .map(|_| ())
    }
}
