//! Categories endpoints

use shared::{Category, CategoryCreate, CategoryUpdate};

use super::{get_list, segment};
use crate::ClientResult;
use crate::http::HttpClient;

/// `/categories` resource
pub struct CategoriesApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> CategoriesApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /categories`
    pub async fn list(&self) -> ClientResult<Vec<Category>> {
        get_list(self.http, "/categories").await
    }

    /// `GET /categories/{id}`
    pub async fn get(&self, id: &str) -> ClientResult<Category> {
        self.http.get(&format!("/categories/{}", segment(id))).await
    }

    /// `POST /categories`
    pub async fn create(&self, data: &CategoryCreate) -> ClientResult<Category> {
        data.validate()?;
        self.http.post("/categories", data).await
    }

    /// `PATCH /categories/{id}`
    pub async fn update(&self, id: &str, data: &CategoryUpdate) -> ClientResult<Category> {
        data.validate()?;
        self.http
            .patch(&format!("/categories/{}", segment(id)), data)
            .await
    }

    /// `DELETE /categories/{id}`
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.http
            .delete::<serde_json::Value>(&format!("/categories/{}", segment(id)))
            .await
            .map(|_| ())
    }
}
