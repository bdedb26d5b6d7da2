//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;
use crate::money::{deserialize_amount, deserialize_count};
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, ValidationError, validate_amount,
    validate_optional_text, validate_required_text, validate_stock,
};

/// Product entity
///
/// Owned by the backend; the barcode is assigned server-side and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub barcode: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, coerced from number or numeric string
    #[serde(deserialize_with = "deserialize_amount")]
    pub price: f64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Embedded category relation, when the backend joins it
    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// Name of the embedded category, if joined
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}

/// Create product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_amount(self.price, "price")?;
        if let Some(stock) = self.stock {
            validate_stock(stock, "stock")?;
        }
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&self.image_url, "imageUrl", MAX_URL_LEN)
    }
}

/// Update product payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(price) = self.price {
            validate_amount(price, "price")?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock, "stock")?;
        }
        validate_optional_text(&self.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&self.image_url, "imageUrl", MAX_URL_LEN)
    }
}

/// Stock adjustment payload for `PATCH /products/{id}/stock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub quantity: i64,
}
