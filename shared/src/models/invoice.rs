//! Invoice Model
//!
//! An invoice is created `pending` and moves to `completed` (stock is
//! decremented server-side) or `cancelled`. Line items are snapshots frozen
//! at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Product;
use crate::money::{deserialize_amount, deserialize_count};
use crate::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidationError,
    validate_optional_text,
};

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Completed,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Completed => "completed",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invoice line snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub product_id: String,
    #[serde(deserialize_with = "deserialize_count")]
    pub quantity: i64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub unit_price: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub subtotal: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded product relation, when the backend joins it
    #[serde(default)]
    pub product: Option<Product>,
}

impl InvoiceItem {
    /// Display name: the joined product name, falling back to the product id
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(self.product_id.as_str())
    }
}

/// Invoice entity (with items when the backend includes them)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Human-readable sequential number assigned by the backend
    pub invoice_number: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub subtotal: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub tax: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total: f64,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<InvoiceItem>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<InvoiceItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<InvoiceItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One requested line of a new invoice; the price is resolved server-side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineInput {
    pub product_id: String,
    pub quantity: i64,
}

/// Create invoice payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreate {
    pub items: Vec<InvoiceLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoiceCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::new("invoice must contain at least one item"));
        }
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(ValidationError::new(format!(
                    "quantity for product {} must be positive, got {}",
                    item.product_id, item.quantity
                )));
            }
        }
        validate_customer_fields(
            &self.customer_name,
            &self.customer_phone,
            &self.customer_email,
            &self.notes,
        )
    }
}

/// Update invoice payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoiceUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_customer_fields(
            &self.customer_name,
            &self.customer_phone,
            &self.customer_email,
            &self.notes,
        )
    }
}

fn validate_customer_fields(
    name: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    notes: &Option<String>,
) -> Result<(), ValidationError> {
    validate_optional_text(name, "customerName", MAX_NAME_LEN)?;
    validate_optional_text(phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(email, "customerEmail", MAX_EMAIL_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)
}
