//! Aggregate statistics returned by the backend

use serde::{Deserialize, Serialize};

use crate::money::{deserialize_amount, deserialize_count};

/// Invoice counters from `GET /invoices/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStats {
    #[serde(deserialize_with = "deserialize_count")]
    pub total_invoices: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub completed_invoices: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub pending_invoices: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub cancelled_invoices: i64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_revenue: f64,
}

/// Dashboard counters from `GET /statistics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(deserialize_with = "deserialize_count")]
    pub total_products: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub total_invoices: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub today_invoices: i64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub today_sales: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "deserialize_count")]
    pub low_stock_products: i64,
}
