//! In-memory store backend for integration tests
//!
//! An axum `Router` that imitates the REST backend closely enough for the
//! client: string-encoded decimals, `{statusCode, message}` error bodies,
//! empty `DELETE` responses and completion responses without items.
//! Every request is recorded so tests can assert on the calls made.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use till_client::{OneshotHttpClient, StoreApi};
use tokio::sync::Notify;

const TAX_RATE: f64 = 0.16;

/// One recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// Pauses `POST /invoices` until released
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
struct Failures {
    create_invoice: Option<(StatusCode, String)>,
    complete_invoice: Option<(StatusCode, String)>,
    cancel_invoice: Option<(StatusCode, String)>,
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    products: Mutex<Vec<Value>>,
    categories: Mutex<Vec<Value>>,
    invoices: Mutex<Vec<Value>>,
    failures: Mutex<Failures>,
    gate: Mutex<Option<Gate>>,
    next_id: AtomicU64,
}

impl FakeBackend {
    /// Backend seeded with three products
    ///
    /// | id | barcode | price |
    /// |----|---------|-------|
    /// | p1 | 100 | "19.99" (string) |
    /// | p2 | 200 | 10 (number) |
    /// | p3 | 300 | "5.50" (string) |
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        *backend.products.lock().unwrap() = vec![
            json!({"id": "p1", "name": "Blue Vase", "barcode": "100", "price": "19.99", "stock": 5}),
            json!({"id": "p2", "name": "Mug", "barcode": "200", "price": 10, "stock": "40"}),
            json!({"id": "p3", "name": "Candle", "barcode": "300", "price": "5.50", "stock": 12}),
        ];
        Arc::new(backend)
    }

    pub fn router(self: &Arc<Self>) -> Router {
        Router::new()
            .route("/products", get(products_list).post(product_create))
            .route("/products/barcode", get(product_by_barcode))
            .route(
                "/products/{id}",
                get(product_get).patch(product_update).delete(product_delete),
            )
            .route("/products/{id}/stock", patch(product_stock))
            .route("/categories", get(categories_list).post(category_create))
            .route(
                "/categories/{id}",
                get(category_get)
                    .patch(category_update)
                    .delete(category_delete),
            )
            .route("/invoices", get(invoices_list).post(invoice_create))
            .route("/invoices/stats", get(invoice_stats))
            .route(
                "/invoices/{id}",
                get(invoice_get).patch(invoice_update).delete(invoice_delete),
            )
            .route("/invoices/{id}/complete", post(invoice_complete))
            .route("/invoices/{id}/cancel", post(invoice_cancel))
            .route("/statistics", get(statistics))
            .with_state(self.clone())
    }

    pub fn api(self: &Arc<Self>) -> StoreApi<OneshotHttpClient> {
        StoreApi::new(OneshotHttpClient::new(self.router()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests with this method and exact path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn invoice_status(&self, id: &str) -> Option<String> {
        find(&self.invoices, id).and_then(|inv| inv["status"].as_str().map(str::to_string))
    }

    pub fn product_stock(&self, id: &str) -> Option<i64> {
        find(&self.products, id).map(|p| count_of(&p["stock"]))
    }

    pub fn fail_create_invoice(&self, status: StatusCode, message: &str) {
        self.failures.lock().unwrap().create_invoice = Some((status, message.to_string()));
    }

    pub fn fail_complete_invoice(&self, status: StatusCode, message: &str) {
        self.failures.lock().unwrap().complete_invoice = Some((status, message.to_string()));
    }

    pub fn fail_cancel_invoice(&self, status: StatusCode, message: &str) {
        self.failures.lock().unwrap().cancel_invoice = Some((status, message.to_string()));
    }

    /// Hold invoice creation until `gate.release` is notified
    pub fn gate_create_invoice(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn record(&self, method: &'static str, uri: &Uri, body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: uri.to_string(),
            body: body.cloned(),
        });
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

type Backend = State<Arc<FakeBackend>>;

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "message": message,
            "error": status.canonical_reason(),
        })),
    )
        .into_response()
}

fn not_found(kind: &str, id: &str) -> Response {
    api_error(StatusCode::NOT_FOUND, &format!("{kind} with ID {id} not found"))
}

fn find(table: &Mutex<Vec<Value>>, id: &str) -> Option<Value> {
    table.lock().unwrap().iter().find(|v| v["id"] == id).cloned()
}

/// Apply `patch` onto the row with `id`, returning the updated row
fn merge(table: &Mutex<Vec<Value>>, id: &str, patch: &Value) -> Option<Value> {
    let mut rows = table.lock().unwrap();
    let row = rows.iter_mut().find(|v| v["id"] == id)?;
    if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
    Some(row.clone())
}

fn remove(table: &Mutex<Vec<Value>>, id: &str) -> bool {
    let mut rows = table.lock().unwrap();
    let before = rows.len();
    rows.retain(|v| v["id"] != id);
    rows.len() != before
}

fn amount_of(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap_or(0.0),
        other => other.as_f64().unwrap_or(0.0),
    }
}

fn count_of(value: &Value) -> i64 {
    amount_of(value) as i64
}

/// Decimals go out as strings, like a numeric SQL column
fn decimal(value: f64) -> Value {
    Value::String(format!("{value:.2}"))
}

fn without_items(invoice: &Value) -> Value {
    let mut invoice = invoice.clone();
    invoice["items"] = Value::Null;
    invoice
}

// ========== Products ==========

async fn products_list(State(b): Backend, uri: Uri) -> Response {
    b.record("GET", &uri, None);
    Json(b.products.lock().unwrap().clone()).into_response()
}

async fn product_by_barcode(
    State(b): Backend,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    b.record("GET", &uri, None);
    let code = query.get("code").cloned().unwrap_or_default();
    let found = b
        .products
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["barcode"] == code.as_str())
        .cloned();
    match found {
        Some(product) => Json(product).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            &format!("Product with barcode {code} not found"),
        ),
    }
}

async fn product_get(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("GET", &uri, None);
    match find(&b.products, &id) {
        Some(product) => Json(product).into_response(),
        None => not_found("Product", &id),
    }
}

async fn product_create(State(b): Backend, uri: Uri, Json(body): Json<Value>) -> Response {
    b.record("POST", &uri, Some(&body));
    let n = b.next_id();
    let product = json!({
        "id": format!("p-new-{n}"),
        "name": body["name"],
        "barcode": format!("99{n:04}"),
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "price": decimal(amount_of(&body["price"])),
        "stock": body.get("stock").cloned().unwrap_or(json!(0)),
        "categoryId": body.get("categoryId").cloned().unwrap_or(Value::Null),
    });
    b.products.lock().unwrap().push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn product_update(
    State(b): Backend,
    uri: Uri,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record("PATCH", &uri, Some(&body));
    let mut patch = body.clone();
    if let Some(price) = body.get("price") {
        patch["price"] = decimal(amount_of(price));
    }
    match merge(&b.products, &id, &patch) {
        Some(product) => Json(product).into_response(),
        None => not_found("Product", &id),
    }
}

async fn product_stock(
    State(b): Backend,
    uri: Uri,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record("PATCH", &uri, Some(&body));
    match merge(&b.products, &id, &json!({"stock": body["quantity"]})) {
        Some(product) => Json(product).into_response(),
        None => not_found("Product", &id),
    }
}

async fn product_delete(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("DELETE", &uri, None);
    if remove(&b.products, &id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Product", &id)
    }
}

// ========== Categories ==========

async fn categories_list(State(b): Backend, uri: Uri) -> Response {
    b.record("GET", &uri, None);
    let categories = b.categories.lock().unwrap().clone();
    if categories.is_empty() {
        // Some backends answer an empty table with `null`
        return Json(Value::Null).into_response();
    }
    Json(categories).into_response()
}

async fn category_create(State(b): Backend, uri: Uri, Json(body): Json<Value>) -> Response {
    b.record("POST", &uri, Some(&body));
    if body["name"].as_str().is_none_or(|s| s.trim().is_empty()) {
        return api_error(StatusCode::BAD_REQUEST, "name should not be empty");
    }
    let category = json!({
        "id": format!("c{}", b.next_id()),
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
    });
    b.categories.lock().unwrap().push(category.clone());
    (StatusCode::CREATED, Json(category)).into_response()
}

async fn category_get(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("GET", &uri, None);
    match find(&b.categories, &id) {
        Some(category) => Json(category).into_response(),
        None => not_found("Category", &id),
    }
}

async fn category_update(
    State(b): Backend,
    uri: Uri,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record("PATCH", &uri, Some(&body));
    match merge(&b.categories, &id, &body) {
        Some(category) => Json(category).into_response(),
        None => not_found("Category", &id),
    }
}

async fn category_delete(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("DELETE", &uri, None);
    if remove(&b.categories, &id) {
        StatusCode::OK.into_response()
    } else {
        not_found("Category", &id)
    }
}

// ========== Invoices ==========

async fn invoices_list(State(b): Backend, uri: Uri) -> Response {
    b.record("GET", &uri, None);
    Json(b.invoices.lock().unwrap().clone()).into_response()
}

async fn invoice_stats(State(b): Backend, uri: Uri) -> Response {
    b.record("GET", &uri, None);
    let invoices = b.invoices.lock().unwrap().clone();
    let with_status = |s: &str| invoices.iter().filter(|i| i["status"] == s).count();
    let revenue: f64 = invoices
        .iter()
        .filter(|i| i["status"] == "completed")
        .map(|i| amount_of(&i["total"]))
        .sum();
    // Aggregates come back as strings
    Json(json!({
        "totalInvoices": invoices.len().to_string(),
        "completedInvoices": with_status("completed").to_string(),
        "pendingInvoices": with_status("pending").to_string(),
        "cancelledInvoices": with_status("cancelled").to_string(),
        "totalRevenue": decimal(revenue),
    }))
    .into_response()
}

async fn invoice_get(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("GET", &uri, None);
    match find(&b.invoices, &id) {
        Some(invoice) => Json(invoice).into_response(),
        None => not_found("Invoice", &id),
    }
}

async fn invoice_create(State(b): Backend, uri: Uri, Json(body): Json<Value>) -> Response {
    b.record("POST", &uri, Some(&body));

    let gate = b.gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.entered.notify_one();
        gate.release.notified().await;
    }

    let failure = b.failures.lock().unwrap().create_invoice.clone();
    if let Some((status, message)) = failure {
        return api_error(status, &message);
    }

    let n = b.next_id();
    let invoice_id = format!("inv-{n}");
    let mut items = Vec::new();
    let mut subtotal = 0.0;
    for line in body["items"].as_array().cloned().unwrap_or_default() {
        let product_id = line["productId"].as_str().unwrap_or_default().to_string();
        let Some(product) = find(&b.products, &product_id) else {
            return not_found("Product", &product_id);
        };
        let quantity = count_of(&line["quantity"]);
        let unit_price = amount_of(&product["price"]);
        let line_total = unit_price * quantity as f64;
        let item_id = format!("{invoice_id}-{}", items.len() + 1);
        subtotal += line_total;
        items.push(json!({
            "id": item_id,
            "invoiceId": &invoice_id,
            "productId": product_id,
            "quantity": quantity,
            "unitPrice": decimal(unit_price),
            "subtotal": decimal(line_total),
            "product": product,
        }));
    }
    let tax = subtotal * TAX_RATE;
    let invoice = json!({
        "id": invoice_id,
        "invoiceNumber": format!("INV-{n:06}"),
        "subtotal": decimal(subtotal),
        "tax": decimal(tax),
        "total": decimal(subtotal + tax),
        "status": "pending",
        "customerName": body.get("customerName").cloned().unwrap_or(Value::Null),
        "customerPhone": body.get("customerPhone").cloned().unwrap_or(Value::Null),
        "customerEmail": body.get("customerEmail").cloned().unwrap_or(Value::Null),
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
        "items": items,
    });
    b.invoices.lock().unwrap().push(invoice.clone());
    (StatusCode::CREATED, Json(invoice)).into_response()
}

async fn invoice_update(
    State(b): Backend,
    uri: Uri,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    b.record("PATCH", &uri, Some(&body));
    match merge(&b.invoices, &id, &body) {
        Some(invoice) => Json(invoice).into_response(),
        None => not_found("Invoice", &id),
    }
}

async fn invoice_complete(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("POST", &uri, None);
    let failure = b.failures.lock().unwrap().complete_invoice.clone();
    if let Some((status, message)) = failure {
        return api_error(status, &message);
    }
    let Some(invoice) = find(&b.invoices, &id) else {
        return not_found("Invoice", &id);
    };
    if invoice["status"] != "pending" {
        return api_error(StatusCode::BAD_REQUEST, "Only pending invoices can be completed");
    }
    for item in invoice["items"].as_array().cloned().unwrap_or_default() {
        let product_id = item["productId"].as_str().unwrap_or_default();
        if let Some(product) = find(&b.products, product_id) {
            let stock = count_of(&product["stock"]) - count_of(&item["quantity"]);
            merge(&b.products, product_id, &json!({"stock": stock}));
        }
    }
    match merge(&b.invoices, &id, &json!({"status": "completed"})) {
        Some(invoice) => Json(without_items(&invoice)).into_response(),
        None => not_found("Invoice", &id),
    }
}

async fn invoice_cancel(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("POST", &uri, None);
    let failure = b.failures.lock().unwrap().cancel_invoice.clone();
    if let Some((status, message)) = failure {
        return api_error(status, &message);
    }
    match merge(&b.invoices, &id, &json!({"status": "cancelled"})) {
        Some(invoice) => Json(without_items(&invoice)).into_response(),
        None => not_found("Invoice", &id),
    }
}

async fn invoice_delete(State(b): Backend, uri: Uri, Path(id): Path<String>) -> Response {
    b.record("DELETE", &uri, None);
    if remove(&b.invoices, &id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Invoice", &id)
    }
}

// ========== Statistics ==========

async fn statistics(State(b): Backend, uri: Uri) -> Response {
    b.record("GET", &uri, None);
    let products = b.products.lock().unwrap().clone();
    let invoices = b.invoices.lock().unwrap().clone();
    let revenue: f64 = invoices
        .iter()
        .filter(|i| i["status"] == "completed")
        .map(|i| amount_of(&i["total"]))
        .sum();
    let low_stock = products
        .iter()
        .filter(|p| count_of(&p["stock"]) <= 10)
        .count();
    Json(json!({
        "totalProducts": products.len(),
        "totalInvoices": invoices.len(),
        "todayInvoices": invoices.len().to_string(),
        "todaySales": decimal(revenue),
        "totalRevenue": decimal(revenue),
        "lowStockProducts": low_stock,
    }))
    .into_response()
}
