//! Cart aggregation
//!
//! A [`Cart`] holds at most one line per product id, in the order products
//! were first added. Prices are captured when a product enters the cart and
//! are never refreshed; the backend recomputes everything on submission, so
//! the totals shown here are an estimate.
//!
//! Amounts accumulate as unrounded `f64` unless the [`TaxPolicy`] asks for
//! per-line rounding. Display goes through [`shared::money::format_amount`].

use shared::money::round_cents;
use shared::{InvoiceCreate, InvoiceLineInput, Product, ValidationError};

/// Default sales tax rate (16%)
pub const DEFAULT_TAX_RATE: f64 = 0.16;

/// When amounts are rounded to cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Accumulate unrounded; round only for display
    #[default]
    AtDisplay,
    /// Round every line subtotal and the tax half-up to cents
    PerLine,
}

/// Tax rate and rounding rule applied by a cart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxPolicy {
    rate: f64,
    rounding: RoundingMode,
}

impl TaxPolicy {
    /// Rate must be finite and within `[0, 1]`.
    pub fn new(rate: f64, rounding: RoundingMode) -> Result<Self, ValidationError> {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(ValidationError::new(format!(
                "tax rate must be between 0 and 1, got {rate}"
            )));
        }
        Ok(Self { rate, rounding })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            rate: DEFAULT_TAX_RATE,
            rounding: RoundingMode::AtDisplay,
        }
    }
}

/// One product in the cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Snapshot taken when the product was first added
    pub product: Product,
    /// Always at least 1
    pub quantity: i64,
}

impl CartLine {
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    pub fn name(&self) -> &str {
        &self.product.name
    }

    pub fn unit_price(&self) -> f64 {
        self.product.price
    }

    /// Unit price × quantity, unrounded
    pub fn subtotal(&self) -> f64 {
        self.product.price * self.quantity as f64
    }
}

/// Optional customer metadata attached to a sale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl CustomerInfo {
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.phone, &self.email, &self.notes]
            .iter()
            .all(|field| non_blank(field).is_none())
    }
}

/// Trimmed value, or `None` when blank
fn non_blank(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Cart of products being sold
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer: CustomerInfo,
    policy: TaxPolicy,
}

impl Cart {
    /// Empty cart with the default 16% tax
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: TaxPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> TaxPolicy {
        self.policy
    }

    /// Add one unit of `product`
    ///
    /// Increments the existing line for the same product id, otherwise
    /// appends a new line with quantity 1. Returns the affected line.
    pub fn add_or_increment(&mut self, product: Product) -> &CartLine {
        let index = match self.position(&product.id) {
            Some(index) => {
                self.lines[index].quantity += 1;
                index
            }
            None => {
                self.lines.push(CartLine {
                    product,
                    quantity: 1,
                });
                self.lines.len() - 1
            }
        };
        &self.lines[index]
    }

    /// Set the quantity of a line; `<= 0` removes it
    ///
    /// Stock is not checked here, the backend rejects oversold invoices.
    /// Unknown ids are ignored.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(product_id);
            return;
        }
        if let Some(index) = self.position(product_id) {
            self.lines[index].quantity = quantity;
        }
    }

    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across lines
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn customer_mut(&mut self) -> &mut CustomerInfo {
        &mut self.customer
    }

    pub fn subtotal(&self) -> f64 {
        match self.policy.rounding {
            RoundingMode::AtDisplay => self.lines.iter().map(CartLine::subtotal).sum(),
            RoundingMode::PerLine => self
                .lines
                .iter()
                .map(|line| round_cents(line.subtotal()))
                .sum(),
        }
    }

    pub fn tax(&self) -> f64 {
        let tax = self.subtotal() * self.policy.rate;
        match self.policy.rounding {
            RoundingMode::AtDisplay => tax,
            RoundingMode::PerLine => round_cents(tax),
        }
    }

    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }

    /// Empty the lines and forget the customer
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = CustomerInfo::default();
    }

    /// Build the create-invoice payload
    ///
    /// Only product ids and quantities are sent; prices are resolved by the
    /// backend. Blank customer fields are omitted.
    pub fn invoice_request(&self) -> InvoiceCreate {
        InvoiceCreate {
            items: self
                .lines
                .iter()
                .map(|line| InvoiceLineInput {
                    product_id: line.product.id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            customer_name: non_blank(&self.customer.name),
            customer_phone: non_blank(&self.customer.phone),
            customer_email: non_blank(&self.customer.email),
            notes: non_blank(&self.customer.notes),
        }
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.id == product_id)
    }
}
