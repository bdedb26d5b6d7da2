//! Scanning session
//!
//! One [`Session`] drives one till: it owns the cart and routes operator
//! commands to the scanner, the checkout and the catalog. Errors are turned
//! into messages by the caller; the session itself never stops on a failure.

use shared::money::format_amount;
use thiserror::Error;
use till_client::catalog::{LOW_STOCK_THRESHOLD, filter_products, low_stock};
use till_client::{
    BarcodeScanner, Cart, Checkout, HttpClient, OrphanPolicy, PosError, StoreApi, TaxPolicy,
};
use till_printer::{EscPosBuilder, NetworkPrinter, PrintError, PrintResult, Printer};
use tracing::{info, warn};

use crate::command::{Command, CommandError, CustomerField, HELP};
use crate::render::{LabelRenderer, PlainText, ReceiptRenderer, TicketWriter};

/// Maximum rows shown for catalog searches
const MAX_SEARCH_ROWS: usize = 20;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Pos(#[from] PosError),

    #[error("printer error: {0}")]
    Print(#[from] PrintError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Pos(e) => e.user_message(),
            SessionError::Print(e) => format!("Printer error: {e}"),
            SessionError::Command(e) => e.to_string(),
        }
    }
}

impl From<till_client::ClientError> for SessionError {
    fn from(err: till_client::ClientError) -> Self {
        SessionError::Pos(PosError::Backend(err))
    }
}

/// Where receipts and labels go
#[derive(Debug, Clone)]
pub enum Output {
    Printer(NetworkPrinter),
    /// Rendered as plain text into the reply
    Screen,
}

/// Result of handling one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Reply(String),
    Quit,
}

pub struct Session<C: HttpClient + Clone> {
    api: StoreApi<C>,
    scanner: BarcodeScanner<C>,
    checkout: Checkout<C>,
    cart: Cart,
    output: Output,
    width: usize,
}

impl<C: HttpClient + Clone> Session<C> {
    pub fn new(
        api: StoreApi<C>,
        tax: TaxPolicy,
        orphan_policy: OrphanPolicy,
        output: Output,
        width: usize,
    ) -> Self {
        Self {
            scanner: BarcodeScanner::new(api.clone()),
            checkout: Checkout::new(api.clone()).with_orphan_policy(orphan_policy),
            api,
            cart: Cart::with_policy(tax),
            output,
            width,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn handle(&mut self, command: Command) -> Result<Step, SessionError> {
        let reply = match command {
            Command::Scan(code) => match self.scanner.scan(&mut self.cart, &code).await? {
                Some(line) => format!(
                    "+ {} x{}  {}",
                    line.name(),
                    line.quantity,
                    format_amount(line.subtotal())
                ),
                None => String::new(),
            },
            Command::List => self.cart_view(),
            Command::SetQuantity { line, quantity } => {
                let id = self.line_id(line)?;
                self.cart.set_quantity(&id, quantity);
                self.cart_view()
            }
            Command::Remove { line } => {
                let id = self.line_id(line)?;
                self.cart.remove_line(&id);
                self.cart_view()
            }
            Command::Customer { field, value } => {
                let customer = self.cart.customer_mut();
                let slot = match field {
                    CustomerField::Name => &mut customer.name,
                    CustomerField::Phone => &mut customer.phone,
                    CustomerField::Email => &mut customer.email,
                    CustomerField::Notes => &mut customer.notes,
                };
                *slot = Some(value).filter(|v| !v.trim().is_empty());
                "ok".to_string()
            }
            Command::Submit => self.submit().await?,
            Command::Cancel => {
                self.cart.clear();
                "Cart cleared".to_string()
            }
            Command::Search(term) => {
                let products = self.api.products().list().await?;
                let found = filter_products(&products, &term);
                let mut out = String::new();
                for p in found.iter().take(MAX_SEARCH_ROWS) {
                    out.push_str(&format!(
                        "{:<14} {:<24} {:>9} stock {}\n",
                        p.barcode,
                        p.name,
                        format_amount(p.price),
                        p.stock
                    ));
                }
                out.push_str(&format!("{} match(es)", found.len()));
                out
            }
            Command::LowStock(threshold) => {
                let products = self.api.products().list().await?;
                let low = low_stock(&products, threshold.unwrap_or(LOW_STOCK_THRESHOLD));
                let mut out = String::new();
                for p in &low {
                    out.push_str(&format!("{:<14} {:<24} stock {}\n", p.barcode, p.name, p.stock));
                }
                out.push_str(&format!("{} product(s) low on stock", low.len()));
                out
            }
            Command::Label(code) => {
                let Some(product) = self.scanner.lookup(&code).await? else {
                    return Ok(Step::Reply(String::new()));
                };
                let preview = self
                    .emit(|w| LabelRenderer::new(&product).render(w))
                    .await?;
                if preview.is_empty() {
                    format!("Label sent for {}", product.name)
                } else {
                    preview
                }
            }
            Command::Receipt(id) => {
                let invoice = self.api.invoices().get(&id).await?;
                self.emit(|w| {
                    ReceiptRenderer::new(&invoice).render(w);
                    Ok(())
                })
                .await?
            }
            Command::Stats => {
                let dash = self.api.statistics().dashboard().await?;
                let inv = self.api.invoices().stats().await?;
                format!(
                    "Products: {}  (low stock: {})\n\
                     Invoices today: {}  sales {}\n\
                     Invoices: {} completed, {} pending, {} cancelled\n\
                     Revenue: {}",
                    dash.total_products,
                    dash.low_stock_products,
                    dash.today_invoices,
                    format_amount(dash.today_sales),
                    inv.completed_invoices,
                    inv.pending_invoices,
                    inv.cancelled_invoices,
                    format_amount(inv.total_revenue)
                )
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Step::Quit),
        };
        Ok(Step::Reply(reply))
    }

    async fn submit(&mut self) -> Result<String, SessionError> {
        let invoice = self.checkout.submit(&mut self.cart).await?;
        let summary = format!(
            "Invoice {} completed, total {}",
            invoice.invoice_number,
            format_amount(invoice.total)
        );
        // The sale is done even if the receipt cannot be printed
        let printed = self
            .emit(|w| {
                ReceiptRenderer::new(&invoice).render(w);
                Ok(())
            })
            .await;
        match printed {
            Ok(receipt) if receipt.is_empty() => Ok(summary),
            Ok(receipt) => Ok(format!("{receipt}\n{summary}")),
            Err(e) => {
                warn!(invoice_number = %invoice.invoice_number, error = %e, "Receipt not printed");
                Ok(format!("{summary}\n{}", e.user_message()))
            }
        }
    }

    /// Print a ticket, or render it to text when there is no printer
    async fn emit<F>(&self, render: F) -> Result<String, SessionError>
    where
        F: Fn(&mut dyn TicketWriter) -> PrintResult<()>,
    {
        match &self.output {
            Output::Printer(printer) => {
                let mut builder = EscPosBuilder::new(self.width);
                render(&mut builder)?;
                printer.print(&builder.build()).await?;
                info!(addr = printer.addr(), "Ticket printed");
                Ok(String::new())
            }
            Output::Screen => {
                let mut text = PlainText::new(self.width);
                render(&mut text)?;
                Ok(text.into_string())
            }
        }
    }

    fn line_id(&self, line: usize) -> Result<String, SessionError> {
        self.cart
            .lines()
            .get(line.wrapping_sub(1))
            .map(|l| l.product_id().to_string())
            .ok_or_else(|| {
                PosError::Validation(format!(
                    "no line {line}; the cart has {} line(s)",
                    self.cart.len()
                ))
                .into()
            })
    }

    fn cart_view(&self) -> String {
        if self.cart.is_empty() {
            return "Cart is empty".to_string();
        }
        let mut out = String::new();
        for (i, line) in self.cart.lines().iter().enumerate() {
            out.push_str(&format!(
                "{:>2}. {:<24} {:>4} x {:>9} = {:>10}\n",
                i + 1,
                line.name(),
                line.quantity,
                format_amount(line.unit_price()),
                format_amount(line.subtotal())
            ));
        }
        out.push_str(&format!(
            "Subtotal {}  Tax {}  Total {}",
            format_amount(self.cart.subtotal()),
            format_amount(self.cart.tax()),
            format_amount(self.cart.total())
        ));
        out
    }
}
