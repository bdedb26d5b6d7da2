//! Receipt and barcode label rendering
//!
//! Renderers write through [`TicketWriter`], which is implemented both by the
//! ESC/POS builder (for the printer) and by [`PlainText`] (for stdout when no
//! printer is configured).

use shared::money::format_amount;
use shared::{Invoice, InvoiceStatus, Product};
use till_printer::{EscPosBuilder, PrintResult, pad_text, text_width, truncate_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Minimal layout surface shared by paper and screen output
pub trait TicketWriter {
    fn width(&self) -> usize;
    fn align(&mut self, align: Align);
    fn bold(&mut self, on: bool);
    fn large(&mut self, on: bool);
    fn line(&mut self, text: &str);
    fn line_lr(&mut self, left: &str, right: &str);
    fn separator(&mut self, heavy: bool);
    fn barcode(&mut self, data: &str) -> PrintResult<()>;
    fn finish(&mut self);
}

impl TicketWriter for EscPosBuilder {
    fn width(&self) -> usize {
        EscPosBuilder::width(self)
    }

    fn align(&mut self, align: Align) {
        match align {
            Align::Left => self.left(),
            Align::Center => self.center(),
        };
    }

    fn bold(&mut self, on: bool) {
        if on {
            EscPosBuilder::bold(self);
        } else {
            self.bold_off();
        }
    }

    fn large(&mut self, on: bool) {
        if on {
            self.double_size();
        } else {
            self.reset_size();
        }
    }

    fn line(&mut self, text: &str) {
        EscPosBuilder::line(self, text);
    }

    fn line_lr(&mut self, left: &str, right: &str) {
        EscPosBuilder::line_lr(self, left, right);
    }

    fn separator(&mut self, heavy: bool) {
        if heavy {
            self.sep_double();
        } else {
            self.sep_single();
        }
    }

    fn barcode(&mut self, data: &str) -> PrintResult<()> {
        self.barcode_code128(data)?;
        Ok(())
    }

    fn finish(&mut self) {
        self.cut_feed(4);
    }
}

/// Plain-text rendering for terminals
#[derive(Debug)]
pub struct PlainText {
    buf: String,
    width: usize,
    align: Align,
}

impl PlainText {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
            align: Align::Left,
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl TicketWriter for PlainText {
    fn width(&self) -> usize {
        self.width
    }

    fn align(&mut self, align: Align) {
        self.align = align;
    }

    fn bold(&mut self, _on: bool) {}

    fn large(&mut self, _on: bool) {}

    fn line(&mut self, text: &str) {
        if self.align == Align::Center {
            let indent = self.width.saturating_sub(text_width(text)) / 2;
            self.buf.push_str(&" ".repeat(indent));
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn line_lr(&mut self, left: &str, right: &str) {
        let used = text_width(left) + text_width(right);
        let gap = if used >= self.width {
            1
        } else {
            self.width - used
        };
        self.buf.push_str(left);
        self.buf.push_str(&" ".repeat(gap));
        self.buf.push_str(right);
        self.buf.push('\n');
    }

    fn separator(&mut self, heavy: bool) {
        let c = if heavy { "=" } else { "-" };
        self.buf.push_str(&c.repeat(self.width));
        self.buf.push('\n');
    }

    fn barcode(&mut self, data: &str) -> PrintResult<()> {
        self.line(&format!("||| {} |||", data));
        Ok(())
    }

    fn finish(&mut self) {}
}

/// Invoice receipt
pub struct ReceiptRenderer<'a> {
    invoice: &'a Invoice,
}

impl<'a> ReceiptRenderer<'a> {
    pub fn new(invoice: &'a Invoice) -> Self {
        Self { invoice }
    }

    pub fn render<W: TicketWriter + ?Sized>(&self, w: &mut W) {
        let inv = self.invoice;
        let width = w.width();

        w.align(Align::Center);
        w.large(true);
        w.bold(true);
        w.line("INVOICE");
        w.bold(false);
        w.large(false);
        match inv.status {
            InvoiceStatus::Completed => {}
            InvoiceStatus::Pending => w.line("*** PENDING ***"),
            InvoiceStatus::Cancelled => w.line("*** CANCELLED ***"),
        }

        w.align(Align::Left);
        let date = inv
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        w.line_lr(&format!("No: {}", inv.invoice_number), &date);
        for (label, value) in [
            ("Customer", &inv.customer_name),
            ("Phone", &inv.customer_phone),
            ("Email", &inv.customer_email),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                w.line(&truncate_text(&format!("{label}: {value}"), width));
            }
        }

        // QTY(3) NAME PRICE(9) AMOUNT(10), single spaces between
        let name_width = width.saturating_sub(3 + 9 + 10 + 3).max(8);
        w.separator(false);
        w.line(&format!(
            "{} {} {} {}",
            pad_text("QTY", 3, true),
            pad_text("DESCRIPTION", name_width, false),
            pad_text("PRICE", 9, true),
            pad_text("AMOUNT", 10, true)
        ));
        w.separator(true);
        for item in &inv.items {
            w.line(&format!(
                "{} {} {} {}",
                pad_text(&item.quantity.to_string(), 3, true),
                pad_text(item.product_name(), name_width, false),
                pad_text(&format_amount(item.unit_price), 9, true),
                pad_text(&format_amount(item.subtotal), 10, true)
            ));
        }
        w.separator(false);

        w.line_lr("Subtotal", &format_amount(inv.subtotal));
        w.line_lr("Tax", &format_amount(inv.tax));
        w.bold(true);
        w.line_lr("TOTAL", &format_amount(inv.total));
        w.bold(false);

        if let Some(notes) = inv.notes.as_deref().filter(|n| !n.is_empty()) {
            w.line("");
            w.line(&format!("Notes: {notes}"));
        }
        w.line("");
        w.align(Align::Center);
        w.line("Thank you for your purchase");
        w.finish();
    }
}

/// Shelf label: name, price and a CODE128 of the product barcode
pub struct LabelRenderer<'a> {
    product: &'a Product,
}

impl<'a> LabelRenderer<'a> {
    pub fn new(product: &'a Product) -> Self {
        Self { product }
    }

    pub fn render<W: TicketWriter + ?Sized>(&self, w: &mut W) -> PrintResult<()> {
        let width = w.width();
        w.align(Align::Center);
        w.bold(true);
        w.line(&truncate_text(&self.product.name, width));
        w.bold(false);
        w.large(true);
        w.line(&format_amount(self.product.price));
        w.large(false);
        w.barcode(&self.product.barcode)?;
        w.finish();
        Ok(())
    }
}
