//! # till-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building, including CODE128 barcodes
//! - Windows-1252 encoding for Latin printers
//! - Network printing (TCP port 9100)
//!
//! What to print (receipts, barcode labels) lives in the terminal.
//!
//! ## Example
//!
//! ```ignore
//! use till_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.bold();
//! builder.line("Blue Vase");
//! builder.bold_off();
//! builder.barcode_code128("7501234567890")?;
//! builder.cut_feed(4);
//!
//! let printer = NetworkPrinter::from_addr("192.168.1.100")?;
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{encode_latin, pad_text, text_width, truncate_text};
pub use error::{PrintError, PrintResult};
pub use escpos::{BarcodeOptions, EscPosBuilder};
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer};
