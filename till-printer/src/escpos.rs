//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::{SELECT_CP1252, encode_latin, text_width};
use crate::error::{PrintError, PrintResult};

/// Longest CODE128 payload accepted by `GS k` (length is a single byte)
const MAX_BARCODE_LEN: usize = 255;

/// CODE128 rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeOptions {
    /// Bar height in dots (1-255)
    pub height: u8,
    /// Module width in dots (2-6)
    pub module_width: u8,
    /// Print the human readable digits below the bars
    pub show_text: bool,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            height: 80,
            module_width: 2,
            show_text: true,
        }
    }
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is encoded to
/// Windows-1252 as it is appended; command bytes are written as is.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(2048);
        // Initialize printer (ESC @), then select WPC1252
        buf.extend_from_slice(&[0x1B, 0x40]);
        buf.extend_from_slice(&SELECT_CP1252);
        Self { buf, width }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write text, encoded to Windows-1252
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&encode_latin(s));
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned,
    /// with spaces filling the gap.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width(left);
        let rw = text_width(right);

        if lw + rw >= self.width {
            // Too long, just print with space
            self.text(left);
            self.text(" ");
            self.line(right)
        } else {
            let spaces = self.width - lw - rw;
            self.text(left);
            self.text(&" ".repeat(spaces));
            self.line(right)
        }
    }

    // === Barcodes ===

    /// Print a CODE128 barcode with default options
    pub fn barcode_code128(&mut self, data: &str) -> PrintResult<&mut Self> {
        self.barcode_code128_with(data, BarcodeOptions::default())
    }

    /// Print a CODE128 barcode (code set B)
    ///
    /// Data must be printable ASCII. A literal `{` is escaped as `{{`.
    pub fn barcode_code128_with(
        &mut self,
        data: &str,
        options: BarcodeOptions,
    ) -> PrintResult<&mut Self> {
        if data.is_empty() {
            return Err(PrintError::InvalidData("barcode data is empty".into()));
        }
        if let Some(c) = data.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(PrintError::InvalidData(format!(
                "character {c:?} cannot be encoded in CODE128"
            )));
        }

        let mut payload = b"{B".to_vec();
        for b in data.bytes() {
            if b == b'{' {
                payload.push(b'{');
            }
            payload.push(b);
        }
        if payload.len() > MAX_BARCODE_LEN {
            return Err(PrintError::InvalidData(format!(
                "barcode data too long ({} bytes)",
                data.len()
            )));
        }

        // GS h n - bar height
        self.buf.extend_from_slice(&[0x1D, 0x68, options.height.max(1)]);
        // GS w n - module width
        self.buf
            .extend_from_slice(&[0x1D, 0x77, options.module_width.clamp(2, 6)]);
        // GS H n - HRI position (0 none, 2 below)
        let hri = if options.show_text { 0x02 } else { 0x00 };
        self.buf.extend_from_slice(&[0x1D, 0x48, hri]);
        // GS k 73 n d1..dn - CODE128
        self.buf
            .extend_from_slice(&[0x1D, 0x6B, 0x49, payload.len() as u8]);
        self.buf.extend_from_slice(&payload);
        self.buf.push(b'\n');
        Ok(self)
    }

    // === Paper Control ===

    /// Feed n lines then cut (GS V 66 n)
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    /// Finish and return the print data
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
