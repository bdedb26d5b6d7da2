//! Windows-1252 encoding utilities for Latin thermal printers
//!
//! Every character Windows-1252 can represent is a single byte on paper, so
//! layout widths are character counts. Characters outside the code page are
//! printed as `?`.

use encoding_rs::{EncoderResult, WINDOWS_1252};

/// ESC t 16 - select code page WPC1252
pub(crate) const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Printed width of a string in characters
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` characters
pub fn truncate_text(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate_text(s, width);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{}{}", spaces, s)
    } else {
        format!("{}{}", s, spaces)
    }
}

/// Encode text to Windows-1252; unmappable characters become `?`
pub fn encode_latin(s: &str) -> Vec<u8> {
    let mut encoder = WINDOWS_1252.new_encoder();
    let mut out = Vec::with_capacity(s.len());
    let mut chunk = [0u8; 256];
    let mut rest = s;
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(rest, &mut chunk, true);
        out.extend_from_slice(&chunk[..written]);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }
    out
}
