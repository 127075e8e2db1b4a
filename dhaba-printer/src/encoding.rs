//! Text width and encoding utilities for thermal printers
//!
//! The target printers run the default single-byte code page, so text must
//! be reduced to printable ASCII before it goes on the wire. This module
//! provides:
//! - Column width calculation for layout (`text_width`)
//! - Truncating/padding strings to a column width
//! - Lossy transliteration of non-ASCII characters (`to_printer_ascii`)

/// Column width of a string as the printer will render it
///
/// After transliteration every character occupies one column, so width
/// equals the transliterated length.
pub fn text_width(s: &str) -> usize {
    to_printer_ascii(s).len()
}

/// Truncate a string to fit within a column width
pub fn truncate_text(s: &str, max_width: usize) -> String {
    let ascii = to_printer_ascii(s);
    if ascii.len() <= max_width {
        return ascii;
    }
    ascii.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_text(s: &str, width: usize, align_right: bool) -> String {
    let ascii = to_printer_ascii(s);
    if ascii.len() >= width {
        return truncate_text(&ascii, width);
    }
    let spaces = width - ascii.len();
    if align_right {
        format!("{}{}", " ".repeat(spaces), ascii)
    } else {
        format!("{}{}", ascii, " ".repeat(spaces))
    }
}

/// Transliterate text to printable ASCII
///
/// Control bytes below 0x20 are preserved so ESC/POS commands embedded in
/// the stream are not corrupted. The rupee sign becomes "Rs." since the
/// default code page has no glyph for it; other non-ASCII characters
/// degrade to '?'.
pub fn to_printer_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{20B9}' => out.push_str("Rs."), // ₹
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupee_transliteration() {
        assert_eq!(to_printer_ascii("₹100"), "Rs.100");
    }

    #[test]
    fn test_control_bytes_preserved() {
        let s = "\x1B\x45\x01BOLD";
        assert_eq!(to_printer_ascii(s), s);
    }

    #[test]
    fn test_pad_left_and_right() {
        assert_eq!(pad_text("ab", 4, false), "ab  ");
        assert_eq!(pad_text("ab", 4, true), "  ab");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("abcdef", 4), "abcd");
        assert_eq!(truncate_text("ab", 4), "ab");
    }

    #[test]
    fn test_width_counts_transliterated_chars() {
        // ₹ expands to three columns
        assert_eq!(text_width("₹9"), 4);
    }
}
