//! # dhaba-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building (init, bold, double size, align, feed, cut)
//! - Character width handling and ASCII transliteration for CP437-class
//!   printers (the rupee sign prints as "Rs.")
//! - Network printing (TCP port 9100)
//! - Spool-to-file fallback when no printer is reachable
//!
//! Business logic (WHAT to print) stays in application code:
//! - Bill/receipt rendering → dhaba-server `printing::renderer`
//! - Kitchen ticket rendering → dhaba-server `printing::kot`
//!
//! ## Example
//!
//! ```ignore
//! use dhaba_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut b = EscPosBuilder::new(48);
//! b.center();
//! b.double_size();
//! b.line("DHABA JUNCTION");
//! b.reset_size();
//! b.left();
//! b.line_lr("TOTAL", "Rs.246.00");
//! b.cut();
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&b.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{pad_text, text_width, to_printer_ascii, truncate_text};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{FallbackPrinter, NetworkPrinter, Printer, SpoolPrinter};
