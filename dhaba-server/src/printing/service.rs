//! Print dispatch
//!
//! Renders receipts/tickets and hands the bytes to the transport chain:
//! network printer first, spool directory when the printer is down.

use std::path::PathBuf;

use dhaba_printer::{FallbackPrinter, NetworkPrinter, PrintResult, Printer, SpoolPrinter};
use shared::order::OrderGroup;

use super::kot::KotRenderer;
use super::renderer::ReceiptRenderer;
use crate::db::models::{Order, Restaurant};

/// Rendering plus transport for all POS print jobs
pub struct PrintService {
    printer: FallbackPrinter,
    receipt: ReceiptRenderer,
    kot: KotRenderer,
}

impl PrintService {
    /// Build the transport chain from config
    ///
    /// `printer_addr` empty or unset means spool-only operation.
    pub fn new(printer_addr: Option<&str>, spool_dir: PathBuf) -> PrintResult<Self> {
        let network = match printer_addr {
            Some(addr) => Some(NetworkPrinter::from_addr(addr)?),
            None => None,
        };
        let printer = FallbackPrinter::new(network, SpoolPrinter::new(spool_dir));

        Ok(Self {
            printer,
            receipt: ReceiptRenderer::new(),
            kot: KotRenderer::new(),
        })
    }

    /// Print the customer receipt for a finalized order
    pub async fn print_receipt(&self, order: &Order, restaurant: &Restaurant) -> PrintResult<()> {
        let bytes = self.receipt.render(order, restaurant);
        self.printer.print(&bytes).await
    }

    /// Print a kitchen ticket for a newly submitted order group
    pub async fn print_kot(&self, table_name: Option<&str>, group: &OrderGroup) -> PrintResult<()> {
        let bytes = self.kot.render(table_name, group);
        self.printer.print(&bytes).await
    }

    /// Print a short self-test slip
    pub async fn print_test(&self, restaurant_name: &str) -> PrintResult<()> {
        let mut b = dhaba_printer::EscPosBuilder::new(48);
        b.center();
        b.bold();
        b.line(restaurant_name);
        b.bold_off();
        b.line("Printer test OK");
        b.left();
        b.feed(3);
        b.cut();
        self.printer.print(&b.build()).await
    }

    /// Whether the network printer currently answers
    pub async fn is_online(&self) -> bool {
        self.printer.is_online().await
    }
}
