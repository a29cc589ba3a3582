//! Ticket dispatch
//!
//! Renders are handed to the named output device for the ticket kind.
//! Failures surface; no retries here — the UI layer owns the manual
//! fallback (browser print dialog).

pub mod renderer;

use pos_printer::{Printer, SpoolPrinter};

use crate::config::Config;
use crate::utils::AppResult;

/// Ticket kinds map to distinct output devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Receipt,
    Kitchen,
}

/// Dispatch service holding one spooler printer per ticket kind
#[derive(Debug, Clone)]
pub struct TicketService {
    receipt: SpoolPrinter,
    kitchen: SpoolPrinter,
}

impl TicketService {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            receipt: SpoolPrinter::new(&config.receipt_device)?,
            kitchen: SpoolPrinter::new(&config.kitchen_device)?,
        })
    }

    /// Send a rendered document to the device for `kind`
    pub async fn dispatch(&self, document: &[u8], kind: TicketKind) -> AppResult<()> {
        let printer = match kind {
            TicketKind::Receipt => &self.receipt,
            TicketKind::Kitchen => &self.kitchen,
        };
        printer.print(document).await?;
        Ok(())
    }
}
