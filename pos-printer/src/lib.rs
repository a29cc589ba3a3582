//! Ticket delivery for the POS station
//!
//! Hands rendered ticket documents to a named output device:
//! - OS print spooler (`lp -d <device>`)
//! - Network printers (raw TCP, port 9100)
//!
//! Rendering is the caller's concern; this crate only moves bytes.

pub mod error;
pub mod printer;

pub use error::{PrintError, PrintResult};
pub use printer::{NetworkPrinter, Printer, SpoolPrinter};
