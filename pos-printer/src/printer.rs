//! Printer adapters for sending ticket documents
//!
//! Supports:
//! - OS spooler devices (`lp -d <device> <file>`)
//! - Network printers (TCP port 9100)

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send a rendered document to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// OS spooler printer
///
/// Writes the document to a spool file and hands it to `lp -d <device>`.
/// No retry on failure; the caller decides on a manual fallback.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    device: String,
}

impl SpoolPrinter {
    /// Create a spooler printer bound to a named output device
    pub fn new(device: &str) -> PrintResult<Self> {
        if device.trim().is_empty() {
            return Err(PrintError::InvalidConfig(
                "Output device name is empty".to_string(),
            ));
        }
        Ok(Self {
            device: device.to_string(),
        })
    }

    /// Get the device name
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Printer for SpoolPrinter {
    #[instrument(skip(data), fields(device = %self.device, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        // lp reads the file by path, so the handle must outlive the command
        let spool = tempfile::NamedTempFile::new()?;
        tokio::fs::write(spool.path(), data).await?;

        info!("Submitting {} bytes to spooler", data.len());

        let output = tokio::process::Command::new("lp")
            .arg("-d")
            .arg(&self.device)
            .arg(spool.path())
            .output()
            .await
            .map_err(|e| PrintError::Spooler(format!("lp not available: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrintError::Spooler(format!(
                "{}: {}",
                self.device,
                stderr.trim()
            )));
        }

        info!("Print job submitted");
        Ok(())
    }

    #[instrument(fields(device = %self.device))]
    async fn is_online(&self) -> bool {
        match tokio::process::Command::new("lpstat")
            .arg("-p")
            .arg(&self.device)
            .output()
            .await
        {
            Ok(out) if out.status.success() => {
                info!("Printer online");
                true
            }
            Ok(_) => {
                warn!("Printer unknown to spooler");
                false
            }
            Err(e) => {
                warn!(error = %e, "Spooler status check failed");
                false
            }
        }
    }
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        let mut stream = stream;
        stream.write_all(data).await.map_err(|e| {
            PrintError::Io(std::io::Error::new(
                e.kind(),
                format!("Write failed: {}", e),
            ))
        })?;

        stream.flush().await?;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => {
                info!("Printer online");
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spool_printer_rejects_empty_device() {
        assert!(matches!(
            SpoolPrinter::new("  "),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn spool_printer_keeps_device_name() {
        let printer = SpoolPrinter::new("kitchen").unwrap();
        assert_eq!(printer.device(), "kitchen");
    }

    #[test]
    fn network_printer_rejects_invalid_address() {
        assert!(matches!(
            NetworkPrinter::new("not an address", 9100),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn network_printer_offline_when_unreachable() {
        // Port 1 on loopback has no listener
        let printer = NetworkPrinter::new("127.0.0.1", 1)
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        assert!(!printer.is_online().await);
    }

    #[tokio::test]
    async fn network_printer_print_fails_when_unreachable() {
        let printer = NetworkPrinter::new("127.0.0.1", 1)
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let result = printer.print(b"ticket").await;
        assert!(matches!(
            result,
            Err(PrintError::Connection(_)) | Err(PrintError::Timeout(_))
        ));
    }
}
