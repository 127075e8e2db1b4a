//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - Spool-to-file fallback (for reprint from a browser/PDF path)
//! - Ordered fallback chains over both

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
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

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

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

/// Spool printer - writes the job to a file in a spool directory
///
/// Last resort of a fallback chain: the operator can reprint the spooled
/// job from another device once a real printer is back.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    dir: PathBuf,
}

impl SpoolPrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the spool directory
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn job_path(&self) -> PathBuf {
        // Sequence suffix keeps two jobs in the same millisecond from
        // overwriting each other.
        static JOB_SEQ: AtomicU64 = AtomicU64::new(0);
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("job-{}-{:04}.escpos", millis, seq))
    }
}

impl Printer for SpoolPrinter {
    #[instrument(skip(data), fields(dir = %self.dir.display(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.job_path();
        tokio::fs::write(&path, data).await?;
        info!(path = %path.display(), "Print job spooled to file");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        // A writable directory is all we need
        tokio::fs::create_dir_all(&self.dir).await.is_ok()
    }
}

/// Ordered fallback chain of printer transports
///
/// Tries each transport in order and silently degrades to the next on
/// failure, logging each failed hop. Success means some transport accepted
/// the bytes; no printer acknowledgement is modeled.
pub struct FallbackPrinter {
    network: Option<NetworkPrinter>,
    spool: SpoolPrinter,
}

impl FallbackPrinter {
    pub fn new(network: Option<NetworkPrinter>, spool: SpoolPrinter) -> Self {
        Self { network, spool }
    }
}

impl Printer for FallbackPrinter {
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        if let Some(net) = &self.network {
            match net.print(data).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(error = %e, "Network transport failed, falling back to spool");
                }
            }
        }

        self.spool.print(data).await.map_err(|e| {
            PrintError::AllTransportsFailed(format!("spool fallback failed: {}", e))
        })
    }

    async fn is_online(&self) -> bool {
        if let Some(net) = &self.network
            && net.is_online().await
        {
            return true;
        }
        self.spool.is_online().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        let result = NetworkPrinter::from_addr("invalid");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_spool_printer_writes_job() {
        let dir = tempfile::tempdir().unwrap();
        let printer = SpoolPrinter::new(dir.path());

        printer.print(b"\x1B\x40hello\n").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_spool_keeps_same_millisecond_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let printer = SpoolPrinter::new(dir.path());

        for _ in 0..5 {
            printer.print(b"ticket").await.unwrap();
        }

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 5);
    }

    #[tokio::test]
    async fn test_fallback_degrades_to_spool() {
        let dir = tempfile::tempdir().unwrap();
        // Unroutable address, connection will fail fast or time out
        let net = NetworkPrinter::new("127.0.0.1", 1)
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let chain = FallbackPrinter::new(Some(net), SpoolPrinter::new(dir.path()));

        chain.print(b"ticket").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
