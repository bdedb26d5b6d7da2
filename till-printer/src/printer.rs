//! Printer adapters for sending ESC/POS data

use crate::error::{PrintError, PrintResult};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

/// Raw printing port used by most thermal printers
pub const DEFAULT_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: String,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer host".into()));
        }
        Ok(Self {
            addr: format!("{}:{}", host, port),
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from an address string
    ///
    /// Accepts `host:port` or a bare host, which uses port 9100.
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr = addr.trim();
        match addr.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse()
                    .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
                Self::new(host, port)
            }
            None => Self::new(addr, DEFAULT_PORT),
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address (`host:port`)
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        stream.write_all(data).await?;
        stream.flush().await?;
        stream.shutdown().await?;

        info!("Print job sent");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(_)) => true,
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
