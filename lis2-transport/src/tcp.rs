//! TCP transport implementation
//!
//! Analyzers are frequently wired through serial-to-Ethernet device servers;
//! this transport speaks the same byte-stream contract over such a bridge.

use crate::error::{Lis2Error, Lis2Result};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::fmt;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Wrapper for TcpStream that implements Debug
struct DebugTcpStream(TcpStream);

impl fmt::Debug for DebugTcpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpStream").finish()
    }
}

impl Deref for DebugTcpStream {
    type Target = TcpStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugTcpStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// TCP transport layer settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub address: SocketAddr,
    pub timeout: Option<Duration>,
}

impl TcpSettings {
    /// Create new TCP settings with the default 10 second frame timeout
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Create TCP settings with an explicit timeout
    pub fn with_timeout(address: SocketAddr, timeout: Duration) -> Self {
        Self {
            address,
            timeout: Some(timeout),
        }
    }
}

/// TCP transport layer implementation
#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<DebugTcpStream>,
    settings: TcpSettings,
    closed: bool,
}

impl TcpTransport {
    /// Create a new TCP transport layer
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    /// Create TCP transport from an address string
    pub fn from_address(address: &str) -> Lis2Result<Self> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| Lis2Error::InvalidData(format!("Invalid TCP address: {}", e)))?;
        Ok(Self::new(TcpSettings::new(addr)))
    }

    /// Create TCP transport from an already-connected stream
    pub fn from_connected_stream(stream: TcpStream, timeout: Option<Duration>) -> Self {
        Self {
            stream: Some(DebugTcpStream(stream)),
            settings: TcpSettings {
                address: SocketAddr::new(
                    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
                    0,
                ),
                timeout,
            },
            closed: false,
        }
    }
}

#[async_trait]
impl TransportLayer for TcpTransport {
    async fn open(&mut self) -> Lis2Result<()> {
        if !self.closed {
            return Err(Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect(self.settings.address))
                .await
                .map_err(|_| Lis2Error::Timeout)?
                .map_err(Lis2Error::Connection)?
        } else {
            TcpStream::connect(self.settings.address)
                .await
                .map_err(Lis2Error::Connection)?
        };

        self.stream = Some(DebugTcpStream(stream));
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for TcpTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> Lis2Result<()> {
        self.settings.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Lis2Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })?;

        let result = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, stream.read(buf))
                .await
                .map_err(|_| Lis2Error::Timeout)?
                .map_err(Lis2Error::Connection)
        } else {
            stream.read(buf).await.map_err(Lis2Error::Connection)
        };

        match result {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                if !matches!(e, Lis2Error::Timeout) {
                    self.closed = true;
                }
                Err(e)
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> Lis2Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })?;

        if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, stream.write(buf))
                .await
                .map_err(|_| Lis2Error::Timeout)?
                .map_err(Lis2Error::Connection)
        } else {
            stream.write(buf).await.map_err(Lis2Error::Connection)
        }
    }

    async fn flush(&mut self) -> Lis2Result<()> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })?;

        stream.flush().await.map_err(Lis2Error::Connection)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> Lis2Result<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }
}
