//! Serial port transport implementation
//!
//! Defaults match the analyzer line discipline: 9600 baud, 8 data bits, no
//! parity, 1 stop bit, software (XON/XOFF) flow control, 10 second read
//! timeout.

use crate::error::{Lis2Error, Lis2Result};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialStream;

/// Wrapper for SerialStream that implements Debug
struct DebugSerialStream(SerialStream);

impl fmt::Debug for DebugSerialStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialStream").finish()
    }
}

impl Deref for DebugSerialStream {
    type Target = SerialStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugSerialStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Serial port transport layer settings
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub flow_control: tokio_serial::FlowControl,
    pub timeout: Option<Duration>,
}

impl SerialSettings {
    /// Create serial settings with the analyzer line discipline (8N1,
    /// XON/XOFF) at the given baud rate
    pub fn new(port_name: String, baud_rate: u32) -> Self {
        Self {
            port_name,
            baud_rate,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            flow_control: tokio_serial::FlowControl::Software,
            timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Create serial settings with an explicit read timeout
    pub fn with_timeout(port_name: String, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(port_name, baud_rate)
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        // The instrument ships configured for 9600 baud.
        Self::new(String::new(), 9600)
    }
}

/// Serial port transport layer implementation
#[derive(Debug)]
pub struct SerialTransport {
    stream: Option<DebugSerialStream>,
    settings: SerialSettings,
    closed: bool,
}

impl SerialTransport {
    /// Create a new serial transport layer
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    /// Create serial transport with port name and the default 9600 baud rate
    pub fn new_simple(port_name: String) -> Self {
        Self::new(SerialSettings::new(port_name, 9600))
    }
}

#[async_trait]
impl TransportLayer for SerialTransport {
    async fn open(&mut self) -> Lis2Result<()> {
        if !self.closed {
            return Err(Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let builder = tokio_serial::new(&self.settings.port_name, self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .stop_bits(self.settings.stop_bits)
            .parity(self.settings.parity)
            .flow_control(self.settings.flow_control);

        let stream = SerialStream::open(&builder).map_err(|e| {
            Lis2Error::Connection(std::io::Error::other(format!(
                "Failed to open serial port: {}",
                e
            )))
        })?;

        self.stream = Some(DebugSerialStream(stream));
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl StreamAccessor for SerialTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> Lis2Result<()> {
        self.settings.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Lis2Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            Lis2Error::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Serial stream not connected",
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
                "Serial stream not connected",
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
                "Serial stream not connected",
            ))
        })?;

        stream.flush().await.map_err(Lis2Error::Connection)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> Lis2Result<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.flush().await;
        }
        self.closed = true;
        Ok(())
    }
}
