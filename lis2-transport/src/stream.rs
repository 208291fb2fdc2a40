//! Stream accessor trait for the transport layer

use crate::error::{Lis2Error, Lis2Result};
use async_trait::async_trait;
use std::time::Duration;

/// Byte-stream interface to a physical link with an analyzer
///
/// This is the contract the protocol engine runs against: `read` may return
/// fewer bytes than requested, `Ok(0)` means the stream has closed, and a
/// read that produces nothing within the configured timeout fails with
/// [`Lis2Error::Timeout`]. The engine treats that timeout as an abandoned
/// transmission, never a fatal condition.
#[async_trait]
pub trait StreamAccessor: Send + Sync {
    /// Set the read timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration. None means infinite timeout.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> Lis2Result<()>;

    /// Read data from the stream
    ///
    /// # Returns
    ///
    /// Number of bytes read, or 0 if EOF
    async fn read(&mut self, buf: &mut [u8]) -> Lis2Result<usize>;

    /// Write data to the stream
    ///
    /// # Returns
    ///
    /// Number of bytes written
    async fn write(&mut self, buf: &[u8]) -> Lis2Result<usize>;

    /// Write all data to the stream
    async fn write_all(&mut self, buf: &[u8]) -> Lis2Result<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..]).await?;
            if n == 0 {
                return Err(Lis2Error::Connection(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "Failed to write all data",
                )));
            }
            written += n;
        }
        Ok(())
    }

    /// Flush any buffered data
    async fn flush(&mut self) -> Lis2Result<()>;

    /// Check if the stream is closed
    fn is_closed(&self) -> bool;

    /// Close the stream
    async fn close(&mut self) -> Lis2Result<()>;
}

/// Transport layer trait that extends StreamAccessor
#[async_trait]
pub trait TransportLayer: StreamAccessor {
    /// Open the physical layer connection
    async fn open(&mut self) -> Lis2Result<()>;
}
