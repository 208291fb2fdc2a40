//! Scripted in-memory stream for protocol tests
//!
//! Plays back a queue of read outcomes (data chunks, timeouts, then EOF) and
//! records every byte the engine writes, so handshake sequences can be
//! asserted without a physical port.

use crate::error::{Lis2Error, Lis2Result};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted read outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRead {
    /// Bytes delivered to the reader (possibly across several `read` calls)
    Data(Vec<u8>),
    /// A read that expires with [`Lis2Error::Timeout`]
    Timeout,
}

/// Scripted stream accessor
///
/// Reads drain the script in order; an exhausted script reads as EOF.
#[derive(Debug, Default)]
pub struct MockStream {
    script: VecDeque<MockRead>,
    pending: VecDeque<u8>,
    written: Vec<u8>,
    closed: bool,
}

impl MockStream {
    /// Create a stream that will play back the given script
    pub fn new(script: impl IntoIterator<Item = MockRead>) -> Self {
        Self {
            script: script.into_iter().collect(),
            pending: VecDeque::new(),
            written: Vec::new(),
            closed: false,
        }
    }

    /// Create a stream that delivers one contiguous byte sequence
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new([MockRead::Data(bytes.into())])
    }

    /// Append another read outcome to the script
    pub fn push(&mut self, read: MockRead) {
        self.script.push_back(read);
    }

    /// All bytes written by the engine so far
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

#[async_trait]
impl StreamAccessor for MockStream {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> Lis2Result<()> {
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Lis2Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pending.is_empty() {
            match self.script.pop_front() {
                Some(MockRead::Data(bytes)) => self.pending.extend(bytes),
                Some(MockRead::Timeout) => return Err(Lis2Error::Timeout),
                None => {
                    self.closed = true;
                    return Ok(0);
                }
            }
        }

        let mut n = 0;
        while n < buf.len() {
            match self.pending.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    async fn write(&mut self, buf: &[u8]) -> Lis2Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Lis2Result<()> {
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> Lis2Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[async_trait]
impl TransportLayer for MockStream {
    async fn open(&mut self) -> Lis2Result<()> {
        self.closed = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_follow_script() {
        let mut stream = MockStream::new([
            MockRead::Data(vec![0x05]),
            MockRead::Timeout,
            MockRead::Data(b"ab".to_vec()),
        ]);

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], 0x05);

        assert!(matches!(
            stream.read(&mut buf).await,
            Err(Lis2Error::Timeout)
        ));

        assert_eq!(stream.read(&mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"ab");

        // Script exhausted: EOF and the stream reports closed.
        assert_eq!(stream.read(&mut buf).await.unwrap(), 0);
        assert!(stream.is_closed());
    }

    #[tokio::test]
    async fn test_writes_are_recorded() {
        let mut stream = MockStream::default();
        stream.write_all(&[0x06]).await.unwrap();
        stream.write_all(&[0x15]).await.unwrap();
        assert_eq!(stream.written(), &[0x06, 0x15]);
    }

    #[tokio::test]
    async fn test_partial_reads_drain_pending_data() {
        let mut stream = MockStream::with_bytes(b"xyz".to_vec());
        let mut one = [0u8; 1];
        for expected in b"xyz" {
            assert_eq!(stream.read(&mut one).await.unwrap(), 1);
            assert_eq!(one[0], *expected);
        }
        assert_eq!(stream.read(&mut one).await.unwrap(), 0);
    }
}
