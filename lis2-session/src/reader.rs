//! Byte framer: chunks the raw stream into control bytes and frames

use crate::error::{Lis2Error, Lis2Result};
use bytes::BytesMut;
use lis2_core::control::{LF, STX};
use lis2_transport::StreamAccessor;
use log::warn;

/// Upper bound on a single frame's size
///
/// Input past this limit without a terminating LF is handed over as-is; it
/// will fail checksum validation and draw a NAK like any malformed frame.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// One unit of protocol input produced by the framer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteEvent {
    /// A single non-STX byte (ENQ, EOT, flow control, line noise)
    Control(u8),
    /// A complete STX..LF frame, delimiters included
    Frame(Vec<u8>),
    /// The stream produced no data within the configured frame timeout
    Timeout,
    /// The stream reached end of file
    Eof,
}

/// Chunks a byte stream into [`ByteEvent`]s
///
/// A frame is complete when the terminating line feed is observed; anything
/// that does not begin with STX is surfaced one byte at a time as a control
/// event. A timeout mid-frame discards the partial frame.
#[derive(Debug, Default)]
pub struct FrameReader {
    buf: BytesMut,
}

impl FrameReader {
    /// Create a new frame reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the next control byte or complete frame from the stream
    pub async fn next_event<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> Lis2Result<ByteEvent> {
        let first = match self.read_byte(stream).await {
            Ok(Some(byte)) => byte,
            Ok(None) => return Ok(ByteEvent::Eof),
            Err(Lis2Error::Timeout) => return Ok(ByteEvent::Timeout),
            Err(e) => return Err(e),
        };

        if first != STX {
            return Ok(ByteEvent::Control(first));
        }

        self.buf.clear();
        self.buf.extend_from_slice(&[STX]);

        loop {
            match self.read_byte(stream).await {
                Ok(Some(byte)) => {
                    self.buf.extend_from_slice(&[byte]);
                    if byte == LF || self.buf.len() >= MAX_FRAME_LEN {
                        if byte != LF {
                            warn!(
                                "frame exceeded {} bytes without a terminator",
                                MAX_FRAME_LEN
                            );
                        }
                        return Ok(ByteEvent::Frame(self.buf.split().to_vec()));
                    }
                }
                Ok(None) => {
                    self.buf.clear();
                    return Ok(ByteEvent::Eof);
                }
                Err(Lis2Error::Timeout) => {
                    warn!("timeout mid-frame, {} bytes discarded", self.buf.len());
                    self.buf.clear();
                    return Ok(ByteEvent::Timeout);
                }
                Err(e) => {
                    self.buf.clear();
                    return Err(e);
                }
            }
        }
    }

    async fn read_byte<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> Lis2Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match stream.read(&mut byte).await? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Lis2Frame;
    use lis2_core::control::{ENQ, EOT};
    use lis2_transport::{MockRead, MockStream};

    #[tokio::test]
    async fn test_control_bytes_surface_individually() {
        let mut stream = MockStream::with_bytes(vec![ENQ, EOT]);
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Control(ENQ)
        );
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Control(EOT)
        );
        assert_eq!(reader.next_event(&mut stream).await.unwrap(), ByteEvent::Eof);
    }

    #[tokio::test]
    async fn test_frame_collected_through_lf() {
        let wire = Lis2Frame::new('1', "L|1|N").encode();
        let mut stream = MockStream::with_bytes(wire.clone());
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Frame(wire)
        );
    }

    #[tokio::test]
    async fn test_frame_split_across_reads() {
        let wire = Lis2Frame::new('1', "H|\\^&").encode();
        let (head, tail) = wire.split_at(3);
        let mut stream = MockStream::new([
            MockRead::Data(head.to_vec()),
            MockRead::Data(tail.to_vec()),
        ]);
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Frame(wire)
        );
    }

    #[tokio::test]
    async fn test_timeout_mid_frame_discards_partial() {
        let mut stream = MockStream::new([
            MockRead::Data(vec![STX, b'1', b'H']),
            MockRead::Timeout,
            MockRead::Data(vec![ENQ]),
        ]);
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Timeout
        );
        // The partial frame is gone; the next byte reads cleanly.
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Control(ENQ)
        );
    }

    #[tokio::test]
    async fn test_idle_timeout_is_an_event() {
        let mut stream = MockStream::new([MockRead::Timeout]);
        let mut reader = FrameReader::new();
        assert_eq!(
            reader.next_event(&mut stream).await.unwrap(),
            ByteEvent::Timeout
        );
    }

    #[tokio::test]
    async fn test_oversize_frame_is_surfaced_unterminated() {
        let mut runaway = vec![STX];
        runaway.resize(MAX_FRAME_LEN + 16, b'A');
        let mut stream = MockStream::with_bytes(runaway);
        let mut reader = FrameReader::new();
        match reader.next_event(&mut stream).await.unwrap() {
            ByteEvent::Frame(frame) => {
                assert_eq!(frame.len(), MAX_FRAME_LEN);
                assert!(!lis2_core::checksum::verify_frame(&frame));
            }
            other => panic!("expected oversize frame, got {:?}", other),
        }
    }
}
