//! ENQ/ACK handshake state machine for the analyzer link
//!
//! Drives the host side of one connection: acknowledge ENQ, validate and
//! acknowledge (or reject) each data frame, acknowledge EOT, and abandon
//! the transmission on timeout or retry exhaustion. Checksum mismatch and
//! timeout are the only failure classes the analyzer ever sees; a frame
//! that passes checksum validation is always acknowledged, even when its
//! payload later fails to decode.

use crate::error::Lis2Result;
use crate::frame::Lis2Frame;
use crate::reader::{ByteEvent, FrameReader};
use crate::state::LinkState;
use crate::statistics::LinkStatistics;
use lis2_core::checksum;
use lis2_core::control::{ACK, ENQ, EOT, NAK};
use lis2_core::ControlByte;
use lis2_transport::StreamAccessor;
use log::{debug, info, warn};
use std::time::Duration;

/// Link-level configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Read timeout for one frame; expiry abandons the transmission
    pub frame_timeout: Duration,
    /// Maximum consecutive NAKs for one frame number before the
    /// transmission is treated as failed
    pub max_retries: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            frame_timeout: Duration::from_secs(10),
            max_retries: 6,
        }
    }
}

/// Why an in-progress transmission was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// No data arrived within the frame timeout
    Timeout,
    /// The same frame number failed checksum validation past the retry cap
    RetryExhausted,
}

/// Protocol-level event surfaced to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// A checksum-valid frame was acknowledged and decoded
    Frame(Lis2Frame),
    /// EOT was acknowledged; the transmission completed normally
    TransmissionComplete,
    /// The in-progress transmission was dropped without completing;
    /// nothing collected from it may be finalized
    TransmissionAbandoned(AbandonReason),
    /// The stream closed
    Disconnected,
}

/// Host-side handshake state machine
#[derive(Debug)]
pub struct LinkReceiver {
    state: LinkState,
    config: LinkConfig,
    reader: FrameReader,
    statistics: LinkStatistics,
    /// Frame number of the last rejected frame with its consecutive NAK count
    retry: Option<(u8, u32)>,
}

impl LinkReceiver {
    /// Create a receiver with the given link configuration
    pub fn new(config: LinkConfig) -> Self {
        Self {
            state: LinkState::Idle,
            config,
            reader: FrameReader::new(),
            statistics: LinkStatistics::new(),
            retry: None,
        }
    }

    /// Get the current link state
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Get the link configuration
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Get the link statistics
    pub fn statistics(&self) -> &LinkStatistics {
        &self.statistics
    }

    /// Drive the link until the next protocol event
    ///
    /// Returns `Ok(None)` when nothing actionable happened: a quiet line
    /// while idle, a stray byte discarded, or a NAK sent while awaiting
    /// retransmission of the same frame.
    pub async fn poll<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
    ) -> Lis2Result<Option<LinkEvent>> {
        match self.reader.next_event(stream).await? {
            ByteEvent::Eof => {
                debug!("stream closed in state {}", self.state.as_str());
                Ok(Some(LinkEvent::Disconnected))
            }
            ByteEvent::Timeout => self.on_timeout(),
            ByteEvent::Control(byte) => self.on_control(stream, byte).await,
            ByteEvent::Frame(raw) => self.on_frame(stream, &raw).await,
        }
    }

    fn on_timeout(&mut self) -> Lis2Result<Option<LinkEvent>> {
        match self.state {
            // A quiet line while idle is normal; keep waiting for ENQ.
            LinkState::Idle => Ok(None),
            _ => {
                warn!("frame timeout, abandoning transmission");
                self.statistics.increment_timeouts();
                self.statistics.increment_transmissions_abandoned();
                self.reset_to_idle()?;
                Ok(Some(LinkEvent::TransmissionAbandoned(
                    AbandonReason::Timeout,
                )))
            }
        }
    }

    async fn on_control<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
        byte: u8,
    ) -> Lis2Result<Option<LinkEvent>> {
        if let Some(control) = ControlByte::from_byte(byte) {
            if control.is_flow_control() {
                debug!("{} ignored", control);
                return Ok(None);
            }
        }

        match (self.state, byte) {
            (LinkState::Idle, ENQ) => {
                info!("ENQ received, acknowledging transmission start");
                stream.write_all(&[ACK]).await?;
                self.transition(LinkState::Receiving)?;
                self.statistics.increment_transmissions_started();
                Ok(None)
            }
            (LinkState::Receiving, EOT) => {
                info!("EOT received, transmission complete");
                stream.write_all(&[ACK]).await?;
                self.transition(LinkState::Terminated)?;
                self.statistics.increment_transmissions_completed();
                self.reset_to_idle()?;
                Ok(Some(LinkEvent::TransmissionComplete))
            }
            _ => {
                debug!(
                    "unexpected byte 0x{:02X} in state {}, discarded",
                    byte,
                    self.state.as_str()
                );
                Ok(None)
            }
        }
    }

    async fn on_frame<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
        raw: &[u8],
    ) -> Lis2Result<Option<LinkEvent>> {
        if self.state != LinkState::Receiving {
            warn!(
                "frame received without a transmission in progress, discarded"
            );
            return Ok(None);
        }

        self.statistics.increment_frames_received();

        if !checksum::verify_frame(raw) {
            return self.reject_frame(stream, raw).await;
        }

        self.retry = None;
        self.statistics.increment_frames_accepted();
        stream.write_all(&[ACK]).await?;

        match Lis2Frame::decode(raw) {
            Ok(frame) => {
                debug!("frame {} accepted ({} bytes)", frame.number(), raw.len());
                Ok(Some(LinkEvent::Frame(frame)))
            }
            Err(e) => {
                // Already acknowledged: decode trouble stays internal and
                // must not surface as a protocol-level rejection.
                warn!("acknowledged frame failed to decode: {}", e);
                Ok(None)
            }
        }
    }

    async fn reject_frame<S: StreamAccessor + ?Sized>(
        &mut self,
        stream: &mut S,
        raw: &[u8],
    ) -> Lis2Result<Option<LinkEvent>> {
        self.statistics.increment_checksum_errors();

        let number = raw.get(1).copied().unwrap_or(b'?');
        let attempts = match self.retry {
            Some((n, count)) if n == number => count + 1,
            _ => 1,
        };

        if attempts > self.config.max_retries {
            warn!(
                "frame {} rejected {} times, abandoning transmission",
                number as char, self.config.max_retries
            );
            self.statistics.increment_transmissions_abandoned();
            self.reset_to_idle()?;
            return Ok(Some(LinkEvent::TransmissionAbandoned(
                AbandonReason::RetryExhausted,
            )));
        }

        self.retry = Some((number, attempts));
        self.statistics.increment_frames_rejected();
        stream.write_all(&[NAK]).await?;
        warn!(
            "frame {} checksum mismatch, NAK sent (attempt {}/{})",
            number as char, attempts, self.config.max_retries
        );
        Ok(None)
    }

    fn transition(&mut self, new_state: LinkState) -> Lis2Result<()> {
        self.state.validate_transition(new_state)?;
        debug!(
            "link state {} -> {}",
            self.state.as_str(),
            new_state.as_str()
        );
        self.state = new_state;
        Ok(())
    }

    fn reset_to_idle(&mut self) -> Lis2Result<()> {
        self.retry = None;
        if self.state != LinkState::Idle {
            self.transition(LinkState::Idle)?;
        }
        Ok(())
    }
}

impl Default for LinkReceiver {
    fn default() -> Self {
        Self::new(LinkConfig::default())
    }
}
