//! Link statistics collection

/// Counters for one analyzer link
///
/// Updated by the receiver as it drives the handshake; queryable at any
/// time to monitor link health.
#[derive(Debug, Clone, Default)]
pub struct LinkStatistics {
    /// Total number of STX frames received (valid or not)
    pub frames_received: u64,
    /// Frames that passed checksum validation and were acknowledged
    pub frames_accepted: u64,
    /// Frames rejected with a NAK
    pub frames_rejected: u64,
    /// Checksum verification failures
    pub checksum_errors: u64,
    /// Frame timeouts while a transmission was in progress
    pub timeouts: u64,
    /// Transmissions opened by an acknowledged ENQ
    pub transmissions_started: u64,
    /// Transmissions closed by an acknowledged EOT
    pub transmissions_completed: u64,
    /// Transmissions dropped by timeout or retry exhaustion
    pub transmissions_abandoned: u64,
}

impl LinkStatistics {
    /// Create new statistics with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all statistics counters
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Increment frames received counter
    pub fn increment_frames_received(&mut self) {
        self.frames_received += 1;
    }

    /// Increment frames accepted counter
    pub fn increment_frames_accepted(&mut self) {
        self.frames_accepted += 1;
    }

    /// Increment frames rejected counter
    pub fn increment_frames_rejected(&mut self) {
        self.frames_rejected += 1;
    }

    /// Increment checksum error counter
    pub fn increment_checksum_errors(&mut self) {
        self.checksum_errors += 1;
    }

    /// Increment timeout counter
    pub fn increment_timeouts(&mut self) {
        self.timeouts += 1;
    }

    /// Increment transmissions started counter
    pub fn increment_transmissions_started(&mut self) {
        self.transmissions_started += 1;
    }

    /// Increment transmissions completed counter
    pub fn increment_transmissions_completed(&mut self) {
        self.transmissions_completed += 1;
    }

    /// Increment transmissions abandoned counter
    pub fn increment_transmissions_abandoned(&mut self) {
        self.transmissions_abandoned += 1;
    }

    /// Get the share of received frames that were rejected, as a percentage
    ///
    /// Returns 0.0 before any frame has been received.
    pub fn rejection_rate(&self) -> f64 {
        if self.frames_received == 0 {
            0.0
        } else {
            (self.frames_rejected as f64 / self.frames_received as f64) * 100.0
        }
    }
}
