//! LIS2-A2 frame structure and encoding/decoding

use crate::error::{Lis2Error, Lis2Result};
use lis2_core::checksum;
use lis2_core::control::{CR, ETX, LF, STX};
use std::fmt;

/// One STX..LF unit of transmission
///
/// Wire format: `STX <frame-number:1 char> <record>(CR <record>)* CR ETX
/// <checksum:2 hex chars> CR LF`. The checksum covers the span from the byte
/// after STX through ETX inclusive. A frame may carry several records; the
/// frame number cycles so the host can recognise a retransmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lis2Frame {
    number: char,
    payload: String,
}

impl Lis2Frame {
    /// Create a frame from a number and a CR-separated record payload
    pub fn new(number: char, payload: impl Into<String>) -> Self {
        Self {
            number,
            payload: payload.into(),
        }
    }

    /// Decode a frame from its raw bytes
    ///
    /// The caller is expected to have verified the checksum already
    /// ([`lis2_core::checksum::verify_frame`]); this only takes the frame
    /// apart. The trailing CR before ETX is stripped from the payload.
    pub fn decode(raw: &[u8]) -> Lis2Result<Self> {
        if raw.first() != Some(&STX) {
            return Err(Lis2Error::FrameInvalid(
                "frame does not start with STX".to_string(),
            ));
        }
        let etx_pos = raw
            .iter()
            .position(|&b| b == ETX)
            .ok_or_else(|| Lis2Error::FrameInvalid("frame has no ETX".to_string()))?;
        if etx_pos < 2 {
            return Err(Lis2Error::FrameInvalid(
                "frame too short for a frame number".to_string(),
            ));
        }

        let number = raw[1] as char;
        let mut body = &raw[2..etx_pos];
        if body.last() == Some(&CR) {
            body = &body[..body.len() - 1];
        }
        let payload = std::str::from_utf8(body)
            .map_err(|_| Lis2Error::InvalidData("frame payload is not valid ASCII".to_string()))?
            .to_string();

        Ok(Self { number, payload })
    }

    /// Encode the frame to its wire representation, checksum included
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 8);
        out.push(STX);
        out.push(self.number as u8);
        out.extend_from_slice(self.payload.as_bytes());
        out.push(CR);
        out.push(ETX);
        let sum = checksum::compute(&out[1..]);
        out.extend_from_slice(&checksum::render(sum));
        out.push(CR);
        out.push(LF);
        out
    }

    /// Get the one-character frame sequence number
    pub fn number(&self) -> char {
        self.number
    }

    /// Get the CR-separated record payload
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Iterate over the individual records in the payload
    pub fn records(&self) -> impl Iterator<Item = &str> {
        self.payload.split('\r').filter(|record| !record.is_empty())
    }
}

impl fmt::Display for Lis2Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {}: {} record(s), {} bytes",
            self.number,
            self.records().count(),
            self.payload.len()
        )
    }
}
