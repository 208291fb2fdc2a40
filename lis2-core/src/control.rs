//! LIS2-A2 control byte definitions
//!
//! Single-byte protocol markers with fixed wire values. The analyzer is the
//! protocol master; the host only ever sends ACK and NAK.

use std::fmt;

/// Enquiry - analyzer requests to start a transmission
pub const ENQ: u8 = 0x05;

/// Acknowledge - host accepts a transmission, frame, or EOT
pub const ACK: u8 = 0x06;

/// Negative acknowledge - host rejects a frame, requesting retransmission
pub const NAK: u8 = 0x15;

/// Start of text - begins a data frame
pub const STX: u8 = 0x02;

/// End of text - ends a data frame, checksum follows
pub const ETX: u8 = 0x03;

/// End of transmission - analyzer has finished sending
pub const EOT: u8 = 0x04;

/// Carriage return - record separator within a frame
pub const CR: u8 = 0x0D;

/// Line feed - frame terminator
pub const LF: u8 = 0x0A;

/// Resume transmission (software flow control)
pub const XON: u8 = 0x11;

/// Pause transmission (software flow control)
pub const XOFF: u8 = 0x13;

/// Typed view of the protocol control bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlByte {
    Enq,
    Ack,
    Nak,
    Stx,
    Etx,
    Eot,
    Cr,
    Lf,
    Xon,
    Xoff,
}

impl ControlByte {
    /// Classify a raw byte as a control byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            ENQ => Some(ControlByte::Enq),
            ACK => Some(ControlByte::Ack),
            NAK => Some(ControlByte::Nak),
            STX => Some(ControlByte::Stx),
            ETX => Some(ControlByte::Etx),
            EOT => Some(ControlByte::Eot),
            CR => Some(ControlByte::Cr),
            LF => Some(ControlByte::Lf),
            XON => Some(ControlByte::Xon),
            XOFF => Some(ControlByte::Xoff),
            _ => None,
        }
    }

    /// Get the wire value for this control byte
    pub fn value(&self) -> u8 {
        match self {
            ControlByte::Enq => ENQ,
            ControlByte::Ack => ACK,
            ControlByte::Nak => NAK,
            ControlByte::Stx => STX,
            ControlByte::Etx => ETX,
            ControlByte::Eot => EOT,
            ControlByte::Cr => CR,
            ControlByte::Lf => LF,
            ControlByte::Xon => XON,
            ControlByte::Xoff => XOFF,
        }
    }

    /// Get the conventional mnemonic for this control byte
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlByte::Enq => "ENQ",
            ControlByte::Ack => "ACK",
            ControlByte::Nak => "NAK",
            ControlByte::Stx => "STX",
            ControlByte::Etx => "ETX",
            ControlByte::Eot => "EOT",
            ControlByte::Cr => "CR",
            ControlByte::Lf => "LF",
            ControlByte::Xon => "XON",
            ControlByte::Xoff => "XOFF",
        }
    }

    /// Check if this byte is flow control (XON/XOFF) rather than handshake
    pub fn is_flow_control(&self) -> bool {
        matches!(self, ControlByte::Xon | ControlByte::Xoff)
    }
}

impl fmt::Display for ControlByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(ENQ, 0x05);
        assert_eq!(ACK, 0x06);
        assert_eq!(NAK, 0x15);
        assert_eq!(STX, 0x02);
        assert_eq!(ETX, 0x03);
        assert_eq!(EOT, 0x04);
        assert_eq!(CR, 0x0D);
        assert_eq!(LF, 0x0A);
        assert_eq!(XON, 0x11);
        assert_eq!(XOFF, 0x13);
    }

    #[test]
    fn test_from_byte_round_trip() {
        for byte in [ENQ, ACK, NAK, STX, ETX, EOT, CR, LF, XON, XOFF] {
            let control = ControlByte::from_byte(byte).expect("known control byte");
            assert_eq!(control.value(), byte);
        }
        assert_eq!(ControlByte::from_byte(b'H'), None);
    }

    #[test]
    fn test_flow_control_classification() {
        assert!(ControlByte::Xon.is_flow_control());
        assert!(ControlByte::Xoff.is_flow_control());
        assert!(!ControlByte::Enq.is_flow_control());
    }
}
