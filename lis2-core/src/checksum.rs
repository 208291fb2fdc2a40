//! Frame checksum computation and validation
//!
//! The LIS2-A2 frame checksum is the modulo-256 sum of the byte span from the
//! byte immediately after STX through ETX inclusive (frame number, records,
//! record separators, and the ETX itself), rendered as two uppercase
//! hexadecimal characters placed directly after ETX on the wire.

use crate::control::{ETX, STX};

/// Compute the modulo-256 checksum of a byte span
pub fn compute(span: &[u8]) -> u8 {
    span.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Render a checksum as two uppercase hexadecimal characters
pub fn render(sum: u8) -> [u8; 2] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    [HEX[(sum >> 4) as usize], HEX[(sum & 0x0F) as usize]]
}

/// Verify the declared checksum of a complete frame
///
/// The declared value is the two ASCII characters following ETX, compared
/// case-insensitively against the computed sum. A malformed frame (missing
/// STX or ETX, truncated checksum) is reported invalid, never as an error.
pub fn verify_frame(frame: &[u8]) -> bool {
    let Some(stx_pos) = frame.iter().position(|&b| b == STX) else {
        return false;
    };
    let Some(etx_pos) = frame.iter().position(|&b| b == ETX) else {
        return false;
    };
    if etx_pos <= stx_pos || etx_pos + 3 > frame.len() {
        return false;
    }

    let declared = &frame[etx_pos + 1..etx_pos + 3];
    let computed = render(compute(&frame[stx_pos + 1..=etx_pos]));
    declared.eq_ignore_ascii_case(&computed)
}
