//! Session layer for the LIS2-A2 analyzer link
//!
//! This crate turns a raw byte stream into acknowledged protocol events: it
//! chunks input into control bytes and LF-terminated frames, validates the
//! per-frame checksum, and drives the ENQ/ACK/NAK/EOT handshake with retry
//! accounting. The analyzer is the protocol master; the host side
//! implemented here only ever answers.

pub mod error;
pub mod frame;
pub mod reader;
pub mod receiver;
pub mod state;
pub mod statistics;

pub use error::{Lis2Error, Lis2Result};
pub use frame::Lis2Frame;
pub use reader::{ByteEvent, FrameReader, MAX_FRAME_LEN};
pub use receiver::{AbandonReason, LinkConfig, LinkEvent, LinkReceiver};
pub use state::LinkState;
pub use statistics::LinkStatistics;
