//! Transport layer for the LIS2-A2 analyzer link
//!
//! This crate provides the async byte-stream contract the protocol engine
//! runs against, with implementations for a physical serial port, a TCP
//! serial-device bridge, and a scripted mock for protocol tests.

pub mod error;
pub mod mock;
pub mod serial;
pub mod stream;
pub mod tcp;

pub use error::{Lis2Error, Lis2Result};
pub use mock::{MockRead, MockStream};
pub use serial::{SerialSettings, SerialTransport};
pub use stream::{StreamAccessor, TransportLayer};
pub use tcp::{TcpSettings, TcpTransport};
