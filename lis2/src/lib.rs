//! lis2 - Rust implementation of the LIS2-A2/ASTM analyzer link protocol
//!
//! This library decodes transmissions from clinical analyzers that act as
//! protocol master over a serial line, such as the Alcor iSED ESR analyzer.
//! The analyzer opens each exchange with ENQ, sends checksummed STX/ETX
//! frames carrying pipe-delimited records, and closes with EOT; this side
//! acknowledges, validates and aggregates.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `lis2-core`: Error handling, control bytes, frame checksums
//! - `lis2-transport`: Transport layer (Serial, TCP, scripted mock)
//! - `lis2-session`: Frame model, byte framer, handshake state machine
//! - `lis2-application`: Record decoding, result interpretation, sessions
//! - `lis2-host`: Engine run loop and session delivery
//!
//! # Usage
//!
//! ```no_run
//! use lis2::host::{ChannelSink, LinkHost};
//! use lis2::session::LinkConfig;
//! use lis2::transport::SerialTransport;
//!
//! # async fn run() -> lis2::Lis2Result<()> {
//! let transport = SerialTransport::new_simple("/dev/ttyUSB0".to_string());
//! let (sink, mut sessions) = ChannelSink::new(16);
//! let mut host = LinkHost::new(transport, sink, LinkConfig::default());
//!
//! tokio::spawn(async move {
//!     while let Some(session) = sessions.recv().await {
//!         println!("{} results", session.results.len());
//!     }
//! });
//! host.run().await
//! # }
//! ```

// Re-export core types
pub use lis2_core::{ControlByte, Lis2Error, Lis2Result};

// Re-export transport API
pub mod transport {
    pub use lis2_transport::*;
}

// Re-export session layer
pub mod session {
    pub use lis2_session::*;
}

// Re-export application layer
pub mod application {
    pub use lis2_application::*;
}

// Re-export host engine
pub mod host {
    pub use lis2_host::*;
}
