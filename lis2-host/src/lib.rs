//! Host engine for LIS2-A2 analyzer links
//!
//! Combines a [`lis2_transport::TransportLayer`], the link receiver from
//! `lis2-session` and the session aggregator from `lis2-application` into a
//! run loop that answers the analyzer and hands finalized sessions to a
//! [`SessionSink`].

pub mod error;
pub mod host;
pub mod sink;

pub use error::{Lis2Error, Lis2Result};
pub use host::{shutdown_signal, LinkHost};
pub use sink::{ChannelSink, MemorySink, SessionSink};
