//! Session delivery
//!
//! Finalized sessions leave the engine through a [`SessionSink`]. What
//! happens to them afterwards (files, a database, a message bus) is the
//! consumer's business.

use crate::error::{Lis2Error, Lis2Result};
use async_trait::async_trait;
use lis2_application::Session;
use tokio::sync::mpsc;

/// Consumer of finalized sessions
#[async_trait]
pub trait SessionSink: Send {
    async fn deliver(&mut self, session: Session) -> Lis2Result<()>;
}

/// Sink delivering sessions over a bounded mpsc channel
pub struct ChannelSink {
    tx: mpsc::Sender<Session>,
}

impl ChannelSink {
    /// Create a sink and the receiving half for the consumer
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Session>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SessionSink for ChannelSink {
    async fn deliver(&mut self, session: Session) -> Lis2Result<()> {
        self.tx
            .send(session)
            .await
            .map_err(|_| Lis2Error::Protocol("session consumer disconnected".to_string()))
    }
}

/// Sink collecting sessions in memory, for tests
#[derive(Debug, Default)]
pub struct MemorySink {
    sessions: Vec<Session>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }
}

#[async_trait]
impl SessionSink for MemorySink {
    async fn deliver(&mut self, session: Session) -> Lis2Result<()> {
        self.sessions.push(session);
        Ok(())
    }
}
