//! Host engine
//!
//! Wires a transport, the link receiver and the session aggregator together
//! and pumps the link until the stream closes or a shutdown is requested.
//! The analyzer is the master on the wire; this side only ever answers.

use crate::error::Lis2Result;
use crate::sink::SessionSink;
use lis2_application::{Record, Session, SessionAggregator};
use lis2_session::{LinkConfig, LinkEvent, LinkReceiver, LinkStatistics, Lis2Frame};
use lis2_transport::TransportLayer;
use log::{info, warn};
use tokio::sync::watch;

/// Create a shutdown signal pair
///
/// Hand the receiver to [`LinkHost::with_shutdown`]; setting the sender to
/// `true` stops the engine between frames. A frame in flight is finished
/// first, so the analyzer never sees a half-acknowledged exchange.
pub fn shutdown_signal() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Protocol engine for one analyzer link
pub struct LinkHost<T: TransportLayer, S: SessionSink> {
    transport: T,
    sink: S,
    receiver: LinkReceiver,
    aggregator: SessionAggregator,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<T: TransportLayer, S: SessionSink> LinkHost<T, S> {
    pub fn new(transport: T, sink: S, config: LinkConfig) -> Self {
        Self {
            transport,
            sink,
            receiver: LinkReceiver::new(config),
            aggregator: SessionAggregator::new(),
            shutdown: None,
        }
    }

    /// Attach a shutdown signal, checked between frames
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Link statistics accumulated so far
    pub fn statistics(&self) -> &LinkStatistics {
        self.receiver.statistics()
    }

    /// Sessions delivered to the sink so far
    pub fn sessions_finalized(&self) -> u64 {
        self.aggregator.sessions_finalized()
    }

    /// Run the engine until disconnect or shutdown
    pub async fn run(&mut self) -> Lis2Result<()> {
        self.transport.open().await?;
        self.transport
            .set_timeout(Some(self.receiver.config().frame_timeout))
            .await?;
        info!("listening for analyzer transmissions");

        loop {
            if self.shutdown_requested() {
                info!("shutdown requested, stopping engine");
                break;
            }

            match self.receiver.poll(&mut self.transport).await? {
                Some(LinkEvent::Frame(frame)) => self.absorb_frame(frame).await?,
                Some(LinkEvent::TransmissionComplete) => {
                    if let Some(session) = self.aggregator.finalize_if_open() {
                        self.deliver(session).await?;
                    }
                }
                Some(LinkEvent::TransmissionAbandoned(reason)) => {
                    warn!("transmission abandoned ({:?})", reason);
                    self.aggregator.discard();
                }
                Some(LinkEvent::Disconnected) => {
                    info!("analyzer disconnected");
                    break;
                }
                None => {}
            }
        }

        self.transport.close().await?;
        Ok(())
    }

    async fn absorb_frame(&mut self, frame: Lis2Frame) -> Lis2Result<()> {
        for line in frame.records() {
            if let Some(record) = Record::decode(line) {
                if let Some(session) = self.aggregator.absorb(record) {
                    self.deliver(session).await?;
                }
            }
        }
        Ok(())
    }

    async fn deliver(&mut self, session: Session) -> Lis2Result<()> {
        let summary = session.summary();
        info!(
            "delivering session {}: {} patients, {} orders, {} results",
            summary.session_info.session_id,
            summary.statistics.total_patients,
            summary.statistics.total_orders,
            summary.statistics.total_results
        );
        self.sink.deliver(session).await
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|signal| *signal.borrow())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use lis2_core::control::{ACK, ENQ, EOT, ETX, NAK};
    use lis2_core::Lis2Error;
    use lis2_transport::{MockRead, MockStream};

    fn frame(number: char, payload: &str) -> Vec<u8> {
        Lis2Frame::new(number, payload).encode()
    }

    fn corrupt(mut wire: Vec<u8>) -> Vec<u8> {
        let etx_pos = wire.iter().position(|&b| b == ETX).unwrap();
        wire[etx_pos + 1] = b'0';
        wire[etx_pos + 2] = b'0';
        wire
    }

    fn transmission(payloads: &[&str]) -> Vec<u8> {
        let mut bytes = vec![ENQ];
        for (i, payload) in payloads.iter().enumerate() {
            let number = char::from_digit(((i + 1) % 8) as u32, 10).unwrap();
            bytes.extend_from_slice(&frame(number, payload));
        }
        bytes.push(EOT);
        bytes
    }

    const SESSION_PAYLOADS: &[&str] = &[
        "H|\\^&|||Alcor^iSED^1.4.2^07|||||||P|E 1394-97|20250612093045",
        "P|1||PID-1||Doe^Jane||19751023|F",
        "O|1|S-100^3||^^^ESR",
        "R|1|^^^ESR^4537-7|15|mm/h|||||||20250612093000|20250612093030|07",
        "L|1|N",
    ];

    async fn run_with(bytes: Vec<u8>) -> LinkHost<MockStream, MemorySink> {
        let stream = MockStream::with_bytes(bytes);
        let mut host = LinkHost::new(stream, MemorySink::new(), LinkConfig::default());
        host.run().await.unwrap();
        host
    }

    #[tokio::test]
    async fn test_complete_transmission_delivers_one_session() {
        let host = run_with(transmission(SESSION_PAYLOADS)).await;

        let sessions = host.sink.sessions();
        assert_eq!(sessions.len(), 1);
        let session = &sessions[0];
        assert_eq!(session.header.as_ref().unwrap().instrument_id, "07");
        assert_eq!(session.patients.len(), 1);
        assert_eq!(session.results.len(), 1);
        assert_eq!(host.statistics().frames_accepted, 5);
        assert_eq!(host.statistics().transmissions_completed, 1);
    }

    #[tokio::test]
    async fn test_terminator_then_eot_delivers_exactly_once() {
        let host = run_with(transmission(SESSION_PAYLOADS)).await;
        assert_eq!(host.sink.sessions().len(), 1);
        assert_eq!(host.sessions_finalized(), 1);
    }

    #[tokio::test]
    async fn test_eot_without_terminator_still_delivers() {
        let host = run_with(transmission(&SESSION_PAYLOADS[..4])).await;
        assert_eq!(host.sink.sessions().len(), 1);
        assert_eq!(host.sink.sessions()[0].results.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_frame_is_retransmitted_and_session_survives() {
        let mut bytes = vec![ENQ];
        let good = frame('1', SESSION_PAYLOADS[0]);
        bytes.extend_from_slice(&corrupt(good.clone()));
        bytes.extend_from_slice(&good);
        bytes.extend_from_slice(&frame('2', SESSION_PAYLOADS[4]));
        bytes.push(EOT);

        let host = run_with(bytes).await;
        assert_eq!(host.sink.sessions().len(), 1);
        assert_eq!(host.statistics().frames_rejected, 1);
        assert_eq!(host.statistics().frames_accepted, 2);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_never_delivers_partial_session() {
        let mut bytes = vec![ENQ];
        bytes.extend_from_slice(&frame('1', SESSION_PAYLOADS[0]));
        let bad = corrupt(frame('2', SESSION_PAYLOADS[3]));
        for _ in 0..7 {
            bytes.extend_from_slice(&bad);
        }

        let host = run_with(bytes).await;
        assert!(host.sink.sessions().is_empty());
        assert_eq!(host.statistics().transmissions_abandoned, 1);
    }

    #[tokio::test]
    async fn test_timeout_mid_transmission_discards_session() {
        let mut opening = vec![ENQ];
        opening.extend_from_slice(&frame('1', SESSION_PAYLOADS[0]));
        let stream = MockStream::new([MockRead::Data(opening), MockRead::Timeout]);

        let mut host = LinkHost::new(stream, MemorySink::new(), LinkConfig::default());
        host.run().await.unwrap();
        assert!(host.sink.sessions().is_empty());
        assert_eq!(host.statistics().timeouts, 1);
    }

    #[tokio::test]
    async fn test_back_to_back_transmissions() {
        let mut bytes = transmission(SESSION_PAYLOADS);
        bytes.extend_from_slice(&transmission(&[
            "H|\\^&|||Alcor^iSED^1.4.2^07",
            "R|1|^^^ESR|-5|mm/h",
            "L|1|N",
        ]));

        let host = run_with(bytes).await;
        let sessions = host.sink.sessions();
        assert_eq!(sessions.len(), 2);
        assert!(!sessions[1].results[0].interpretation.is_normal());
        assert_eq!(host.statistics().transmissions_completed, 2);
    }

    #[tokio::test]
    async fn test_multi_record_frame() {
        let payload = SESSION_PAYLOADS.join("\r");
        let mut bytes = vec![ENQ];
        bytes.extend_from_slice(&frame('1', &payload));
        bytes.push(EOT);

        let host = run_with(bytes).await;
        let sessions = host.sink.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].orders.len(), 1);
        assert_eq!(sessions[0].results.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_record_does_not_fail_the_frame() {
        let host = run_with(transmission(&[
            "H|\\^&|||Alcor^iSED^1.0^01",
            "Q|1|unexpected",
            "R|1|^^^ESR|12|mm/h",
            "L|1|N",
        ]))
        .await;

        let sessions = host.sink.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].results.len(), 1);
        assert_eq!(host.statistics().frames_rejected, 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_touching_the_line() {
        let (tx, rx) = shutdown_signal();
        tx.send(true).ok();

        let stream = MockStream::with_bytes(vec![ENQ]);
        let mut host = LinkHost::new(stream, MemorySink::new(), LinkConfig::default())
            .with_shutdown(rx);
        host.run().await.unwrap();

        assert!(host.transport.written().is_empty());
        assert_eq!(host.statistics().transmissions_started, 0);
    }

    #[tokio::test]
    async fn test_sink_failure_surfaces_as_error() {
        struct FailingSink;

        #[async_trait::async_trait]
        impl SessionSink for FailingSink {
            async fn deliver(&mut self, _session: Session) -> Lis2Result<()> {
                Err(Lis2Error::Protocol("sink closed".to_string()))
            }
        }

        let stream = MockStream::with_bytes(transmission(SESSION_PAYLOADS));
        let mut host = LinkHost::new(stream, FailingSink, LinkConfig::default());
        assert!(host.run().await.is_err());
    }

    #[tokio::test]
    async fn test_wire_exchange_matches_protocol() {
        let host = run_with(transmission(SESSION_PAYLOADS)).await;
        // One ACK for ENQ, one per frame, one for EOT; never a NAK.
        assert_eq!(host.transport.written().len(), 7);
        assert!(host.transport.written().iter().all(|&b| b == ACK));
        assert!(!host.transport.written().contains(&NAK));
    }
}
