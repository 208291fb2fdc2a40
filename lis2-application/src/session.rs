//! Session aggregation
//!
//! One transmission from the analyzer becomes one [`Session`]: the header,
//! then patient, order and result records in arrival order, closed by a
//! terminator record. The aggregator owns at most one open session at a
//! time; finalizing hands the session off by value and opens a fresh one,
//! so a delivered session can never be mutated afterwards.

use crate::header::HeaderRecord;
use crate::order::OrderRecord;
use crate::patient::PatientRecord;
use crate::record::Record;
use crate::result::ResultRecord;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// All data collected from one transmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// `YYYYMMDD_HHMMSS` derived from the session start
    pub session_id: String,
    pub header: Option<HeaderRecord>,
    pub patients: Vec<PatientRecord>,
    pub orders: Vec<OrderRecord>,
    pub results: Vec<ResultRecord>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    fn open(now: DateTime<Utc>) -> Self {
        Self {
            session_id: now.format("%Y%m%d_%H%M%S").to_string(),
            header: None,
            patients: Vec::new(),
            orders: Vec::new(),
            results: Vec::new(),
            started_at: now,
            ended_at: None,
        }
    }

    /// True when no record has been absorbed yet
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
            && self.patients.is_empty()
            && self.orders.is_empty()
            && self.results.is_empty()
    }

    /// Build the denormalized summary for this session
    pub fn summary(&self) -> SessionSummary {
        let placeholder = || "N/A".to_string();

        let info = SessionInfo {
            session_id: self.session_id.clone(),
            start_time: self.started_at,
            end_time: self.ended_at,
            analyzer: self
                .header
                .as_ref()
                .map_or_else(|| "N/A N/A".to_string(), HeaderRecord::analyzer_name),
            software_version: self
                .header
                .as_ref()
                .map_or_else(placeholder, |h| h.software_version.clone()),
            instrument_id: self
                .header
                .as_ref()
                .map_or_else(placeholder, |h| h.instrument_id.clone()),
        };

        let normal = self
            .results
            .iter()
            .filter(|r| r.interpretation.is_normal())
            .count();

        let statistics = SummaryStatistics {
            total_patients: self.patients.len(),
            total_orders: self.orders.len(),
            total_results: self.results.len(),
            normal_results: normal,
            abnormal_results: self.results.len() - normal,
        };

        // Results join patients and orders on the sequence number; the
        // first match wins when the instrument repeats one.
        let results = self
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let patient = self
                    .patients
                    .iter()
                    .find(|p| p.sequence_number == result.sequence_number);
                let order = self
                    .orders
                    .iter()
                    .find(|o| o.sequence_number == result.sequence_number);

                SummaryRow {
                    test_number: i + 1,
                    patient_name: patient.map_or_else(placeholder, |p| p.patient_name.clone()),
                    patient_id: patient
                        .map_or_else(placeholder, |p| p.laboratory_patient_id.clone()),
                    sample_id: order.map_or_else(placeholder, |o| o.sample_id.clone()),
                    value: result.result_value.clone(),
                    units: result.units.clone(),
                    interpretation: result.interpretation.to_string(),
                    test_completed: result.test_complete_datetime.clone(),
                    instrument_id: result.instrument_id.clone(),
                }
            })
            .collect();

        SessionSummary {
            session_info: info,
            statistics,
            results,
        }
    }
}

/// Identity block of a session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub analyzer: String,
    pub software_version: String,
    pub instrument_id: String,
}

/// Entity and interpretation counts for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_patients: usize,
    pub total_orders: usize,
    pub total_results: usize,
    pub normal_results: usize,
    pub abnormal_results: usize,
}

/// One denormalized result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub test_number: usize,
    pub patient_name: String,
    pub patient_id: String,
    pub sample_id: String,
    pub value: String,
    pub units: String,
    pub interpretation: String,
    pub test_completed: String,
    pub instrument_id: String,
}

/// Denormalized view of a finalized session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_info: SessionInfo,
    pub statistics: SummaryStatistics,
    pub results: Vec<SummaryRow>,
}

/// Collects decoded records into sessions
#[derive(Debug)]
pub struct SessionAggregator {
    current: Session,
    sessions_finalized: u64,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self {
            current: Session::open(Utc::now()),
            sessions_finalized: 0,
        }
    }

    /// Absorb one decoded record
    ///
    /// A terminator record finalizes the open session and returns it; every
    /// other record returns `None`. A second header in one transmission
    /// overwrites the first.
    pub fn absorb(&mut self, record: Record) -> Option<Session> {
        match record {
            Record::Header(header) => {
                if self.current.header.is_some() {
                    warn!("second header in one transmission, overwriting");
                }
                info!(
                    "analyzer {} v{} (instrument {})",
                    header.analyzer_name(),
                    header.software_version,
                    header.instrument_id
                );
                self.current.header = Some(header);
                None
            }
            Record::Patient(patient) => {
                debug!(
                    "patient {} (id {})",
                    patient.patient_name, patient.laboratory_patient_id
                );
                self.current.patients.push(patient);
                None
            }
            Record::Order(order) => {
                debug!(
                    "order for sample {} at rotor {}",
                    order.sample_id, order.rotor_location
                );
                self.current.orders.push(order);
                None
            }
            Record::Result(result) => {
                info!(
                    "result {} {} ({})",
                    result.result_value, result.units, result.interpretation
                );
                self.current.results.push(result);
                None
            }
            Record::Terminator(terminator) => {
                info!(
                    "terminator received (code '{}')",
                    terminator.termination_code
                );
                Some(self.finalize())
            }
        }
    }

    /// Finalize the open session if it holds any data
    ///
    /// Called on EOT. A transmission closed by a terminator record has
    /// already been finalized and left an empty session behind, so this
    /// does not deliver twice.
    pub fn finalize_if_open(&mut self) -> Option<Session> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.finalize())
        }
    }

    /// Drop the open session without delivering it
    pub fn discard(&mut self) {
        if !self.current.is_empty() {
            warn!(
                "discarding partial session {} ({} results)",
                self.current.session_id,
                self.current.results.len()
            );
        }
        self.current = Session::open(Utc::now());
    }

    /// Sessions finalized since construction
    pub fn sessions_finalized(&self) -> u64 {
        self.sessions_finalized
    }

    fn finalize(&mut self) -> Session {
        let now = Utc::now();
        let mut session = std::mem::replace(&mut self.current, Session::open(now));
        session.ended_at = Some(now);
        self.sessions_finalized += 1;
        info!(
            "session {} finalized with {} results",
            session.session_id,
            session.results.len()
        );
        session
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(line: &str) -> Record {
        Record::decode(line).unwrap()
    }

    fn full_transmission(aggregator: &mut SessionAggregator) -> Session {
        aggregator.absorb(decode("H|\\^&|||Alcor^iSED^1.4.2^07|||||||P|E 1394-97|20250612093045"));
        aggregator.absorb(decode("P|1||PID-1||Doe^Jane||19751023|F"));
        aggregator.absorb(decode("O|1|S-100^3||^^^ESR"));
        aggregator.absorb(decode("R|1|^^^ESR^4537-7|15|mm/h|||||||20250612093000|20250612093030|07"));
        aggregator.absorb(decode("L|1|N")).unwrap()
    }

    #[test]
    fn test_terminator_finalizes_session() {
        let mut aggregator = SessionAggregator::new();
        let session = full_transmission(&mut aggregator);

        assert_eq!(session.header.as_ref().unwrap().product_name, "iSED");
        assert_eq!(session.patients.len(), 1);
        assert_eq!(session.orders.len(), 1);
        assert_eq!(session.results.len(), 1);
        assert!(session.ended_at.is_some());
        assert_eq!(aggregator.sessions_finalized(), 1);
    }

    #[test]
    fn test_eot_after_terminator_does_not_finalize_twice() {
        let mut aggregator = SessionAggregator::new();
        full_transmission(&mut aggregator);
        assert_eq!(aggregator.finalize_if_open(), None);
        assert_eq!(aggregator.sessions_finalized(), 1);
    }

    #[test]
    fn test_eot_without_terminator_finalizes_nonempty_session() {
        let mut aggregator = SessionAggregator::new();
        aggregator.absorb(decode("H|\\^&|||Alcor^iSED^1.0^01"));
        aggregator.absorb(decode("R|1|^^^ESR|42|mm/h"));

        let session = aggregator.finalize_if_open().unwrap();
        assert_eq!(session.results.len(), 1);
        assert_eq!(aggregator.finalize_if_open(), None);
    }

    #[test]
    fn test_second_header_overwrites_first() {
        let mut aggregator = SessionAggregator::new();
        aggregator.absorb(decode("H|\\^&|||Alcor^iSED^1.0^01"));
        aggregator.absorb(decode("H|\\^&|||Alcor^iSED^2.0^02"));
        let session = aggregator.finalize_if_open().unwrap();
        assert_eq!(session.header.unwrap().software_version, "2.0");
    }

    #[test]
    fn test_discard_drops_partial_session() {
        let mut aggregator = SessionAggregator::new();
        aggregator.absorb(decode("P|1||PID-1"));
        aggregator.discard();
        assert_eq!(aggregator.finalize_if_open(), None);
        assert_eq!(aggregator.sessions_finalized(), 0);
    }

    #[test]
    fn test_summary_joins_on_sequence_number() {
        let mut aggregator = SessionAggregator::new();
        let session = full_transmission(&mut aggregator);
        let summary = session.summary();

        assert_eq!(summary.session_info.analyzer, "Alcor iSED");
        assert_eq!(summary.session_info.software_version, "1.4.2");
        assert_eq!(summary.statistics.total_results, 1);
        assert_eq!(summary.statistics.normal_results, 1);
        assert_eq!(summary.statistics.abnormal_results, 0);

        let row = &summary.results[0];
        assert_eq!(row.test_number, 1);
        assert_eq!(row.patient_name, "Doe^Jane");
        assert_eq!(row.patient_id, "PID-1");
        assert_eq!(row.sample_id, "S-100");
        assert_eq!(row.value, "15");
        assert_eq!(row.interpretation, "Normal measurement: 15 mm/hr");
        assert_eq!(row.test_completed, "20250612093030");
    }

    #[test]
    fn test_summary_uses_placeholders_for_missing_joins() {
        let mut aggregator = SessionAggregator::new();
        aggregator.absorb(decode("R|9|^^^ESR|-2|mm/h"));
        let session = aggregator.finalize_if_open().unwrap();
        let summary = session.summary();

        let row = &summary.results[0];
        assert_eq!(row.patient_name, "N/A");
        assert_eq!(row.patient_id, "N/A");
        assert_eq!(row.sample_id, "N/A");
        assert_eq!(row.interpretation, "No spike detected");
        assert_eq!(summary.session_info.instrument_id, "N/A");
        assert_eq!(summary.statistics.abnormal_results, 1);
    }

    #[test]
    fn test_summary_first_match_wins_on_duplicate_sequence() {
        let mut aggregator = SessionAggregator::new();
        aggregator.absorb(decode("P|1||PID-first||First^Patient"));
        aggregator.absorb(decode("P|1||PID-second||Second^Patient"));
        aggregator.absorb(decode("R|1|^^^ESR|10|mm/h"));
        let session = aggregator.finalize_if_open().unwrap();

        let summary = session.summary();
        assert_eq!(summary.results[0].patient_id, "PID-first");
    }

    #[test]
    fn test_new_session_opens_after_finalize() {
        let mut aggregator = SessionAggregator::new();
        let first = full_transmission(&mut aggregator);
        let second = full_transmission(&mut aggregator);
        assert!(second.started_at >= first.ended_at.unwrap());
        assert_eq!(second.results.len(), 1);
        assert_eq!(aggregator.sessions_finalized(), 2);
    }
}
