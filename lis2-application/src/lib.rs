//! Application layer: LIS2-A2 record decoding and session aggregation
//!
//! Takes the record lines carried by acknowledged frames and turns them into
//! typed entities, interpreted results and finalized sessions.

pub mod error;
pub mod header;
pub mod interpret;
pub mod order;
pub mod patient;
pub mod record;
pub mod result;
pub mod session;
pub mod terminator;

pub use error::{Lis2Error, Lis2Result};
pub use header::HeaderRecord;
pub use interpret::{InstrumentError, Interpretation};
pub use order::OrderRecord;
pub use patient::PatientRecord;
pub use record::{Fields, Record};
pub use result::ResultRecord;
pub use session::{
    Session, SessionAggregator, SessionInfo, SessionSummary, SummaryRow, SummaryStatistics,
};
pub use terminator::TerminatorRecord;
