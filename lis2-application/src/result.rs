//! Result record (R), one ESR measurement with its derived interpretation

use crate::interpret::Interpretation;
use crate::record::{join_fields, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result record
///
/// The interpretation is derived at decode time from the result value and
/// abnormal flag; `captured_at` stamps when this host decoded the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Join key against patient and order records
    pub sequence_number: String,
    /// Expected `^^^ESR^4537-7` (LOINC)
    pub universal_test_id: String,
    /// Measurement 0-130, or a negative error code
    pub result_value: String,
    /// Expected `mm/h`
    pub units: String,
    pub reference_range: String,
    /// `<` or `>` when the measurement fell outside the range
    pub abnormal_flag: String,
    pub abnormality_nature: String,
    /// `P` preliminary, `X` cannot do
    pub result_status: String,
    pub normative_change_date: String,
    pub operator_id: String,
    /// `YYYYMMDDHHMMSS`
    pub test_start_datetime: String,
    /// `YYYYMMDDHHMMSS`
    pub test_complete_datetime: String,
    /// 01-99
    pub instrument_id: String,
    pub interpretation: Interpretation,
    pub captured_at: DateTime<Utc>,
}

impl ResultRecord {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        let result_value = fields.get(3);
        let abnormal_flag = fields.get(6);
        let interpretation = Interpretation::classify(&result_value, &abnormal_flag);

        Self {
            sequence_number: fields.get(1),
            universal_test_id: fields.get(2),
            result_value,
            units: fields.get(4),
            reference_range: fields.get(5),
            abnormal_flag,
            abnormality_nature: fields.get(7),
            result_status: fields.get(8),
            normative_change_date: fields.get(9),
            operator_id: fields.get(10),
            test_start_datetime: fields.get(11),
            test_complete_datetime: fields.get(12),
            instrument_id: fields.get(13),
            interpretation,
            captured_at: Utc::now(),
        }
    }

    /// Re-encode as a wire record line
    ///
    /// Only the wire fields are encoded; the interpretation and capture
    /// timestamp are host-side derivations.
    pub fn encode(&self) -> String {
        join_fields(&[
            "R".to_string(),
            self.sequence_number.clone(),
            self.universal_test_id.clone(),
            self.result_value.clone(),
            self.units.clone(),
            self.reference_range.clone(),
            self.abnormal_flag.clone(),
            self.abnormality_nature.clone(),
            self.result_status.clone(),
            self.normative_change_date.clone(),
            self.operator_id.clone(),
            self.test_start_datetime.clone(),
            self.test_complete_datetime.clone(),
            self.instrument_id.clone(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::InstrumentError;
    use crate::record::Record;

    const WIRE: &str =
        "R|1|^^^ESR^4537-7|15|mm/h|||||||20250612093000|20250612093030|01";

    #[test]
    fn test_result_fields_and_interpretation() {
        let Some(Record::Result(result)) = Record::decode(WIRE) else {
            panic!("expected result record");
        };
        assert_eq!(result.sequence_number, "1");
        assert_eq!(result.universal_test_id, "^^^ESR^4537-7");
        assert_eq!(result.result_value, "15");
        assert_eq!(result.units, "mm/h");
        assert_eq!(result.test_start_datetime, "20250612093000");
        assert_eq!(result.test_complete_datetime, "20250612093030");
        assert_eq!(result.instrument_id, "01");
        assert_eq!(result.interpretation, Interpretation::Normal(15.0));
    }

    #[test]
    fn test_result_round_trips_through_encode() {
        let Some(Record::Result(result)) = Record::decode(WIRE) else {
            panic!("expected result record");
        };
        assert_eq!(result.encode(), WIRE);
    }

    #[test]
    fn test_error_code_result() {
        let Some(Record::Result(result)) = Record::decode("R|2|^^^ESR|-4|mm/h||||X") else {
            panic!("expected result record");
        };
        assert_eq!(result.result_status, "X");
        assert_eq!(
            result.interpretation,
            Interpretation::InstrumentError(InstrumentError::InsufficientPoints)
        );
    }

    #[test]
    fn test_flagged_result() {
        let Some(Record::Result(result)) = Record::decode("R|3|^^^ESR|135|mm/h||>") else {
            panic!("expected result record");
        };
        assert_eq!(result.abnormal_flag, ">");
        assert_eq!(result.interpretation, Interpretation::AboveRange);
    }
}
