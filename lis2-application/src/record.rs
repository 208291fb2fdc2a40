//! Raw LIS2-A2 record splitting and tag dispatch
//!
//! A record is one `|`-delimited line inside a frame payload. Any field index
//! the line does not reach reads as the empty string; composite fields are
//! further split on `^`. Decoding a record never fails, so a sparse or
//! over-long line from the instrument can not take down a frame.

use crate::header::HeaderRecord;
use crate::order::OrderRecord;
use crate::patient::PatientRecord;
use crate::result::ResultRecord;
use crate::terminator::TerminatorRecord;
use log::warn;
use serde::{Deserialize, Serialize};

/// Pipe-split field accessor with empty-string defaults
#[derive(Debug)]
pub struct Fields<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    /// Split a raw record line on `|`
    pub fn split(record: &'a str) -> Self {
        Self {
            fields: record.split('|').collect(),
        }
    }

    /// Field at `index`, or `""` when the record is too short
    pub fn get(&self, index: usize) -> String {
        self.fields.get(index).copied().unwrap_or("").to_string()
    }

    /// Caret-split component `component` of field `index`, or `""`
    pub fn component(&self, index: usize, component: usize) -> String {
        self.fields
            .get(index)
            .and_then(|field| field.split('^').nth(component))
            .unwrap_or("")
            .to_string()
    }

    /// Number of fields present on the wire
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the line carried no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Join fields back into a wire record, dropping trailing empties
pub(crate) fn join_fields(fields: &[String]) -> String {
    let last = fields
        .iter()
        .rposition(|f| !f.is_empty())
        .map_or(1, |pos| pos + 1);
    fields[..last.max(1)].join("|")
}

/// One decoded LIS2-A2 record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    Header(HeaderRecord),
    Patient(PatientRecord),
    Order(OrderRecord),
    Result(ResultRecord),
    Terminator(TerminatorRecord),
}

impl Record {
    /// Decode one record line by its leading tag character
    ///
    /// Unknown tags are logged and skipped with `None`; they are not an
    /// error, later instrument firmware may add record types.
    pub fn decode(record: &str) -> Option<Record> {
        let fields = Fields::split(record);
        match record.chars().next() {
            Some('H') => Some(Record::Header(HeaderRecord::from_fields(&fields))),
            Some('P') => Some(Record::Patient(PatientRecord::from_fields(&fields))),
            Some('O') => Some(Record::Order(OrderRecord::from_fields(&fields))),
            Some('R') => Some(Record::Result(ResultRecord::from_fields(&fields))),
            Some('L') => Some(Record::Terminator(TerminatorRecord::from_fields(&fields))),
            Some(tag) => {
                warn!("unknown record type '{}', skipped", tag);
                None
            }
            None => None,
        }
    }

    /// Tag character of this record
    pub fn tag(&self) -> char {
        match self {
            Record::Header(_) => 'H',
            Record::Patient(_) => 'P',
            Record::Order(_) => 'O',
            Record::Result(_) => 'R',
            Record::Terminator(_) => 'L',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_default_to_empty_past_the_end() {
        let fields = Fields::split("P|1|PID");
        assert_eq!(fields.get(0), "P");
        assert_eq!(fields.get(2), "PID");
        assert_eq!(fields.get(3), "");
        assert_eq!(fields.get(34), "");
    }

    #[test]
    fn test_component_splits_on_caret() {
        let fields = Fields::split("O|1|S-100^7");
        assert_eq!(fields.component(2, 0), "S-100");
        assert_eq!(fields.component(2, 1), "7");
        assert_eq!(fields.component(2, 2), "");
        assert_eq!(fields.component(9, 0), "");
    }

    #[test]
    fn test_join_drops_trailing_empty_fields() {
        let fields = vec![
            "R".to_string(),
            "1".to_string(),
            String::new(),
            "42".to_string(),
            String::new(),
            String::new(),
        ];
        assert_eq!(join_fields(&fields), "R|1||42");
    }

    #[test]
    fn test_decode_dispatches_on_tag() {
        assert!(matches!(
            Record::decode("H|\\^&"),
            Some(Record::Header(_))
        ));
        assert!(matches!(Record::decode("P|1"), Some(Record::Patient(_))));
        assert!(matches!(Record::decode("O|1|S1^2"), Some(Record::Order(_))));
        assert!(matches!(Record::decode("R|1|^^^ESR|12"), Some(Record::Result(_))));
        assert!(matches!(Record::decode("L|1|N"), Some(Record::Terminator(_))));
    }

    #[test]
    fn test_unknown_tag_is_skipped() {
        assert_eq!(Record::decode("Q|1|whatever"), None);
        assert_eq!(Record::decode(""), None);
    }
}
