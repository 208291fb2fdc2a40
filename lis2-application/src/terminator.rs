//! Terminator record (L), the authoritative end-of-message marker

use crate::record::{join_fields, Fields};
use serde::{Deserialize, Serialize};

/// Terminator record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminatorRecord {
    /// Expected `1`
    pub sequence_number: String,
    /// `N` for a normal termination
    pub termination_code: String,
}

impl TerminatorRecord {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            sequence_number: fields.get(1),
            termination_code: fields.get(2),
        }
    }

    /// Re-encode as a wire record line
    pub fn encode(&self) -> String {
        join_fields(&[
            "L".to_string(),
            self.sequence_number.clone(),
            self.termination_code.clone(),
        ])
    }

    pub fn is_normal(&self) -> bool {
        self.termination_code == "N"
    }
}
