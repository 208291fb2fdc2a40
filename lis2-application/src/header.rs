//! Header record (H), message envelope and analyzer identity

use crate::record::{join_fields, Fields};
use serde::{Deserialize, Serialize};

/// Header record, one per transmission
///
/// The sender field carries the analyzer identity as
/// `manufacturer^product^software version^instrument id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub delimiter_definition: String,
    pub message_control_id: String,
    pub access_password: String,
    pub manufacturer: String,
    pub product_name: String,
    pub software_version: String,
    pub instrument_id: String,
    pub sender_address: String,
    pub reserved: String,
    pub sender_phone: String,
    pub characteristics: String,
    pub receiver_id: String,
    pub comments: String,
    /// Expected `P` for production traffic
    pub processing_id: String,
    /// Expected `E 1394-97`
    pub version_number: String,
    /// `YYYYMMDDHHMMSS`
    pub message_datetime: String,
}

impl HeaderRecord {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            delimiter_definition: fields.get(1),
            message_control_id: fields.get(2),
            access_password: fields.get(3),
            manufacturer: fields.component(4, 0),
            product_name: fields.component(4, 1),
            software_version: fields.component(4, 2),
            instrument_id: fields.component(4, 3),
            sender_address: fields.get(5),
            reserved: fields.get(6),
            sender_phone: fields.get(7),
            characteristics: fields.get(8),
            receiver_id: fields.get(9),
            comments: fields.get(10),
            processing_id: fields.get(11),
            version_number: fields.get(12),
            message_datetime: fields.get(13),
        }
    }

    /// Re-encode as a wire record line
    pub fn encode(&self) -> String {
        let sender = [
            self.manufacturer.as_str(),
            self.product_name.as_str(),
            self.software_version.as_str(),
            self.instrument_id.as_str(),
        ]
        .join("^");
        let sender = sender.trim_end_matches('^').to_string();

        join_fields(&[
            "H".to_string(),
            self.delimiter_definition.clone(),
            self.message_control_id.clone(),
            self.access_password.clone(),
            sender,
            self.sender_address.clone(),
            self.reserved.clone(),
            self.sender_phone.clone(),
            self.characteristics.clone(),
            self.receiver_id.clone(),
            self.comments.clone(),
            self.processing_id.clone(),
            self.version_number.clone(),
            self.message_datetime.clone(),
        ])
    }

    /// `manufacturer product` for display and summaries
    pub fn analyzer_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.product_name)
    }
}
