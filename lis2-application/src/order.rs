//! Order record (O), one test order per sample

use crate::record::{join_fields, Fields};
use serde::{Deserialize, Serialize};

/// Order record with the full LIS2-A2 field layout
///
/// The specimen field carries `sample id^rotor location`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Join key against patient and result records
    pub sequence_number: String,
    pub sample_id: String,
    pub rotor_location: String,
    pub instrument_specimen_id: String,
    /// Expected `^^^ESR`
    pub universal_test_id: String,
    pub priority: String,
    pub requested_datetime: String,
    pub specimen_collection_datetime: String,
    pub collection_end_time: String,
    pub collection_volume: String,
    pub collector_id: String,
    pub action_code: String,
    pub danger_code: String,
    pub clinical_info: String,
    pub specimen_received_datetime: String,
    pub specimen_descriptor: String,
    pub ordering_physician: String,
    pub physician_phone: String,
    pub user_field_1: String,
    pub user_field_2: String,
    pub laboratory_field_1: String,
    pub laboratory_field_2: String,
    pub result_reported_datetime: String,
    pub instrument_charge: String,
    pub instrument_section_id: String,
    /// `P` marks a preliminary result
    pub report_types: String,
    pub reserved: String,
    pub specimen_location: String,
    pub nosocomial_infection_flag: String,
    pub specimen_service: String,
    pub specimen_institution: String,
}

impl OrderRecord {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            sequence_number: fields.get(1),
            sample_id: fields.component(2, 0),
            rotor_location: fields.component(2, 1),
            instrument_specimen_id: fields.get(3),
            universal_test_id: fields.get(4),
            priority: fields.get(5),
            requested_datetime: fields.get(6),
            specimen_collection_datetime: fields.get(7),
            collection_end_time: fields.get(8),
            collection_volume: fields.get(9),
            collector_id: fields.get(10),
            action_code: fields.get(11),
            danger_code: fields.get(12),
            clinical_info: fields.get(13),
            specimen_received_datetime: fields.get(14),
            specimen_descriptor: fields.get(15),
            ordering_physician: fields.get(16),
            physician_phone: fields.get(17),
            user_field_1: fields.get(18),
            user_field_2: fields.get(19),
            laboratory_field_1: fields.get(20),
            laboratory_field_2: fields.get(21),
            result_reported_datetime: fields.get(22),
            instrument_charge: fields.get(23),
            instrument_section_id: fields.get(24),
            report_types: fields.get(25),
            reserved: fields.get(26),
            specimen_location: fields.get(27),
            nosocomial_infection_flag: fields.get(28),
            specimen_service: fields.get(29),
            specimen_institution: fields.get(30),
        }
    }

    /// Re-encode as a wire record line
    pub fn encode(&self) -> String {
        let specimen = if self.rotor_location.is_empty() {
            self.sample_id.clone()
        } else {
            format!("{}^{}", self.sample_id, self.rotor_location)
        };

        join_fields(&[
            "O".to_string(),
            self.sequence_number.clone(),
            specimen,
            self.instrument_specimen_id.clone(),
            self.universal_test_id.clone(),
            self.priority.clone(),
            self.requested_datetime.clone(),
            self.specimen_collection_datetime.clone(),
            self.collection_end_time.clone(),
            self.collection_volume.clone(),
            self.collector_id.clone(),
            self.action_code.clone(),
            self.danger_code.clone(),
            self.clinical_info.clone(),
            self.specimen_received_datetime.clone(),
            self.specimen_descriptor.clone(),
            self.ordering_physician.clone(),
            self.physician_phone.clone(),
            self.user_field_1.clone(),
            self.user_field_2.clone(),
            self.laboratory_field_1.clone(),
            self.laboratory_field_2.clone(),
            self.result_reported_datetime.clone(),
            self.instrument_charge.clone(),
            self.instrument_section_id.clone(),
            self.report_types.clone(),
            self.reserved.clone(),
            self.specimen_location.clone(),
            self.nosocomial_infection_flag.clone(),
            self.specimen_service.clone(),
            self.specimen_institution.clone(),
        ])
    }
}
