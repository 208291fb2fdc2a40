//! Patient record (P), demographics for the samples that follow

use crate::record::{join_fields, Fields};
use serde::{Deserialize, Serialize};

/// Patient record with the full LIS2-A2 field layout
///
/// The analyzer emits most of these empty; they are kept so downstream
/// consumers see the complete standard shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Join key against order and result records
    pub sequence_number: String,
    pub practice_patient_id: String,
    /// Laboratory-assigned patient id, the primary identifier
    pub laboratory_patient_id: String,
    pub patient_id_3: String,
    pub patient_name: String,
    pub mother_maiden_name: String,
    pub birthdate: String,
    pub patient_sex: String,
    pub patient_race: String,
    pub patient_address: String,
    pub reserved: String,
    pub patient_phone: String,
    pub attending_physician_id: String,
    pub special_field_1: String,
    pub special_field_2: String,
    pub patient_height: String,
    pub patient_weight: String,
    pub diagnosis: String,
    pub active_medications: String,
    pub patient_diet: String,
    pub practice_field_1: String,
    pub practice_field_2: String,
    pub admission_discharge_dates: String,
    pub admission_status: String,
    pub location: String,
    pub diagnostic_code_nature_1: String,
    pub diagnostic_code_nature_2: String,
    pub patient_religion: String,
    pub marital_status: String,
    pub isolation_status: String,
    pub language: String,
    pub hospital_service: String,
    pub hospital_institution: String,
    pub dosage_category: String,
}

impl PatientRecord {
    pub(crate) fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            sequence_number: fields.get(1),
            practice_patient_id: fields.get(2),
            laboratory_patient_id: fields.get(3),
            patient_id_3: fields.get(4),
            patient_name: fields.get(5),
            mother_maiden_name: fields.get(6),
            birthdate: fields.get(7),
            patient_sex: fields.get(8),
            patient_race: fields.get(9),
            patient_address: fields.get(10),
            reserved: fields.get(11),
            patient_phone: fields.get(12),
            attending_physician_id: fields.get(13),
            special_field_1: fields.get(14),
            special_field_2: fields.get(15),
            patient_height: fields.get(16),
            patient_weight: fields.get(17),
            diagnosis: fields.get(18),
            active_medications: fields.get(19),
            patient_diet: fields.get(20),
            practice_field_1: fields.get(21),
            practice_field_2: fields.get(22),
            admission_discharge_dates: fields.get(23),
            admission_status: fields.get(24),
            location: fields.get(25),
            diagnostic_code_nature_1: fields.get(26),
            diagnostic_code_nature_2: fields.get(27),
            patient_religion: fields.get(28),
            marital_status: fields.get(29),
            isolation_status: fields.get(30),
            language: fields.get(31),
            hospital_service: fields.get(32),
            hospital_institution: fields.get(33),
            dosage_category: fields.get(34),
        }
    }

    /// Re-encode as a wire record line
    pub fn encode(&self) -> String {
        join_fields(&[
            "P".to_string(),
            self.sequence_number.clone(),
            self.practice_patient_id.clone(),
            self.laboratory_patient_id.clone(),
            self.patient_id_3.clone(),
            self.patient_name.clone(),
            self.mother_maiden_name.clone(),
            self.birthdate.clone(),
            self.patient_sex.clone(),
            self.patient_race.clone(),
            self.patient_address.clone(),
            self.reserved.clone(),
            self.patient_phone.clone(),
            self.attending_physician_id.clone(),
            self.special_field_1.clone(),
            self.special_field_2.clone(),
            self.patient_height.clone(),
            self.patient_weight.clone(),
            self.diagnosis.clone(),
            self.active_medications.clone(),
            self.patient_diet.clone(),
            self.practice_field_1.clone(),
            self.practice_field_2.clone(),
            self.admission_discharge_dates.clone(),
            self.admission_status.clone(),
            self.location.clone(),
            self.diagnostic_code_nature_1.clone(),
            self.diagnostic_code_nature_2.clone(),
            self.patient_religion.clone(),
            self.marital_status.clone(),
            self.isolation_status.clone(),
            self.language.clone(),
            self.hospital_service.clone(),
            self.hospital_institution.clone(),
            self.dosage_category.clone(),
        ])
    }
}
