//! Entity domain models
//!
//! Every stored entity carries an explicit kind tag, serialized as the first
//! JSON field, and a primary string identifier. JSON field names follow the
//! ledger's established wire schema (e.g. the patient id is `photo_id`).

use super::errors::CareTrailError;
use super::result::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kinds held by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    PatientInformation,
    MedicalRecord,
    DrugInformation,
    HospitalFees,
    User,
}

impl EntityKind {
    /// Literal kind tag written into every serialized entity
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientInformation => "PatientInformation",
            Self::MedicalRecord => "MedicalRecord",
            Self::DrugInformation => "DrugInformation",
            Self::HospitalFees => "HospitalFees",
            Self::User => "User",
        }
    }

    /// Name of the invocation that creates this kind
    pub fn create_function(&self) -> &'static str {
        match self {
            Self::PatientInformation => "createPatientInformation",
            Self::MedicalRecord => "createMedicalRecord",
            Self::DrugInformation => "createDrugInformation",
            Self::HospitalFees => "createHospitalFees",
            Self::User => "createUser",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record addressable by its primary identifier
///
/// `from_fields` takes the positional invocation arguments in order, id first.
/// Callers validate non-emptiness before construction; arity is re-checked
/// here so a direct call can never build a half-populated entity.
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync {
    /// Kind discriminator
    const KIND: EntityKind;

    /// Number of positional fields, id included
    const ARITY: usize;

    /// Name of the secondary index this entity registers
    const INDEX_NAME: &'static str;

    /// Builds the entity from positional fields
    fn from_fields(fields: Vec<String>) -> Result<Self>;

    /// Primary identifier
    fn id(&self) -> &str;

    /// Kind tag as stored
    fn kind_tag(&self) -> &str;

    /// Field values making up the secondary index key, id first
    fn index_fields(&self) -> Vec<String>;
}

/// An entity whose non-key fields can be overwritten in place
pub trait Mutable: Entity {
    /// Replacement values for the mutable fields
    type Update: Clone + fmt::Debug + Send + Sync;

    /// Number of positional update fields
    const UPDATE_ARITY: usize;

    /// Builds an update from positional fields
    fn update_from_fields(fields: Vec<String>) -> Result<Self::Update>;

    /// Overwrites the mutable fields; id and kind tag are left alone
    fn apply_update(&mut self, update: &Self::Update);
}

fn into_array<const N: usize>(function: &str, fields: Vec<String>) -> Result<[String; N]> {
    let actual = fields.len();
    fields.try_into().map_err(|_| CareTrailError::Arity {
        function: function.to_string(),
        expected: N,
        actual,
    })
}

/// Patient information (insurance, current medication, appointments)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInformation {
    #[serde(rename = "doctype")]
    pub object_type: String,
    #[serde(rename = "photo_id")]
    pub id: String,
    pub insurance_card: String,
    pub current_medication_information: String,
    pub related_medical_records: String,
    pub make_note_of_appointment_date: String,
}

/// Replacement values for [`PatientInformation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientUpdate {
    pub insurance_card: String,
    pub current_medication_information: String,
    pub related_medical_records: String,
    pub make_note_of_appointment_date: String,
}

impl Entity for PatientInformation {
    const KIND: EntityKind = EntityKind::PatientInformation;
    const ARITY: usize = 5;
    const INDEX_NAME: &'static str = "id~insurance_card";

    fn from_fields(fields: Vec<String>) -> Result<Self> {
        let [id, insurance_card, current_medication_information, related_medical_records, make_note_of_appointment_date] =
            into_array(Self::KIND.create_function(), fields)?;
        Ok(Self {
            object_type: Self::KIND.as_str().to_string(),
            id,
            insurance_card,
            current_medication_information,
            related_medical_records,
            make_note_of_appointment_date,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind_tag(&self) -> &str {
        &self.object_type
    }

    fn index_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.insurance_card.clone(),
            self.current_medication_information.clone(),
            self.related_medical_records.clone(),
            self.make_note_of_appointment_date.clone(),
        ]
    }
}

impl Mutable for PatientInformation {
    type Update = PatientUpdate;
    const UPDATE_ARITY: usize = 4;

    fn update_from_fields(fields: Vec<String>) -> Result<Self::Update> {
        let [insurance_card, current_medication_information, related_medical_records, make_note_of_appointment_date] =
            into_array("modifyPatientInformation", fields)?;
        Ok(PatientUpdate {
            insurance_card,
            current_medication_information,
            related_medical_records,
            make_note_of_appointment_date,
        })
    }

    fn apply_update(&mut self, update: &Self::Update) {
        self.insurance_card = update.insurance_card.clone();
        self.current_medication_information = update.current_medication_information.clone();
        self.related_medical_records = update.related_medical_records.clone();
        self.make_note_of_appointment_date = update.make_note_of_appointment_date.clone();
    }
}

/// Medical record (identification and histories)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(rename = "doctype")]
    pub object_type: String,
    pub id: String,
    #[serde(rename = "personal_identification")]
    pub personal_identification_information: String,
    pub medical_history: String,
    pub family_medical_history: String,
    pub medication_history: String,
    pub treatment_history: String,
    pub medical_directives: String,
}

/// Replacement values for [`MedicalRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicalUpdate {
    pub personal_identification_information: String,
    pub medical_history: String,
    pub family_medical_history: String,
    pub medication_history: String,
    pub treatment_history: String,
    pub medical_directives: String,
}

impl Entity for MedicalRecord {
    const KIND: EntityKind = EntityKind::MedicalRecord;
    const ARITY: usize = 7;
    const INDEX_NAME: &'static str = "id";

    fn from_fields(fields: Vec<String>) -> Result<Self> {
        let [id, personal_identification_information, medical_history, family_medical_history, medication_history, treatment_history, medical_directives] =
            into_array(Self::KIND.create_function(), fields)?;
        Ok(Self {
            object_type: Self::KIND.as_str().to_string(),
            id,
            personal_identification_information,
            medical_history,
            family_medical_history,
            medication_history,
            treatment_history,
            medical_directives,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind_tag(&self) -> &str {
        &self.object_type
    }

    fn index_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.personal_identification_information.clone(),
            self.medical_history.clone(),
            self.family_medical_history.clone(),
            self.medication_history.clone(),
            self.treatment_history.clone(),
            self.medical_directives.clone(),
        ]
    }
}

impl Mutable for MedicalRecord {
    type Update = MedicalUpdate;
    const UPDATE_ARITY: usize = 6;

    fn update_from_fields(fields: Vec<String>) -> Result<Self::Update> {
        let [personal_identification_information, medical_history, family_medical_history, medication_history, treatment_history, medical_directives] =
            into_array("modifyMedicalData", fields)?;
        Ok(MedicalUpdate {
            personal_identification_information,
            medical_history,
            family_medical_history,
            medication_history,
            treatment_history,
            medical_directives,
        })
    }

    fn apply_update(&mut self, update: &Self::Update) {
        self.personal_identification_information =
            update.personal_identification_information.clone();
        self.medical_history = update.medical_history.clone();
        self.family_medical_history = update.family_medical_history.clone();
        self.medication_history = update.medication_history.clone();
        self.treatment_history = update.treatment_history.clone();
        self.medical_directives = update.medical_directives.clone();
    }
}

/// A single drug dispensation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugInformation {
    #[serde(rename = "doctype")]
    pub object_type: String,
    pub id: String,
    pub patient_name: String,
    pub drug_name: String,
    pub expiration_date: String,
    pub quantity: String,
    pub prescribed_by: String,
}

/// Replacement values for [`DrugInformation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugUpdate {
    pub patient_name: String,
    pub drug_name: String,
    pub expiration_date: String,
    pub quantity: String,
    pub prescribed_by: String,
}

impl Entity for DrugInformation {
    const KIND: EntityKind = EntityKind::DrugInformation;
    const ARITY: usize = 6;
    const INDEX_NAME: &'static str = "id~patient_name";

    fn from_fields(fields: Vec<String>) -> Result<Self> {
        let [id, patient_name, drug_name, expiration_date, quantity, prescribed_by] =
            into_array(Self::KIND.create_function(), fields)?;
        Ok(Self {
            object_type: Self::KIND.as_str().to_string(),
            id,
            patient_name,
            drug_name,
            expiration_date,
            quantity,
            prescribed_by,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind_tag(&self) -> &str {
        &self.object_type
    }

    fn index_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.patient_name.clone(),
            self.drug_name.clone(),
            self.expiration_date.clone(),
            self.quantity.clone(),
            self.prescribed_by.clone(),
        ]
    }
}

impl Mutable for DrugInformation {
    type Update = DrugUpdate;
    const UPDATE_ARITY: usize = 5;

    fn update_from_fields(fields: Vec<String>) -> Result<Self::Update> {
        let [patient_name, drug_name, expiration_date, quantity, prescribed_by] =
            into_array("modifyDrugData", fields)?;
        Ok(DrugUpdate {
            patient_name,
            drug_name,
            expiration_date,
            quantity,
            prescribed_by,
        })
    }

    fn apply_update(&mut self, update: &Self::Update) {
        self.patient_name = update.patient_name.clone();
        self.drug_name = update.drug_name.clone();
        self.expiration_date = update.expiration_date.clone();
        self.quantity = update.quantity.clone();
        self.prescribed_by = update.prescribed_by.clone();
    }
}

/// Billing statement for a hospital stay. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalFees {
    #[serde(rename = "docType")]
    pub object_type: String,
    pub id: String,
    pub patient_name: String,
    pub account: String,
    pub date_of_service: String,
    pub patient_service: String,
    pub primary_insurance_billed: String,
    pub secondary_insurance_billed: String,
    pub pharmacy: String,
    pub room: String,
    pub amount_due: String,
}

impl Entity for HospitalFees {
    const KIND: EntityKind = EntityKind::HospitalFees;
    const ARITY: usize = 10;
    const INDEX_NAME: &'static str = "id~patient_name";

    fn from_fields(fields: Vec<String>) -> Result<Self> {
        let [id, patient_name, account, date_of_service, patient_service, primary_insurance_billed, secondary_insurance_billed, pharmacy, room, amount_due] =
            into_array(Self::KIND.create_function(), fields)?;
        Ok(Self {
            object_type: Self::KIND.as_str().to_string(),
            id,
            patient_name,
            account,
            date_of_service,
            patient_service,
            primary_insurance_billed,
            secondary_insurance_billed,
            pharmacy,
            room,
            amount_due,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind_tag(&self) -> &str {
        &self.object_type
    }

    fn index_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.patient_name.clone(),
            self.account.clone(),
            self.date_of_service.clone(),
            self.patient_service.clone(),
            self.primary_insurance_billed.clone(),
            self.secondary_insurance_billed.clone(),
            self.pharmacy.clone(),
            self.room.clone(),
            self.amount_due.clone(),
        ]
    }
}

/// Identity record of an actor allowed to query or modify patient data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "doctype")]
    pub object_type: String,
    pub id: String,
    pub name: String,
    pub age: u32,
    pub number: String,
    pub address: String,
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    const ARITY: usize = 5;
    const INDEX_NAME: &'static str = "id~name";

    fn from_fields(fields: Vec<String>) -> Result<Self> {
        let [id, name, age, number, address] = into_array(Self::KIND.create_function(), fields)?;
        let age = age
            .parse()
            .map_err(|_| CareTrailError::InvalidArgument("age must be a number".to_string()))?;
        Ok(Self {
            object_type: Self::KIND.as_str().to_string(),
            id,
            name,
            age,
            number,
            address,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn kind_tag(&self) -> &str {
        &self.object_type
    }

    fn index_fields(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_patient_json_layout() {
        let patient = PatientInformation::from_fields(strings(&[
            "P1",
            "INS-1",
            "med-A",
            "rec-ref-1",
            "2024-01-01",
        ]))
        .unwrap();

        let json = serde_json::to_string(&patient).unwrap();
        assert!(json.starts_with("{\"doctype\":\"PatientInformation\",\"photo_id\":\"P1\""));
        assert!(json.contains("\"make_note_of_appointment_date\":\"2024-01-01\""));
    }

    #[test]
    fn test_hospital_fees_uses_camel_case_tag() {
        let fees = HospitalFees::from_fields(strings(&[
            "F1", "Jane", "ACC-9", "2024-02-02", "x-ray", "yes", "no", "main", "204", "120.00",
        ]))
        .unwrap();
        let value = serde_json::to_value(&fees).unwrap();
        assert_eq!(value["docType"], "HospitalFees");
        assert_eq!(value["amount_due"], "120.00");
    }

    #[test]
    fn test_from_fields_wrong_arity() {
        let err = MedicalRecord::from_fields(strings(&["M1", "a"])).unwrap_err();
        match err {
            CareTrailError::Arity {
                function,
                expected,
                actual,
            } => {
                assert_eq!(function, "createMedicalRecord");
                assert_eq!(expected, 7);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_drug_index_covers_every_field() {
        let drug = DrugInformation::from_fields(strings(&[
            "D1", "Jane", "aspirin", "2025-12", "30", "dr-who",
        ]))
        .unwrap();
        assert_eq!(
            drug.index_fields(),
            strings(&["D1", "Jane", "aspirin", "2025-12", "30", "dr-who"])
        );
    }

    #[test]
    fn test_apply_update_keeps_id_and_kind() {
        let mut record = MedicalRecord::from_fields(strings(&[
            "M1", "pid", "mh", "fh", "medh", "th", "dir",
        ]))
        .unwrap();
        let update =
            MedicalRecord::update_from_fields(strings(&["pid2", "mh2", "fh2", "medh2", "th2", "dir2"]))
                .unwrap();
        record.apply_update(&update);

        assert_eq!(record.id, "M1");
        assert_eq!(record.kind_tag(), "MedicalRecord");
        assert_eq!(record.medical_directives, "dir2");
    }

    #[test]
    fn test_user_age_must_be_numeric() {
        let err = User::from_fields(strings(&["u1", "Ann", "old", "555", "Main St"])).unwrap_err();
        assert!(matches!(err, CareTrailError::InvalidArgument(_)));

        let user = User::from_fields(strings(&["u1", "Ann", "41", "555", "Main St"])).unwrap();
        assert_eq!(user.age, 41);
    }

    #[test]
    fn test_user_age_rejects_padding() {
        let err = User::from_fields(strings(&["u1", "Ann", " 41 ", "555", "Main St"])).unwrap_err();
        assert!(matches!(err, CareTrailError::InvalidArgument(_)));
    }

    #[test]
    fn test_roundtrip_preserves_kind_tag() {
        let drug = DrugInformation::from_fields(strings(&["D1", "a", "b", "c", "d", "e"])).unwrap();
        let bytes = serde_json::to_vec(&drug).unwrap();
        let back: DrugInformation = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, drug);
        assert_eq!(back.kind_tag(), EntityKind::DrugInformation.as_str());
    }
}
