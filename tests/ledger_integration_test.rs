//! End-to-end tests of ledger invocations over the in-memory store

use caretrail::adapters::memory::MemoryStore;
use caretrail::adapters::state::StateStore;
use caretrail::config::{CollectionsConfig, DuplicatePolicy};
use caretrail::core::{Ledger, Response};
use caretrail::domain::{
    AccessEvent, AccessTrailEntry, DrugInformation, ErrorKind, HospitalFees, MedicalRecord,
    PatientInformation, Purpose,
};
use std::sync::Arc;
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn collections() -> CollectionsConfig {
    CollectionsConfig {
        identity: "identityCollection".to_string(),
        ..Default::default()
    }
}

fn ledger_over(store: Arc<MemoryStore>, policy: DuplicatePolicy) -> Ledger {
    Ledger::new(store, collections(), policy)
}

async fn invoke_ok(ledger: &Ledger, function: &str, args: &[&str]) -> Vec<u8> {
    match ledger.invoke(function, strings(args)).await {
        Response::Success { payload } => payload,
        Response::Error { kind, message } => panic!("{function} failed: {kind}: {message}"),
    }
}

async fn setup() -> (Arc<MemoryStore>, Ledger) {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone(), DuplicatePolicy::Upsert);
    invoke_ok(&ledger, "createUser", &["nurseA", "Ann", "41", "555-0100", "1 Main St"]).await;
    invoke_ok(
        &ledger,
        "createPatientInformation",
        &["P1", "INS-1", "med-A", "rec-ref-1", "2024-01-01"],
    )
    .await;
    (store, ledger)
}

#[tokio::test]
async fn test_query_returns_patient_and_logs_event() {
    let (_, ledger) = setup().await;

    let payload = invoke_ok(&ledger, "query", &["nurseA", "P1", "ward-3", "identityCollection"]).await;
    let patient: PatientInformation = serde_json::from_slice(&payload).unwrap();
    assert_eq!(patient.id, "P1");
    assert_eq!(patient.insurance_card, "INS-1");
    assert_eq!(patient.make_note_of_appointment_date, "2024-01-01");

    let history = invoke_ok(&ledger, "historyQuery", &["nurseA"]).await;
    let event: AccessEvent = serde_json::from_slice(&history).unwrap();
    assert_eq!(event.actor.as_str(), "nurseA");
    assert_eq!(event.subject.as_str(), "P1");
    assert_eq!(event.location, "ward-3");
    assert_eq!(event.purpose, Purpose::Query);

    // A query never lands in the modify log.
    let modify = ledger.invoke("historyModify", strings(&["nurseA"])).await;
    assert_eq!(modify.error_kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_unknown_actor_leaves_no_trace() {
    let (store, ledger) = setup().await;
    let before = store.len("queryCollection").await;

    let response = ledger
        .invoke("query", strings(&["ghost", "P1", "ward-3", "identityCollection"]))
        .await;
    assert_eq!(response.error_kind(), Some(ErrorKind::UnknownActor));

    assert_eq!(store.len("queryCollection").await, before);
    let history = ledger.invoke("historyQuery", strings(&["ghost"])).await;
    assert_eq!(history.error_kind(), Some(ErrorKind::NotFound));

    let stored = store
        .get("PatientInformationCollection", "P1")
        .await
        .unwrap()
        .unwrap();
    let patient: PatientInformation = serde_json::from_slice(&stored).unwrap();
    assert_eq!(patient.insurance_card, "INS-1");
}

#[tokio::test]
async fn test_actor_must_exist_in_named_collection() {
    let (_, ledger) = setup().await;

    let response = ledger
        .invoke("query", strings(&["nurseA", "P1", "ward-3", "someOtherCollection"]))
        .await;
    assert_eq!(response.error_kind(), Some(ErrorKind::UnknownActor));
}

#[tokio::test]
async fn test_arity_checked_for_every_function() {
    let ledger = ledger_over(Arc::new(MemoryStore::new()), DuplicatePolicy::Upsert);

    let cases: &[(&str, usize)] = &[
        ("createPatientInformation", 5),
        ("createMedicalRecord", 7),
        ("createDrugInformation", 6),
        ("createHospitalFees", 10),
        ("createUser", 5),
        ("query", 4),
        ("modifyPatientInformation", 8),
        ("modifyMedicalData", 10),
        ("modifyDrugData", 9),
        ("historyQuery", 1),
        ("historyModify", 1),
    ];

    for &(function, arity) in cases {
        for count in [arity - 1, arity + 1] {
            let args = (0..count).map(|i| format!("a{i}")).collect();
            let response = ledger.invoke(function, args).await;
            assert_eq!(
                response.error_kind(),
                Some(ErrorKind::ArityError),
                "{function} with {count} arguments"
            );
        }
    }
}

#[tokio::test]
async fn test_empty_field_reports_position() {
    let ledger = ledger_over(Arc::new(MemoryStore::new()), DuplicatePolicy::Upsert);

    let response = ledger
        .invoke("createDrugInformation", strings(&["D1", "Jane", "", "2025-01", "30", "drX"]))
        .await;
    match response {
        Response::Error { kind, message } => {
            assert_eq!(kind, ErrorKind::EmptyFieldError);
            assert!(message.contains('3'), "{message}");
        }
        Response::Success { .. } => panic!("expected EmptyFieldError"),
    }
}

#[tokio::test]
async fn test_create_user_with_invalid_age() {
    let ledger = ledger_over(Arc::new(MemoryStore::new()), DuplicatePolicy::Upsert);

    let response = ledger
        .invoke("createUser", strings(&["u1", "Bob", "forty", "555", "addr"]))
        .await;
    assert_eq!(response.error_kind(), Some(ErrorKind::InvalidArgument));
}

#[tokio::test]
async fn test_create_is_idempotent_under_upsert() {
    let (store, ledger) = setup().await;
    let before = store.len("PatientInformationCollection").await;

    invoke_ok(
        &ledger,
        "createPatientInformation",
        &["P1", "INS-1", "med-A", "rec-ref-1", "2024-01-01"],
    )
    .await;

    assert_eq!(store.len("PatientInformationCollection").await, before);
}

#[tokio::test]
async fn test_reject_policy_refuses_duplicates() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store, DuplicatePolicy::Reject);
    let fields = ["M1", "pid", "none", "none", "aspirin", "none", "DNR"];

    invoke_ok(&ledger, "createMedicalRecord", &fields).await;
    let response = ledger.invoke("createMedicalRecord", strings(&fields)).await;
    assert_eq!(response.error_kind(), Some(ErrorKind::AlreadyExists));
}

#[tokio::test]
async fn test_modify_updates_fields_and_reindexes() {
    let (store, ledger) = setup().await;

    invoke_ok(
        &ledger,
        "modifyPatientInformation",
        &["nurseA", "P1", "ward-3", "identityCollection", "INS-2", "med-B", "rec-ref-2", "2024-02-02"],
    )
    .await;

    let stored = store
        .get("PatientInformationCollection", "P1")
        .await
        .unwrap()
        .unwrap();
    let patient: PatientInformation = serde_json::from_slice(&stored).unwrap();
    assert_eq!(patient.id, "P1");
    assert_eq!(patient.object_type, "PatientInformation");
    assert_eq!(patient.insurance_card, "INS-2");
    assert_eq!(patient.make_note_of_appointment_date, "2024-02-02");

    let old_marker = "\u{0}id~insurance_card\u{0}P1\u{0}INS-1\u{0}";
    let new_marker = "\u{0}id~insurance_card\u{0}P1\u{0}INS-2\u{0}";
    let c = "PatientInformationCollection";
    assert!(store.get(c, old_marker).await.unwrap().is_none());
    assert_eq!(store.get(c, new_marker).await.unwrap(), Some(vec![0x00]));

    let history = invoke_ok(&ledger, "historyModify", &["nurseA"]).await;
    let event: AccessEvent = serde_json::from_slice(&history).unwrap();
    assert_eq!(event.purpose, Purpose::Modify);
}

#[tokio::test]
async fn test_modify_medical_data_rewrites_record() {
    let (store, ledger) = setup().await;
    invoke_ok(
        &ledger,
        "createMedicalRecord",
        &["M1", "pid-1", "asthma", "none", "aspirin", "none", "DNR"],
    )
    .await;

    invoke_ok(
        &ledger,
        "modifyMedicalData",
        &[
            "nurseA", "M1", "ward-5", "identityCollection", "pid-2", "asthma, flu", "diabetes",
            "ibuprofen", "rest", "full code",
        ],
    )
    .await;

    let stored = store
        .get("MedicalRecordCollection", "M1")
        .await
        .unwrap()
        .unwrap();
    let record: MedicalRecord = serde_json::from_slice(&stored).unwrap();
    assert_eq!(record.id, "M1");
    assert_eq!(record.object_type, "MedicalRecord");
    assert_eq!(record.personal_identification_information, "pid-2");
    assert_eq!(record.medical_history, "asthma, flu");
    assert_eq!(record.family_medical_history, "diabetes");
    assert_eq!(record.medication_history, "ibuprofen");
    assert_eq!(record.treatment_history, "rest");
    assert_eq!(record.medical_directives, "full code");

    let event: AccessEvent =
        serde_json::from_slice(&invoke_ok(&ledger, "historyModify", &["nurseA"]).await).unwrap();
    assert_eq!(event.subject.as_str(), "M1");
    assert_eq!(event.location, "ward-5");
}

#[tokio::test]
async fn test_hospital_fees_stored_as_created() {
    let ledger = ledger_over(Arc::new(MemoryStore::new()), DuplicatePolicy::Upsert);
    invoke_ok(
        &ledger,
        "createHospitalFees",
        &[
            "F1", "Jane", "ACC-7", "2025-03-01", "x-ray", "120", "30", "15", "201", "165",
        ],
    )
    .await;

    let stored = ledger
        .store()
        .get("HospitalFeesCollection", "F1")
        .await
        .unwrap()
        .unwrap();
    let fees: HospitalFees = serde_json::from_slice(&stored).unwrap();
    assert_eq!(fees.object_type, "HospitalFees");
    assert_eq!(fees.patient_name, "Jane");
    assert_eq!(fees.account, "ACC-7");
    assert_eq!(fees.primary_insurance_billed, "120");
    assert_eq!(fees.secondary_insurance_billed, "30");
    assert_eq!(fees.room, "201");
    assert_eq!(fees.amount_due, "165");
}

#[tokio::test]
async fn test_whitespace_ids_round_trip() {
    let (_, ledger) = setup().await;
    invoke_ok(&ledger, "createUser", &[" ", "Sam", "30", "555", "2 Main St"]).await;
    invoke_ok(
        &ledger,
        "createPatientInformation",
        &[" ", "INS-3", "med-D", "rec-ref-3", "2024-04-04"],
    )
    .await;

    // Nothing recorded yet, so the lookup is a miss rather than a bad id.
    let before = ledger.invoke("historyQuery", strings(&[" "])).await;
    assert_eq!(before.error_kind(), Some(ErrorKind::NotFound));

    let payload = invoke_ok(&ledger, "query", &["nurseA", " ", "ward-3", "identityCollection"]).await;
    let patient: PatientInformation = serde_json::from_slice(&payload).unwrap();
    assert_eq!(patient.id, " ");
    assert_eq!(patient.insurance_card, "INS-3");

    invoke_ok(&ledger, "query", &[" ", "P1", "ward-4", "identityCollection"]).await;
    let event: AccessEvent =
        serde_json::from_slice(&invoke_ok(&ledger, "historyQuery", &[" "]).await).unwrap();
    assert_eq!(event.actor.as_str(), " ");
    assert_eq!(event.subject.as_str(), "P1");
}

#[tokio::test]
async fn test_modify_drug_data_requires_existing_record() {
    let (_, ledger) = setup().await;
    let update = [
        "nurseA", "P9", "pharmacy", "identityCollection", "Jane", "ibuprofen", "2026-01", "20", "drY",
    ];

    let response = ledger.invoke("modifyDrugData", strings(&update)).await;
    assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));

    invoke_ok(
        &ledger,
        "createDrugInformation",
        &["P9", "Jane", "aspirin", "2025-01", "30", "drX"],
    )
    .await;
    invoke_ok(&ledger, "modifyDrugData", &update).await;

    let trail = invoke_ok(&ledger, "accessTrail", &["nurseA", "modify"]).await;
    let entries: Vec<AccessTrailEntry> = serde_json::from_slice(&trail).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].subject, "P9");
    assert_eq!(entries[0].location, "pharmacy");

    let drug: DrugInformation = serde_json::from_slice(
        &ledger
            .store()
            .get("DrugInformationCollection", "P9")
            .await
            .unwrap()
            .unwrap(),
    )
    .unwrap();
    assert_eq!(drug.drug_name, "ibuprofen");
}

#[tokio::test]
async fn test_history_keeps_latest_while_trail_keeps_all() {
    let (_, ledger) = setup().await;
    invoke_ok(
        &ledger,
        "createPatientInformation",
        &["P2", "INS-9", "med-C", "rec-ref-9", "2024-03-03"],
    )
    .await;

    invoke_ok(&ledger, "query", &["nurseA", "P1", "ward-3", "identityCollection"]).await;
    invoke_ok(&ledger, "query", &["nurseA", "P2", "ward-7", "identityCollection"]).await;
    invoke_ok(&ledger, "query", &["nurseA", "P1", "ward-3", "identityCollection"]).await;

    let latest: AccessEvent =
        serde_json::from_slice(&invoke_ok(&ledger, "historyQuery", &["nurseA"]).await).unwrap();
    assert_eq!(latest.subject.as_str(), "P1");

    let trail: Vec<AccessTrailEntry> =
        serde_json::from_slice(&invoke_ok(&ledger, "accessTrail", &["nurseA", "query"]).await)
            .unwrap();
    let subjects: Vec<&str> = trail.iter().map(|e| e.subject.as_str()).collect();
    assert_eq!(subjects, vec!["P1", "P2"]);

    let narrowed: Vec<AccessTrailEntry> = serde_json::from_slice(
        &invoke_ok(&ledger, "accessTrail", &["nurseA", "query", "P2"]).await,
    )
    .unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].location, "ward-7");
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = Arc::new(MemoryStore::open(&path).await.unwrap());
        let ledger = ledger_over(store, DuplicatePolicy::Upsert);
        invoke_ok(&ledger, "createUser", &["nurseA", "Ann", "41", "555", "Main St"]).await;
        invoke_ok(
            &ledger,
            "createPatientInformation",
            &["P1", "INS-1", "med-A", "rec-ref-1", "2024-01-01"],
        )
        .await;
        invoke_ok(&ledger, "query", &["nurseA", "P1", "ward-3", "identityCollection"]).await;
    }

    let store = Arc::new(MemoryStore::open(&path).await.unwrap());
    let ledger = ledger_over(store, DuplicatePolicy::Upsert);
    let event: AccessEvent =
        serde_json::from_slice(&invoke_ok(&ledger, "historyQuery", &["nurseA"]).await).unwrap();
    assert_eq!(event.subject.as_str(), "P1");
}
