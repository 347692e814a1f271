//! Ledger: invocation dispatch
//!
//! Each invocation runs in its own [`RecordStore`] transaction:
//!
//! - creates go to the [`EntityManager`];
//! - queries and modifications pass authorization, then the audit log, then
//!   the read or the [`MutationApplier`];
//! - history and trail reads go to the [`HistoryReader`].
//!
//! The transaction commits only when the whole invocation succeeds, so a
//! failed call never leaves an audit event or a partial index behind.

use crate::adapters::state::StateStore;
use crate::config::{CareTrailConfig, CollectionsConfig, DuplicatePolicy};
use crate::core::audit::AuditLogger;
use crate::core::authorization::authorize;
use crate::core::command::{AccessRequest, Command};
use crate::core::entities::EntityManager;
use crate::core::history::HistoryReader;
use crate::core::mutation::MutationApplier;
use crate::core::response::Response;
use crate::core::store::RecordStore;
use crate::domain::{
    CareTrailError, DrugInformation, MedicalRecord, Mutable, PatientInformation, Purpose, Result,
};
use crate::{log_error_with_context, log_invocation_complete, log_invocation_start};
use std::sync::Arc;
use std::time::Instant;

/// Access-audited record store
///
/// # Example
///
/// ```rust
/// use caretrail::adapters::memory::MemoryStore;
/// use caretrail::config::{CollectionsConfig, DuplicatePolicy};
/// use caretrail::core::ledger::Ledger;
/// use std::sync::Arc;
///
/// # async fn example() {
/// let ledger = Ledger::new(
///     Arc::new(MemoryStore::new()),
///     CollectionsConfig::default(),
///     DuplicatePolicy::Upsert,
/// );
///
/// let args = ["nurseA", "Ann", "41", "555-0100", "1 Main St"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let response = ledger.invoke("createUser", args).await;
/// assert!(response.is_success());
/// # }
/// ```
pub struct Ledger {
    store: Arc<dyn StateStore>,
    collections: CollectionsConfig,
    entities: EntityManager,
    audit: AuditLogger,
    history: HistoryReader,
    mutations: MutationApplier,
}

impl Ledger {
    pub fn new(
        store: Arc<dyn StateStore>,
        collections: CollectionsConfig,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            audit: AuditLogger::new(&collections),
            history: HistoryReader::new(&collections),
            entities: EntityManager::new(policy),
            mutations: MutationApplier::new(),
            collections,
            store,
        }
    }

    /// Builds a ledger over `store` using the collection names and duplicate
    /// policy from `config`
    pub fn from_config(store: Arc<dyn StateStore>, config: &CareTrailConfig) -> Self {
        Self::new(
            store,
            config.collections.clone(),
            config.store.duplicate_policy,
        )
    }

    pub fn collections(&self) -> &CollectionsConfig {
        &self.collections
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Parses, executes and times one invocation
    ///
    /// Never fails: errors come back as [`Response::Error`].
    pub async fn invoke(&self, function: &str, args: Vec<String>) -> Response {
        let start = Instant::now();
        log_invocation_start!(function, args.len());

        let result = match Command::parse(function, args) {
            Ok(command) => self.execute(command).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(payload) => {
                log_invocation_complete!(function, start.elapsed());
                Response::success(payload)
            }
            Err(err) => {
                log_error_with_context!(err, function);
                Response::error(&err)
            }
        }
    }

    /// Executes a parsed command atomically
    ///
    /// # Errors
    ///
    /// Any error of the dispatched operation; nothing is committed then.
    pub async fn execute(&self, command: Command) -> Result<Vec<u8>> {
        let mut store = RecordStore::begin(self.store.clone());
        let c = &self.collections;

        let payload = match command {
            Command::CreatePatientInformation(entity) => {
                self.entities
                    .insert(&mut store, &c.patient_information, &entity)
                    .await?;
                Vec::new()
            }
            Command::CreateMedicalRecord(entity) => {
                self.entities
                    .insert(&mut store, &c.medical_record, &entity)
                    .await?;
                Vec::new()
            }
            Command::CreateDrugInformation(entity) => {
                self.entities
                    .insert(&mut store, &c.drug_information, &entity)
                    .await?;
                Vec::new()
            }
            Command::CreateHospitalFees(entity) => {
                self.entities
                    .insert(&mut store, &c.hospital_fees, &entity)
                    .await?;
                Vec::new()
            }
            Command::CreateUser(entity) => {
                self.entities.insert(&mut store, &c.identity, &entity).await?;
                Vec::new()
            }
            Command::Query(access) => self.query(&mut store, &access).await?,
            Command::ModifyPatientInformation { access, update } => {
                self.modify::<PatientInformation>(&mut store, &c.patient_information, &access, &update)
                    .await?;
                Vec::new()
            }
            Command::ModifyMedicalData { access, update } => {
                self.modify::<MedicalRecord>(&mut store, &c.medical_record, &access, &update)
                    .await?;
                Vec::new()
            }
            Command::ModifyDrugData { access, update } => {
                self.modify::<DrugInformation>(&mut store, &c.drug_information, &access, &update)
                    .await?;
                Vec::new()
            }
            Command::HistoryQuery(actor) => {
                self.history
                    .read_access_history(&store, Purpose::Query, &actor)
                    .await?
            }
            Command::HistoryModify(actor) => {
                self.history
                    .read_access_history(&store, Purpose::Modify, &actor)
                    .await?
            }
            Command::AccessTrail {
                actor,
                purpose,
                subject,
            } => {
                let entries = self
                    .history
                    .access_trail(&store, purpose, &actor, subject.as_ref())
                    .await?;
                serde_json::to_vec(&entries)?
            }
        };

        store.commit().await?;
        Ok(payload)
    }

    async fn query(&self, store: &mut RecordStore, access: &AccessRequest) -> Result<Vec<u8>> {
        authorize(store, &access.actor_collection, &access.actor).await?;
        self.audit.log_access(
            store,
            &access.actor,
            &access.subject,
            &access.location,
            Purpose::Query,
        )?;

        let collection = &self.collections.patient_information;
        let patient: PatientInformation = store
            .get_entity(collection, access.subject.as_str())
            .await?
            .ok_or_else(|| {
                CareTrailError::NotFound(format!("PatientInformation '{}'", access.subject))
            })?;

        Ok(serde_json::to_vec(&patient)?)
    }

    async fn modify<E: Mutable>(
        &self,
        store: &mut RecordStore,
        collection: &str,
        access: &AccessRequest,
        update: &E::Update,
    ) -> Result<()> {
        authorize(store, &access.actor_collection, &access.actor).await?;
        self.audit.log_access(
            store,
            &access.actor,
            &access.subject,
            &access.location,
            Purpose::Modify,
        )?;

        self.mutations
            .apply::<E>(store, collection, access.subject.as_str(), update)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::ErrorKind;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn ledger() -> Ledger {
        Ledger::new(
            Arc::new(MemoryStore::new()),
            CollectionsConfig::default(),
            DuplicatePolicy::Upsert,
        )
    }

    #[tokio::test]
    async fn test_query_requires_patient() {
        let ledger = ledger();
        assert!(ledger
            .invoke("createUser", strings(&["nurseA", "Ann", "41", "555", "Main St"]))
            .await
            .is_success());

        let response = ledger
            .invoke("query", strings(&["nurseA", "P404", "ward-3", "userCollection"]))
            .await;
        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));

        // Failed invocation rolled back its audit event.
        let history = ledger.invoke("historyQuery", strings(&["nurseA"])).await;
        assert_eq!(history.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_unknown_function_response() {
        let response = ledger().invoke("dropTables", Vec::new()).await;
        assert_eq!(response.error_kind(), Some(ErrorKind::UnknownFunction));
    }
}
