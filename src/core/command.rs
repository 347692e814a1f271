//! Invocation parsing
//!
//! A ledger invocation arrives as a function name plus positional string
//! arguments. [`Command::parse`] turns that pair into a closed enum whose
//! payloads are already validated: argument count, non-empty arguments and
//! typed fields are all checked before any state is touched.

use crate::core::entities::validate_fields;
use crate::domain::{
    ActorId, CareTrailError, DrugInformation, DrugUpdate, Entity, HospitalFees, MedicalRecord,
    MedicalUpdate, Mutable, PatientInformation, PatientUpdate, Purpose, RecordId, Result, User,
};

pub const CREATE_PATIENT_INFORMATION: &str = "createPatientInformation";
pub const CREATE_MEDICAL_RECORD: &str = "createMedicalRecord";
pub const CREATE_DRUG_INFORMATION: &str = "createDrugInformation";
pub const CREATE_HOSPITAL_FEES: &str = "createHospitalFees";
pub const CREATE_USER: &str = "createUser";
pub const QUERY: &str = "query";
pub const MODIFY_DATA: &str = "modifyData";
pub const MODIFY_PATIENT_INFORMATION: &str = "modifyPatientInformation";
pub const MODIFY_MEDICAL_DATA: &str = "modifyMedicalData";
pub const MODIFY_DRUG_DATA: &str = "modifyDrugData";
pub const HISTORY_QUERY: &str = "historyQuery";
pub const HISTORY_MODIFY: &str = "historyModify";
pub const ACCESS_TRAIL: &str = "accessTrail";

/// Every function name accepted by [`Command::parse`]
pub const FUNCTIONS: &[&str] = &[
    CREATE_PATIENT_INFORMATION,
    CREATE_MEDICAL_RECORD,
    CREATE_DRUG_INFORMATION,
    CREATE_HOSPITAL_FEES,
    CREATE_USER,
    QUERY,
    MODIFY_DATA,
    MODIFY_PATIENT_INFORMATION,
    MODIFY_MEDICAL_DATA,
    MODIFY_DRUG_DATA,
    HISTORY_QUERY,
    HISTORY_MODIFY,
    ACCESS_TRAIL,
];

/// Number of leading arguments shared by query and modify calls
const ACCESS_ARITY: usize = 4;

/// Who is accessing which patient, from where, vouched for by which collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub actor: ActorId,
    pub subject: RecordId,
    pub location: String,
    /// Collection that must hold the actor's identity record
    pub actor_collection: String,
}

impl AccessRequest {
    fn from_fields([actor, subject, location, actor_collection]: [String; ACCESS_ARITY]) -> Result<Self> {
        Ok(Self {
            actor: ActorId::new(actor).map_err(CareTrailError::InvalidArgument)?,
            subject: RecordId::new(subject).map_err(CareTrailError::InvalidArgument)?,
            location,
            actor_collection,
        })
    }
}

/// A parsed ledger invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreatePatientInformation(PatientInformation),
    CreateMedicalRecord(MedicalRecord),
    CreateDrugInformation(DrugInformation),
    CreateHospitalFees(HospitalFees),
    CreateUser(User),
    Query(AccessRequest),
    ModifyPatientInformation {
        access: AccessRequest,
        update: PatientUpdate,
    },
    ModifyMedicalData {
        access: AccessRequest,
        update: MedicalUpdate,
    },
    ModifyDrugData {
        access: AccessRequest,
        update: DrugUpdate,
    },
    HistoryQuery(ActorId),
    HistoryModify(ActorId),
    AccessTrail {
        actor: ActorId,
        purpose: Purpose,
        subject: Option<RecordId>,
    },
}

impl Command {
    /// Parses and validates an invocation
    ///
    /// `modifyData` is accepted as an alias of `modifyPatientInformation`.
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` for an unrecognized name
    /// - `Arity` for a wrong argument count
    /// - `EmptyField` naming the first blank argument (1-based)
    /// - `InvalidArgument` for a malformed typed argument
    ///
    /// # Examples
    ///
    /// ```
    /// use caretrail::core::command::Command;
    ///
    /// let args = ["nurseA", "P1", "ward-3", "userCollection"]
    ///     .iter()
    ///     .map(|s| s.to_string())
    ///     .collect();
    /// let command = Command::parse("query", args).unwrap();
    /// assert_eq!(command.function_name(), "query");
    /// ```
    pub fn parse(function: &str, args: Vec<String>) -> Result<Self> {
        match function {
            CREATE_PATIENT_INFORMATION => Ok(Self::CreatePatientInformation(build(args)?)),
            CREATE_MEDICAL_RECORD => Ok(Self::CreateMedicalRecord(build(args)?)),
            CREATE_DRUG_INFORMATION => Ok(Self::CreateDrugInformation(build(args)?)),
            CREATE_HOSPITAL_FEES => Ok(Self::CreateHospitalFees(build(args)?)),
            CREATE_USER => Ok(Self::CreateUser(build(args)?)),
            QUERY => {
                validate_fields(QUERY, ACCESS_ARITY, &args)?;
                Ok(Self::Query(AccessRequest::from_fields(into_array(QUERY, args)?)?))
            }
            MODIFY_DATA | MODIFY_PATIENT_INFORMATION => {
                let (access, update) = modify::<PatientInformation>(function, args)?;
                Ok(Self::ModifyPatientInformation { access, update })
            }
            MODIFY_MEDICAL_DATA => {
                let (access, update) = modify::<MedicalRecord>(function, args)?;
                Ok(Self::ModifyMedicalData { access, update })
            }
            MODIFY_DRUG_DATA => {
                let (access, update) = modify::<DrugInformation>(function, args)?;
                Ok(Self::ModifyDrugData { access, update })
            }
            HISTORY_QUERY => Ok(Self::HistoryQuery(single_actor(function, args)?)),
            HISTORY_MODIFY => Ok(Self::HistoryModify(single_actor(function, args)?)),
            ACCESS_TRAIL => access_trail(args),
            other => Err(CareTrailError::UnknownFunction(other.to_string())),
        }
    }

    /// Canonical function name of the command
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::CreatePatientInformation(_) => CREATE_PATIENT_INFORMATION,
            Self::CreateMedicalRecord(_) => CREATE_MEDICAL_RECORD,
            Self::CreateDrugInformation(_) => CREATE_DRUG_INFORMATION,
            Self::CreateHospitalFees(_) => CREATE_HOSPITAL_FEES,
            Self::CreateUser(_) => CREATE_USER,
            Self::Query(_) => QUERY,
            Self::ModifyPatientInformation { .. } => MODIFY_PATIENT_INFORMATION,
            Self::ModifyMedicalData { .. } => MODIFY_MEDICAL_DATA,
            Self::ModifyDrugData { .. } => MODIFY_DRUG_DATA,
            Self::HistoryQuery(_) => HISTORY_QUERY,
            Self::HistoryModify(_) => HISTORY_MODIFY,
            Self::AccessTrail { .. } => ACCESS_TRAIL,
        }
    }
}

fn build<E: Entity>(args: Vec<String>) -> Result<E> {
    validate_fields(E::KIND.create_function(), E::ARITY, &args)?;
    E::from_fields(args)
}

fn into_array<const N: usize>(function: &str, args: Vec<String>) -> Result<[String; N]> {
    let actual = args.len();
    args.try_into().map_err(|_| CareTrailError::Arity {
        function: function.to_string(),
        expected: N,
        actual,
    })
}

fn modify<E: Mutable>(function: &str, mut args: Vec<String>) -> Result<(AccessRequest, E::Update)> {
    validate_fields(function, ACCESS_ARITY + E::UPDATE_ARITY, &args)?;
    let update_fields = args.split_off(ACCESS_ARITY);
    let access = AccessRequest::from_fields(into_array(function, args)?)?;
    let update = E::update_from_fields(update_fields)?;
    Ok((access, update))
}

fn single_actor(function: &str, args: Vec<String>) -> Result<ActorId> {
    validate_fields(function, 1, &args)?;
    let [actor] = into_array(function, args)?;
    ActorId::new(actor).map_err(CareTrailError::InvalidArgument)
}

fn access_trail(mut args: Vec<String>) -> Result<Command> {
    let expected = match args.len() {
        n @ (2 | 3) => n,
        n if n < 2 => 2,
        _ => 3,
    };
    validate_fields(ACCESS_TRAIL, expected, &args)?;

    let subject = if args.len() == 3 {
        args.pop()
            .map(RecordId::new)
            .transpose()
            .map_err(CareTrailError::InvalidArgument)?
    } else {
        None
    };
    let [actor, purpose] = into_array(ACCESS_TRAIL, args)?;

    Ok(Command::AccessTrail {
        actor: ActorId::new(actor).map_err(CareTrailError::InvalidArgument)?,
        purpose: purpose.parse().map_err(CareTrailError::InvalidArgument)?,
        subject,
    })
}
