//! End-to-end workflow scenarios and the training gate property.

use std::cell::{Cell, RefCell};

use breath_core::{
    Step, TrainingAck, TrainingError, TrainingRequest, TrainingService, WorkflowEnv,
    WorkflowError, WorkflowState, materialize,
};
use breath_ingest::parse;
use breath_model::{
    DiagnosticCatalog, MIME_CSV, RequiredSchema, UploadedFile, ValidationResult,
};
use breath_validate::validate;
use proptest::prelude::*;

/// Training service double that records submissions.
struct MockService {
    reply: RefCell<Result<TrainingAck, TrainingError>>,
    calls: Cell<usize>,
    last_model_name: RefCell<Option<String>>,
}

impl MockService {
    fn accepting() -> Self {
        Self {
            reply: RefCell::new(Ok(TrainingAck {
                message: "Model Training Successful! Model ID: 42".to_string(),
            })),
            calls: Cell::new(0),
            last_model_name: RefCell::new(None),
        }
    }

    fn failing(message: &str) -> Self {
        let service = Self::accepting();
        service.set_failing(Some(message));
        service
    }

    fn set_failing(&self, message: Option<&str>) {
        *self.reply.borrow_mut() = match message {
            Some(message) => Err(TrainingError::new(message)),
            None => Ok(TrainingAck {
                message: "Model Training Successful! Model ID: 42".to_string(),
            }),
        };
    }
}

impl TrainingService for MockService {
    fn submit(&self, request: &TrainingRequest) -> Result<TrainingAck, TrainingError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_model_name.borrow_mut() = Some(request.metadata.model_name().to_string());
        self.reply.borrow().clone()
    }
}

const HEADER: &str = "Admit/Visit Date/Time,Date of Birth,Gender,Race,Death Date,\
Case Type Description,Primary Diagnosis Code (Mediclaim),\
Secondary Diagnosis Code Concat (Mediclaim),Discharge Date/Time,Patient ID";

fn training_csv(rows: usize) -> String {
    let mut body = format!("{HEADER}\n");
    for i in 0..rows {
        body.push_str(&format!(
            "2023-01-0{d} 10:00,1950-03-02,Female,Chinese,,Inpatient,\
             J44.1,J44.1||I10,2023-01-0{d} 16:00,P{i}\n",
            d = i % 9 + 1
        ));
    }
    body
}

fn upload(name: &str, body: &str) -> UploadedFile {
    UploadedFile::new(name, MIME_CSV, body.as_bytes().to_vec())
}

fn ready_state(file: UploadedFile) -> WorkflowState {
    WorkflowState::start()
        .with_file(file)
        .and_then(|s| s.with_model_name("copd_v1"))
        .and_then(|s| s.with_diagnostic_interest("J44"))
        .unwrap()
}

#[test]
fn scenario_missing_patient_id_stays_at_upload() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let body = training_csv(3).replace(",Patient ID", "");
    let state = ready_state(upload("no_id.csv", &body));
    let err = state.advance(&env).unwrap_err();

    assert_eq!(
        err,
        WorkflowError::SchemaMismatch {
            missing: ["patient id".to_string()].into(),
        }
    );
    assert_eq!(state.step(), Step::Upload);
    assert_eq!(service.calls.get(), 0);
}

#[test]
fn scenario_well_formed_file_reaches_preview() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let file = upload("copd.csv", &training_csv(5));
    assert_eq!(parse(&file).unwrap().height(), 5);

    let state = ready_state(file.clone()).advance(&env).unwrap();
    assert_eq!(state.step(), Step::Preview);
    assert_eq!(state.validated_fingerprint(), Some(file.fingerprint().as_str()));

    let preview = state.preview(&schema).unwrap();
    assert_eq!(preview.row_count(), 5);
    assert_eq!(preview.column_count(), 10);
    assert_eq!(preview.columns[9].title, "Patient ID");
}

#[test]
fn scenario_training_failure_stays_at_preview() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::failing("Training failed: insufficient rows");
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let preview = ready_state(upload("copd.csv", &training_csv(5)))
        .advance(&env)
        .unwrap();
    let err = preview.advance(&env).unwrap_err();

    assert_eq!(err.user_message(), "Training failed: insufficient rows");
    assert_eq!(preview.step(), Step::Preview);

    // Retrying the same transition is allowed.
    service.set_failing(None);
    let trained = preview.advance(&env).unwrap();
    assert_eq!(trained.step(), Step::Train);
    assert_eq!(service.calls.get(), 2);
}

#[test]
fn scenario_training_success_is_terminal() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let trained = ready_state(upload("copd.csv", &training_csv(5)))
        .advance(&env)
        .and_then(|s| s.advance(&env))
        .unwrap();

    assert_eq!(trained.step(), Step::Train);
    assert_eq!(
        trained.ack().map(|a| a.message.as_str()),
        Some("Model Training Successful! Model ID: 42")
    );
    assert_eq!(service.last_model_name.borrow().as_deref(), Some("copd_v1"));
    assert_eq!(trained.advance(&env).unwrap_err(), WorkflowError::Terminal);
}

#[test]
fn scenario_header_only_file_is_empty() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let state = ready_state(upload("blank.csv", &training_csv(0)));
    let err = state.advance(&env).unwrap_err();

    assert_eq!(err, WorkflowError::EmptyFile);
    assert_eq!(
        err.user_message(),
        "The file appears to be empty. Please check the content and try again."
    );
    assert_eq!(state.step(), Step::Upload);
}

#[test]
fn missing_metadata_keeps_upload() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let state = WorkflowState::start()
        .with_file(upload("copd.csv", &training_csv(2)))
        .unwrap();
    let err = state.advance(&env).unwrap_err();
    assert!(matches!(err, WorkflowError::MetadataMissing(_)));
}

#[test]
fn back_from_preview_keeps_file() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let file = upload("copd.csv", &training_csv(2));
    let back = ready_state(file.clone())
        .advance(&env)
        .and_then(|s| s.retreat())
        .unwrap();

    assert_eq!(back.step(), Step::Upload);
    assert_eq!(back.file(), Some(&file));
    assert_eq!(back.model_name(), "copd_v1");
    assert!(back.table().is_none());
    assert_eq!(back.advance(&env).unwrap().step(), Step::Preview);
}

#[test]
fn unsupported_file_is_rejected() {
    let schema = RequiredSchema::training();
    let catalog = DiagnosticCatalog::default();
    let service = MockService::accepting();
    let env = WorkflowEnv::new(&schema, &catalog, &service);

    let state = ready_state(UploadedFile::new("scan.pdf", "application/pdf", b"%PDF".to_vec()));
    assert_eq!(
        state.advance(&env).unwrap_err().user_message(),
        "scan.pdf is not an xlsx, xls, or csv file"
    );
}

// =============================================================================
// Gate property
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    SelectFile(usize),
    ModelName(&'static str),
    Interest(&'static str),
    ServiceFails(bool),
    Advance,
    Retreat,
    Reset,
}

fn candidate_files() -> Vec<UploadedFile> {
    vec![
        upload("good.csv", &training_csv(3)),
        upload("good_too.csv", &training_csv(1)),
        upload("no_id.csv", &training_csv(3).replace(",Patient ID", "")),
        upload("empty.csv", &training_csv(0)),
        upload("blank.csv", ""),
        UploadedFile::new("photo.png", "image/png", b"\x89PNG\r\n\x1a\n\0".to_vec()),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..6).prop_map(Op::SelectFile),
        prop::sample::select(vec!["copd_v1", "", "much_too_long"]).prop_map(Op::ModelName),
        prop::sample::select(vec!["J44", "J45", "", "Z99"]).prop_map(Op::Interest),
        any::<bool>().prop_map(Op::ServiceFails),
        Just(Op::Advance),
        Just(Op::Advance),
        Just(Op::Retreat),
        Just(Op::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn train_is_only_reached_through_a_valid_file(
        ops in prop::collection::vec(op_strategy(), 1..24),
    ) {
        let schema = RequiredSchema::training();
        let catalog = DiagnosticCatalog::default();
        let service = MockService::accepting();
        let env = WorkflowEnv::new(&schema, &catalog, &service);
        let files = candidate_files();

        let mut state = WorkflowState::start();
        for op in ops {
            let next = match op {
                Op::SelectFile(i) => state.with_file(files[i].clone()),
                Op::ModelName(name) => state.with_model_name(name),
                Op::Interest(code) => state.with_diagnostic_interest(code),
                Op::ServiceFails(fail) => {
                    service.set_failing(fail.then_some("Training failed"));
                    Ok(state.clone())
                }
                Op::Advance => state.advance(&env),
                Op::Retreat => state.retreat(),
                Op::Reset => Ok(state.reset()),
            };
            if let Ok(next) = next {
                state = next;
            }

            if state.step() != Step::Upload {
                let file = state.file().expect("a file is held past upload");
                let fingerprint = file.fingerprint();
                prop_assert_eq!(state.validated_fingerprint(), Some(fingerprint.as_str()));
                let result = parse(file).map(|table| validate(&table, &schema));
                prop_assert!(matches!(result, Ok(ValidationResult::Valid(_))));
                let table = state.table().expect("validated table held past upload");
                prop_assert_eq!(materialize(table, &schema).column_count(), 10);
            }
            if state.step() == Step::Train {
                prop_assert!(state.ack().is_some());
            }
        }
    }
}
