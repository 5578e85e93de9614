use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use breath_cli::logging::redact_value;
use breath_cli::settings::Settings;
use breath_client::{ClientError, HttpTrainingService, PredictionClient, RegistryClient};
use breath_core::{Step, WorkflowEnv, WorkflowError, WorkflowState, materialize};
use breath_ingest::{IngestError, admit_file, parse_with_timeout};
use breath_model::{
    CatalogEntry, DiagnosticCode, Gender, ParsedTable, PredictionRequest, RequiredSchema,
    UploadedFile, ValidationResult,
};
use breath_validate::validate;

use crate::cli::{CodesArgs, FileArgs, PredictArgs, PreviewArgs, TemplateArgs, TrainArgs};
use crate::summary::{
    check_table, codes_table, curve_table, models_table, prediction_table, preview_table,
    print_step,
};

/// Rows of the validated file shown after the upload step of `train`.
const TRAIN_PREVIEW_ROWS: usize = 5;

/// Outcome of checking one file against the training schema.
pub struct CheckOutcome {
    pub file: UploadedFile,
    pub parsed: ParsedTable,
    pub result: ValidationResult,
}

pub fn run_check(settings: &Settings, args: &FileArgs) -> Result<bool> {
    let schema = RequiredSchema::training();
    let outcome = check_file(settings, &args.file, &schema)?;
    println!(
        "{} ({}, {} rows)",
        outcome.file.name(),
        outcome.file.size_label(),
        outcome.parsed.height()
    );
    println!("{}", check_table(&schema, &outcome.parsed, &outcome.result));
    if outcome.result.is_valid() {
        println!("File is ready for training.");
    } else {
        println!("{}", outcome.result.user_message());
    }
    Ok(outcome.result.is_valid())
}

pub fn run_preview(settings: &Settings, args: &PreviewArgs) -> Result<()> {
    let schema = RequiredSchema::training();
    let outcome = check_file(settings, &args.input.file, &schema)?;
    let table = match &outcome.result {
        ValidationResult::Valid(table) => table,
        invalid => return Err(anyhow!(invalid.user_message())),
    };

    let preview = materialize(table, &schema);
    let page_size = args.page_size.unwrap_or(settings.ingest.page_size).max(1);
    let page_count = preview.page_count(page_size);
    if args.page == 0 || args.page > page_count.max(1) {
        return Err(anyhow!(
            "page {} is out of range (1-{})",
            args.page,
            page_count.max(1)
        ));
    }
    let page = args.page - 1;

    if args.json {
        let body = serde_json::json!({
            "columns": preview.columns,
            "rows": preview.page(page, page_size),
            "page": args.page,
            "page_count": page_count,
            "row_count": preview.row_count(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", preview_table(&preview, page, page_size));
        println!(
            "Page {} of {} ({} rows)",
            args.page,
            page_count.max(1),
            preview.row_count()
        );
    }
    Ok(())
}

pub fn run_train(settings: &Settings, email: Option<&str>, args: &TrainArgs) -> Result<()> {
    let schema = RequiredSchema::training();
    let service = HttpTrainingService::new(&settings.services)?;
    let env = WorkflowEnv::new(&schema, &settings.training.diagnostic_codes, &service)
        .with_parse_timeout(settings.ingest.parse_timeout());

    let file = load_upload(&args.input.file)?;
    let state = WorkflowState::start_for(settings.user(email))
        .and_then(|state| state.with_file(file))
        .and_then(|state| state.with_model_name(args.model_name.as_str()))
        .and_then(|state| state.with_diagnostic_interest(args.diagnostic_interest.as_str()))
        .map_err(workflow_error)?;
    if let Some(file) = state.file() {
        print_step(Step::Upload, &format!("{} ({})", file.name(), file.size_label()));
    }

    let state = with_spinner("Checking file", || state.advance(&env)).map_err(workflow_error)?;
    if let Some(preview) = state.preview(&schema) {
        print_step(
            state.step(),
            &format!(
                "{} rows, {} columns",
                preview.row_count(),
                preview.column_count()
            ),
        );
        println!("{}", preview_table(&preview, 0, TRAIN_PREVIEW_ROWS));
    }

    let state = with_spinner("Training model", || state.advance(&env)).map_err(workflow_error)?;
    if let Some(ack) = state.ack() {
        print_step(state.step(), &ack.message);
    }
    Ok(())
}

pub fn run_models(settings: &Settings, email: Option<&str>) -> Result<()> {
    let user = settings
        .user(email)
        .ok_or_else(|| anyhow!("You have to login to your account to view your models."))?;
    let client = RegistryClient::new(&settings.services)?;
    let history = with_spinner("Fetching models", || client.history(&user)).map_err(client_error)?;
    if history.is_empty() {
        println!("No models trained yet.");
        return Ok(());
    }
    println!("{}", models_table(&history, Utc::now()));
    Ok(())
}

pub fn run_template(args: &TemplateArgs) -> Result<PathBuf> {
    let format = args.format;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format.default_file_name()));
    let bytes = format.render(&RequiredSchema::training())?;
    std::fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "template written");
    Ok(path)
}

pub fn run_codes(settings: &Settings, args: &CodesArgs) -> Result<()> {
    let catalog = &settings.training.diagnostic_codes;
    if !args.remote {
        println!("{}", codes_table(catalog.entries()));
        return Ok(());
    }

    let client = PredictionClient::new(&settings.services)?;
    let codes = with_spinner("Fetching diagnostic codes", || client.diagnostic_codes())
        .map_err(client_error)?;
    let entries: Vec<CatalogEntry> = codes
        .iter()
        .filter_map(|raw| match raw.parse::<DiagnosticCode>() {
            Ok(code) => Some(code),
            Err(error) => {
                tracing::warn!(%error, "skipping code from service");
                None
            }
        })
        .map(|code| CatalogEntry {
            label: catalog.label(&code).unwrap_or_default().to_string(),
            code,
        })
        .collect();
    println!("{}", codes_table(&entries));
    Ok(())
}

pub fn run_predict(settings: &Settings, args: &PredictArgs) -> Result<()> {
    let gender: Gender = args.gender.parse()?;
    let request = PredictionRequest {
        model_id: args.model_id,
        gender,
        age: args.age,
        readmissions: args.readmissions,
        diagnostic_codes: args
            .codes
            .iter()
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect(),
    };
    let client = PredictionClient::new(&settings.services)?;
    let response =
        with_spinner("Requesting prediction", || client.predict(&request)).map_err(client_error)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", prediction_table(&response));
        println!("{}", curve_table(&response));
    }
    Ok(())
}

/// Reads, admits, parses and validates one file.
fn check_file(settings: &Settings, path: &Path, schema: &RequiredSchema) -> Result<CheckOutcome> {
    let file = load_upload(path)?;
    let kind = admit_file(&file).map_err(ingest_error)?;
    tracing::info!(file = %file.name(), kind = kind.label(), size = file.len(), "checking file");

    let parsed = with_spinner("Checking file", || {
        parse_with_timeout(&file, settings.ingest.parse_timeout())
    })
    .map_err(ingest_error)?;
    trace_first_row(&parsed);

    let result = validate(&parsed, schema);
    Ok(CheckOutcome {
        file,
        parsed,
        result,
    })
}

fn load_upload(path: &Path) -> Result<UploadedFile> {
    Ok(UploadedFile::from_path(path)?)
}

fn trace_first_row(table: &ParsedTable) {
    if let Some(record) = table.record(0) {
        for (header, value) in record {
            tracing::trace!(column = header, value = redact_value(value), "first row");
        }
    }
}

fn with_spinner<T>(message: &'static str, work: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}...") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = work();
    spinner.finish_and_clear();
    result
}

fn ingest_error(error: IngestError) -> anyhow::Error {
    workflow_error(WorkflowError::from(error))
}

fn workflow_error(error: WorkflowError) -> anyhow::Error {
    tracing::debug!(%error, "workflow step failed");
    anyhow!(error.user_message())
}

fn client_error(error: ClientError) -> anyhow::Error {
    tracing::debug!(%error, retryable = error.is_retryable(), "service request failed");
    anyhow!(error.user_message())
}
