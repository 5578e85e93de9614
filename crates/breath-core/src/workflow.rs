//! Upload → Preview → Train workflow.
//!
//! [`WorkflowState`] is an immutable value. Every transition borrows the
//! current state and returns a new one, so a failed transition leaves the
//! caller holding the state it started from.
//!
//! The stage owns the data that justified entering it: `Preview` holds the
//! validated table together with the fingerprint of the file it came from,
//! and `Train` can only be built from a `Preview`. Replacing the file drops
//! back to `Upload`.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use breath_ingest::{DEFAULT_PARSE_TIMEOUT, admit_file, parse_with_timeout};
use breath_model::{DiagnosticCatalog, ParsedTable, RequiredSchema, UploadedFile, ValidationResult};
use breath_validate::validate;

use crate::error::{Result, WorkflowError};
use crate::metadata::TrainingMetadata;
use crate::preview::{Preview, materialize};
use crate::session::UserId;
use crate::training::{TrainingAck, TrainingRequest, TrainingService};

// =============================================================================
// STEP
// =============================================================================

/// Visible step of the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Upload,
    Preview,
    Train,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Preview => "Preview",
            Self::Train => "Train",
        }
    }

    /// One-based position, for "step 2 of 3" style displays.
    pub fn number(&self) -> usize {
        match self {
            Self::Upload => 1,
            Self::Preview => 2,
            Self::Train => 3,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Collaborators and settings a transition needs.
#[derive(Clone, Copy)]
pub struct WorkflowEnv<'a> {
    pub schema: &'a RequiredSchema,
    pub catalog: &'a DiagnosticCatalog,
    pub parse_timeout: Duration,
    pub service: &'a dyn TrainingService,
}

impl<'a> WorkflowEnv<'a> {
    pub fn new(
        schema: &'a RequiredSchema,
        catalog: &'a DiagnosticCatalog,
        service: &'a dyn TrainingService,
    ) -> Self {
        Self {
            schema,
            catalog,
            parse_timeout: DEFAULT_PARSE_TIMEOUT,
            service,
        }
    }

    #[must_use]
    pub fn with_parse_timeout(mut self, timeout: Duration) -> Self {
        self.parse_timeout = timeout;
        self
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Result of a successful Upload → Preview transition.
#[derive(Debug, Clone)]
struct Validated {
    table: Arc<ParsedTable>,
    fingerprint: String,
    metadata: TrainingMetadata,
}

#[derive(Debug, Clone)]
enum Stage {
    Upload,
    Preview(Validated),
    Train { validated: Validated, ack: TrainingAck },
}

/// State of one user's upload-to-train workflow.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    user: Option<UserId>,
    file: Option<UploadedFile>,
    model_name: String,
    diagnostic_interest: String,
    stage: Stage,
}

impl WorkflowState {
    /// A fresh workflow at `Upload` with no file.
    pub fn start() -> Self {
        Self {
            user: None,
            file: None,
            model_name: String::new(),
            diagnostic_interest: String::new(),
            stage: Stage::Upload,
        }
    }

    /// A fresh workflow for a signed-in user.
    pub fn start_for(user: Option<UserId>) -> Result<Self> {
        let user = user.ok_or(WorkflowError::NotSignedIn)?;
        tracing::debug!(user = %user, "starting training workflow");
        Ok(Self {
            user: Some(user),
            ..Self::start()
        })
    }

    // -------------------------------------------------------------------------
    // Inputs (Upload step only)
    // -------------------------------------------------------------------------

    /// Holds a newly selected file, replacing any previous one.
    pub fn with_file(&self, file: UploadedFile) -> Result<Self> {
        self.require_upload()?;
        tracing::debug!(file = %file.name(), size = %file.size_label(), "file selected");
        Ok(Self {
            file: Some(file),
            ..self.clone()
        })
    }

    pub fn with_model_name(&self, name: impl Into<String>) -> Result<Self> {
        self.require_upload()?;
        Ok(Self {
            model_name: name.into(),
            ..self.clone()
        })
    }

    pub fn with_diagnostic_interest(&self, code: impl Into<String>) -> Result<Self> {
        self.require_upload()?;
        Ok(Self {
            diagnostic_interest: code.into(),
            ..self.clone()
        })
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Moves one step forward.
    ///
    /// From `Upload`: admits, parses and validates the held file, then checks
    /// the metadata. From `Preview`: submits to the training service.
    pub fn advance(&self, env: &WorkflowEnv<'_>) -> Result<Self> {
        match &self.stage {
            Stage::Upload => self.enter_preview(env),
            Stage::Preview(validated) => self.enter_train(env, validated),
            Stage::Train { .. } => Err(WorkflowError::Terminal),
        }
    }

    /// Moves one step back. `Preview → Upload` keeps the file and inputs.
    pub fn retreat(&self) -> Result<Self> {
        match &self.stage {
            Stage::Upload => Err(WorkflowError::AtFirstStep),
            Stage::Preview(_) => {
                tracing::debug!("back to upload");
                Ok(Self {
                    stage: Stage::Upload,
                    ..self.clone()
                })
            }
            Stage::Train { .. } => Err(WorkflowError::Terminal),
        }
    }

    /// A fresh workflow for the same user.
    pub fn reset(&self) -> Self {
        Self {
            user: self.user.clone(),
            ..Self::start()
        }
    }

    fn enter_preview(&self, env: &WorkflowEnv<'_>) -> Result<Self> {
        let file = self.file.as_ref().ok_or(WorkflowError::NoFile)?;
        let span = tracing::info_span!("upload", file = %file.name());
        let _guard = span.enter();
        let start = Instant::now();

        admit_file(file)?;
        let parsed = parse_with_timeout(file, env.parse_timeout)?;
        let table = match validate(&parsed, env.schema) {
            ValidationResult::Valid(table) => table,
            ValidationResult::Invalid { missing_columns } => {
                return Err(WorkflowError::SchemaMismatch {
                    missing: missing_columns,
                });
            }
            ValidationResult::Empty => return Err(WorkflowError::EmptyFile),
        };
        let metadata =
            TrainingMetadata::new(&self.model_name, &self.diagnostic_interest, env.catalog)?;

        tracing::info!(
            rows = table.height(),
            model_name = %metadata.model_name(),
            diagnostic_interest = %metadata.diagnostic_interest(),
            duration_ms = start.elapsed().as_millis(),
            "upload validated"
        );
        Ok(Self {
            stage: Stage::Preview(Validated {
                table: Arc::new(table),
                fingerprint: file.fingerprint(),
                metadata,
            }),
            ..self.clone()
        })
    }

    fn enter_train(&self, env: &WorkflowEnv<'_>, validated: &Validated) -> Result<Self> {
        let file = self.file.as_ref().ok_or(WorkflowError::NoFile)?;
        let request = TrainingRequest {
            file: file.clone(),
            metadata: validated.metadata.clone(),
        };

        let span = tracing::info_span!("train", model_name = %validated.metadata.model_name());
        let _guard = span.enter();
        let start = Instant::now();

        match env.service.submit(&request) {
            Ok(ack) => {
                tracing::info!(
                    duration_ms = start.elapsed().as_millis(),
                    message = %ack.message,
                    "training acknowledged"
                );
                Ok(Self {
                    stage: Stage::Train {
                        validated: validated.clone(),
                        ack,
                    },
                    ..self.clone()
                })
            }
            Err(err) => {
                tracing::warn!(
                    duration_ms = start.elapsed().as_millis(),
                    error = %err,
                    "training rejected"
                );
                Err(err.into())
            }
        }
    }

    fn require_upload(&self) -> Result<()> {
        match self.step() {
            Step::Upload => Ok(()),
            Step::Train => Err(WorkflowError::Terminal),
            actual => Err(WorkflowError::WrongStep {
                expected: Step::Upload,
                actual,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn step(&self) -> Step {
        match self.stage {
            Stage::Upload => Step::Upload,
            Stage::Preview(_) => Step::Preview,
            Stage::Train { .. } => Step::Train,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.step() == Step::Train
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn diagnostic_interest(&self) -> &str {
        &self.diagnostic_interest
    }

    fn validated(&self) -> Option<&Validated> {
        match &self.stage {
            Stage::Upload => None,
            Stage::Preview(validated) | Stage::Train { validated, .. } => Some(validated),
        }
    }

    /// Validated table, available from `Preview` on.
    pub fn table(&self) -> Option<&ParsedTable> {
        self.validated().map(|v| v.table.as_ref())
    }

    /// Fingerprint of the file that passed validation.
    pub fn validated_fingerprint(&self) -> Option<&str> {
        self.validated().map(|v| v.fingerprint.as_str())
    }

    pub fn metadata(&self) -> Option<&TrainingMetadata> {
        self.validated().map(|v| &v.metadata)
    }

    /// Preview of the validated table.
    pub fn preview(&self, schema: &RequiredSchema) -> Option<Preview> {
        self.table().map(|table| materialize(table, schema))
    }

    /// The training service's acknowledgement once at `Train`.
    pub fn ack(&self) -> Option<&TrainingAck> {
        match &self.stage {
            Stage::Train { ack, .. } => Some(ack),
            _ => None,
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::start()
    }
}
