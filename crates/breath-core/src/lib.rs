//! Upload-to-train workflow for prediction models.
//!
//! - [`preview`]: read-only column/row model of a validated upload
//! - [`metadata`]: model name and diagnostic interest rules
//! - [`training`]: the [`TrainingService`] seam to the external trainer
//! - [`workflow`]: the `Upload → Preview → Train` state machine

pub mod error;
pub mod metadata;
pub mod preview;
pub mod session;
pub mod training;
pub mod workflow;

pub use error::{Result, WorkflowError};
pub use metadata::{MAX_MODEL_NAME_LEN, MetadataError, TrainingMetadata};
pub use preview::{DEFAULT_PAGE_SIZE, Preview, PreviewColumn, PreviewRow, materialize};
pub use session::UserId;
pub use training::{TrainingAck, TrainingError, TrainingRequest, TrainingService};
pub use workflow::{Step, WorkflowEnv, WorkflowState};
