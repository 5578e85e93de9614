//! Shared data model for the retraining and prediction tools.
//!
//! Types in this crate are plain values. Parsing lives in `breath-ingest`,
//! schema checks in `breath-validate` and the workflow in `breath-core`.

pub mod diagnostic;
pub mod error;
pub mod prediction;
pub mod registry;
pub mod schema;
pub mod table;
pub mod upload;
pub mod validation;

pub use diagnostic::{CatalogEntry, DiagnosticCatalog, DiagnosticCode};
pub use error::{ModelError, Result};
pub use prediction::{
    Gender, OutcomePrediction, PredictionRequest, PredictionResponse, SurvivalCurve,
    SurvivalPrediction,
};
pub use registry::{ModelHistory, ModelMetadata, ModelStatus};
pub use schema::{ColumnSpec, RequiredSchema, normalize_header};
pub use table::ParsedTable;
pub use upload::{FileKind, MIME_CSV, MIME_XLS, MIME_XLSX, UploadedFile};
pub use validation::ValidationResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_schema_has_ten_columns() {
        let schema = RequiredSchema::training();
        assert_eq!(schema.len(), 10);
        assert_eq!(schema.columns()[9].key(), "patient id");
    }

    #[test]
    fn validation_result_reports_missing_columns() {
        let result = ValidationResult::Invalid {
            missing_columns: ["patient id".to_string()].into_iter().collect(),
        };
        assert!(!result.is_valid());
        assert_eq!(result.missing_columns().len(), 1);
    }
}
