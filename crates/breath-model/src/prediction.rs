//! Request and response shapes of the prediction dashboard service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Patient gender as encoded by the prediction models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn code(self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(ModelError::InvalidPrediction(
                "*Gender is required".to_string(),
            )),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRequest {
    /// Stored model to score. Required by the training service's
    /// `/predict`; the dashboard always uses its latest model.
    #[serde(rename = "modelid", skip_serializing_if = "Option::is_none")]
    pub model_id: Option<i64>,
    pub gender: Gender,
    pub age: u32,
    pub readmissions: u32,
    #[serde(rename = "diagnosticCodes")]
    pub diagnostic_codes: Vec<String>,
}

impl PredictionRequest {
    /// Checks the form rules applied before a prediction is requested.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if self.age == 0 {
            problems.push("*Age is required");
        }
        if self.readmissions == 0 {
            problems.push("*Number of admissions is required");
        }
        if self.diagnostic_codes.iter().all(|c| c.trim().is_empty()) {
            problems.push("*At least one diagnostic code is required");
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ModelError::InvalidPrediction(problems.join("; ")))
        }
    }
}

/// Survival function sampled at event times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCurve {
    pub time: Vec<f64>,
    pub probability: Vec<f64>,
}

impl SurvivalCurve {
    pub fn len(&self) -> usize {
        self.time.len().min(self.probability.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Step-function value at `day`: the probability at the last event time
    /// not after `day`, or 1.0 before the first event.
    pub fn at(&self, day: f64) -> f64 {
        self.time
            .iter()
            .zip(&self.probability)
            .take_while(|(t, _)| **t <= day)
            .last()
            .map_or(1.0, |(_, p)| *p)
    }
}

/// Curves from the training service's `/predict`, which scores one stored
/// model (`modelid` required).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomePrediction {
    pub death_curve: SurvivalCurve,
    pub readmission_curve: SurvivalCurve,
    pub death_6_month: f64,
    pub death_12_month: f64,
    pub readmission_30_day: f64,
    pub readmission_60_day: f64,
}

/// Curve from the dashboard's `/predict`, which scores the latest model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPrediction {
    pub survival_curve: SurvivalCurve,
    pub survival_6_month: f64,
    pub survival_12_month: f64,
    pub readmission_1_year: f64,
    pub readmission_5_year: f64,
}

/// Body returned by `POST /predict` on either service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Outcomes(OutcomePrediction),
    Survival(SurvivalPrediction),
}

impl PredictionResponse {
    /// Headline probabilities, labelled.
    pub fn headline(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::Outcomes(p) => vec![
                ("Death within 6 months", p.death_6_month),
                ("Death within 12 months", p.death_12_month),
                ("Readmission within 30 days", p.readmission_30_day),
                ("Readmission within 60 days", p.readmission_60_day),
            ],
            Self::Survival(p) => vec![
                ("Survival at 6 months", p.survival_6_month),
                ("Survival at 12 months", p.survival_12_month),
                ("Readmission within 1 year", p.readmission_1_year),
                ("Readmission within 5 years", p.readmission_5_year),
            ],
        }
    }

    /// Returned curves, labelled.
    pub fn curves(&self) -> Vec<(&'static str, &SurvivalCurve)> {
        match self {
            Self::Outcomes(p) => vec![
                ("Survival", &p.death_curve),
                ("Not readmitted", &p.readmission_curve),
            ],
            Self::Survival(p) => vec![("Survival", &p.survival_curve)],
        }
    }
}
