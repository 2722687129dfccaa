//! Prediction service: encode, scale, classify, interpret.
//!
//! The service borrows the loaded artifacts and keeps no state of its own, so
//! each call is independent and repeatable.

use tracing::{debug, info, warn};

use crate::artifacts::ArtifactBundle;
use crate::domain::{
    PredictionResult, ReceivableInput, Recommendation, TAX_YEAR_MAX, TAX_YEAR_MIN, YearPolicy,
};
use crate::error::AppError;
use crate::features::build_features;
use crate::models::Classifier;

/// Allowed drift of `p0 + p1` from one.
const PROBA_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct PredictionService<'a> {
    artifacts: &'a ArtifactBundle,
    year_policy: YearPolicy,
}

impl<'a> PredictionService<'a> {
    pub fn new(artifacts: &'a ArtifactBundle, year_policy: YearPolicy) -> Self {
        Self {
            artifacts,
            year_policy,
        }
    }

    pub fn artifacts(&self) -> &'a ArtifactBundle {
        self.artifacts
    }

    pub fn predict(&self, input: &ReceivableInput) -> Result<PredictionResult, AppError> {
        let features = build_features(input, &self.artifacts.encoder)?;
        self.check_year(input)?;

        let scaled = self.artifacts.scaler.transform(features.as_slice())?;
        debug!(?features, ?scaled, "features prepared");

        // Label and probabilities come from the same scaled row.
        let classifier = &self.artifacts.classifier;
        let label = classifier.predict(&scaled)?;
        let probabilities = classifier.predict_proba(&scaled)?;
        check_probabilities(label, probabilities)?;

        let settled = label == 1;
        let confidence = probabilities[usize::from(label)] * 100.0;

        info!(
            tax_year = input.tax_year,
            category = %input.tax_category,
            settled,
            confidence,
            "prediction complete"
        );

        Ok(PredictionResult {
            settled,
            label,
            confidence,
            probabilities,
            recommendation: Recommendation::for_outcome(settled),
            features,
        })
    }

    fn check_year(&self, input: &ReceivableInput) -> Result<(), AppError> {
        if input.year_in_range() {
            return Ok(());
        }
        match self.year_policy {
            YearPolicy::Strict => Err(AppError::invalid_input(format!(
                "Tax year {} is outside the supported range {TAX_YEAR_MIN}-{TAX_YEAR_MAX}.",
                input.tax_year
            ))),
            YearPolicy::Advisory => {
                warn!(
                    tax_year = input.tax_year,
                    "tax year outside {TAX_YEAR_MIN}-{TAX_YEAR_MAX}; scoring anyway"
                );
                Ok(())
            }
        }
    }
}

fn check_probabilities(label: u8, p: [f64; 2]) -> Result<(), AppError> {
    if label > 1 {
        return Err(AppError::mismatch(format!("Classifier returned label {label}; expected 0 or 1.")));
    }
    let in_unit = p.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v));
    if !in_unit || ((p[0] + p[1]) - 1.0).abs() > PROBA_SUM_TOLERANCE {
        return Err(AppError::mismatch(format!(
            "Classifier returned invalid probabilities {p:?}."
        )));
    }
    Ok(())
}
