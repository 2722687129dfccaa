//! Standard feature scaler fit offline.
//!
//! `transform` computes `(x - mean) / scale` per feature. The statistics are
//! read-only after load; a zero scale (constant training column) divides by 1.

use std::path::Path;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    /// Column names the scaler was fit on, in fit order.
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check the fitted layout against the canonical feature order.
    pub fn check_layout(&self) -> Result<(), AppError> {
        if self.mean.len() != self.scale.len() || self.feature_names.len() != self.mean.len() {
            return Err(AppError::mismatch(format!(
                "Scaler is inconsistent: {} names, {} means, {} scales.",
                self.feature_names.len(),
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.n_features() != FEATURE_COUNT {
            return Err(AppError::mismatch(format!(
                "Scaler was fit on {} features; the pipeline produces {FEATURE_COUNT}.",
                self.n_features()
            )));
        }
        for (idx, (fitted, expected)) in self.feature_names.iter().zip(FEATURE_NAMES).enumerate() {
            if fitted != expected {
                return Err(AppError::mismatch(format!(
                    "Scaler feature {idx} is '{fitted}', expected '{expected}'."
                )));
            }
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(AppError::mismatch("Scaler statistics contain non-finite values."));
        }
        Ok(())
    }

    /// Scale one feature row. Does not touch the fitted statistics.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, AppError> {
        if values.len() != self.n_features() || self.scale.len() != self.n_features() {
            return Err(AppError::mismatch(format!(
                "Scaler expects {} features, got {}.",
                self.n_features(),
                values.len()
            )));
        }

        let x = DVector::from_column_slice(values);
        let mean = DVector::from_column_slice(&self.mean);
        let scale = DVector::from_iterator(
            self.scale.len(),
            self.scale.iter().map(|&s| if s == 0.0 { 1.0 } else { s }),
        );

        let scaled = (x - mean).component_div(&scale);
        Ok(scaled.iter().copied().collect())
    }
}

/// Read `scaler.json` and verify it matches the canonical feature order.
pub fn read_scaler_json(path: &Path) -> Result<FeatureScaler, AppError> {
    let scaler: FeatureScaler = super::read_json(path, "feature scaler")?;
    scaler.check_layout()?;
    Ok(scaler)
}
