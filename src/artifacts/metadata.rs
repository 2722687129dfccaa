//! Informational model metadata.
//!
//! Displayed in the header and side panel; never consumed by inference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    /// Share of total importance, in `[0, 1]`.
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    /// Test-set accuracy in `[0, 1]`.
    pub accuracy: f64,
    pub f1_score: f64,
    /// Ranked, most important first.
    #[serde(default)]
    pub feature_importance: Vec<FeatureImportance>,
    /// Number of historical records the model was trained on.
    #[serde(default)]
    pub training_records: Option<u64>,
}

impl ModelMetadata {
    /// The `n` highest-ranked features, re-sorted defensively.
    pub fn top_features(&self, n: usize) -> Vec<&FeatureImportance> {
        let mut ranked: Vec<&FeatureImportance> = self.feature_importance.iter().collect();
        ranked.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }
}

pub fn read_metadata_json(path: &Path) -> Result<ModelMetadata, AppError> {
    super::read_json(path, "model metadata")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_features_ranks_by_importance() {
        let meta = ModelMetadata {
            model_name: "Random Forest".into(),
            accuracy: 0.9989,
            f1_score: 0.9989,
            feature_importance: vec![
                FeatureImportance { feature: "TAHUN".into(), importance: 0.05 },
                FeatureImportance { feature: "PERSENTASE_TERBAYAR".into(), importance: 0.60 },
                FeatureImportance { feature: "REALISASI PIUTANG".into(), importance: 0.20 },
                FeatureImportance { feature: "SALDO AWAL".into(), importance: 0.15 },
            ],
            training_records: Some(4539),
        };
        let top: Vec<&str> = meta.top_features(3).iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(top, vec!["PERSENTASE_TERBAYAR", "REALISASI PIUTANG", "SALDO AWAL"]);
    }

    #[test]
    fn optional_fields_default() {
        let meta: ModelMetadata =
            serde_json::from_str(r#"{"model_name":"LR","accuracy":0.9,"f1_score":0.8}"#).unwrap();
        assert!(meta.feature_importance.is_empty());
        assert_eq!(meta.training_records, None);
    }
}
