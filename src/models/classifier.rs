//! Classifier interface and the serialized model file.
//!
//! `model.json` is tagged by `kind` so the same loader handles every supported
//! model family. Class 1 means "settled".

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::forest::RandomForest;
use crate::models::logistic::LogisticRegression;

/// Binary classifier over one scaled feature row.
///
/// Implementations must be pure: the same row always yields the same label and
/// probabilities, and `predict` must agree with `predict_proba`.
pub trait Classifier {
    fn n_features(&self) -> usize;

    /// Predicted class, `0` or `1`.
    fn predict(&self, x: &[f64]) -> Result<u8, AppError>;

    /// `[p0, p1]`, summing to one.
    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], AppError>;

    fn display_name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierModel {
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

impl ClassifierModel {
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            ClassifierModel::RandomForest(m) => m.validate(),
            ClassifierModel::LogisticRegression(m) => m.validate(),
        }
    }

    fn check_width(&self, x: &[f64]) -> Result<(), AppError> {
        if x.len() != self.n_features() {
            return Err(AppError::mismatch(format!(
                "Classifier expects {} features, got {}.",
                self.n_features(),
                x.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for ClassifierModel {
    fn n_features(&self) -> usize {
        match self {
            ClassifierModel::RandomForest(m) => m.n_features,
            ClassifierModel::LogisticRegression(m) => m.n_features(),
        }
    }

    fn predict(&self, x: &[f64]) -> Result<u8, AppError> {
        self.check_width(x)?;
        let label = match self {
            // Argmax with ties going to the lower class.
            ClassifierModel::RandomForest(m) => {
                let p = m.proba(x);
                u8::from(p[1] > p[0])
            }
            ClassifierModel::LogisticRegression(m) => u8::from(m.decision(x) > 0.0),
        };
        Ok(label)
    }

    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2], AppError> {
        self.check_width(x)?;
        Ok(match self {
            ClassifierModel::RandomForest(m) => m.proba(x),
            ClassifierModel::LogisticRegression(m) => m.proba(x),
        })
    }

    fn display_name(&self) -> &'static str {
        match self {
            ClassifierModel::RandomForest(_) => "Random Forest",
            ClassifierModel::LogisticRegression(_) => "Logistic Regression",
        }
    }
}

/// Read and structurally validate `model.json`.
pub fn read_model_json(path: &Path) -> Result<ClassifierModel, AppError> {
    let model: ClassifierModel = crate::artifacts::read_json(path, "classifier")?;
    model.validate()?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::forest::{Node, Tree};

    fn forest() -> ClassifierModel {
        ClassifierModel::RandomForest(RandomForest::new(
            2,
            vec![Tree::new(vec![
                Node::split(1, 0.0, 1, 2),
                Node::leaf(9.0, 1.0),
                Node::leaf(1.0, 3.0),
            ])],
        ))
    }

    #[test]
    fn forest_label_matches_argmax() {
        let model = forest();
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 1);
        assert_eq!(model.predict_proba(&[0.0, 1.0]).unwrap(), [0.25, 0.75]);
        assert_eq!(model.predict(&[0.0, -1.0]).unwrap(), 0);
    }

    #[test]
    fn tie_goes_to_class_zero() {
        let model = ClassifierModel::RandomForest(RandomForest::new(
            1,
            vec![Tree::new(vec![Node::leaf(1.0, 1.0)])],
        ));
        assert_eq!(model.predict(&[0.0]).unwrap(), 0);
    }

    #[test]
    fn width_mismatch_is_fatal_kind() {
        let err = forest().predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactMismatch);
    }

    #[test]
    fn logistic_label_agrees_with_proba() {
        let model = ClassifierModel::LogisticRegression(LogisticRegression {
            coefficients: vec![2.0],
            intercept: -1.0,
        });
        for x in [-3.0, 0.0, 0.4, 0.6, 3.0] {
            let label = model.predict(&[x]).unwrap();
            let p = model.predict_proba(&[x]).unwrap();
            assert!(p[label as usize] >= 0.5, "x={x} label={label} p={p:?}");
        }
    }

    #[test]
    fn model_file_is_tagged_by_kind() {
        let json = r#"{"kind":"logistic_regression","coefficients":[0.1,0.2],"intercept":0.0}"#;
        let model: ClassifierModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.display_name(), "Logistic Regression");
        assert_eq!(model.n_features(), 2);
    }
}
