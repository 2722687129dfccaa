//! Binary logistic regression on scaled features.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.coefficients.is_empty() {
            return Err(AppError::load("Logistic regression has no coefficients."));
        }
        if self
            .coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .any(|v| !v.is_finite())
        {
            return Err(AppError::load("Logistic regression has non-finite parameters."));
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub(crate) fn decision(&self, x: &[f64]) -> f64 {
        let w = DVector::from_column_slice(&self.coefficients);
        let x = DVector::from_column_slice(x);
        w.dot(&x) + self.intercept
    }

    pub(crate) fn proba(&self, x: &[f64]) -> [f64; 2] {
        let p1 = sigmoid(self.decision(x));
        [1.0 - p1, p1]
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_decision_is_even_odds() {
        let model = LogisticRegression {
            coefficients: vec![1.0, -1.0],
            intercept: 0.0,
        };
        assert_eq!(model.proba(&[2.0, 2.0]), [0.5, 0.5]);
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn non_finite_intercept_fails_validation() {
        let model = LogisticRegression {
            coefficients: vec![1.0],
            intercept: f64::NAN,
        };
        assert!(model.validate().is_err());
    }
}
