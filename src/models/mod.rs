//! Classifier implementations.
//!
//! Models are plain data loaded from `model.json`; inference is a pure function
//! of the model and one scaled feature row.

pub mod classifier;
pub mod forest;
pub mod logistic;

pub use classifier::*;
pub use forest::{Node, RandomForest, Tree};
pub use logistic::LogisticRegression;
