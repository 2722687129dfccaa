//! Domain types used throughout the prediction pipeline.
//!
//! This module defines:
//!
//! - the operator request (`ReceivableInput`) and its derived percent-paid value
//! - the canonical feature layout (`FeatureVector`, `FEATURE_NAMES`)
//! - inference outputs (`PredictionResult`, `Recommendation`)
//! - the tax-year policy (`YearPolicy`)

pub mod types;

pub use types::*;
