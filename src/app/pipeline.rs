//! Shared prediction workflow used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load artifacts once -> build service -> predict per request
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use crate::artifacts::{self, ArtifactBundle};
use crate::domain::{PredictionResult, ReceivableInput, YearPolicy};
use crate::error::AppError;
use crate::predict::PredictionService;

/// One completed request, kept together for rendering.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: ReceivableInput,
    pub result: PredictionResult,
}

/// Load every artifact into process-wide state and return a service over them.
///
/// Any load or layout failure here is fatal: callers must not serve without it.
pub fn start(artifact_dir: &Path, year_policy: YearPolicy) -> Result<PredictionService<'static>, AppError> {
    let bundle: &'static ArtifactBundle = artifacts::init(artifact_dir)?;
    Ok(PredictionService::new(bundle, year_policy))
}

/// Run one prediction.
pub fn run_prediction(service: &PredictionService<'_>, input: ReceivableInput) -> Result<RunOutput, AppError> {
    let result = service.predict(&input)?;
    Ok(RunOutput { input, result })
}
