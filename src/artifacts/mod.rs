//! Loading of the offline-fit artifacts.
//!
//! - category encoder (`encoder.json`)
//! - feature scaler (`scaler.json`)
//! - classifier (`model.json`)
//! - informational metadata (`metadata.json`)
//!
//! All four are loaded once at startup; if any fails the process does not
//! serve. After `init` they live in process-wide immutable state and are
//! shared read-only by every request.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::FEATURE_COUNT;
use crate::error::AppError;
use crate::models::{Classifier, ClassifierModel, read_model_json};

pub mod encoder;
pub mod metadata;
pub mod scaler;

pub use encoder::{CategoryEncoder, read_encoder_json};
pub use metadata::{FeatureImportance, ModelMetadata, read_metadata_json};
pub use scaler::{FeatureScaler, read_scaler_json};

pub const ENCODER_FILE: &str = "encoder.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";

static ARTIFACTS: OnceLock<ArtifactBundle> = OnceLock::new();

/// Everything inference needs, loaded together.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub encoder: CategoryEncoder,
    pub scaler: FeatureScaler,
    pub classifier: ClassifierModel,
    pub metadata: ModelMetadata,
    pub source_dir: PathBuf,
}

impl ArtifactBundle {
    /// Assemble a bundle from already-built parts, applying the same
    /// cross-artifact checks as `load`.
    pub fn new(
        encoder: CategoryEncoder,
        scaler: FeatureScaler,
        classifier: ClassifierModel,
        metadata: ModelMetadata,
        source_dir: PathBuf,
    ) -> Result<Self, AppError> {
        scaler.check_layout()?;
        classifier.validate()?;
        if classifier.n_features() != FEATURE_COUNT {
            return Err(AppError::mismatch(format!(
                "Classifier was fit on {} features; the pipeline produces {FEATURE_COUNT}.",
                classifier.n_features()
            )));
        }
        Ok(Self {
            encoder,
            scaler,
            classifier,
            metadata,
            source_dir,
        })
    }

    /// Load all artifacts from `dir`, failing on the first problem.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let encoder = read_encoder_json(&dir.join(ENCODER_FILE))?;
        let scaler = read_scaler_json(&dir.join(SCALER_FILE))?;
        let classifier = read_model_json(&dir.join(MODEL_FILE))?;
        let metadata = read_metadata_json(&dir.join(METADATA_FILE))?;

        let bundle = Self::new(encoder, scaler, classifier, metadata, dir.to_path_buf())?;
        info!(
            dir = %dir.display(),
            model = bundle.classifier.display_name(),
            categories = bundle.encoder.len(),
            "artifacts loaded"
        );
        Ok(bundle)
    }
}

/// Load artifacts into process-wide state. Later calls return the first bundle
/// unchanged; artifacts are never reloaded.
pub fn init(dir: &Path) -> Result<&'static ArtifactBundle, AppError> {
    if let Some(bundle) = ARTIFACTS.get() {
        return Ok(bundle);
    }
    let bundle = ArtifactBundle::load(dir)?;
    Ok(ARTIFACTS.get_or_init(|| bundle))
}

/// The loaded artifacts, if `init` has succeeded.
pub fn get() -> Option<&'static ArtifactBundle> {
    ARTIFACTS.get()
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::load(format!("Failed to open {what} '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::load(format!("Invalid {what} JSON '{}': {e}", path.display())))
}
