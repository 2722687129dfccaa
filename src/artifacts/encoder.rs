//! Tax-category label encoder.
//!
//! The vocabulary is fixed at training time: a label's code is its position in
//! `classes`. The same list is the only source of selectable categories.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoryEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, AppError> {
        if classes.is_empty() {
            return Err(AppError::load("Category encoder has an empty vocabulary."));
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (idx, label) in classes.iter().enumerate() {
            let code = u32::try_from(idx)
                .map_err(|_| AppError::load("Category encoder vocabulary is too large."))?;
            if codes.insert(label.clone(), code).is_some() {
                return Err(AppError::load(format!(
                    "Category encoder lists '{label}' more than once."
                )));
            }
        }

        Ok(Self { classes, codes })
    }

    /// Code for `label`, or `UnknownCategory`.
    pub fn lookup(&self, label: &str) -> Result<u32, AppError> {
        self.codes
            .get(label)
            .copied()
            .ok_or_else(|| AppError::unknown_category(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.codes.contains_key(label)
    }

    /// Labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Read `encoder.json`.
pub fn read_encoder_json(path: &Path) -> Result<CategoryEncoder, AppError> {
    let file: EncoderFile = super::read_json(path, "category encoder")?;
    CategoryEncoder::new(file.classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::new(vec!["BPHTB".into(), "PBB".into(), "REKLAME".into()]).unwrap()
    }

    #[test]
    fn codes_follow_class_order() {
        let enc = encoder();
        assert_eq!(enc.lookup("BPHTB").unwrap(), 0);
        assert_eq!(enc.lookup("PBB").unwrap(), 1);
        assert_eq!(enc.lookup("REKLAME").unwrap(), 2);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = encoder().lookup("X").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCategory);
        // Lookup is exact, not case-folded.
        assert!(encoder().lookup("pbb").is_err());
    }

    #[test]
    fn duplicate_labels_fail_to_load() {
        let err = CategoryEncoder::new(vec!["PBB".into(), "PBB".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArtifactLoad);
    }

    #[test]
    fn empty_vocabulary_fails_to_load() {
        assert!(CategoryEncoder::new(Vec::new()).is_err());
    }
}
