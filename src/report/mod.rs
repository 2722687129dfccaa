//! Reporting utilities: text rendering of predictions and model information.

pub mod format;

pub use format::*;
