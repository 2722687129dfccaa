//! `settle-predict` library crate.
//!
//! The binary (`settle`) is a thin wrapper around this library so that:
//!
//! - the feature builder and prediction service are testable without a terminal
//! - the CLI and the TUI share one inference path
//! - artifacts are loaded and validated in exactly one place

pub mod app;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod logging;
pub mod models;
pub mod predict;
pub mod report;
pub mod tui;
