//! Command-line parsing for the settlement predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the inference code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{TAX_YEAR_MAX, YearPolicy};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "settle", version, about = "Local tax receivable settlement predictor")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Directory with encoder.json, scaler.json, model.json and metadata.json
    /// (default: $SETTLE_ARTIFACT_DIR or ./artifacts).
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    /// Reject tax years outside the supported range instead of warning.
    #[arg(long, global = true)]
    pub strict_year: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl CommonArgs {
    /// CLI flag wins; otherwise keep the environment setting.
    pub fn year_policy(&self, fallback: YearPolicy) -> YearPolicy {
        if self.strict_year {
            YearPolicy::Strict
        } else {
            fallback
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict the settlement status of one receivable.
    Predict(PredictArgs),
    /// Show model name, accuracy, F1-score and top feature importances.
    Info,
    /// List the tax categories known to the encoder, with their codes.
    Categories,
    /// Launch the interactive form (default).
    Tui,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Tax year.
    #[arg(short = 'y', long, default_value_t = TAX_YEAR_MAX)]
    pub year: i32,

    /// Tax category label; prompts with the known categories when omitted.
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Opening balance.
    #[arg(short = 'b', long, default_value_t = 1_000_000, allow_negative_numbers = true)]
    pub opening_balance: i64,

    /// Amount already paid.
    #[arg(short = 'p', long, default_value_t = 0, allow_negative_numbers = true)]
    pub paid: i64,

    /// Hide the table of feature values used.
    #[arg(long)]
    pub no_details: bool,

    /// Print the result as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}
