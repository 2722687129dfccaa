//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - sets up logging
//! - loads the artifacts (fail fast)
//! - dispatches to the CLI commands or the interactive form

use std::io::IsTerminal;

use clap::Parser;
use tracing::error;

use crate::cli::{Command, CommonArgs, PredictArgs};
use crate::config::Settings;
use crate::domain::ReceivableInput;
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::predict::PredictionService;

pub mod pipeline;

/// Entry point for the `settle` binary.
pub fn run() -> Result<(), AppError> {
    // `settle` and `settle --artifacts DIR` behave like `settle tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = resolve_settings(Settings::from_env()?, &cli.common);

    let target = match (&cli.command, &settings.log_file) {
        (Command::Tui, Some(path)) => LogTarget::File(path.as_path()),
        (Command::Tui, None) => LogTarget::Off,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(target, cli.common.verbose)?;

    let service = pipeline::start(&settings.artifact_dir, settings.year_policy).inspect_err(|err| {
        error!(dir = %settings.artifact_dir.display(), "{err}");
    })?;

    match cli.command {
        Command::Predict(args) => handle_predict(&service, args),
        Command::Info => handle_info(&service),
        Command::Categories => handle_categories(&service),
        Command::Tui => crate::tui::run(service),
    }
}

/// Apply CLI overrides on top of environment settings.
pub fn resolve_settings(mut settings: Settings, common: &CommonArgs) -> Settings {
    if let Some(dir) = &common.artifacts {
        settings.artifact_dir = dir.clone();
    }
    settings.year_policy = common.year_policy(settings.year_policy);
    settings
}

fn handle_predict(service: &PredictionService<'_>, args: PredictArgs) -> Result<(), AppError> {
    let artifacts = service.artifacts();
    let category = match args.category {
        Some(category) => category,
        None if std::io::stdin().is_terminal() => crate::cli::picker::prompt_for_category(&artifacts.encoder)?,
        None => {
            return Err(AppError::invalid_input(
                "Missing --category. Run `settle categories` to list the known labels.",
            ));
        }
    };

    let input = ReceivableInput {
        tax_year: args.year,
        tax_category: category,
        opening_balance: args.opening_balance,
        amount_paid: args.paid,
    };
    let run = pipeline::run_prediction(service, input)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.result)
            .map_err(|e| AppError::terminal(format!("Failed to encode result JSON: {e}")))?;
        println!("{json}");
    } else {
        println!(
            "{}",
            crate::report::format_prediction(&run.input, &run.result, &artifacts.metadata, !args.no_details)
        );
    }
    Ok(())
}

fn handle_info(service: &PredictionService<'_>) -> Result<(), AppError> {
    use crate::models::Classifier;

    let artifacts = service.artifacts();
    println!(
        "{}",
        crate::report::format_model_info(
            &artifacts.metadata,
            artifacts.classifier.display_name(),
            &artifacts.encoder
        )
    );
    Ok(())
}

fn handle_categories(service: &PredictionService<'_>) -> Result<(), AppError> {
    print!("{}", crate::report::format_categories(&service.artifacts().encoder));
    Ok(())
}

/// Rewrite argv so `settle` defaults to `settle tui`.
///
/// Rules:
/// - `settle`                      -> `settle tui`
/// - `settle --artifacts DIR ...`  -> `settle tui --artifacts DIR ...`
/// - `settle --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "predict" | "info" | "categories" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::YearPolicy;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_the_form() {
        assert_eq!(rewrite_args(args(&["settle"])), args(&["settle", "tui"]));
        assert_eq!(
            rewrite_args(args(&["settle", "--artifacts", "m"])),
            args(&["settle", "tui", "--artifacts", "m"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(
            rewrite_args(args(&["settle", "predict", "-c", "PBB"])),
            args(&["settle", "predict", "-c", "PBB"])
        );
        assert_eq!(rewrite_args(args(&["settle", "--help"])), args(&["settle", "--help"]));
    }

    #[test]
    fn cli_flags_override_environment() {
        let common = CommonArgs {
            artifacts: Some(PathBuf::from("cli-dir")),
            strict_year: true,
            verbose: false,
        };
        let settings = resolve_settings(Settings::default(), &common);
        assert_eq!(settings.artifact_dir, PathBuf::from("cli-dir"));
        assert_eq!(settings.year_policy, YearPolicy::Strict);

        let none = CommonArgs {
            artifacts: None,
            strict_year: false,
            verbose: false,
        };
        let env = Settings {
            year_policy: YearPolicy::Strict,
            ..Settings::default()
        };
        assert_eq!(resolve_settings(env.clone(), &none), env);
    }
}
