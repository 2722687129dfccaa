//! Interactive category picker.
//!
//! Used by `settle predict` when `--category` is omitted. The options are exactly
//! the encoder vocabulary, so an unknown label cannot be picked.

use std::io::{self, BufRead, Write};

use crate::artifacts::CategoryEncoder;
use crate::error::AppError;

/// Prompt on stdin/stdout.
pub fn prompt_for_category(encoder: &CategoryEncoder) -> Result<String, AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    pick_category(encoder, &mut stdin.lock(), &mut stdout.lock())
}

/// Behavior:
/// - list the known categories
/// - accept either a number (from the list) or an exact label
/// - `q` cancels
pub fn pick_category<R: BufRead, W: Write>(
    encoder: &CategoryEncoder,
    input: &mut R,
    out: &mut W,
) -> Result<String, AppError> {
    let classes = encoder.classes();
    let io_err = |e: io::Error| AppError::terminal(format!("Failed to write prompt: {e}"));

    writeln!(out, "Known tax categories:").map_err(io_err)?;
    for (idx, label) in classes.iter().enumerate() {
        writeln!(out, "{:>3}) {label}", idx + 1).map_err(io_err)?;
    }

    loop {
        write!(out, "Select a category by number (1-{}) or name (q to quit): ", classes.len())
            .map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::terminal(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::invalid_input(
                "No category selected. Pass one with `settle predict --category <LABEL>`.",
            ));
        }

        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Err(AppError::invalid_input("Canceled."));
        }

        if let Ok(n) = choice.parse::<usize>() {
            if (1..=classes.len()).contains(&n) {
                return Ok(classes[n - 1].clone());
            }
            writeln!(out, "Invalid choice: {n}. Enter a number between 1 and {}.", classes.len())
                .map_err(io_err)?;
            continue;
        }

        if encoder.contains(choice) {
            return Ok(choice.to_string());
        }
        writeln!(out, "Unknown category '{choice}'.").map_err(io_err)?;
    }
}
