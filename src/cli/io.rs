//! Output handling for CLI
//!
//! Command results go to stdout; diagnostics go to stderr.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write text to stdout as is
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Write a value as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write one diagnostic line to stderr
pub fn write_diagnostic(line: &str) -> CliResult<()> {
    let mut stderr = io::stderr();
    writeln!(stderr, "{}", line)?;

    Ok(())
}
