use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Name of the step output carrying the application id.
pub const APP_ID_OUTPUT: &str = "appID";

/// Environment variable pointing at the runner's step output file.
pub const GITHUB_OUTPUT_VAR: &str = "GITHUB_OUTPUT";

/// Format a workflow command that sets a step output.
///
/// Example: ::set-output name=appID::42
pub fn format_set_output(name: &str, value: impl std::fmt::Display) -> String {
    format!("::set-output name={name}::{value}")
}

/// Write the application id as a `::set-output` line.
pub fn write_set_output(out: &mut impl Write, app_id: u64) -> io::Result<()> {
    writeln!(out, "{}", format_set_output(APP_ID_OUTPUT, app_id))?;
    out.flush()
}

/// Append `appID=<id>` to the step output file, creating it if needed.
pub fn append_output_file(path: &Path, app_id: u64) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{APP_ID_OUTPUT}={app_id}")
}
