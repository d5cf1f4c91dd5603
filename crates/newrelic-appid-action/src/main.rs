mod client;
mod errors;
mod lookup;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use newrelic_appid_core::LookupConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the workflow command.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match LookupConfig::from_env() {
        Ok(config) => config,
        Err(e) => return fail(e),
    };

    let output_file = std::env::var_os(output::GITHUB_OUTPUT_VAR)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    let mut stdout = std::io::stdout();
    match lookup::run(&config, &mut stdout, output_file.as_deref()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

/// Report a terminal error on stdout, where the runner shows it, and exit 1.
fn fail(err: impl std::fmt::Display) -> ExitCode {
    error!(error = %err, "lookup failed");
    println!("{err}");
    ExitCode::FAILURE
}
