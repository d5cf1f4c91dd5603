use std::io::Write;
use std::path::Path;

use newrelic_appid_core::{LookupConfig, select_application_id};
use tracing::info;

use crate::client::NewRelicClient;
use crate::errors::ActionError;
use crate::output;

/// Resolve the application id for `config.app_name`.
///
/// 1. Query `applications.json` filtered by name
/// 2. Take the first returned record's id
pub async fn find_application_id(config: &LookupConfig) -> Result<u64, ActionError> {
    info!(
        region = %config.region,
        app_name = %config.app_name,
        "looking up application"
    );

    let client = NewRelicClient::new(
        config.api_key.clone(),
        config.endpoint.clone(),
        config.timeout,
    )?;
    let records = client.fetch_applications(&config.app_name).await?;

    if records.len() > 1 {
        info!(
            count = records.len(),
            "several applications share this name, using the first"
        );
    }

    let app_id = select_application_id(&records, &config.app_name)?;
    info!(app_id, "found application");
    Ok(app_id)
}

/// Look up the application id and publish it as a step output.
///
/// Nothing is written to `out` or `output_file` unless the lookup
/// succeeds.
pub async fn run(
    config: &LookupConfig,
    out: &mut impl Write,
    output_file: Option<&Path>,
) -> Result<u64, ActionError> {
    let app_id = find_application_id(config).await?;

    output::write_set_output(out, app_id)?;
    if let Some(path) = output_file {
        output::append_output_file(path, app_id)?;
    }

    Ok(app_id)
}
