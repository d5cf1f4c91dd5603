use newrelic_appid_core::CoreError;

/// Errors from the New Relic REST API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("New Relic HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// New Relic answered with something other than 200.
    #[error("HTTP status code is not 200 (got {0})")]
    Status(u16),
    /// Body was not a recognised `applications.json` payload.
    #[error("failed to decode New Relic response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from the action.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Invalid inputs or no matching application.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// Error from the New Relic API.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Writing the pipeline output failed.
    #[error("failed to write pipeline output: {0}")]
    Output(#[from] std::io::Error),
}
