use thiserror::Error;

/// Core errors for the application lookup.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("No application found matching name: {0}")]
    NotFound(String),
}
