pub mod config;
pub mod error;
pub mod model;

pub use config::{ConfigError, LookupConfig, parse_timeout};
pub use error::CoreError;
pub use model::{
    ApplicationRecord, ApplicationsPage, ApplicationsResponse, Links, Region, RegionError,
    select_application_id,
};
