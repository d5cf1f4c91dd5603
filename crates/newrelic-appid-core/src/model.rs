use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

const US_APPLICATIONS_URL: &str = "https://api.newrelic.com/v2/applications.json";
const EU_APPLICATIONS_URL: &str = "https://api.eu.newrelic.com/v2/applications.json";

/// New Relic data center region. Each region has its own REST API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Region {
    Us,
    Eu,
}

impl Region {
    /// Base URL of the `applications.json` endpoint for this region.
    pub fn applications_url(self) -> &'static str {
        match self {
            Self::Us => US_APPLICATIONS_URL,
            Self::Eu => EU_APPLICATIONS_URL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Us => "US",
            Self::Eu => "EU",
        }
    }
}

impl FromStr for Region {
    type Err = RegionError;

    /// Exact match only: `"US"` or `"EU"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "US" => Ok(Self::Us),
            "EU" => Ok(Self::Eu),
            other => Err(RegionError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.as_str().to_string()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region string that is neither `"US"` nor `"EU"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region {0:?}, expected \"US\" or \"EU\"")]
pub struct RegionError(pub String);

// ---------------------------------------------------------------------------
// ApplicationRecord
// ---------------------------------------------------------------------------

/// Decode a field the lookup never reads, falling back to the default when
/// the value has an unexpected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// One monitored application as returned by `GET /v2/applications.json`.
///
/// Only `id` is required and type-checked. The rest follows the documented
/// v2 layout (metrics under `application_summary`, thresholds under
/// `settings`, related ids under `links`) and drops to `None` or empty when
/// missing or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: u64,

    #[serde(default, deserialize_with = "lenient")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub health_status: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reporting: Option<bool>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub last_reported_at: Option<DateTime<Utc>>,

    /// Present only while the application is reporting.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub application_summary: Option<ApplicationSummary>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub end_user_summary: Option<EndUserSummary>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub settings: Option<ApplicationSettings>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub links: Option<ApplicationLinks>,
}

/// Timing and throughput metrics for the server side of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSummary {
    #[serde(deserialize_with = "lenient")]
    pub response_time: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub throughput: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub error_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub apdex_target: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub apdex_score: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub host_count: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub instance_count: Option<u32>,
}

/// Browser (real user monitoring) metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndUserSummary {
    #[serde(deserialize_with = "lenient")]
    pub response_time: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub throughput: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub apdex_target: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub apdex_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "lenient")]
    pub app_apdex_threshold: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub end_user_apdex_threshold: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub enable_real_user_monitoring: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub use_server_side_config: Option<bool>,
}

/// Ids of resources related to one application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationLinks {
    #[serde(deserialize_with = "lenient")]
    pub application_servers: Vec<u64>,
    #[serde(deserialize_with = "lenient")]
    pub servers: Vec<u64>,
    #[serde(deserialize_with = "lenient")]
    pub application_hosts: Vec<u64>,
    #[serde(deserialize_with = "lenient")]
    pub application_instances: Vec<u64>,
    #[serde(deserialize_with = "lenient")]
    pub alert_policy: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// URL templates for resources related to the returned applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "application.servers", deserialize_with = "lenient")]
    pub application_servers: Option<String>,
    #[serde(rename = "application.server", deserialize_with = "lenient")]
    pub application_server: Option<String>,
    #[serde(rename = "application.application_hosts", deserialize_with = "lenient")]
    pub application_hosts: Option<String>,
    #[serde(rename = "application.application_host", deserialize_with = "lenient")]
    pub application_host: Option<String>,
    #[serde(rename = "application.application_instances", deserialize_with = "lenient")]
    pub application_instances: Option<String>,
    #[serde(rename = "application.application_instance", deserialize_with = "lenient")]
    pub application_instance: Option<String>,
    #[serde(rename = "application.alert_policy", deserialize_with = "lenient")]
    pub alert_policy: Option<String>,
}

/// The documented `applications.json` body. The `applications` key is
/// required, so error bodies and unrelated JSON fail to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationsPage {
    pub applications: Vec<ApplicationRecord>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Either body shape seen from the endpoint: a single page object, or a
/// list of page objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationsResponse {
    Page(ApplicationsPage),
    Pages(Vec<ApplicationsPage>),
}

impl<'de> Deserialize<'de> for ApplicationsResponse {
    /// Picks the shape from the top-level JSON type so a decode failure
    /// reports the actual field at fault.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => ApplicationsPage::deserialize(value)
                .map(Self::Page)
                .map_err(de::Error::custom),
            value @ Value::Array(_) => Vec::<ApplicationsPage>::deserialize(value)
                .map(Self::Pages)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected an object or an array of objects, got {other}"
            ))),
        }
    }
}

impl ApplicationsResponse {
    /// Flatten into records, keeping response order.
    pub fn into_records(self) -> Vec<ApplicationRecord> {
        match self {
            Self::Page(page) => page.applications,
            Self::Pages(pages) => pages
                .into_iter()
                .flat_map(|page| page.applications)
                .collect(),
        }
    }
}

/// Pick the id of the first record. The server already filtered by name;
/// when several applications share it, the first one in the response wins.
pub fn select_application_id(
    records: &[ApplicationRecord],
    app_name: &str,
) -> Result<u64, CoreError> {
    records
        .first()
        .map(|record| record.id)
        .ok_or_else(|| CoreError::NotFound(app_name.to_string()))
}
