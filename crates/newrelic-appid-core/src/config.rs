use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::model::Region;

/// Action input: New Relic user API key.
pub const API_KEY_VAR: &str = "INPUT_NEWRELICAPIKEY";
/// Action input: `US` or `EU`.
pub const REGION_VAR: &str = "INPUT_NEWRELICREGION";
/// Action input: application name to filter on.
pub const APP_NAME_VAR: &str = "INPUT_APPNAME";
/// Optional action input: request timeout ("30s", "1m", or raw seconds).
pub const TIMEOUT_VAR: &str = "INPUT_TIMEOUT";
/// Optional action input: replaces the region's base URL.
pub const API_URL_VAR: &str = "INPUT_NEWRELICAPIURL";

/// Everything one lookup needs, resolved and validated up front.
#[derive(Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub api_key: String,
    pub region: Region,
    /// Full URL of the `applications.json` endpoint.
    pub endpoint: String,
    pub app_name: String,
    /// `None` leaves the HTTP client's default in place.
    pub timeout: Option<Duration>,
}

impl LookupConfig {
    /// Read the action inputs from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the action inputs through `lookup`.
    ///
    /// Unset and empty variables are treated the same. Checks run in the
    /// order api key, app name, region, timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;
        let app_name = get(APP_NAME_VAR).ok_or(ConfigError::MissingAppName)?;

        let region_raw = get(REGION_VAR).unwrap_or_default();
        let region: Region = region_raw
            .parse()
            .map_err(|_| ConfigError::InvalidRegion(region_raw))?;

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => Some(parse_timeout(&raw).ok_or(ConfigError::InvalidTimeout(raw))?),
            None => None,
        };

        let endpoint = match get(API_URL_VAR) {
            Some(url) => {
                debug!(%url, "using endpoint override");
                url
            }
            None => region.applications_url().to_string(),
        };

        Ok(Self {
            api_key,
            region,
            endpoint,
            app_name,
            timeout,
        })
    }
}

// Keeps the API key out of debug logs.
impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("api_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("app_name", &self.app_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Parse a timeout string into a [`Duration`].
///
/// Accepts either:
/// - Human-readable shorthand via `humantime` (e.g. "30s", "1m", "1m30s")
/// - Raw seconds as a plain integer (e.g. "30")
///
/// Zero is rejected.
pub fn parse_timeout(s: &str) -> Option<Duration> {
    let parsed = humantime::parse_duration(s)
        .ok()
        .or_else(|| s.parse::<u64>().ok().map(Duration::from_secs))?;

    (!parsed.is_zero()).then_some(parsed)
}

/// Invalid or missing action inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("NewRelic API key not specified.")]
    MissingApiKey,

    #[error("App name not specified.")]
    MissingAppName,

    #[error("Invalid NewRelic region specified.")]
    InvalidRegion(String),

    #[error("Invalid timeout specified: {0:?}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn valid_inputs() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_KEY_VAR, "NRAK-test"),
            (REGION_VAR, "US"),
            (APP_NAME_VAR, "checkout"),
        ]
    }

    #[test]
    fn resolves_us_region() {
        let config = LookupConfig::from_lookup(lookup_from(&valid_inputs())).unwrap();
        assert_eq!(config.api_key, "NRAK-test");
        assert_eq!(config.app_name, "checkout");
        assert_eq!(config.region, Region::Us);
        assert_eq!(
            config.endpoint,
            "https://api.newrelic.com/v2/applications.json"
        );
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn resolves_eu_region() {
        let mut inputs = valid_inputs();
        inputs[1] = (REGION_VAR, "EU");
        let config = LookupConfig::from_lookup(lookup_from(&inputs)).unwrap();
        assert_eq!(config.region, Region::Eu);
        assert_eq!(
            config.endpoint,
            "https://api.eu.newrelic.com/v2/applications.json"
        );
    }

    #[test]
    fn missing_api_key() {
        let inputs = [(REGION_VAR, "US"), (APP_NAME_VAR, "checkout")];
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut inputs = valid_inputs();
        inputs[0] = (API_KEY_VAR, "");
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn missing_app_name() {
        let mut inputs = valid_inputs();
        inputs[2] = (APP_NAME_VAR, "");
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::MissingAppName)
        );
    }

    #[test]
    fn api_key_checked_before_app_name() {
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn invalid_region() {
        let mut inputs = valid_inputs();
        inputs[1] = (REGION_VAR, "APAC");
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::InvalidRegion("APAC".into()))
        );
    }

    #[test]
    fn missing_region_is_invalid() {
        let inputs = [(API_KEY_VAR, "NRAK-test"), (APP_NAME_VAR, "checkout")];
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::InvalidRegion(String::new()))
        );
    }

    #[test]
    fn endpoint_override() {
        let mut inputs = valid_inputs();
        inputs.push((API_URL_VAR, "http://127.0.0.1:1234/v2/applications.json"));
        let config = LookupConfig::from_lookup(lookup_from(&inputs)).unwrap();
        assert_eq!(config.region, Region::Us);
        assert_eq!(config.endpoint, "http://127.0.0.1:1234/v2/applications.json");
    }

    #[test]
    fn timeout_input() {
        let mut inputs = valid_inputs();
        inputs.push((TIMEOUT_VAR, "45s"));
        let config = LookupConfig::from_lookup(lookup_from(&inputs)).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn invalid_timeout_input() {
        let mut inputs = valid_inputs();
        inputs.push((TIMEOUT_VAR, "soon"));
        assert_eq!(
            LookupConfig::from_lookup(lookup_from(&inputs)),
            Err(ConfigError::InvalidTimeout("soon".into()))
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = LookupConfig::from_lookup(lookup_from(&valid_inputs())).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("NRAK-test"));
        assert!(debug.contains("<redacted>"));
    }

    // -- parse_timeout tests --

    #[test]
    fn parse_humantime_seconds() {
        assert_eq!(parse_timeout("30s"), Some(Duration::from_secs(30)));
    }

    #[test]
    fn parse_humantime_compound() {
        assert_eq!(parse_timeout("1m30s"), Some(Duration::from_secs(90)));
    }

    #[test]
    fn parse_raw_seconds() {
        assert_eq!(parse_timeout("20"), Some(Duration::from_secs(20)));
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(parse_timeout("foo"), None);
        assert_eq!(parse_timeout("-5"), None);
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("0s"), None);
    }
}
