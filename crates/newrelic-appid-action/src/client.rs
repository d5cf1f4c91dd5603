use std::time::Duration;

use newrelic_appid_core::{ApplicationRecord, ApplicationsResponse};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::errors::ApiError;

/// Header New Relic reads the user API key from.
const API_KEY_HEADER: &str = "Api-Key";

/// Query parameter for the server-side name filter.
const NAME_FILTER_PARAM: &str = "filter[name]";

/// New Relic REST API (v2) client for the `applications.json` endpoint.
#[derive(Clone)]
pub struct NewRelicClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl NewRelicClient {
    /// Create a new client. `timeout` of `None` keeps reqwest's default.
    pub fn new(
        api_key: String,
        endpoint: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_key,
            endpoint,
        })
    }

    /// Fetch the applications whose name matches `app_name`.
    ///
    /// Accepts both body shapes the endpoint has been seen to return and
    /// yields the records in response order.
    pub async fn fetch_applications(
        &self,
        app_name: &str,
    ) -> Result<Vec<ApplicationRecord>, ApiError> {
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[(NAME_FILTER_PARAM, app_name)])
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await?;

        let status = resp.status();
        info!(status = status.as_u16(), "New Relic responded");

        if status != StatusCode::OK {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let response: ApplicationsResponse = serde_json::from_slice(&body)?;
        let records = response.into_records();

        debug!(count = records.len(), "decoded applications");
        Ok(records)
    }
}
