use crate::workflow::config::DashboardConfig;
use anyhow::Context;
use rxlogcore::dataset::SourceRecord;
use std::time::Duration;

/// HTTP client for the stock API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.api_base,
            config.token.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base, endpoint)
        } else {
            format!("{}/{}", self.base, endpoint)
        }
    }

    pub async fn fetch_records(&self, endpoint: &str) -> anyhow::Result<Vec<SourceRecord>> {
        let url = self.url(endpoint);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("requesting {}", url))?
            .error_for_status()
            .with_context(|| format!("unexpected status from {}", url))?;
        response
            .json::<Vec<SourceRecord>>()
            .await
            .with_context(|| format!("decoding records from {}", url))
    }
}
