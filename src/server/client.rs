use super::routes::UpdateResponse;
use super::store::{ConfigPatch, ConfigSnapshot};
use crate::error::ReportResult;
use crate::report::SharedSettings;
use reqwest::Client;
use tracing::debug;

/// Talks to a running config service.
#[derive(Debug, Clone)]
pub struct ConfigClient {
    client: Client,
    base_url: String,
}

impl ConfigClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch(&self) -> ReportResult<ConfigSnapshot> {
        let url = format!("{}/api/config", self.base_url);
        debug!("GET {}", url);
        let snapshot = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }

    pub async fn fetch_settings(&self) -> ReportResult<SharedSettings> {
        Ok(self.fetch().await?.settings())
    }

    pub async fn push(&self, patch: &ConfigPatch) -> ReportResult<UpdateResponse> {
        let url = format!("{}/api/config", self.base_url);
        debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .json(patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}
