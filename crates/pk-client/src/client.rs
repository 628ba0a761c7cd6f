use std::time::Duration;

use pk_core::{AnalysisEnvelope, DatasetProfile, Envelope, PreviewRow};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Client for the three read endpoints of the analysis server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::BaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().connect_timeout(timeout).timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/dataset/{id}/preview`
    pub async fn dataset_preview(&self, id: u64) -> Result<Envelope<Vec<PreviewRow>>> {
        self.get_json(&format!("/api/dataset/{id}/preview")).await
    }

    /// `GET /api/dataset/{id}/plot-data`
    pub async fn dataset_plot_data(&self, id: u64) -> Result<Envelope<Vec<DatasetProfile>>> {
        self.get_json(&format!("/api/dataset/{id}/plot-data")).await
    }

    /// `GET /api/analysis/{id}/plot-data`
    pub async fn analysis_plot_data(&self, id: u64) -> Result<AnalysisEnvelope> {
        self.get_json(&format!("/api/analysis/{id}/plot-data")).await
    }

    // The body is decoded whatever the status code: failures arrive as
    // `success: false` envelopes.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%url, %status, bytes = body.len(), "response");
        Ok(serde_json::from_str(&body).map_err(pk_core::Error::from)?)
    }
}
