use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use super::envelope::{
    parse_insight_envelope, parse_list_envelope, parse_search_envelope, parse_update_envelope,
};
use super::{ApiError, MailApi, UpdateOutcome};
use crate::core::insight::Insights;
use crate::core::raw::RawTaskRecord;

const LIST_PATH: &str = "/api/allmessages";
const UPDATE_PATH: &str = "/api/update_mail";
const SEARCH_PATH: &str = "/api/search";
const INSIGHT_PATH: &str = "/api/insight";

/// HTTP client for the MailSync REST backend.
pub struct HttpMailApi {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl HttpMailApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, token, http))
    }

    pub fn with_client(base_url: &str, token: Option<String>, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorized POST. Fails before touching the network when no token is set.
    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingCredential)?;
        Ok(self.http.post(self.url(path)).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<(reqwest::StatusCode, String), ApiError> {
        let resp = request.send().await.map_err(|e| {
            log::warn!("POST {} failed: {}", path, e);
            ApiError::Transport(e.to_string())
        })?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read response: {}", e)))?;
        log::debug!("POST {} -> {} ({} bytes)", path, status, text.len());
        Ok((status, text))
    }
}

impl MailApi for HttpMailApi {
    async fn list_tasks(&self) -> Result<Vec<RawTaskRecord>, ApiError> {
        let request = self.post(LIST_PATH)?;
        let (status, body) = self.send(request, LIST_PATH).await?;
        parse_list_envelope(status, &body)
    }

    async fn update_mail(&self) -> Result<UpdateOutcome, ApiError> {
        let request = self.post(UPDATE_PATH)?;
        let (status, body) = self.send(request, UPDATE_PATH).await?;
        parse_update_envelope(status, &body)
    }

    async fn search(&self, query: &str) -> Result<Vec<RawTaskRecord>, ApiError> {
        let request = self.post(SEARCH_PATH)?.form(&[("query", query)]);
        let (status, body) = self.send(request, SEARCH_PATH).await?;
        parse_search_envelope(status, &body)
    }

    async fn insights(&self) -> Result<Insights, ApiError> {
        let request = self.post(INSIGHT_PATH)?;
        let (status, body) = self.send(request, INSIGHT_PATH).await?;
        parse_insight_envelope(status, &body)
    }
}
