use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{PlaceId, PlaceRecord},
    error::ApiException,
    protocol::{HealthResponse, Review, SearchRequest, SearchResponse, VibeSummary},
};
use tracing::debug;

use crate::{config::ClientSettings, error::SearchError};

const BODY_PREVIEW_CHARS: usize = 200;

/// The remote side of a search: anything that can turn criteria into place
/// records. The controller only talks to this trait.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceRecord>, SearchError>;
    async fn vibe_summary(&self, place_id: PlaceId) -> Result<VibeSummary, SearchError>;
    async fn reviews(&self, place_id: PlaceId) -> Result<Vec<Review>, SearchError>;
    async fn health(&self) -> Result<String, SearchError>;
}

#[derive(Clone)]
pub struct HttpSearchClient {
    http: Client,
    base_url: String,
}

impl HttpSearchClient {
    /// `base_url` must already be normalized (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.base_url()?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SearchError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiException::from_body(status.as_u16(), &body).into());
        }

        let body = response.text().await?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "search service replied");
        serde_json::from_str(&body).map_err(|err| {
            SearchError::MalformedBody(format!(
                "{err}; body starts with: {}",
                body.chars().take(BODY_PREVIEW_CHARS).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<PlaceRecord>, SearchError> {
        let response: SearchResponse = self
            .fetch_json(
                self.http
                    .get(format!("{}/search/", self.base_url))
                    .query(request),
            )
            .await?;
        Ok(response.results)
    }

    async fn vibe_summary(&self, place_id: PlaceId) -> Result<VibeSummary, SearchError> {
        self.fetch_json(
            self.http
                .get(format!("{}/places/{}/vibe", self.base_url, place_id.0)),
        )
        .await
    }

    async fn reviews(&self, place_id: PlaceId) -> Result<Vec<Review>, SearchError> {
        self.fetch_json(
            self.http
                .get(format!("{}/places/{}/reviews", self.base_url, place_id.0)),
        )
        .await
    }

    async fn health(&self) -> Result<String, SearchError> {
        let response: HealthResponse = self
            .fetch_json(self.http.get(format!("{}/", self.base_url)))
            .await?;
        Ok(response.message)
    }
}
