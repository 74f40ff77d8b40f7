//! Remote recipe feed client trait and implementations.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Recipe, RecipeResponse};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Recipe feed unavailable: {0}")]
    Unavailable(String),
}

/// Source of the remote recipe list, enabling test doubles.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Issue a single fetch of the recipe list. No retries.
    async fn fetch_recipes(&self) -> Result<RecipeResponse, FetchError>;
}

/// Production source: `GET {base_url}/recipes` over reqwest.
pub struct HttpRecipeSource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpRecipeSource {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::RequestFailed)?;
        Self::with_client(client, base_url)
    }

    /// Build on top of an existing client (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, FetchError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = reqwest::Url::parse(&base)
            .and_then(|url| url.join("recipes"))
            .map_err(|e| FetchError::InvalidUrl(format!("'{}': {}", base_url, e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

#[async_trait]
impl RecipeSource for HttpRecipeSource {
    async fn fetch_recipes(&self) -> Result<RecipeResponse, FetchError> {
        tracing::debug!(url = %self.endpoint, "fetching remote recipes");
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %self.endpoint, %status, "remote recipes request failed");
            return Err(FetchError::Status(status.as_u16()));
        }
        let payload = response.json::<RecipeResponse>().await?;
        Ok(payload)
    }
}

/// Canned response returned by [`StaticRecipeSource`]
#[derive(Debug, Clone)]
pub enum StaticResponse {
    Recipes(Vec<Recipe>),
    /// Successful response whose `recipes` field is absent
    MissingList,
    Error(String),
}

/// In-process source for tests and offline previews.
pub struct StaticRecipeSource {
    response: StaticResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticRecipeSource {
    pub fn new(response: StaticResponse) -> Self {
        Self {
            response,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self::new(StaticResponse::Recipes(recipes))
    }

    pub fn failing(error: &str) -> Self {
        Self::new(StaticResponse::Error(error.to_string()))
    }

    /// Hold every fetch for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSource for StaticRecipeSource {
    async fn fetch_recipes(&self) -> Result<RecipeResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            StaticResponse::Recipes(recipes) => Ok(RecipeResponse {
                recipes: Some(recipes.clone()),
            }),
            StaticResponse::MissingList => Ok(RecipeResponse { recipes: None }),
            StaticResponse::Error(e) => Err(FetchError::Unavailable(e.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_recipes_path() {
        let source = HttpRecipeSource::new("https://api.example.com/v1").unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/v1/recipes");

        let source = HttpRecipeSource::new("https://api.example.com/").unwrap();
        assert_eq!(source.endpoint(), "https://api.example.com/recipes");
    }

    #[test]
    fn rejects_garbage_base_url() {
        let err = HttpRecipeSource::new("not a url").err().expect("invalid url");
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn static_source_counts_calls() {
        let source = StaticRecipeSource::new(StaticResponse::MissingList);
        let payload = source.fetch_recipes().await.unwrap();
        assert!(payload.recipes.is_none());
        assert!(StaticRecipeSource::failing("offline")
            .fetch_recipes()
            .await
            .is_err());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        // Port 9 on localhost is the discard service; nothing should be listening.
        let source = HttpRecipeSource::new("http://127.0.0.1:9").unwrap();
        assert!(source.fetch_recipes().await.is_err());
    }
}
