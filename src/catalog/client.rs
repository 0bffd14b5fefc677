use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::types::{MovieEntry, TmdbPage};
use crate::config::Config;
use crate::outcome::Outcome;

pub const TRENDING_LIMIT: usize = 8;
pub const SEARCH_LIMIT: usize = 10;

/// Source of catalog listings.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// This week's trending movies, at most [`TRENDING_LIMIT`].
    async fn trending(&self) -> Outcome<Vec<MovieEntry>>;
    /// Title search, at most [`SEARCH_LIMIT`].
    async fn search(&self, query: &str) -> Outcome<Vec<MovieEntry>>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("TMDB request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct TmdbClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.tmdb.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(CatalogError::Client)?;

        Ok(Self {
            client,
            api_key: config.tmdb_api_key().map(str::to_string),
            base_url: config.tmdb.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.tmdb.image_base_url.clone(),
        })
    }

    async fn fetch_page(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<TmdbPage, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let page = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<TmdbPage>()
            .await?;

        Ok(page)
    }

    fn map_page(&self, page: TmdbPage, limit: usize) -> Vec<MovieEntry> {
        page.results
            .into_iter()
            .take(limit)
            .map(|m| m.into_entry(&self.image_base_url))
            .collect()
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn trending(&self) -> Outcome<Vec<MovieEntry>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Outcome::Degraded(Vec::new());
        };

        match self
            .fetch_page("/trending/movie/week", &[("api_key", api_key)])
            .await
        {
            Ok(page) => Outcome::Success(self.map_page(page, TRENDING_LIMIT)),
            Err(e) => {
                error!("TMDB trending error: {}", e);
                Outcome::Failure(e.to_string())
            }
        }
    }

    async fn search(&self, query: &str) -> Outcome<Vec<MovieEntry>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Outcome::Degraded(Vec::new());
        };
        if query.is_empty() {
            return Outcome::Degraded(Vec::new());
        }

        match self
            .fetch_page("/search/movie", &[("api_key", api_key), ("query", query)])
            .await
        {
            Ok(page) => Outcome::Success(self.map_page(page, SEARCH_LIMIT)),
            Err(e) => {
                error!("TMDB search error for {:?}: {}", query, e);
                Outcome::Failure(e.to_string())
            }
        }
    }
}
