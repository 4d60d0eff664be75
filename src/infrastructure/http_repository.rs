// HTTP repository implementation for the cat data API
use crate::application::cat_repository::CatRepository;
use crate::domain::cat::{CatIntervals, CatSnapshot};
use crate::domain::range::QueryWindow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct HttpCatRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CatsResponse<T> {
    #[serde(default = "Vec::new")]
    cats: Vec<T>,
}

impl HttpCatRepository {
    /// Every request carries the bearer token when one is configured.
    pub fn new(base_url: String, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("API token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn cats_url(&self) -> String {
        format!("{}/cats", self.base_url)
    }

    fn intervals_url(&self, window: &QueryWindow) -> String {
        format!(
            "{}/cats/intervals?start_date={}&end_date={}&collapse_ms={}",
            self.base_url,
            urlencoding::encode(&window.start_param()),
            urlencoding::encode(&window.end_param()),
            window.bucket_width_ms
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to cat API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Cat API request failed with status {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse cat API response")
    }
}

#[async_trait]
impl CatRepository for HttpCatRepository {
    async fn list_cats(&self) -> Result<Vec<CatSnapshot>> {
        let response: CatsResponse<CatSnapshot> = self.get_json(&self.cats_url()).await?;
        Ok(response.cats)
    }

    async fn query_intervals(&self, window: &QueryWindow) -> Result<Vec<CatIntervals>> {
        let response: CatsResponse<CatIntervals> = self.get_json(&self.intervals_url(window)).await?;
        Ok(response.cats)
    }
}
