use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{RawScrapeResponse, RawSearchResponse, ScrapeFormat, ScrapeService, SearchService};
use crate::config::SearchConfig;

#[derive(Debug, thiserror::Error)]
pub enum FirecrawlError {
    #[error("Firecrawl API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Firecrawl request was not successful: {0}")]
    Unsuccessful(String),
}

/// Firecrawl v2 REST 客户端，同时提供搜索与抓取
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    api_base_url: String,
    query_suffix: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: String,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<&'a str>>,
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [ScrapeFormat],
}

impl FirecrawlClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            query_suffix: config.query_suffix.clone(),
        })
    }

    fn decorate_query(&self, query: &str) -> String {
        if self.query_suffix.trim().is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, self.query_suffix.trim())
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send Firecrawl request to {}", path))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let value: Value = response
            .json()
            .await
            .context("Failed to parse Firecrawl response")?;

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(FirecrawlError::Unsuccessful(message).into());
        }

        Ok(value)
    }
}

#[async_trait]
impl SearchService for FirecrawlClient {
    async fn search(&self, query: &str, limit: usize) -> Result<RawSearchResponse> {
        let request = SearchRequest {
            query: self.decorate_query(query),
            limit,
            sources: Some(vec!["web"]),
        };
        tracing::debug!(query = %request.query, limit, "firecrawl search");

        let value = self.post("/v2/search", &request).await?;
        Ok(RawSearchResponse::from_value(value))
    }
}

#[async_trait]
impl ScrapeService for FirecrawlClient {
    async fn scrape(&self, url: &str, formats: &[ScrapeFormat]) -> Result<RawScrapeResponse> {
        tracing::debug!(url, "firecrawl scrape");

        let request = ScrapeRequest { url, formats };
        let value = self.post("/v2/scrape", &request).await?;
        Ok(RawScrapeResponse::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_suffix(suffix: &str) -> FirecrawlClient {
        let config = SearchConfig {
            api_key: "fc-test".to_string(),
            query_suffix: suffix.to_string(),
            ..Default::default()
        };
        FirecrawlClient::new(&config).unwrap()
    }

    #[test]
    fn test_query_suffix_is_appended() {
        let client = client_with_suffix("and company pricing official website");
        assert_eq!(
            client.decorate_query("Qdrant official website"),
            "Qdrant official website and company pricing official website"
        );
    }

    #[test]
    fn test_blank_suffix_leaves_query_untouched() {
        let client = client_with_suffix("  ");
        assert_eq!(client.decorate_query("vector databases"), "vector databases");
    }

    #[test]
    fn test_scrape_request_serializes_formats() {
        let request = ScrapeRequest {
            url: "https://qdrant.tech",
            formats: &[ScrapeFormat::Markdown],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["formats"], serde_json::json!(["markdown"]));
    }
}
