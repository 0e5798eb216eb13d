// ABOUTME: SearchInternetTool - web search through the Tavily search API.
// ABOUTME: Returns an ordered list of {title, url, snippet} hits, five by default.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tool::{Tool, ToolResult};

/// Default Tavily API endpoint.
pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Number of hits requested when the caller does not say.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl From<TavilyHit> for SearchResult {
    fn from(hit: TavilyHit) -> Self {
        SearchResult {
            title: hit.title,
            url: hit.url,
            snippet: hit.content,
        }
    }
}

/// Tool for searching the internet.
pub struct SearchInternetTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SearchInternetTool {
    /// Create a new tool using the given Tavily API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, api_key)
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: TAVILY_BASE_URL.to_string(),
        }
    }

    /// Point the tool at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, String> {
        let url = format!("{}/search", self.base_url);
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Search failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Search failed with status: {}", response.status()));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(SearchResult::from)
            .collect())
    }
}

#[async_trait]
impl Tool for SearchInternetTool {
    fn name(&self) -> &str {
        "search_internet"
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns a list of results with titles, URLs, and snippets."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 5)",
                    "default": DEFAULT_MAX_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
            #[serde(default = "default_max_results")]
            max_results: usize,
        }

        fn default_max_results() -> usize {
            DEFAULT_MAX_RESULTS
        }

        let params: Params = serde_json::from_value(params)?;

        match self.search(&params.query, params.max_results).await {
            Ok(results) => {
                tracing::debug!(query = %params.query, hits = results.len(), "search completed");
                Ok(ToolResult::json("results", results))
            }
            Err(message) => Ok(ToolResult::error(message)),
        }
    }
}
