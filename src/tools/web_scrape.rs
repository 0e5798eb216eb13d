// ABOUTME: WebScrapeTool - placeholder scrape capability.
// ABOUTME: Returns {url, content} without fetching; a real scraping provider plugs in here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tool::{Tool, ToolResult};

/// Result of scraping one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub content: String,
}

/// Tool for scraping a web page.
pub struct WebScrapeTool;

impl WebScrapeTool {
    fn scrape(url: &str) -> ScrapedPage {
        ScrapedPage {
            url: url.to_string(),
            content: format!("Scraped content from {} (no scraping provider configured)", url),
        }
    }
}

#[async_trait]
impl Tool for WebScrapeTool {
    fn name(&self) -> &str {
        "web_scrape"
    }

    fn description(&self) -> &str {
        "Scrape the content of a web page. Returns the URL and its content."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to scrape"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            url: String,
        }
        let params: Params = serde_json::from_value(params)?;

        Ok(ToolResult::json("page", Self::scrape(&params.url)))
    }
}
