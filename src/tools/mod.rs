// ABOUTME: Built-in capabilities dispatched by name through the Registry.
// ABOUTME: File I/O on durable storage, code execution, web search, and scraping.

mod edit_file;
mod execute_code;
mod read_file;
mod search_internet;
mod web_scrape;
mod write_file;

pub use edit_file::EditFileTool;
pub use execute_code::{CodeOutcome, ExecuteCodeTool};
pub use read_file::ReadFileTool;
pub use search_internet::{DEFAULT_MAX_RESULTS, SearchInternetTool, SearchResult, TAVILY_BASE_URL};
pub use web_scrape::{ScrapedPage, WebScrapeTool};
pub use write_file::WriteFileTool;

use crate::artifact::ArtifactStore;
use crate::config::Settings;
use crate::tool::Registry;

/// Build a registry holding all six built-in tools, configured from `settings`.
/// The file tools operate on the artifact directory.
pub async fn default_registry(settings: &Settings) -> Registry {
    let store = ArtifactStore::new(&settings.artifact_dir);
    let registry = Registry::new();
    registry.register(ReadFileTool::new(store.clone())).await;
    registry.register(WriteFileTool::new(store.clone())).await;
    registry.register(EditFileTool::new(store)).await;
    registry
        .register(ExecuteCodeTool::new(&settings.python).with_timeout(settings.timeout))
        .await;
    let http = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    registry
        .register(SearchInternetTool::with_client(http, &settings.tavily_api_key))
        .await;
    registry.register(WebScrapeTool).await;
    registry
}
