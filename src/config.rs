// ABOUTME: Settings - process configuration loaded from environment variables.
// ABOUTME: Missing credentials are the one fatal error, raised before any task runs.

use std::path::PathBuf;
use std::time::Duration;

use crate::artifact::DEFAULT_ARTIFACT_DIR;
use crate::error::ConfigError;
use crate::llm::OPENROUTER_DEFAULT_MODEL;

pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const ARTIFACT_DIR: &str = "PROJECT_ARTIFACT_DIR";
pub const MODEL: &str = "SUPERVISOR_MODEL";
pub const PYTHON: &str = "SUPERVISOR_PYTHON";
pub const TIMEOUT_SECS: &str = "SUPERVISOR_TIMEOUT_SECS";

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime settings for one supervisor process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Credential for the language-model transport.
    pub openrouter_api_key: String,

    /// Credential for the search provider.
    pub tavily_api_key: String,

    /// Directory artifacts and `final_output.txt` are written to.
    pub artifact_dir: PathBuf,

    /// Model requested from OpenRouter.
    pub model: String,

    /// Interpreter used by the `execute_code` tool.
    pub python: String,

    /// Upper bound for any single external call.
    pub timeout: Duration,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openrouter_api_key = get(OPENROUTER_API_KEY).ok_or(ConfigError::Missing(OPENROUTER_API_KEY))?;
        let tavily_api_key = get(TAVILY_API_KEY).ok_or(ConfigError::Missing(TAVILY_API_KEY))?;

        let timeout = match get(TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: TIMEOUT_SECS,
                        value: raw,
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            openrouter_api_key,
            tavily_api_key,
            artifact_dir: PathBuf::from(
                get(ARTIFACT_DIR).unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string()),
            ),
            model: get(MODEL).unwrap_or_else(|| OPENROUTER_DEFAULT_MODEL.to_string()),
            python: get(PYTHON).unwrap_or_else(|| DEFAULT_PYTHON.to_string()),
            timeout,
        })
    }
}
