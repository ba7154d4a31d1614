use serde::Deserialize;

/// Main configuration structure for Vacancy-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    pub output: OutputConfig,
}

/// Remote search endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search results path, queried with `text`, `area`, `page` and filters
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Region identifier sent as the `area` parameter
    #[serde(default = "default_area")]
    pub area: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            area: default_area(),
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Identity used when the rotation pool cannot supply one
    #[serde(rename = "fallback-user-agent", default = "default_fallback_user_agent")]
    pub fallback_user_agent: String,

    /// Pool of browser identities rotated per request
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            fallback_user_agent: default_fallback_user_agent(),
            user_agents: default_user_agents(),
        }
    }
}

/// Pagination loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Safety ceiling on fetched pages, 0 means unlimited
    #[serde(rename = "max-pages", default)]
    pub max_pages: u32,

    /// Extra attempts for a failed (non-404) page fetch
    #[serde(rename = "retry-attempts", default)]
    pub retry_attempts: u32,

    /// Delay between fetch attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            retry_attempts: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_base_url() -> String {
    "https://hh.ru/search/vacancy".to_string()
}

fn default_area() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_fallback_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
    ]
    .iter()
    .map(|ua| ua.to_string())
    .collect()
}
