//! HTTP page fetcher implementation
//!
//! This module issues the GET request for one result page:
//! - Builds the HTTP client from the fetcher configuration
//! - Injects the `page` parameter into the search parameters
//! - Rotates the client identity per request
//! - Classifies the response (page, end of results, failure)
//!
//! No retries happen here; the pagination controller owns that policy.

use crate::config::FetcherConfig;
use crate::harvester::identity::IdentityProvider;
use crate::FetchFailure;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Name of the query parameter carrying the page index
pub const PAGE_PARAM: &str = "page";

/// Raw markup of one successfully fetched result page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Index of the page that was requested
    pub page_index: u32,

    /// HTTP status code of the response
    pub status_code: u16,

    /// Response body
    pub body: String,
}

/// Classified result of a page fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was fetched
    Page(RawPage),

    /// The site answered HTTP 404: there are no further pages
    EndOfResults,

    /// Any other non-success status or transport failure
    Failed(FetchFailure),
}

/// Fetches one result page for a set of search parameters
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page with the given index
    ///
    /// `params` are the search parameters without `page`; implementations
    /// add it themselves.
    async fn fetch(&self, params: &[(String, String)], page_index: u32) -> FetchOutcome;
}

/// Builds an HTTP client with the configured timeouts
///
/// No default User-Agent is set on the client; every request carries its own.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher backed by `reqwest`
pub struct HttpPageFetcher {
    client: Client,
    base_url: String,
    identity: Box<dyn IdentityProvider>,
    fallback_identity: String,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the given search endpoint
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        identity: Box<dyn IdentityProvider>,
        fallback_identity: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            identity,
            fallback_identity: fallback_identity.into(),
        }
    }

    /// Resolves the identity for the next request
    fn next_identity(&self) -> String {
        match self.identity.next_identity() {
            Some(identity) => identity,
            None => {
                tracing::warn!(
                    "Identity provider returned no user agent, using fallback identity"
                );
                self.fallback_identity.clone()
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    /// Fetches one page
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | HTTP 2xx | `Page` |
    /// | HTTP 404 | `EndOfResults` |
    /// | Other status | `Failed(Status)` |
    /// | Timeout / connect / body error | `Failed(Transport)` |
    async fn fetch(&self, params: &[(String, String)], page_index: u32) -> FetchOutcome {
        let query = with_page(params, page_index);
        let identity = self.next_identity();

        tracing::trace!("GET {} page={} as '{}'", self.base_url, page_index, identity);

        let response = match self
            .client
            .get(&self.base_url)
            .header(USER_AGENT, identity)
            .query(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(classify_transport_error(&e)),
        };

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::EndOfResults;
        }

        if !status.is_success() {
            return FetchOutcome::Failed(FetchFailure::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Page(RawPage {
                page_index,
                status_code: status.as_u16(),
                body,
            }),
            Err(e) => FetchOutcome::Failed(classify_transport_error(&e)),
        }
    }
}

/// Copies the search parameters and sets `page` to the given index
fn with_page(params: &[(String, String)], page_index: u32) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = params
        .iter()
        .filter(|(key, _)| key != PAGE_PARAM)
        .cloned()
        .collect();
    query.push((PAGE_PARAM.to_string(), page_index.to_string()));
    query
}

fn classify_transport_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Transport("request timeout".to_string())
    } else if error.is_connect() {
        FetchFailure::Transport(format!("connection failed: {}", error))
    } else {
        FetchFailure::Transport(error.to_string())
    }
}
