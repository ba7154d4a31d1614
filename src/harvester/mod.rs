//! Harvester module for collecting listing snapshots
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of result pages with identity rotation
//! - Listing extraction from page markup
//! - The pagination loop and its state machine
//! - Handing the finished snapshot to the store

mod controller;
mod fetcher;
mod identity;
mod parser;

pub use controller::{PaginationController, PaginationOutcome, PaginationSettings};
pub use fetcher::{build_http_client, FetchOutcome, HttpPageFetcher, PageFetcher, RawPage, PAGE_PARAM};
pub use identity::{IdentityProvider, UserAgentPool};
pub use parser::{extract_records, ExtractionFault, ListingRecord, RequiredField, NOT_SPECIFIED};

use crate::config::Config;
use crate::query::{SearchQuery, SearchRequest};
use crate::state::Termination;
use crate::storage::SnapshotStore;
use crate::Result;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

/// Summary of one completed harvest run
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Search text the run was started with
    pub query_text: String,

    /// Number of records written to the store
    pub record_count: usize,

    /// Pages successfully fetched, including a final empty page
    pub pages_fetched: u32,

    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Runs harvests against one snapshot store
pub struct Harvester<S: SnapshotStore> {
    config: Config,
    fetcher: Box<dyn PageFetcher>,
    store: S,
}

impl<S: SnapshotStore> Harvester<S> {
    /// Creates a harvester that fetches over HTTP as configured
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config, store: S) -> Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        let pool = UserAgentPool::new(config.fetcher.user_agents.clone());
        let fetcher = HttpPageFetcher::new(
            client,
            config.search.base_url.clone(),
            Box::new(pool),
            config.fetcher.fallback_user_agent.clone(),
        );

        Ok(Self::with_fetcher(config, Box::new(fetcher), store))
    }

    /// Creates a harvester with a custom page fetcher
    pub fn with_fetcher(config: Config, fetcher: Box<dyn PageFetcher>, store: S) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }

    /// The store snapshots are written to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Harvests all pages for `request` and replaces the stored snapshot
    ///
    /// Returns the number of records stored.
    pub async fn run(&self, request: &SearchRequest) -> Result<usize> {
        let report = self
            .run_with_report(request, CancellationToken::new())
            .await?;
        Ok(report.record_count)
    }

    /// Harvests all pages for `request`, stopping early if `cancel` fires
    ///
    /// The request is validated before any page is fetched. The store is
    /// written only when pagination finishes normally; a failed or cancelled
    /// run leaves the previous snapshot in place.
    pub async fn run_with_report(
        &self,
        request: &SearchRequest,
        cancel: CancellationToken,
    ) -> Result<HarvestReport> {
        let query = SearchQuery::from_request(request, self.config.search.area)?;
        let started_at = Utc::now();

        tracing::info!("Starting harvest for \"{}\"", query.text);

        let controller = PaginationController::new(
            self.fetcher.as_ref(),
            PaginationSettings::from(&self.config.pagination),
            cancel,
        );
        let outcome = controller.run(&query.to_params()).await?;

        tracing::info!(
            "Pagination finished ({}) after {} pages with {} listings",
            outcome.termination,
            outcome.pages_fetched,
            outcome.records.len()
        );

        let record_count = self.store.replace(outcome.records)?;

        tracing::info!("Stored snapshot of {} listings", record_count);

        Ok(HarvestReport {
            query_text: query.text,
            record_count,
            pages_fetched: outcome.pages_fetched,
            termination: outcome.termination,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
