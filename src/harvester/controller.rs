//! Pagination controller - the fetch/extract loop of one harvest run
//!
//! The controller walks result pages strictly in order, starting at page 0:
//! - fetches the page through a `PageFetcher`
//! - extracts its listing records
//! - appends them to the snapshot and moves on to the next page
//!
//! It stops normally on an empty page or HTTP 404 and aborts on any other
//! fetch failure or on a malformed card. Pages are never fetched ahead.

use crate::config::PaginationConfig;
use crate::harvester::fetcher::{FetchOutcome, PageFetcher, RawPage};
use crate::harvester::parser::{extract_records, ListingRecord};
use crate::state::{PaginationState, Termination};
use crate::HarvestError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Limits applied by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationSettings {
    /// Maximum number of pages to fetch, 0 = unlimited
    pub max_pages: u32,

    /// Extra attempts for a failed (non-404) fetch of the same page
    pub retry_attempts: u32,

    /// Pause between attempts
    pub retry_delay: Duration,
}

impl From<&PaginationConfig> for PaginationSettings {
    fn from(config: &PaginationConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Snapshot collected by a run that reached `Done`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOutcome {
    /// Records of all pages, in page order then card order
    pub records: Vec<ListingRecord>,

    /// Number of pages successfully fetched, including the final empty one
    pub pages_fetched: u32,

    pub termination: Termination,
}

/// Drives one pagination run
pub struct PaginationController<'a> {
    fetcher: &'a dyn PageFetcher,
    settings: PaginationSettings,
    cancel: CancellationToken,
    state: PaginationState,
    snapshot: Vec<ListingRecord>,
    pages_fetched: u32,
}

impl<'a> PaginationController<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        settings: PaginationSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            settings,
            cancel,
            state: PaginationState::initial(),
            snapshot: Vec::new(),
            pages_fetched: 0,
        }
    }

    /// Current state of the run
    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Runs the loop to completion
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationOutcome)` - the run reached `Done`
    /// * `Err(HarvestError)` - the run reached `Failed`; nothing collected so
    ///   far is returned
    pub async fn run(mut self, params: &[(String, String)]) -> Result<PaginationOutcome, HarvestError> {
        let mut page_index = 0;

        loop {
            // Fetching(page_index)
            if self.cancel.is_cancelled() {
                tracing::info!("Harvest cancelled before page {}", page_index);
                return Err(self.fail(HarvestError::Cancelled { page: page_index }));
            }

            let outcome = match self.fetch_page(params, page_index).await {
                Some(outcome) => outcome,
                None => {
                    tracing::info!("Harvest cancelled while retrying page {}", page_index);
                    return Err(self.fail(HarvestError::Cancelled { page: page_index }));
                }
            };

            let raw = match outcome {
                FetchOutcome::Page(raw) => raw,
                FetchOutcome::EndOfResults => {
                    tracing::debug!("Page {} not found, end of results", page_index);
                    return self.finish(Termination::EndOfResults);
                }
                FetchOutcome::Failed(cause) => {
                    tracing::warn!("Fetching page {} failed: {}", page_index, cause);
                    return Err(self.fail(HarvestError::FetchFailed {
                        page: page_index,
                        cause,
                    }));
                }
            };
            self.pages_fetched += 1;

            self.advance(PaginationState::Extracting(page_index))?;
            let records = match extract(page_index, &raw) {
                Ok(records) => records,
                Err(error) => return Err(self.fail(error)),
            };

            if records.is_empty() {
                tracing::debug!("Page {} has no listings, end of results", page_index);
                return self.finish(Termination::EmptyPage);
            }

            self.advance(PaginationState::Accumulating(page_index))?;
            tracing::debug!("Page {}: {} listings", page_index, records.len());
            self.snapshot.extend(records);

            let next = match page_index.checked_add(1) {
                Some(next) if !self.page_limit_reached(next) => next,
                _ => {
                    tracing::warn!(
                        "Page limit reached after {} pages, stopping with {} listings",
                        self.pages_fetched,
                        self.snapshot.len()
                    );
                    return self.finish(Termination::PageLimit);
                }
            };

            self.advance(PaginationState::Fetching(next))?;
            page_index = next;
        }
    }

    /// Fetches one page, retrying failures when configured
    ///
    /// Returns `None` if the run is cancelled while waiting for a retry.
    async fn fetch_page(&self, params: &[(String, String)], page_index: u32) -> Option<FetchOutcome> {
        let mut attempt = 0;

        loop {
            let outcome = self.fetcher.fetch(params, page_index).await;

            match outcome {
                FetchOutcome::Failed(ref cause) if attempt < self.settings.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "Page {} fetch failed ({}), retry {}/{}",
                        page_index,
                        cause,
                        attempt,
                        self.settings.retry_attempts
                    );
                }
                other => return Some(other),
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return None,
                _ = tokio::time::sleep(self.settings.retry_delay) => {}
            }
        }
    }

    fn page_limit_reached(&self, next_page: u32) -> bool {
        self.settings.max_pages > 0 && next_page >= self.settings.max_pages
    }

    fn advance(&mut self, next: PaginationState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(&next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("Pagination {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn finish(mut self, termination: Termination) -> Result<PaginationOutcome, HarvestError> {
        self.advance(PaginationState::Done)?;
        Ok(PaginationOutcome {
            records: self.snapshot,
            pages_fetched: self.pages_fetched,
            termination,
        })
    }

    fn fail(&mut self, error: HarvestError) -> HarvestError {
        match self.advance(PaginationState::Failed) {
            Ok(()) => error,
            Err(transition) => transition,
        }
    }
}

fn extract(page_index: u32, raw: &RawPage) -> Result<Vec<ListingRecord>, HarvestError> {
    extract_records(&raw.body).map_err(|fault| HarvestError::Extraction {
        page: page_index,
        fault,
    })
}
