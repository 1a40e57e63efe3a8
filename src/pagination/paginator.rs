//! The page loop

use super::types::{PageSink, PageSource, PaginationConfig, PaginationOutcome, PaginationState, StopReason};
use crate::error::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Walks a collection page by page
pub struct Paginator {
    source: Arc<dyn PageSource>,
    config: PaginationConfig,
}

impl Paginator {
    /// Create a paginator with default configuration
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self {
            source,
            config: PaginationConfig::default(),
        }
    }

    /// Set pagination configuration
    #[must_use]
    pub fn with_config(mut self, config: PaginationConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch every page of `album_id`, feeding each one to `sink`
    ///
    /// Requests are strictly sequential. After a page is fetched its items are
    /// appended to the running total and `sink` is awaited; the configured
    /// delay follows only if another page will be requested.
    ///
    /// A failed fetch is not an error here: the loop stops and the outcome
    /// carries `StopReason::FetchFailed` along with everything gathered so
    /// far. A sink error aborts the run and is returned as `Err`.
    pub async fn paginate_all(
        &self,
        album_id: &str,
        sink: &mut dyn PageSink,
    ) -> Result<PaginationOutcome> {
        let start = Instant::now();
        let mut state = PaginationState::new();
        let mut items = Vec::new();

        let stop = loop {
            if state.past_limit(self.config.page_limit) {
                break StopReason::PageLimit;
            }

            info!(
                page = state.page,
                page_size = self.config.page_size,
                "Fetching page"
            );

            let page = match self
                .source
                .fetch_page(album_id, state.cursor.as_deref(), self.config.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!(page = state.page, error = %e, "Fetching page failed, stopping");
                    break StopReason::FetchFailed(e);
                }
            };

            let page_number = state.advance(&page);
            let offset = items.len();
            items.extend(page.items);

            info!(
                page = page_number,
                fetched = items.len() - offset,
                total = items.len(),
                "Fetched page"
            );

            sink.on_page(page_number, &items[offset..]).await?;

            if state.done {
                break StopReason::Exhausted;
            }
            if state.past_limit(self.config.page_limit) {
                break StopReason::PageLimit;
            }

            if !self.config.delay.is_zero() {
                info!(delay_ms = self.config.delay.as_millis() as u64, "Sleeping before next page");
                tokio::time::sleep(self.config.delay).await;
            }
        };

        info!(
            album_id,
            pages = state.pages_fetched(),
            items = items.len(),
            reason = %stop,
            "Pagination finished"
        );

        Ok(PaginationOutcome {
            items,
            pages_fetched: state.pages_fetched(),
            stop,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
