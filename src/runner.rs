//! One tracking run across every configured source, and the loop that
//! repeats it.

use crate::config::{SearchSpec, Settings};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::models::Listing;
use crate::notifier::Notifier;
use crate::pipeline;
use crate::scrapers::ExtractorRegistry;
use crate::store::SeenStore;
use std::future::Future;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, info_span, warn, Instrument};

/// Outcome of a single run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Searches that were fetched and processed
    pub searches: usize,
    /// New matching listings across all searches, in configuration order
    pub matched: Vec<Listing>,
    /// Whether a digest went out for `matched`
    pub notified: bool,
}

pub struct Tracker<'a, S, F, N> {
    settings: &'a Settings,
    store: S,
    fetcher: F,
    extractors: ExtractorRegistry,
    notifier: N,
}

impl<'a, S, F, N> Tracker<'a, S, F, N>
where
    S: SeenStore,
    F: PageFetcher,
    N: Notifier,
{
    pub fn new(
        settings: &'a Settings,
        store: S,
        fetcher: F,
        extractors: ExtractorRegistry,
        notifier: N,
    ) -> Self {
        Self {
            settings,
            store,
            fetcher,
            extractors,
            notifier,
        }
    }

    /// Scrape, dedup and match every enabled search, then send one digest.
    ///
    /// Fetch and parse failures only empty the affected search. A storage
    /// failure aborts the run; listings already recorded stay recorded.
    pub async fn run_once(&mut self) -> Result<RunSummary> {
        let settings = self.settings;
        let mut summary = RunSummary::default();

        for (source_name, source) in &settings.sources {
            if !source.enabled {
                info!("Skipping disabled source: {}", source_name);
                continue;
            }

            if self.extractors.get(source_name).is_none() {
                warn!("Unknown source: {}", source_name);
                continue;
            }

            for search in &source.urls {
                let span = info_span!("search", source = %source_name, search = %search.name);
                let Some(matched) = self.process_search(source_name, search).instrument(span).await?
                else {
                    continue;
                };

                summary.searches += 1;
                summary.matched.extend(matched);
            }
        }

        summary.notified = self.send_digest(&summary.matched).await?;

        info!(
            searches = summary.searches,
            matched = summary.matched.len(),
            notified = summary.notified,
            "Completed tracking run"
        );

        Ok(summary)
    }

    /// `None` when the search was skipped for lack of a URL
    async fn process_search(
        &mut self,
        source_name: &str,
        search: &SearchSpec,
    ) -> Result<Option<Vec<Listing>>> {
        let Some(url) = search.url.as_deref() else {
            warn!("Missing URL for search {}", search.name);
            return Ok(None);
        };

        info!("Processing {} search: {}", source_name, search.name);

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Fetch failed, treating search as empty");
                return Ok(Some(Vec::new()));
            }
        };

        let Some(extractor) = self.extractors.get(source_name) else {
            return Ok(Some(Vec::new()));
        };

        let raw = match extractor.extract(&html) {
            Ok(listings) => listings,
            Err(e) => {
                warn!(error = %e, "Extraction failed, site structure may have changed");
                return Ok(Some(Vec::new()));
            }
        };

        info!("Found {} total ads", raw.len());
        pipeline::process(&mut self.store, source_name, search, raw).map(Some)
    }

    /// Returns whether a digest was delivered
    async fn send_digest(&mut self, matched: &[Listing]) -> Result<bool> {
        if matched.is_empty() {
            return Ok(false);
        }

        if !self.settings.email.enabled {
            info!("Email disabled, {} matching ads not sent", matched.len());
            return Ok(false);
        }

        match self.notifier.notify(matched).await {
            Ok(()) => {
                let ids: Vec<&str> = matched.iter().map(|l| l.id.as_str()).collect();
                self.store.record_notification(&ids)?;
                Ok(true)
            }
            Err(e) => {
                let ids: Vec<&str> = matched.iter().map(|l| l.id.as_str()).collect();
                error!(error = %e, ?ids, "Failed to send email notification, ads stay marked as seen");
                Ok(false)
            }
        }
    }

    /// Run now, then once per configured interval until `shutdown` resolves.
    ///
    /// A failed run is logged and the next tick proceeds as usual. Shutdown is
    /// only observed between runs, so a run in progress always finishes.
    pub async fn run_forever(&mut self, shutdown: impl Future<Output = ()>) {
        let interval = self.settings.schedule.interval();
        info!(
            "Setting up schedule to run every {} hours",
            self.settings.schedule.interval_hours
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping Ad Tracker");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "Error in tracker run, waiting for next tick");
                    }
                }
            }
        }
    }
}
