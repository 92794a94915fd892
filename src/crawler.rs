use crate::fetch::{Page, PageSource};
use crate::logging::{Event, RunSummary, Telemetry};
use crate::models::PropertyRecord;
use crate::postprocess::{post_process, Geocode};
use crate::scrapers::SiteAdapter;
use crate::storage::RecordSink;
use chrono::Utc;
use tracing::{error, info, info_span, warn, Instrument};

const COUNTED: [Event; 5] = [
    Event::PageVisited,
    Event::PageSkipped,
    Event::RecordInserted,
    Event::RecordDropped,
    Event::GeocodeMiss,
];

/// Walks one site's listing pages and pushes every detail page through
/// extraction, post-processing and the sink, strictly one at a time.
pub struct Crawler<'a> {
    site: &'a dyn SiteAdapter,
    source: &'a dyn PageSource,
    geocoder: &'a dyn Geocode,
    sink: &'a dyn RecordSink,
    telemetry: &'a Telemetry,
    max_pages: Option<usize>,
}

impl<'a> Crawler<'a> {
    pub fn new(
        site: &'a dyn SiteAdapter,
        source: &'a dyn PageSource,
        geocoder: &'a dyn Geocode,
        sink: &'a dyn RecordSink,
        telemetry: &'a Telemetry,
    ) -> Self {
        Self {
            site,
            source,
            geocoder,
            sink,
            telemetry,
            max_pages: None,
        }
    }

    /// Stop after `max_pages` listing pages even if the site never signals
    /// its last page. `None` keeps the loop unbounded.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub async fn run(&self) -> RunSummary {
        let span = info_span!("crawl", site = self.site.name());
        self.crawl().instrument(span).await
    }

    async fn crawl(&self) -> RunSummary {
        let started_at = Utc::now();
        let baseline = COUNTED.map(|event| self.telemetry.count(event));

        let pagination = self.site.pagination();
        let mut cursor = pagination.cursor();
        let mut pages = 0;

        info!("Starting crawl of {}", self.site.name());

        loop {
            if let Some(max) = self.max_pages {
                if pages >= max {
                    warn!("Stopping after {} listing pages without an end signal", max);
                    break;
                }
            }

            let url = self.site.listing_url(cursor.current());
            info!("Fetching listing page {}", url);
            let page = self.source.fetch(&url).await;
            pages += 1;

            let links = match &page {
                Some(page) => {
                    self.telemetry.record(Event::PageVisited);
                    self.listing_links(page)
                }
                None => {
                    self.telemetry.record(Event::PageSkipped);
                    Vec::new()
                }
            };
            info!("Found {} listing links", links.len());

            for link in &links {
                self.process_listing(link).await;
            }

            let body = page.as_ref().map(|p| p.body.as_str());
            if pagination.is_last_page(body, links.len()) {
                info!("Reached the last listing page");
                break;
            }
            cursor.advance();
        }

        let counts = COUNTED.map(|event| self.telemetry.count(event));
        let delta = |i: usize| counts[i] - baseline[i];
        let summary = RunSummary {
            site: self.site.name(),
            started_at,
            finished_at: Utc::now(),
            pages_visited: delta(0),
            pages_skipped: delta(1),
            records_inserted: delta(2),
            records_dropped: delta(3),
            geocode_misses: delta(4),
        };
        summary.log();
        summary
    }

    fn listing_links(&self, page: &Page) -> Vec<String> {
        let document = page.document();
        self.site.extract_listing_links(&document)
    }

    fn extract(&self, page: &Page) -> PropertyRecord {
        let document = page.document();
        self.site.extract_detail(&document, &page.url)
    }

    /// Fetch, extract, post-process and store a single listing.
    async fn process_listing(&self, url: &str) {
        let Some(page) = self.source.fetch(url).await else {
            self.telemetry.record(Event::PageSkipped);
            return;
        };
        self.telemetry.record(Event::PageVisited);

        let mut record = self.extract(&page);
        if !post_process(self.site, self.geocoder, &mut record).await {
            self.telemetry.record(Event::GeocodeMiss);
        }

        match self.sink.insert(&record).await {
            Ok(()) => {
                self.telemetry.record(Event::RecordInserted);
                info!("Saved '{}' from {}", record.title_text(), url);
            }
            Err(e) => {
                self.telemetry.record(Event::RecordDropped);
                error!("Failed to insert record from {}: {:#}", url, e);
            }
        }
    }
}
