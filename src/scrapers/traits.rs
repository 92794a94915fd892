use crate::models::{Country, PropertyRecord};
use crate::scrapers::types::{Pagination, TableShape};
use scraper::Html;

/// Common trait for all listing sites.
/// Each adapter owns its URLs, selectors, price rules and target table; the
/// crawler owns fetching and the loop.
pub trait SiteAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn country(&self) -> Country;

    fn pagination(&self) -> Pagination;

    /// URL of the listing page at `position` (an offset or an index,
    /// depending on `pagination`)
    fn listing_url(&self, position: usize) -> String;

    /// Absolute detail-page URLs found on a listing page
    fn extract_listing_links(&self, document: &Html) -> Vec<String>;

    /// Pull every field the detail page offers; absent nodes leave the
    /// field unset.
    fn extract_detail(&self, document: &Html, url: &str) -> PropertyRecord;

    /// Derive the per-period price slots from the raw price text.
    fn parse_price(&self, record: &mut PropertyRecord);

    fn table(&self) -> TableShape;
}
