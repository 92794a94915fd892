pub mod bg;
pub mod traits;
pub mod types;
pub mod uk;

pub use bg::BgSite;
pub use traits::SiteAdapter;
pub use types::{PageCursor, Pagination, TableShape};
pub use uk::UkSite;

use crate::config::{Config, SiteKind};
use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Build the adapter for a configured site
pub fn build_site(kind: SiteKind, config: &Config) -> Result<Box<dyn SiteAdapter>> {
    let site: Box<dyn SiteAdapter> = match kind {
        SiteKind::Uk => Box::new(UkSite::new(&config.uk_base_url)?),
        SiteKind::Bg => Box::new(BgSite::new(&config.bg_base_url)?),
    };
    Ok(site)
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {:?}", css, e))
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first match, if any
pub(crate) fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

pub(crate) fn all_text(document: &Html, selector: &Selector) -> Vec<String> {
    document.select(selector).map(element_text).collect()
}

/// `src` of every image, relevant or not
pub(crate) fn image_sources(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect()
}
