use crate::models::{Country, KeyFeatures, PropertyRecord};
use crate::postprocess::price::{format_amount, parse_bg_price};
use crate::scrapers::traits::SiteAdapter;
use crate::scrapers::types::{Pagination, TableShape};
use crate::scrapers::{first_text, image_sources, selector};
use anyhow::{Context, Result};
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Bulgarian rentals portal
pub struct BgSite {
    base_url: Url,
    listing_link: Selector,
    title: Selector,
    price: Selector,
    address: Selector,
    features: Selector,
    description: Selector,
    images: Selector,
}

impl BgSite {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid BG base URL: {}", base_url))?;

        Ok(Self {
            base_url,
            listing_link: selector("a.listing-link[href]")?,
            title: selector("h1")?,
            price: selector("div.price")?,
            address: selector("div.location")?,
            features: selector("div.features")?,
            description: selector("div.description")?,
            images: selector("img[src]")?,
        })
    }
}

impl SiteAdapter for BgSite {
    fn name(&self) -> &'static str {
        "Imot.bg"
    }

    fn country(&self) -> Country {
        Country::Bg
    }

    fn pagination(&self) -> Pagination {
        Pagination::Index
    }

    /// Page 0 is the bare base URL; later pages are `/p-2`, `/p-3`, ...
    fn listing_url(&self, position: usize) -> String {
        let base = self.base_url.as_str();
        if position == 0 {
            base.to_string()
        } else {
            format!("{}/p-{}", base.trim_end_matches('/'), position + 1)
        }
    }

    fn extract_listing_links(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.listing_link)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| match self.base_url.join(href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!("Skipping unusable link '{}': {}", href, e);
                    None
                }
            })
            .collect()
    }

    fn extract_detail(&self, document: &Html, url: &str) -> PropertyRecord {
        let mut record = PropertyRecord::new(url, self.country());
        record.title = first_text(document, &self.title);
        record.price = first_text(document, &self.price);
        record.address = first_text(document, &self.address);
        if let Some(features) = first_text(document, &self.features) {
            record.key_features = KeyFeatures::Delimited(features);
        }
        record.description = first_text(document, &self.description);
        record.images = image_sources(document, &self.images);

        debug!(
            "Extracted '{}' with {} images from {}",
            record.title_text(),
            record.images.len(),
            url
        );
        record
    }

    /// Only a monthly figure is derived; the weekly slot stays empty.
    fn parse_price(&self, record: &mut PropertyRecord) {
        if let Some(amount) = record.price.as_deref().and_then(parse_bg_price) {
            record.price_per_month = Some(format_amount(amount));
        }
    }

    fn table(&self) -> TableShape {
        TableShape {
            name: "properties_bg",
            with_country: true,
        }
    }
}
