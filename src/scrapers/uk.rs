use crate::models::{Country, KeyFeatures, PropertyRecord};
use crate::postprocess::price::parse_uk_price;
use crate::scrapers::traits::SiteAdapter;
use crate::scrapers::types::{Pagination, TableShape};
use crate::scrapers::{all_text, first_text, image_sources, selector};
use anyhow::Result;
use scraper::{Html, Selector};
use tracing::debug;

pub const SITE_HOST: &str = "https://www.rightmove.co.uk";
pub const PAGE_SIZE: usize = 24;
pub const END_MARKER: &str = "There are no more properties to show";

/// Rightmove rentals
pub struct UkSite {
    base_url: String,
    card_link: Selector,
    title: Selector,
    price: Selector,
    address: Selector,
    features: Selector,
    description: Selector,
    images: Selector,
}

impl UkSite {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into(),
            card_link: selector("a.propertyCard-link")?,
            title: selector("h1")?,
            price: selector("div._1gfnqJ3Vtd1z40MlC0MzXu")?,
            address: selector(r#"h1[itemprop="streetAddress"]"#)?,
            features: selector("li.lIhZ24u1NHMa5Y6gDH90A")?,
            description: selector("div.STw8udCxUaBUMfOOZu0iL._3nPVwR0HZYQah5tkVJHFh5")?,
            images: selector("img[src]")?,
        })
    }
}

impl SiteAdapter for UkSite {
    fn name(&self) -> &'static str {
        "Rightmove"
    }

    fn country(&self) -> Country {
        Country::Uk
    }

    fn pagination(&self) -> Pagination {
        Pagination::Offset {
            step: PAGE_SIZE,
            end_marker: END_MARKER,
        }
    }

    fn listing_url(&self, position: usize) -> String {
        format!("{}&index={}", self.base_url, position)
    }

    fn extract_listing_links(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.card_link)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| href.contains("properties"))
            .map(|href| format!("{}{}", SITE_HOST, href))
            .collect()
    }

    fn extract_detail(&self, document: &Html, url: &str) -> PropertyRecord {
        let mut record = PropertyRecord::new(url, self.country());
        record.title = first_text(document, &self.title);
        record.price = first_text(document, &self.price);
        record.address = first_text(document, &self.address);
        record.key_features = KeyFeatures::List(all_text(document, &self.features));
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

    fn parse_price(&self, record: &mut PropertyRecord) {
        let Some(price) = record.price.as_deref() else {
            return;
        };
        if let Some((month, week)) = parse_uk_price(price) {
            record.price_per_month = Some(month);
            record.price_per_week = Some(week);
        }
    }

    fn table(&self) -> TableShape {
        TableShape {
            name: "properties2",
            with_country: false,
        }
    }
}
