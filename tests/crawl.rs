use anyhow::{bail, Result};
use async_trait::async_trait;
use estate_scraper::error::GeocodeError;
use estate_scraper::fetch::{Page, PageSource};
use estate_scraper::logging::{Event, Telemetry};
use estate_scraper::models::{decode_list, Coordinates, Country, PropertyRecord};
use estate_scraper::postprocess::Geocode;
use estate_scraper::scrapers::{BgSite, UkSite};
use estate_scraper::storage::RecordSink;
use estate_scraper::Crawler;
use std::collections::HashMap;
use std::sync::Mutex;

const UK_BASE: &str = "https://www.rightmove.co.uk/property-to-rent/find.html?locationIdentifier=TEST";
const BG_BASE: &str = "https://www.imot.bg/obiavi/naemi/test";

/// Serves canned bodies and remembers every requested URL
#[derive(Default)]
struct FakeSite {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl FakeSite {
    fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for FakeSite {
    async fn fetch(&self, url: &str) -> Option<Page> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages.get(url).map(|body| Page::new(url, body.as_str()))
    }
}

/// Resolves every address except those containing "nowhere"
struct FakeGeocoder;

#[async_trait]
impl Geocode for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        if address.contains("nowhere") {
            return Err(GeocodeError::Status("ZERO_RESULTS".into()));
        }
        Ok(Coordinates {
            latitude: 51.5,
            longitude: -0.1,
        })
    }
}

/// Keeps inserted records; rejects titles containing "reject"
#[derive(Default)]
struct MemorySink {
    rows: Mutex<Vec<PropertyRecord>>,
}

impl MemorySink {
    fn rows(&self) -> Vec<PropertyRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn insert(&self, record: &PropertyRecord) -> Result<()> {
        if record.title_text().contains("reject") {
            bail!("duplicate entry");
        }
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn uk_listing(ids: &[u32], last: bool) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        html.push_str(&format!(
            r#"<a class="propertyCard-link" href="/properties/{}">card</a>"#,
            id
        ));
    }
    if last {
        html.push_str("<p>There are no more properties to show</p>");
    }
    html.push_str("</body></html>");
    html
}

/// Rightmove's first `h1` is the title, so a page without a title has no
/// address heading either.
fn uk_detail(title: Option<&str>, address: &str) -> String {
    let headings = title
        .map(|t| format!(r#"<h1>{}</h1><h1 itemprop="streetAddress">{}</h1>"#, t, address))
        .unwrap_or_default();
    format!(
        r#"<html><body>{}
            <div class="_1gfnqJ3Vtd1z40MlC0MzXu">£1,200 pcm £280 pw</div>
            <li class="lIhZ24u1NHMa5Y6gDH90A">Garden</li>
            <img src="https://media.rightmove.co.uk/x/IMG_01.jpeg">
            <img src="https://media.rightmove.co.uk/x/branch_logo_9.png">
        </body></html>"#,
        headings
    )
}

fn uk_url(offset: usize) -> String {
    format!("{}&index={}", UK_BASE, offset)
}

#[tokio::test]
async fn offset_crawl_stops_on_marker_page() {
    let source = FakeSite::default()
        .page(&uk_url(0), &uk_listing(&[1, 2], false))
        .page(&uk_url(24), &uk_listing(&[3], false))
        .page(&uk_url(48), &uk_listing(&[4], true))
        .page(&uk_url(72), &uk_listing(&[5], false))
        .page("https://www.rightmove.co.uk/properties/1", &uk_detail(Some("One"), "1 High St"))
        .page("https://www.rightmove.co.uk/properties/2", &uk_detail(Some("Two"), "2 High St"))
        .page("https://www.rightmove.co.uk/properties/3", &uk_detail(Some("Three"), "3 High St"))
        .page("https://www.rightmove.co.uk/properties/4", &uk_detail(Some("Four"), "4 High St"));

    let site = UkSite::new(UK_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();

    let summary = Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    let rows = sink.rows();
    let titles: Vec<&str> = rows.iter().map(|r| r.title_text()).collect();
    assert_eq!(titles, vec!["One", "Two", "Three", "Four"]);
    assert!(!source.requested().contains(&uk_url(72)));

    assert_eq!(summary.records_inserted, 4);
    assert_eq!(summary.pages_visited, 3 + 4);
}

#[tokio::test]
async fn records_are_post_processed_in_order() {
    let source = FakeSite::default()
        .page(&uk_url(0), &uk_listing(&[1], true))
        .page("https://www.rightmove.co.uk/properties/1", &uk_detail(Some("Flat"), "1 High St"));

    let site = UkSite::new(UK_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    let rows = sink.rows();
    let record = &rows[0];
    assert_eq!(record.price_per_month.as_deref(), Some("1,200"));
    assert_eq!(record.price_per_week.as_deref(), Some("280"));
    assert_eq!(record.images.len(), 2);
    assert_eq!(
        record.right_images,
        vec!["https://media.rightmove.co.uk/x/IMG_01.jpeg".to_string()]
    );
    assert_eq!(
        decode_list(&record.to_row().right_image_url).unwrap(),
        record.right_images
    );
    assert_eq!(
        record.coordinates,
        Some(Coordinates {
            latitude: 51.5,
            longitude: -0.1
        })
    );
}

#[tokio::test]
async fn per_record_failures_never_stop_the_crawl() {
    let source = FakeSite::default()
        .page(&uk_url(0), &uk_listing(&[1, 2, 3, 4], true))
        // 1 has no title, 2 fails to geocode, 3 is rejected by the sink, 4 is unreachable
        .page("https://www.rightmove.co.uk/properties/1", &uk_detail(None, "1 High St"))
        .page("https://www.rightmove.co.uk/properties/2", &uk_detail(Some("Lost"), "nowhere"))
        .page(
            "https://www.rightmove.co.uk/properties/3",
            &uk_detail(Some("reject me"), "3 High St"),
        );

    let site = UkSite::new(UK_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    let summary = Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    let rows = sink.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].title_text(), "Title Not Found");
    assert_eq!(rows[0].address_text(), "Address Not Found");
    assert_eq!(rows[0].price_per_month.as_deref(), Some("1,200"));
    assert_eq!(rows[0].right_images.len(), 1);
    assert_eq!(rows[0].coordinates, None);
    assert_eq!(rows[1].title_text(), "Lost");
    assert_eq!(rows[1].coordinates, None);

    assert_eq!(summary.records_inserted, 2);
    assert_eq!(summary.records_dropped, 1);
    assert_eq!(summary.geocode_misses, 2);
    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(telemetry.count(Event::RecordDropped), 1);
}

#[tokio::test]
async fn failed_offset_page_is_skipped_and_crawl_continues() {
    let source = FakeSite::default()
        .page(&uk_url(24), &uk_listing(&[7], true))
        .page("https://www.rightmove.co.uk/properties/7", &uk_detail(Some("Seven"), "7 High St"));

    let site = UkSite::new(UK_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    let summary = Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    assert_eq!(sink.rows().len(), 1);
    assert_eq!(summary.pages_skipped, 1);
}

#[tokio::test]
async fn max_pages_caps_an_endless_listing() {
    // No page ever carries the end marker
    let mut source = FakeSite::default();
    for page in 0..10 {
        source = source.page(&uk_url(page * 24), &uk_listing(&[], false));
    }

    let site = UkSite::new(UK_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .with_max_pages(Some(3))
        .run()
        .await;

    assert_eq!(source.requested(), vec![uk_url(0), uk_url(24), uk_url(48)]);
}

fn bg_listing(ids: &[&str]) -> String {
    ids.iter()
        .map(|id| format!(r#"<a class="listing-link" href="/obiava/{}">обява</a>"#, id))
        .collect()
}

fn bg_detail(title: &str, price: &str) -> String {
    format!(
        r#"<h1>{}</h1>
           <div class="price">{}</div>
           <div class="location">гр. София</div>
           <div class="features">Обзаведен, Асансьор</div>
           <img src="https://cdn.imot.bg/p/1.jpg">"#,
        title, price
    )
}

#[tokio::test]
async fn index_crawl_stops_on_first_empty_page() {
    let source = FakeSite::default()
        .page(BG_BASE, &bg_listing(&["a1", "a2"]))
        .page(&format!("{}/p-2", BG_BASE), &bg_listing(&["b1"]))
        .page(&format!("{}/p-3", BG_BASE), "<p>Няма резултати</p>")
        .page(&format!("{}/p-4", BG_BASE), &bg_listing(&["d1"]))
        .page("https://www.imot.bg/obiava/a1", &bg_detail("Едностаен", "450 EUR на месец"))
        .page("https://www.imot.bg/obiava/a2", &bg_detail("Двустаен", "800 - 1 000 EUR"))
        .page("https://www.imot.bg/obiava/b1", &bg_detail("Тристаен", "1 200 EUR"));

    let site = BgSite::new(BG_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    let summary = Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    let rows = sink.rows();
    let prices: Vec<Option<&str>> = rows.iter().map(|r| r.price_per_month.as_deref()).collect();
    assert_eq!(prices, vec![Some("450"), Some("900"), Some("1200")]);
    assert!(rows.iter().all(|r| r.country == Country::Bg));
    assert!(rows.iter().all(|r| r.to_row().country == "BG"));

    assert!(!source.requested().contains(&format!("{}/p-4", BG_BASE)));
    assert_eq!(summary.records_inserted, 3);
}

#[tokio::test]
async fn index_crawl_stops_when_a_listing_page_is_unreachable() {
    let source = FakeSite::default();

    let site = BgSite::new(BG_BASE).unwrap();
    let sink = MemorySink::default();
    let telemetry = Telemetry::silent();
    let summary = Crawler::new(&site, &source, &FakeGeocoder, &sink, &telemetry)
        .run()
        .await;

    assert_eq!(source.requested(), vec![BG_BASE.to_string()]);
    assert_eq!(summary.pages_skipped, 1);
    assert!(sink.rows().is_empty());
}
