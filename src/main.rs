use estate_scraper::config::Config;
use estate_scraper::fetch::HttpFetcher;
use estate_scraper::logging::Telemetry;
use estate_scraper::postprocess::GoogleGeocoder;
use estate_scraper::scrapers::build_site;
use estate_scraper::storage::MySqlSink;
use estate_scraper::Crawler;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let telemetry = Telemetry::new(&config.log_filter);
    let _guard = telemetry.set_default();

    info!("🏠 Estate Scraper");
    info!("Sites: {:?}", config.sites);

    let fetcher = HttpFetcher::new(&config)?;
    let geocoder = GoogleGeocoder::new(&config.geocode_endpoint, &config.geocode_api_key)?;

    for kind in &config.sites {
        let site = build_site(*kind, &config)?;
        let sink = MySqlSink::new(config.database.connect_options(), site.table());

        Crawler::new(site.as_ref(), &fetcher, &geocoder, &sink, &telemetry)
            .with_max_pages(config.max_pages)
            .run()
            .await;
    }

    info!("✅ All sites done");
    Ok(())
}
