use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use sqlx::mysql::MySqlConnectOptions;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
pub const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const UK_BASE_URL: &str = "https://www.rightmove.co.uk/property-to-rent/find.html?locationIdentifier=POSTCODE%5E840076&radius=10.0";
pub const BG_BASE_URL: &str = "https://www.imot.bg/obiavi/naemi/grad-sofiya";

/// Which site adapters a run drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Uk,
    Bg,
}

impl FromStr for SiteKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" => Ok(SiteKind::Uk),
            "bg" => Ok(SiteKind::Bg),
            other => bail!("unknown site '{}', expected 'uk' or 'bg'", other),
        }
    }
}

/// Database connection parameters
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
}

impl DbConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DbConfig,
    pub geocode_api_key: String,
    pub geocode_endpoint: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub log_filter: String,
    pub sites: Vec<SiteKind>,
    /// No cap when unset; the sites' own end signals terminate the crawl.
    pub max_pages: Option<usize>,
    pub uk_base_url: String,
    pub bg_base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenv();

        let sites = parse_sites(&var_or("ESTATE_SITES", "uk,bg"))?;
        let max_pages = match env::var("ESTATE_MAX_PAGES") {
            Ok(raw) => Some(parse_max_pages(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            database: DbConfig {
                user: var_or("DB_USER", "root"),
                password: var_or("DB_PASSWORD", "pass"),
                host: var_or("DB_HOST", "localhost"),
                database: var_or("DB_NAME", "estate_buildings_uk"),
            },
            geocode_api_key: var_or("google_key", "None"),
            geocode_endpoint: GEOCODE_ENDPOINT.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            log_filter: var_or("RUST_LOG", "info"),
            sites,
            max_pages,
            uk_base_url: var_or("UK_BASE_URL", UK_BASE_URL),
            bg_base_url: var_or("BG_BASE_URL", BG_BASE_URL),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_sites(raw: &str) -> Result<Vec<SiteKind>> {
    let sites = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(SiteKind::from_str)
        .collect::<Result<Vec<_>>>()?;

    if sites.is_empty() {
        bail!("ESTATE_SITES selects no sites");
    }
    Ok(sites)
}

fn parse_max_pages(raw: &str) -> Result<usize> {
    let max_pages: usize = raw
        .trim()
        .parse()
        .context("ESTATE_MAX_PAGES must be a positive number")?;
    if max_pages == 0 {
        bail!("ESTATE_MAX_PAGES must be a positive number, got 0");
    }
    Ok(max_pages)
}
