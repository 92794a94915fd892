//! Scrapes rental listings from a UK and a Bulgarian property site, normalizes
//! the fields and stores one row per listing.

pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod models;
pub mod postprocess;
pub mod scrapers;
pub mod storage;

pub use crawler::Crawler;
pub use models::PropertyRecord;
