extern crate diesel;

pub mod cli;
pub mod config;
pub mod db;
pub mod export;
pub mod geocoding;
pub mod immoscout;
pub mod logger;
pub mod models;
pub mod producer;
pub mod shutdown;

pub use producer::scrape_producer::{RunSummary, ScrapeProducer};
