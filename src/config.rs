use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::{export::heatmap::HeatmapSettings, immoscout::immoscout::PAGE_PLACEHOLDER};

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

const SEARCH_URL: &str =
    "https://www.immobilienscout24.de/Suche/S-T/Wohnung-Miete/Baden-Wuerttemberg/Karlsruhe";
const PAGE_URL: &str = "https://www.immobilienscout24.de/Suche/S-T/P-{page}/Wohnung-Miete/Baden-Wuerttemberg/Karlsruhe?pagerReporting=true";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub json_path: PathBuf,
    pub heatmap_path: PathBuf,
    pub log_path: PathBuf,
    pub geocode_cache_path: PathBuf,
    pub city: String,
    pub search_url: String,
    pub page_url: String,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub page_delay_ms: u64,
    pub page_delay_jitter_ms: u64,
    pub max_pages: Option<usize>,
    pub geocoder_url: String,
    pub geocoder_timeout_seconds: u64,
    pub geocoder_rate_limit_calls: usize,
    pub geocoder_rate_limit_seconds: u64,
    pub heatmap: HeatmapConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub enabled: bool,
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub width: u32,
    pub height: u32,
    pub radius: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("listings.sqlite"),
            json_path: PathBuf::from("listings.json"),
            heatmap_path: PathBuf::from("heatmap.png"),
            log_path: PathBuf::from("scrape.log"),
            geocode_cache_path: PathBuf::from("address_location_cache.json"),
            city: "Karlsruhe".to_string(),
            search_url: SEARCH_URL.to_string(),
            page_url: PAGE_URL.to_string(),
            user_agent: format!("rentmap/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_seconds: 30,
            page_delay_ms: 0,
            page_delay_jitter_ms: 0,
            max_pages: None,
            geocoder_url: NOMINATIM_URL.to_string(),
            geocoder_timeout_seconds: 5,
            geocoder_rate_limit_calls: 1,
            geocoder_rate_limit_seconds: 1,
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            enabled: true,
            west: 8.28,
            south: 48.92,
            east: 8.53,
            north: 49.08,
            width: 250,
            height: 160,
            radius: 0.01,
        }
    }
}

impl HeatmapConfig {
    pub fn settings(&self) -> HeatmapSettings {
        HeatmapSettings {
            west: self.west,
            south: self.south,
            east: self.east,
            north: self.north,
            width: self.width,
            height: self.height,
            radius: self.radius,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.page_url.contains(PAGE_PLACEHOLDER) {
            bail!("page_url must contain a {} placeholder", PAGE_PLACEHOLDER);
        }
        if self.max_pages == Some(0) {
            bail!("max_pages must be at least 1");
        }
        if self.heatmap.enabled {
            let h = &self.heatmap;
            if h.west >= h.east || h.south >= h.north {
                bail!("heatmap area is empty");
            }
            if h.width == 0 || h.height == 0 || h.radius <= 0.0 {
                bail!("heatmap width, height and radius must be positive");
            }
        }
        Ok(())
    }
}

pub fn create_test_config() -> Config {
    Config {
        db_path: PathBuf::from("test_listings.sqlite"),
        json_path: PathBuf::from("test_listings.json"),
        heatmap_path: PathBuf::from("test_heatmap.png"),
        log_path: PathBuf::from("test_scrape.log"),
        geocode_cache_path: PathBuf::from("test_cache.json"),
        search_url: "http://127.0.0.1:3000/Suche/Karlsruhe".to_string(),
        page_url: "http://127.0.0.1:3000/Suche/P-{page}/Karlsruhe".to_string(),
        geocoder_url: "http://127.0.0.1:3000".to_string(),
        request_timeout_seconds: 5,
        geocoder_rate_limit_calls: 100,
        ..Config::default()
    }
}

/// Reads the config from `path`, or from the file named by `CONFIG_PATH`.
///
/// Falls back to the built-in defaults when neither is given. The result is
/// not validated yet, command line overrides still have to be applied.
pub fn read_config(path: Option<&Path>) -> Result<Config> {
    dotenv().ok();

    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
    };

    let config = match config_path {
        Some(config_path) => {
            let contents = std::fs::read_to_string(&config_path).with_context(|| {
                format!("failed to read config {}", config_path.display())
            })?;
            parse_config(&contents)
                .with_context(|| format!("failed to parse config {}", config_path.display()))?
        }
        None => Config::default(),
    };

    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}
