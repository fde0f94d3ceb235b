use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use serde_this_or_that::as_f64;

use super::{cache::GeocodeCache, rate_limiter::RateLimiter};
use crate::{config::Config, models::listing::Coordinates};

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(deserialize_with = "as_f64")]
    lat: f64,
    #[serde(deserialize_with = "as_f64")]
    lon: f64,
}

/// OpenStreetMap Nominatim search, rate limited and persistently cached.
#[derive(Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    search_url: String,
    limiter: RateLimiter,
    cache: GeocodeCache,
}

impl Nominatim {
    pub fn new(config: &Config) -> Result<Nominatim> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.geocoder_timeout_seconds))
            .build()
            .context("Failed to build geocoder HTTP client")?;

        let cache = GeocodeCache::load(&config.geocode_cache_path)?;
        info!("Geocode cache holds {} addresses", cache.len());

        Ok(Nominatim {
            client,
            search_url: format!("{}/search", config.geocoder_url.trim_end_matches('/')),
            limiter: RateLimiter::new(
                config.geocoder_rate_limit_calls,
                Duration::from_secs(config.geocoder_rate_limit_seconds),
            ),
            cache,
        })
    }

    /// Looks up an address. `Ok(None)` means the service knows no such place.
    pub async fn get_coordinates(&mut self, address: &str) -> Result<Option<Coordinates>> {
        if let Some(cached) = self.cache.get(address) {
            debug!("Cache hit for '{}'", address);
            return Ok(*cached);
        }

        self.limiter.wait().await;

        let params: Vec<(&str, &str)> = vec![("q", address), ("format", "json"), ("limit", "1")];
        let places: Vec<Place> = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{}' failed", address))?
            .error_for_status()
            .with_context(|| format!("Geocoder rejected '{}'", address))?
            .json()
            .await
            .with_context(|| format!("Invalid geocoder response for '{}'", address))?;

        let coordinates = places.first().map(|place| Coordinates {
            latitude: place.lat,
            longitude: place.lon,
        });

        self.cache.insert(address.to_string(), coordinates)?;
        Ok(coordinates)
    }

    pub fn cache(&self) -> &GeocodeCache {
        &self.cache
    }
}
