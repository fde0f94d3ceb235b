use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::Result;
use diesel::SqliteConnection;
use log::{info, warn};
use rand::Rng;

use crate::{
    config::Config,
    db,
    export::{heatmap, json},
    geocoding::nominatim::Nominatim,
    immoscout::{immoscout::Immoscout, parser::parse_result_page},
    models::listing::{Coordinates, Listing},
};

/// What a single scrape run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub listings_seen: usize,
    pub new_listings: usize,
    pub geocoded: usize,
    pub exported: usize,
    pub heatmap_written: bool,
}

pub struct ScrapeProducer;

impl ScrapeProducer {
    /// Collects listings, geocodes them and writes the map exports.
    pub async fn run(config: &Arc<Config>, shutdown: Arc<AtomicBool>) -> Result<RunSummary> {
        config.validate()?;
        let start = Instant::now();
        let mut summary = RunSummary::default();

        info!("Using database \"{}\"", config.db_path.display());
        let mut conn = db::establish_connection(&config.db_path)?;

        collect_listings(config, &mut conn, &shutdown, &mut summary).await?;
        summary.geocoded = add_coordinates(config, &mut conn, &shutdown).await?;

        let listings = db::listing::get_exportable(&mut conn)?;

        info!("Exporting data to JSON file \"{}\"", config.json_path.display());
        summary.exported = json::export_to_json(&listings, &config.json_path)?;

        if config.heatmap.enabled {
            info!("Creating heatmap \"{}\"", config.heatmap_path.display());
            summary.heatmap_written = heatmap::create_heatmap(
                &listings,
                &config.heatmap.settings(),
                &config.heatmap_path,
            )?;
        }

        info!(
            "Finished scrape run in {}: {:?}",
            humantime::format_duration(Duration::from_secs(start.elapsed().as_secs())),
            summary
        );
        Ok(summary)
    }
}

async fn collect_listings(
    config: &Config,
    conn: &mut SqliteConnection,
    shutdown: &AtomicBool,
    summary: &mut RunSummary,
) -> Result<()> {
    let immoscout = Immoscout::new(config)?;

    let mut num_pages: Option<usize> = None;
    let mut page_index = 1;
    while num_pages.map_or(true, |n| page_index <= n) {
        if shutdown.load(Ordering::Acquire) {
            warn!("Shutdown requested, stopping before page {}", page_index);
            break;
        }
        if page_index > 1 {
            politeness_delay(config).await;
        }

        info!("Fetching page {}", page_index);
        let html = immoscout.get_page(page_index).await?;
        let page = parse_result_page(&html)?;

        if num_pages.is_none() {
            let pages = page.number_of_pages.unwrap_or_else(|| {
                warn!("Result page has no pager, assuming a single page");
                1
            });
            num_pages = Some(match config.max_pages {
                Some(max) => pages.min(max),
                None => pages,
            });
        }

        let new_count = db::listing::insert_all(conn, &page.listings)?;
        info!(
            "Extracted {} listings ({} new)",
            page.listings.len(),
            new_count
        );

        summary.pages += 1;
        summary.listings_seen += page.listings.len();
        summary.new_listings += new_count;
        page_index += 1;
    }

    Ok(())
}

fn page_delay(config: &Config) -> Duration {
    let jitter = if config.page_delay_jitter_ms > 0 {
        rand::thread_rng().gen_range(0..=config.page_delay_jitter_ms)
    } else {
        0
    };
    Duration::from_millis(config.page_delay_ms + jitter)
}

async fn politeness_delay(config: &Config) {
    let delay = page_delay(config);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

async fn add_coordinates(
    config: &Config,
    conn: &mut SqliteConnection,
    shutdown: &AtomicBool,
) -> Result<usize> {
    info!("Looking up address coordinates (this might take a while)");
    let mut geocoder = Nominatim::new(config)?;

    let listings = db::listing::get_without_coordinates(conn)?;
    let mut updates: Vec<(String, Coordinates)> = Vec::with_capacity(listings.len());

    for listing in listings {
        if shutdown.load(Ordering::Acquire) {
            warn!("Shutdown requested, stopping address lookups");
            break;
        }

        match locate(&mut geocoder, &listing, &config.city).await {
            Ok(coordinates) => updates.push((listing.id, coordinates)),
            // Left without coordinates, so the next run tries again
            Err(e) => warn!("Could not geocode listing {}: {:#}", listing.id, e),
        }
    }

    let updated = db::listing::set_coordinates(conn, &updates)?;
    info!("Updated {} listings with coordinates", updated);
    Ok(updated)
}

async fn locate(geocoder: &mut Nominatim, listing: &Listing, city: &str) -> Result<Coordinates> {
    for candidate in listing.address_candidates(city) {
        if let Some(coordinates) = geocoder.get_coordinates(&candidate).await? {
            return Ok(coordinates);
        }
    }
    Ok(Coordinates::not_found())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::create_test_config;

    #[test]
    fn page_delay_stays_within_jitter() {
        let config = Config {
            page_delay_ms: 100,
            page_delay_jitter_ms: 50,
            ..create_test_config()
        };
        for _ in 0..50 {
            let delay = page_delay(&config);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[tokio::test]
    async fn politeness_delay_waits_between_pages() {
        let config = Config {
            page_delay_ms: 100,
            page_delay_jitter_ms: 50,
            ..create_test_config()
        };
        let start = Instant::now();
        politeness_delay(&config).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn no_delay_configured() {
        let config = create_test_config();
        assert!(page_delay(&config).is_zero());

        let start = Instant::now();
        politeness_delay(&config).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
