use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;

use crate::config::Config;

pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Client for the ImmobilienScout24 result list of one search.
#[derive(Debug, Clone)]
pub struct Immoscout {
    client: reqwest::Client,
    search_url: String,
    page_url: String,
}

impl Immoscout {
    pub fn new(config: &Config) -> Result<Immoscout> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Immoscout {
            client,
            search_url: config.search_url.clone(),
            page_url: config.page_url.clone(),
        })
    }

    /*
       The first page lives at the plain search URL, later ones are numbered
    */
    pub fn page_url(&self, number: usize) -> String {
        if number <= 1 {
            self.search_url.clone()
        } else {
            self.page_url.replace(PAGE_PLACEHOLDER, &number.to_string())
        }
    }

    /// Downloads a result page and returns its HTML.
    pub async fn get_page(&self, number: usize) -> Result<String> {
        let url = self.page_url(number);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request for result page {} failed", number))?
            .error_for_status()
            .with_context(|| format!("Result page {} returned an error", number))?;

        let html = response
            .text()
            .await
            .with_context(|| format!("Could not read result page {}", number))?;

        Ok(html)
    }
}
