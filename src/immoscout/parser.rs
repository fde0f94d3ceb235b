use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use log::warn;
use scraper::{ElementRef, Html, Selector};

use super::helpers::{parse_address, parse_german_float};
use crate::models::listing::InsertableListing;

const EXPOSE_PREFIX: &str = "/expose/";

/// Everything extracted from one page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub listings: Vec<InsertableListing>,
    pub number_of_pages: Option<usize>,
}

struct Selectors {
    entry: Selector,
    link: Selector,
    street: Selector,
    value: Selector,
    pager: Selector,
}

impl Selectors {
    fn new() -> Result<Selectors> {
        Ok(Selectors {
            entry: create_selector("div.resultlist_entry_data")?,
            link: create_selector("a[href]")?,
            street: create_selector("span.street")?,
            value: create_selector("dd.value")?,
            pager: create_selector("span.smallPager")?,
        })
    }
}

fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|e| anyhow!("Invalid selector '{}': {:?}", sel_str, e))
}

pub fn parse_result_page(html: &str) -> Result<ResultPage> {
    let selectors = Selectors::new()?;
    let doc = Html::parse_document(html);

    // Keyed by id so a listing repeated on the page is only kept once
    let mut listings: BTreeMap<String, InsertableListing> = BTreeMap::new();
    for entry in doc.select(&selectors.entry) {
        if let Some(listing) = extract_listing(&selectors, entry) {
            listings.insert(listing.id.clone(), listing);
        }
    }

    let number_of_pages = doc
        .select(&selectors.pager)
        .next()
        .and_then(|pager| element_text(pager).split_whitespace().last().map(String::from))
        .and_then(|last| last.parse::<usize>().ok());

    Ok(ResultPage {
        listings: listings.into_values().collect(),
        number_of_pages,
    })
}

fn extract_listing(selectors: &Selectors, entry: ElementRef) -> Option<InsertableListing> {
    let id = entry
        .select(&selectors.link)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.starts_with(EXPOSE_PREFIX))
        .and_then(|href| href.trim_end_matches('/').rsplit('/').next())
        .filter(|id| !id.is_empty())?
        .to_string();

    let address = entry
        .select(&selectors.street)
        .next()
        .and_then(|span| parse_address(&element_text(span)));
    let Some(address) = address else {
        warn!("Listing {} has no address, skipping", id);
        return None;
    };

    let mut rent: Option<f64> = None;
    let mut area: Option<f64> = None;
    for dd in entry.select(&selectors.value) {
        let content = element_text(dd);
        let target = if content.ends_with('€') {
            &mut rent
        } else if content.ends_with("m²") {
            &mut area
        } else {
            continue;
        };

        let number = content.split_whitespace().next().unwrap_or_default();
        match parse_german_float(number) {
            Ok(value) => *target = Some(value),
            Err(e) => {
                warn!("Listing {}: {:#}", id, e);
                return None;
            }
        }
    }

    match (rent, area) {
        (Some(rent), Some(area)) => Some(InsertableListing::new(id, address, rent, area)),
        _ => {
            warn!("Listing {} is missing rent or area, skipping", id);
            None
        }
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
