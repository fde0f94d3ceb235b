pub mod scrape_producer;
