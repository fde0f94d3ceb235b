use std::sync::{atomic::AtomicBool, Arc};

use anyhow::Result;
use clap::Parser;
use log::{error, info};

use rentmap::{cli::Cli, logger::setup_logger, shutdown::register_signals, ScrapeProducer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Arc::new(cli.load_config()?);

    // Initialize logger
    setup_logger(&config.log_path, cli.verbose)?;

    // Finish the current page or lookup on Ctrl-C instead of dying mid-write
    let shutdown = Arc::new(AtomicBool::new(false));
    register_signals(&shutdown)?;

    info!("Started");
    let result = ScrapeProducer::run(&config, shutdown).await;
    if let Err(err) = &result {
        error!("Scrape run failed: {:?}", err);
    }
    info!("Finished");

    result.map(|_| ())
}
