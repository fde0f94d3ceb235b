use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{self, Config};

/// Scrapes rental listings for a city and exports them for a rent map.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to $CONFIG_PATH, then built-in settings)
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Database file
    #[clap(long)]
    pub database: Option<PathBuf>,
    /// JSON output file
    #[clap(long)]
    pub json: Option<PathBuf>,
    /// Heatmap output file
    #[clap(long)]
    pub heatmap: Option<PathBuf>,
    /// Skip drawing the heatmap
    #[clap(long)]
    pub no_heatmap: bool,
    /// Stop after this many result pages
    #[clap(long)]
    pub max_pages: Option<usize>,
    /// Output log to STDOUT
    #[clap(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Reads the config file, applies the command line and validates the result.
    pub fn load_config(&self) -> Result<Config> {
        let config = self.apply(config::read_config(self.config.as_deref())?);
        config.validate()?;
        Ok(config)
    }

    /// Command line values take precedence over the config file.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(database) = &self.database {
            config.db_path = database.clone();
        }
        if let Some(json) = &self.json {
            config.json_path = json.clone();
        }
        if let Some(heatmap) = &self.heatmap {
            config.heatmap_path = heatmap.clone();
        }
        if self.no_heatmap {
            config.heatmap.enabled = false;
        }
        if self.max_pages.is_some() {
            config.max_pages = self.max_pages;
        }
        config
    }
}
