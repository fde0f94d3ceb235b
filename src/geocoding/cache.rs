use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;

use crate::models::listing::Coordinates;

/// Geocoding answers kept on disk across runs.
///
/// A `None` value records that the query is known to have no result.
#[derive(Debug)]
pub struct GeocodeCache {
    path: PathBuf,
    entries: HashMap<String, Option<Coordinates>>,
}

impl GeocodeCache {
    pub fn load(path: &Path) -> Result<GeocodeCache> {
        let entries = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Invalid geocode cache {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Could not read geocode cache {}", path.display()))
            }
        };

        debug!("Loaded {} cached addresses", entries.len());

        Ok(GeocodeCache {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn get(&self, query: &str) -> Option<&Option<Coordinates>> {
        self.entries.get(query)
    }

    /// Adds an answer and writes the whole cache back to disk.
    pub fn insert(&mut self, query: String, value: Option<Coordinates>) -> Result<()> {
        self.entries.insert(query, value);
        self.save()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.entries)?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("Could not write geocode cache {}", self.path.display()))
    }
}
