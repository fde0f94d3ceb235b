use std::{fs::File, io::BufWriter, io::Write, path::Path};

use anyhow::{Context, Result};

use crate::models::listing::Listing;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// `[latitude, longitude, rent per m²]` for every listing that can be mapped.
pub fn to_points(listings: &[Listing]) -> Vec<(f64, f64, f64)> {
    listings
        .iter()
        .filter(|l| l.is_exportable())
        .filter_map(|l| {
            let c = l.coordinates()?;
            Some((
                round_to(c.latitude, 5),
                round_to(c.longitude, 5),
                round_to(l.rent_per_square_meter(), 1),
            ))
        })
        .collect()
}

/// Writes the map data as a compact JSON array and returns the number of points.
pub fn export_to_json(listings: &[Listing], path: &Path) -> Result<usize> {
    let points = to_points(listings);

    let file = File::create(path)
        .with_context(|| format!("Could not create JSON file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &points)?;
    writer.flush()?;

    Ok(points.len())
}
