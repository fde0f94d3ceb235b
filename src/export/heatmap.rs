use std::{f64::consts::PI, path::Path};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use log::warn;

use crate::models::listing::Listing;

/// Fraction of the value spread cut off at both ends before rendering.
const TRIM_FRACTION: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapSettings {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub width: u32,
    pub height: u32,
    /// Influence radius of a single listing, in degrees.
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub longitude: f64,
    pub latitude: f64,
    pub value: f64,
}

pub fn samples(listings: &[Listing]) -> Vec<Sample> {
    listings
        .iter()
        .filter(|l| l.is_exportable())
        .filter_map(|l| {
            let c = l.coordinates()?;
            Some(Sample {
                longitude: c.longitude,
                latitude: c.latitude,
                value: l.rent_per_square_meter(),
            })
        })
        .collect()
}

fn value_range(samples: &[Sample]) -> Option<(f64, f64)> {
    samples.iter().fold(None, |range, s| match range {
        None => Some((s.value, s.value)),
        Some((min, max)) => Some((min.min(s.value), max.max(s.value))),
    })
}

/// Drops the samples at the extreme ends of the value range.
pub fn trim_outliers(samples: Vec<Sample>) -> Vec<Sample> {
    let Some((min, max)) = value_range(&samples) else {
        return samples;
    };
    let trim = TRIM_FRACTION * (max - min);
    let lower = min + trim;
    let upper = max - trim;

    samples
        .into_iter()
        .filter(|s| s.value > lower && s.value < upper)
        .collect()
}

/// Matplotlib's "rainbow" colormap for `x` in `[0, 1]`.
pub fn rainbow(x: f64) -> [u8; 3] {
    let x = x.clamp(0.0, 1.0);
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel((2.0 * x - 0.5).abs()),
        channel((PI * x).sin()),
        channel((PI * x / 2.0).cos()),
    ]
}

/// Interpolates the samples over the configured area, north up.
///
/// Each sample weighs `1 - d / radius` within `radius` of a pixel centre. The
/// colour shows the weighted mean value and the alpha the summed weight.
pub fn render(samples: &[Sample], settings: &HeatmapSettings) -> Option<RgbaImage> {
    let (min, max) = value_range(samples)?;
    let spread = max - min;

    let lon_step = (settings.east - settings.west) / settings.width as f64;
    let lat_step = (settings.north - settings.south) / settings.height as f64;

    let mut img = RgbaImage::new(settings.width, settings.height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let lon = settings.west + (x as f64 + 0.5) * lon_step;
        let lat = settings.north - (y as f64 + 0.5) * lat_step;

        let mut density = 0.0;
        let mut weighted = 0.0;
        for s in samples {
            let d = (s.longitude - lon).hypot(s.latitude - lat);
            if d < settings.radius {
                let w = 1.0 - d / settings.radius;
                density += w;
                weighted += w * s.value;
            }
        }

        if density <= 0.0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }

        let value = weighted / density;
        let normalized = if spread > 0.0 { (value - min) / spread } else { 0.5 };
        let [r, g, b] = rainbow(normalized);
        let alpha = (density.min(1.0) * 255.0).round() as u8;
        *pixel = Rgba([r, g, b, alpha]);
    }

    Some(img)
}

/// Renders the listings into a PNG. Returns whether an image was written.
pub fn create_heatmap(listings: &[Listing], settings: &HeatmapSettings, path: &Path) -> Result<bool> {
    let samples = trim_outliers(samples(listings));

    let Some(img) = render(&samples, settings) else {
        warn!("No listings left to draw a heatmap from");
        return Ok(false);
    };

    img.save(path)
        .with_context(|| format!("Could not write heatmap {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64) -> Sample {
        Sample {
            longitude: 8.4,
            latitude: 49.0,
            value,
        }
    }

    #[test]
    fn rainbow_ends() {
        assert_eq!(rainbow(0.0), [128, 0, 255]);
        assert_eq!(rainbow(1.0), [255, 0, 0]);
        assert_eq!(rainbow(0.5)[1], 255);
    }

    #[test]
    fn rainbow_clamps_input() {
        assert_eq!(rainbow(-3.0), rainbow(0.0));
        assert_eq!(rainbow(7.0), rainbow(1.0));
    }

    #[test]
    fn trimming_drops_extremes() {
        let trimmed = trim_outliers(vec![sample(5.0), sample(10.0), sample(12.0), sample(25.0)]);
        let values: Vec<f64> = trimmed.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10.0, 12.0]);
    }

    #[test]
    fn trimming_nothing() {
        assert!(trim_outliers(vec![]).is_empty());
    }

    #[test]
    fn render_without_samples() {
        let settings = HeatmapSettings {
            west: 8.0,
            south: 48.0,
            east: 9.0,
            north: 49.0,
            width: 10,
            height: 10,
            radius: 0.1,
        };
        assert!(render(&[], &settings).is_none());
    }
}
