use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::listing::Address;

lazy_static! {
    static ref STREET_SUFFIX: Regex = Regex::new(r"([Ss])(trasse|tr\.)$").unwrap();
}

/// Parses a number written the German way: `.` separates thousands and `,`
/// is the decimal mark.
pub fn parse_german_float(s: &str) -> Result<f64> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    let value = normalized
        .parse::<f64>()
        .with_context(|| format!("Invalid number '{}'", s))?;

    // Rust also parses "NaN" and "inf"
    if !value.is_finite() || value < 0.0 {
        bail!("Invalid number '{}'", s);
    }
    Ok(value)
}

/// Spells out abbreviated or ASCII-only street suffixes as "straße".
pub fn normalize_street(street: &str) -> String {
    STREET_SUFFIX.replace(street, "${1}traße").into_owned()
}

/*
   Address lines come as "Street No, Suburb, City" or "Suburb, City"
*/
pub fn parse_address(address: &str) -> Option<Address> {
    let fields: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    match fields.len() {
        0 => None,
        1 | 2 => Some(Address {
            street: None,
            number: None,
            suburb: fields[0].to_string(),
        }),
        _ => {
            let (street, number) = match fields[0].rsplit_once(' ') {
                Some((street, number)) => (street.trim(), Some(number.to_string())),
                None => (fields[0], None),
            };

            Some(Address {
                street: Some(normalize_street(street)),
                number,
                suburb: fields[1].to_string(),
            })
        }
    }
}
