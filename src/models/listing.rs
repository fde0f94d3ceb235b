use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Latitude and longitude stored for listings whose address could not be
/// located, so they are not looked up again on every run.
pub const NOT_FOUND: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::listings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Listing {
    pub id: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub suburb: String,
    pub rent: f64,
    pub area: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = crate::db::schema::listings)]
pub struct InsertableListing {
    pub id: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub suburb: String,
    pub rent: f64,
    pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub suburb: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn not_found() -> Coordinates {
        Coordinates {
            latitude: NOT_FOUND,
            longitude: NOT_FOUND,
        }
    }
}

impl Listing {
    pub fn rent_per_square_meter(&self) -> f64 {
        self.rent / self.area
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Whether the listing carries everything the map export needs.
    pub fn is_exportable(&self) -> bool {
        let located = match self.coordinates() {
            Some(c) => c != Coordinates::not_found(),
            None => false,
        };
        located && self.number.is_some() && self.area > 0.0
    }

    /// Geocoding queries for this listing, most specific first.
    pub fn address_candidates(&self, city: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(street) = &self.street {
            if let Some(number) = &self.number {
                candidates.push(format!("{} {}, {}, {}", street, number, self.suburb, city));
            }
            candidates.push(format!("{}, {}, {}", street, self.suburb, city));
        }
        candidates.push(format!("{}, {}", self.suburb, city));
        candidates
    }
}

impl InsertableListing {
    pub fn new(id: String, address: Address, rent: f64, area: f64) -> InsertableListing {
        InsertableListing {
            id,
            street: address.street,
            number: address.number,
            suburb: address.suburb,
            rent,
            area,
        }
    }
}
