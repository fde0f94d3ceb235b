use anyhow::Result;
use diesel::prelude::*;
use log::debug;

use super::schema::listings::dsl::*;
use crate::models::listing::{Coordinates, InsertableListing, Listing, NOT_FOUND};

/// Stores the given listings, ignoring ids that are already known.
///
/// Returns the number of listings that were new.
pub fn insert_all(conn: &mut SqliteConnection, new_listings: &[InsertableListing]) -> Result<usize> {
    let inserted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
        let mut n = 0;
        for listing in new_listings {
            n += diesel::insert_or_ignore_into(listings)
                .values(listing)
                .execute(conn)?;
        }
        Ok(n)
    })?;

    debug!("Inserted {:?} rows into listings table", inserted);
    Ok(inserted)
}

pub fn get_without_coordinates(conn: &mut SqliteConnection) -> Result<Vec<Listing>> {
    let rows = listings
        .filter(latitude.is_null())
        .select(Listing::as_select())
        .order(date.asc())
        .load(conn)?;

    Ok(rows)
}

pub fn set_coordinates(
    conn: &mut SqliteConnection,
    updates: &[(String, Coordinates)],
) -> Result<usize> {
    let updated = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
        let mut n = 0;
        for (listing_id, coordinates) in updates {
            n += diesel::update(listings.filter(id.eq(listing_id)))
                .set((
                    latitude.eq(coordinates.latitude),
                    longitude.eq(coordinates.longitude),
                ))
                .execute(conn)?;
        }
        Ok(n)
    })?;

    Ok(updated)
}

/// Listings that can be placed on the map.
pub fn get_exportable(conn: &mut SqliteConnection) -> Result<Vec<Listing>> {
    let rows = listings
        .filter(latitude.is_not_null())
        .filter(longitude.is_not_null())
        .filter(latitude.ne(NOT_FOUND))
        .filter(number.is_not_null())
        .filter(area.gt(0.0))
        .select(Listing::as_select())
        .order(id.asc())
        .load(conn)?;

    Ok(rows)
}

pub fn get_by_id(conn: &mut SqliteConnection, listing_id: &str) -> Result<Option<Listing>> {
    let listing = listings
        .filter(id.eq(listing_id))
        .select(Listing::as_select())
        .first(conn)
        .optional()?;

    Ok(listing)
}

pub fn count(conn: &mut SqliteConnection) -> Result<i64> {
    Ok(listings.count().get_result(conn)?)
}
