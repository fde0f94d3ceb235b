pub mod listing;
pub mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use diesel::{Connection, RunQueryDsl, SqliteConnection};

const CREATE_LISTINGS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS listings (
        id TEXT PRIMARY KEY NOT NULL,
        street TEXT,
        number TEXT,
        suburb TEXT NOT NULL,
        rent REAL NOT NULL,
        area REAL NOT NULL,
        latitude REAL,
        longitude REAL,
        date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    ) WITHOUT ROWID;
";

/// Opens the listings database, creating the file and table if needed.
pub fn establish_connection(db_path: &Path) -> Result<SqliteConnection> {
    let database_url = db_path.to_string_lossy();

    let mut connection = SqliteConnection::establish(&database_url)
        .with_context(|| format!("Error connecting to {}", database_url))?;

    diesel::sql_query(CREATE_LISTINGS_TABLE)
        .execute(&mut connection)
        .context("Error creating listings table")?;

    Ok(connection)
}
