use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Open a pool for a `sqlite:` URL or a plain file path.
pub async fn connect(database: &str, create_if_missing: bool) -> Result<SqlitePool, sqlx::Error> {
    let options = if database.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database)?
    } else {
        SqliteConnectOptions::new().filename(database)
    }
    .create_if_missing(create_if_missing);

    SqlitePoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect_with(options)
        .await
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
mod tests;
