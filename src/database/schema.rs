use sqlx::SqlitePool;

/// Tables the pipeline reads from or writes to.
pub const REQUIRED_TABLES: &[&str] = &[
    "reference_foods",
    "ingredient_vocabulary",
    "mapping_runs",
    "staged_winners",
    "near_tie_candidates",
    "promotion_pointer",
];

/// Apply the bundled migrations (idempotent).
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Names of required tables missing from the database.
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let existing: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(pool)
            .await?;

    Ok(REQUIRED_TABLES
        .iter()
        .filter(|table| !existing.iter().any(|(name,)| name == *table))
        .map(|table| table.to_string())
        .collect())
}

#[cfg(test)]
#[path = "tests/schema_tests.rs"]
mod tests;
