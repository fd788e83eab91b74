use sqlx::SqlitePool;

use crate::database::models::{RunCounts, RunRow, RunScope, RunStatus};

/// Insert payload for a new `mapping_runs` record (status `staging`).
#[derive(Debug, Clone)]
pub struct NewRun<'a> {
    pub run_id: &'a str,
    pub scope: RunScope,
    pub config_version: &'a str,
    pub config_json: &'a str,
    pub tokenizer_fingerprint: &'a str,
    pub corpus_fingerprint: &'a str,
    pub skipped_foods: i64,
    pub skipped_ingredients: i64,
}

const RUN_COLUMNS: &str = "run_id, status, scope, config_version, config_json, tokenizer_fingerprint,
     corpus_fingerprint, total_ingredients, mapped_count, review_count, no_match_count,
     write_failures, skipped_foods, skipped_ingredients, staging_complete, status_reason,
     created_at, updated_at";

pub async fn run_exists(pool: &SqlitePool, run_id: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT run_id FROM mapping_runs WHERE run_id = ?")
        .bind(run_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Plain INSERT: a duplicate run id is rejected by the primary key.
pub async fn insert_run(pool: &SqlitePool, run: &NewRun<'_>) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO mapping_runs (run_id, status, scope, config_version, config_json,
            tokenizer_fingerprint, corpus_fingerprint, skipped_foods, skipped_ingredients,
            created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(run.run_id)
    .bind(RunStatus::Staging.as_str())
    .bind(run.scope.as_str())
    .bind(run.config_version)
    .bind(run.config_json)
    .bind(run.tokenizer_fingerprint)
    .bind(run.corpus_fingerprint)
    .bind(run.skipped_foods)
    .bind(run.skipped_ingredients)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_run(pool: &SqlitePool, run_id: &str) -> Result<Option<RunRow>, sqlx::Error> {
    sqlx::query_as::<_, RunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM mapping_runs WHERE run_id = ?"
    ))
    .bind(run_id)
    .fetch_optional(pool)
    .await
}

/// All runs, newest first.
pub async fn list_runs(pool: &SqlitePool) -> Result<Vec<RunRow>, sqlx::Error> {
    sqlx::query_as::<_, RunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM mapping_runs ORDER BY created_at DESC, run_id DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Record the final counts and mark staging complete.
pub async fn update_counts(
    pool: &SqlitePool,
    run_id: &str,
    counts: &RunCounts,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE mapping_runs SET total_ingredients = ?, mapped_count = ?, review_count = ?,
            no_match_count = ?, write_failures = ?, skipped_foods = ?, skipped_ingredients = ?,
            staging_complete = 1, updated_at = ?
         WHERE run_id = ?",
    )
    .bind(counts.total_ingredients)
    .bind(counts.mapped_count)
    .bind(counts.review_count)
    .bind(counts.no_match_count)
    .bind(counts.write_failures)
    .bind(counts.skipped_foods)
    .bind(counts.skipped_ingredients)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(run_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Set a run's status and reason. Returns rows affected.
pub async fn set_status_tx(
    conn: &mut sqlx::SqliteConnection,
    run_id: &str,
    status: RunStatus,
    reason: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE mapping_runs SET status = ?, status_reason = ?, updated_at = ? WHERE run_id = ?",
    )
    .bind(status.as_str())
    .bind(reason)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(run_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_status(
    pool: &SqlitePool,
    run_id: &str,
    status: RunStatus,
    reason: Option<&str>,
) -> Result<u64, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    set_status_tx(&mut conn, run_id, status, reason).await
}

#[cfg(test)]
#[path = "tests/run_repo_tests.rs"]
mod tests;
