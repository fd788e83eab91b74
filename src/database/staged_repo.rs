use sqlx::SqlitePool;

use crate::database::models::{NearTieRow, StagedWinnerRow};

const WINNER_COLUMNS: &str = "run_id, ingredient_key, ingredient_raw, frequency, fdc_id, description,
     food_category, score, status, reason_code, review_flag, near_tie_count, signals_json";

/// Upsert keyed by (run_id, ingredient_key); re-running a write is harmless.
pub async fn upsert_winner(pool: &SqlitePool, row: &StagedWinnerRow) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT OR REPLACE INTO staged_winners ({WINNER_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&row.run_id)
    .bind(&row.ingredient_key)
    .bind(&row.ingredient_raw)
    .bind(row.frequency)
    .bind(row.fdc_id)
    .bind(&row.description)
    .bind(&row.food_category)
    .bind(row.score)
    .bind(&row.status)
    .bind(&row.reason_code)
    .bind(&row.review_flag)
    .bind(row.near_tie_count)
    .bind(&row.signals_json)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace the near-tie rows of one (run, ingredient) atomically.
pub async fn replace_near_ties(
    pool: &SqlitePool,
    run_id: &str,
    ingredient_key: &str,
    rows: &[NearTieRow],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM near_tie_candidates WHERE run_id = ? AND ingredient_key = ?")
        .bind(run_id)
        .bind(ingredient_key)
        .execute(&mut *tx)
        .await?;
    for row in rows {
        sqlx::query(
            "INSERT INTO near_tie_candidates
                (run_id, ingredient_key, rank, fdc_id, score, signals_json)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.run_id)
        .bind(&row.ingredient_key)
        .bind(row.rank)
        .bind(row.fdc_id)
        .bind(row.score)
        .bind(&row.signals_json)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

pub async fn get_winner(
    pool: &SqlitePool,
    run_id: &str,
    ingredient_key: &str,
) -> Result<Option<StagedWinnerRow>, sqlx::Error> {
    sqlx::query_as::<_, StagedWinnerRow>(&format!(
        "SELECT {WINNER_COLUMNS} FROM staged_winners WHERE run_id = ? AND ingredient_key = ?"
    ))
    .bind(run_id)
    .bind(ingredient_key)
    .fetch_optional(pool)
    .await
}

pub async fn list_winners(
    pool: &SqlitePool,
    run_id: &str,
) -> Result<Vec<StagedWinnerRow>, sqlx::Error> {
    sqlx::query_as::<_, StagedWinnerRow>(&format!(
        "SELECT {WINNER_COLUMNS} FROM staged_winners WHERE run_id = ? ORDER BY ingredient_key"
    ))
    .bind(run_id)
    .fetch_all(pool)
    .await
}

/// Winners of a run with the given status, most frequent first.
pub async fn list_winners_by_status(
    pool: &SqlitePool,
    run_id: &str,
    status: &str,
) -> Result<Vec<StagedWinnerRow>, sqlx::Error> {
    sqlx::query_as::<_, StagedWinnerRow>(&format!(
        "SELECT {WINNER_COLUMNS} FROM staged_winners WHERE run_id = ? AND status = ?
         ORDER BY frequency DESC, ingredient_key"
    ))
    .bind(run_id)
    .bind(status)
    .fetch_all(pool)
    .await
}

pub async fn list_near_ties(
    pool: &SqlitePool,
    run_id: &str,
    ingredient_key: &str,
) -> Result<Vec<NearTieRow>, sqlx::Error> {
    sqlx::query_as::<_, NearTieRow>(
        "SELECT run_id, ingredient_key, rank, fdc_id, score, signals_json FROM near_tie_candidates
         WHERE run_id = ? AND ingredient_key = ? ORDER BY rank",
    )
    .bind(run_id)
    .bind(ingredient_key)
    .fetch_all(pool)
    .await
}

pub async fn count_winners(pool: &SqlitePool, run_id: &str) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staged_winners WHERE run_id = ?")
        .bind(run_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
#[path = "tests/staged_repo_tests.rs"]
mod tests;
