use sqlx::SqlitePool;

use crate::database::models::PromotionPointerRow;

pub async fn get_pointer(pool: &SqlitePool) -> Result<Option<PromotionPointerRow>, sqlx::Error> {
    sqlx::query_as::<_, PromotionPointerRow>(
        "SELECT run_id, previous_run_id, promoted_at FROM promotion_pointer WHERE id = 1",
    )
    .fetch_optional(pool)
    .await
}

pub async fn get_pointer_tx(
    conn: &mut sqlx::SqliteConnection,
) -> Result<Option<PromotionPointerRow>, sqlx::Error> {
    sqlx::query_as::<_, PromotionPointerRow>(
        "SELECT run_id, previous_run_id, promoted_at FROM promotion_pointer WHERE id = 1",
    )
    .fetch_optional(conn)
    .await
}

/// Point the single pointer row at `run_id` (single statement upsert).
pub async fn upsert_pointer_tx(
    conn: &mut sqlx::SqliteConnection,
    run_id: &str,
    previous_run_id: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO promotion_pointer (id, run_id, previous_run_id, promoted_at)
         VALUES (1, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            run_id = excluded.run_id,
            previous_run_id = excluded.previous_run_id,
            promoted_at = excluded.promoted_at",
    )
    .bind(run_id)
    .bind(previous_run_id)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/promotion_repo_tests.rs"]
mod tests;
