use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::database::models::{PromotionPointerRow, RunRow, StagedWinnerRow};
use crate::database::{promotion_repo, run_repo, staged_repo};
use crate::services::clusters::{self, ClusterReport, SuggestionReport};
use crate::services::config::MapperConfig;
use crate::services::mapper::MatchStatus;
use crate::types::errors::{MapperError, MapperResult};

/// One unresolved ingredient of a run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GapRow {
    pub ingredient: String,
    pub frequency: i64,
    pub best_fdc_id: Option<i64>,
    pub best_description: Option<String>,
    pub category: Option<String>,
    pub score: f64,
    pub review_flag: Option<String>,
}

impl From<StagedWinnerRow> for GapRow {
    fn from(row: StagedWinnerRow) -> Self {
        GapRow {
            ingredient: row.ingredient_raw,
            frequency: row.frequency,
            best_fdc_id: row.fdc_id,
            best_description: row.description,
            category: row.food_category,
            score: row.score,
            review_flag: row.review_flag,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GapReport {
    pub run_id: String,
    pub needs_review: Vec<GapRow>,
    pub no_match: Vec<GapRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub pointer: Option<PromotionPointerRow>,
    pub runs: Vec<RunRow>,
}

/// The run a report targets: explicit, else the active one.
async fn resolve_run_id(pool: &SqlitePool, run_id: Option<String>) -> MapperResult<String> {
    if let Some(run_id) = run_id {
        return match run_repo::run_exists(pool, &run_id).await? {
            true => Ok(run_id),
            false => Err(MapperError::NotFound(format!("run {run_id}"))),
        };
    }
    promotion_repo::get_pointer(pool)
        .await?
        .map(|pointer| pointer.run_id)
        .ok_or_else(|| MapperError::NotFound("no promoted run".to_string()))
}

async fn gap_rows(
    pool: &SqlitePool,
    run_id: &str,
    status: MatchStatus,
    limit: Option<usize>,
) -> Result<Vec<GapRow>, sqlx::Error> {
    let rows = staged_repo::list_winners_by_status(pool, run_id, status.as_str()).await?;
    let take = limit.unwrap_or(rows.len());
    Ok(rows.into_iter().take(take).map(GapRow::from).collect())
}

/// Needs-review and no-match rows, most frequent first.
pub async fn gap_report(
    pool: &SqlitePool,
    run_id: Option<String>,
    limit: Option<usize>,
) -> MapperResult<GapReport> {
    let run_id = resolve_run_id(pool, run_id).await?;
    let needs_review = gap_rows(pool, &run_id, MatchStatus::NeedsReview, limit).await?;
    let no_match = gap_rows(pool, &run_id, MatchStatus::NoMatch, limit).await?;
    log::info!(
        "Gap report for {run_id}: {} needs review, {} no match",
        needs_review.len(),
        no_match.len()
    );
    Ok(GapReport {
        run_id,
        needs_review,
        no_match,
    })
}

pub async fn status_report(pool: &SqlitePool, limit: usize) -> MapperResult<StatusReport> {
    let pointer = promotion_repo::get_pointer(pool).await?;
    let mut runs = run_repo::list_runs(pool).await?;
    runs.truncate(limit);
    Ok(StatusReport { pointer, runs })
}

pub async fn cluster_report(pool: &SqlitePool, min_frequency: i64) -> MapperResult<ClusterReport> {
    clusters::clusters_from_vocabulary(pool, min_frequency).await
}

/// New-entry proposals for clusters the run (explicit, else the active one)
/// has not mapped. Without any run every cluster is open.
pub async fn suggestion_report(
    pool: &SqlitePool,
    config: &MapperConfig,
    min_frequency: i64,
    min_count: i64,
    run_id: Option<String>,
) -> MapperResult<SuggestionReport> {
    let run_id = match run_id {
        Some(run_id) => Some(resolve_run_id(pool, Some(run_id)).await?),
        None => promotion_repo::get_pointer(pool)
            .await?
            .map(|pointer| pointer.run_id),
    };
    let resolved: HashSet<String> = match &run_id {
        Some(run_id) => {
            staged_repo::list_winners_by_status(pool, run_id, MatchStatus::Mapped.as_str())
                .await?
                .into_iter()
                .map(|row| row.ingredient_key)
                .collect()
        }
        None => HashSet::new(),
    };

    let mut report =
        clusters::suggest_from_vocabulary(pool, config, min_frequency, min_count, resolved).await?;
    report.run_id = run_id;
    Ok(report)
}

#[cfg(test)]
#[path = "tests/report_cmds_tests.rs"]
mod tests;
