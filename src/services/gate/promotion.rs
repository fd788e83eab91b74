//! Promotion controller. The pointer is the only mutable record; runs are
//! never modified beyond their status, so rollback is a re-point.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::models::{RunRow, RunStatus};
use crate::database::{promotion_repo, run_repo, staged_repo};
use crate::services::config::MapperConfig;
use crate::services::gate::tripwire::{self, TripwireReport};
use crate::types::errors::{MapperError, MapperResult};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationOutcome {
    pub run_id: String,
    pub status: RunStatus,
    pub report: TripwireReport,
}

impl ValidationOutcome {
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PromotionOutcome {
    Promoted {
        run_id: String,
        previous_run_id: Option<String>,
    },
    /// The run is already the active one; nothing was written.
    AlreadyActive { run_id: String },
    /// The tripwire gate failed; the run is now `failed`.
    Refused { run_id: String, report: TripwireReport },
}

async fn load_run(pool: &SqlitePool, run_id: &str) -> MapperResult<(RunRow, RunStatus)> {
    let run = run_repo::get_run(pool, run_id)
        .await?
        .ok_or_else(|| MapperError::NotFound(format!("run {run_id}")))?;
    let status = run.run_status().map_err(MapperError::Internal)?;
    Ok((run, status))
}

fn invalid_transition(run_id: &str, from: RunStatus, to: RunStatus) -> MapperError {
    MapperError::InvalidTransition {
        run_id: run_id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// A run is gateable only once the orchestrator recorded its counts and every
/// row it did not report as a write failure is present.
async fn ensure_staging_complete(pool: &SqlitePool, run: &RunRow) -> MapperResult<()> {
    if !run.staging_complete {
        return Err(MapperError::Precondition(format!(
            "run {} has not finished staging",
            run.run_id
        )));
    }
    let staged = staged_repo::count_winners(pool, &run.run_id).await?;
    let expected = run.total_ingredients - run.write_failures;
    if staged < expected || staged > run.total_ingredients {
        return Err(MapperError::Precondition(format!(
            "run {} has {staged} staged rows, expected {expected} of {}",
            run.run_id, run.total_ingredients
        )));
    }
    Ok(())
}

/// Run the tripwire gate for a staged (or previously failed) run and record
/// the result as `validated` or `failed`. Incomplete runs are rejected
/// before the battery runs.
pub async fn validate_run(
    pool: &SqlitePool,
    run_id: &str,
    config: &MapperConfig,
) -> MapperResult<ValidationOutcome> {
    let (run, status) = load_run(pool, run_id).await?;
    if status == RunStatus::Promoted {
        return Err(invalid_transition(run_id, status, RunStatus::Validated));
    }
    ensure_staging_complete(pool, &run).await?;
    let scope = run.run_scope().map_err(MapperError::Internal)?;

    let battery = tripwire::active_battery(config);
    let report = tripwire::run_tripwires(pool, run_id, scope, &battery).await?;

    let next = if report.passed() {
        RunStatus::Validated
    } else {
        RunStatus::Failed
    };
    if status != next || next == RunStatus::Failed {
        if !status.can_transition_to(next) {
            return Err(invalid_transition(run_id, status, next));
        }
        let reason = (!report.passed()).then(|| report.summary());
        run_repo::set_status(pool, run_id, next, reason.as_deref()).await?;
        log::info!("Run {run_id}: {status} -> {next}");
    }

    Ok(ValidationOutcome {
        run_id: run_id.to_string(),
        status: next,
        report,
    })
}

/// Gate then promote `run_id`. The pointer upsert and the status change
/// commit together.
pub async fn promote(
    pool: &SqlitePool,
    run_id: &str,
    config: &MapperConfig,
) -> MapperResult<PromotionOutcome> {
    if let Some(pointer) = promotion_repo::get_pointer(pool).await? {
        if pointer.run_id == run_id {
            log::info!("Run {run_id} is already active, nothing to promote");
            return Ok(PromotionOutcome::AlreadyActive {
                run_id: run_id.to_string(),
            });
        }
    }

    let (_, status) = load_run(pool, run_id).await?;
    if status == RunStatus::Promoted {
        // Previously promoted and since replaced: re-pointing is a rollback.
        return rollback_to(pool, run_id).await;
    }

    let validation = validate_run(pool, run_id, config).await?;
    if !validation.passed() {
        log::warn!(
            "Promotion of {run_id} refused: {}",
            validation.report.summary()
        );
        return Ok(PromotionOutcome::Refused {
            run_id: run_id.to_string(),
            report: validation.report,
        });
    }

    let mut tx = pool.begin().await?;
    let previous = promotion_repo::get_pointer_tx(&mut *tx)
        .await?
        .map(|pointer| pointer.run_id);
    promotion_repo::upsert_pointer_tx(&mut *tx, run_id, previous.as_deref()).await?;
    let affected =
        run_repo::set_status_tx(&mut *tx, run_id, RunStatus::Promoted, None).await?;
    if affected != 1 {
        return Err(MapperError::NotFound(format!("run {run_id}")));
    }
    tx.commit().await?;

    log::info!(
        "Promoted {run_id} (previous: {})",
        previous.as_deref().unwrap_or("none")
    );
    Ok(PromotionOutcome::Promoted {
        run_id: run_id.to_string(),
        previous_run_id: previous,
    })
}

/// Re-point to a run that was promoted before.
pub async fn rollback_to(pool: &SqlitePool, run_id: &str) -> MapperResult<PromotionOutcome> {
    let (_, status) = load_run(pool, run_id).await?;
    if status != RunStatus::Promoted {
        return Err(MapperError::Precondition(format!(
            "run {run_id} was never promoted (status {status})"
        )));
    }

    let mut tx = pool.begin().await?;
    let current = promotion_repo::get_pointer_tx(&mut *tx)
        .await?
        .map(|pointer| pointer.run_id);
    if current.as_deref() == Some(run_id) {
        return Ok(PromotionOutcome::AlreadyActive {
            run_id: run_id.to_string(),
        });
    }
    promotion_repo::upsert_pointer_tx(&mut *tx, run_id, current.as_deref()).await?;
    tx.commit().await?;

    log::info!(
        "Rolled back pointer to {run_id} (was: {})",
        current.as_deref().unwrap_or("none")
    );
    Ok(PromotionOutcome::Promoted {
        run_id: run_id.to_string(),
        previous_run_id: current,
    })
}

/// The run the pointer currently names, if any.
pub async fn active_run(pool: &SqlitePool) -> MapperResult<Option<RunRow>> {
    let Some(pointer) = promotion_repo::get_pointer(pool).await? else {
        return Ok(None);
    };
    Ok(run_repo::get_run(pool, &pointer.run_id).await?)
}

#[cfg(test)]
#[path = "tests/promotion_tests.rs"]
mod tests;
