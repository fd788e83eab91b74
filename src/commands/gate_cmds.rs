use sqlx::SqlitePool;
use std::path::Path;

use crate::services::config::{self, MapperConfig};
use crate::services::gate::promotion::{self, PromotionOutcome, ValidationOutcome};
use crate::types::errors::MapperResult;

/// An explicit config file wins; otherwise the run's recorded snapshot is
/// replayed.
pub async fn gate_config(
    pool: &SqlitePool,
    run_id: &str,
    path: Option<&Path>,
) -> MapperResult<MapperConfig> {
    match path {
        Some(path) => config::load_config(Some(path)),
        None => config::config_from_run(pool, run_id).await,
    }
}

pub async fn validate_command(
    pool: &SqlitePool,
    run_id: &str,
    config_path: Option<&Path>,
) -> MapperResult<ValidationOutcome> {
    let config = gate_config(pool, run_id, config_path).await?;
    promotion::validate_run(pool, run_id, &config).await
}

pub async fn promote_command(
    pool: &SqlitePool,
    run_id: &str,
    config_path: Option<&Path>,
) -> MapperResult<PromotionOutcome> {
    let config = gate_config(pool, run_id, config_path).await?;
    promotion::promote(pool, run_id, &config).await
}

pub async fn rollback_command(pool: &SqlitePool, run_id: &str) -> MapperResult<PromotionOutcome> {
    promotion::rollback_to(pool, run_id).await
}

#[cfg(test)]
#[path = "tests/gate_cmds_tests.rs"]
mod tests;
