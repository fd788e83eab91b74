//! Mapper configuration: defaults, JSON loading, validation and replay of a
//! configuration recorded by an earlier run.

pub mod models;

pub use models::*;

use sqlx::SqlitePool;
use std::path::Path;

use crate::database::run_repo;
use crate::types::errors::{MapperError, MapperResult};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Load configuration. No path yields the defaults; an explicit path that
/// cannot be read, parsed or validated is a precondition failure.
pub fn load_config(path: Option<&Path>) -> MapperResult<MapperConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using built-in defaults");
        return Ok(MapperConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MapperError::Config(format!("Cannot read {}: {e}", path.display())))?;
    let config = parse_config(&raw)
        .map_err(|e| MapperError::Config(format!("{}: {e}", path.display())))?;
    log::info!(
        "Loaded config '{}' from {}",
        config.version,
        path.display()
    );
    Ok(config)
}

/// Parse and validate a JSON configuration document.
pub fn parse_config(raw: &str) -> Result<MapperConfig, String> {
    let config: MapperConfig =
        serde_json::from_str(raw).map_err(|e| format!("Invalid config JSON: {e}"))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &MapperConfig) -> Result<(), String> {
    let sum = config.weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(format!("Signal weights must sum to 1.0 (got {sum})"));
    }
    let weights = [
        config.weights.overlap,
        config.weights.similarity,
        config.weights.segment,
        config.weights.affinity,
        config.weights.synonym,
    ];
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err("Signal weights must be finite and non-negative".to_string());
    }
    if config.thresholds.review > config.thresholds.mapped {
        return Err(format!(
            "Review threshold {} exceeds mapped threshold {}",
            config.thresholds.review, config.thresholds.mapped
        ));
    }
    if config.gates.near_tie_delta < 0.0 {
        return Err("near_tie_delta must be >= 0".to_string());
    }
    if config.write_concurrency == 0 {
        return Err("write_concurrency must be >= 1".to_string());
    }
    check_table_versions(&config.tables)?;
    if let Some(cases) = &config.tripwires {
        for case in cases {
            if case.constraints.is_empty() {
                return Err(format!(
                    "Tripwire '{}' has no constraints",
                    case.ingredient
                ));
            }
        }
    }
    Ok(())
}

/// Every recorded table version must name the table compiled into this
/// build; scoring always uses the compiled tables.
pub fn check_table_versions(tables: &TableVersions) -> Result<(), String> {
    let compiled = TableVersions::default();
    let pairs = [
        ("tokenizer", &tables.tokenizer, &compiled.tokenizer),
        ("state_tokens", &tables.state_tokens, &compiled.state_tokens),
        ("stop_words", &tables.stop_words, &compiled.stop_words),
        (
            "category_expectations",
            &tables.category_expectations,
            &compiled.category_expectations,
        ),
        ("synonyms", &tables.synonyms, &compiled.synonyms),
        ("tripwires", &tables.tripwires, &compiled.tripwires),
    ];
    let stale: Vec<String> = pairs
        .iter()
        .filter(|(_, recorded, current)| recorded != current)
        .map(|(name, recorded, current)| format!("{name} {recorded} (built with {current})"))
        .collect();
    if stale.is_empty() {
        Ok(())
    } else {
        Err(format!("Unsupported table versions: {}", stale.join(", ")))
    }
}

/// Reload the configuration snapshot recorded by an earlier run.
pub async fn config_from_run(pool: &SqlitePool, run_id: &str) -> MapperResult<MapperConfig> {
    let run = run_repo::get_run(pool, run_id)
        .await?
        .ok_or_else(|| MapperError::NotFound(run_id.to_string()))?;
    let config: MapperConfig = serde_json::from_str(&run.config_json)?;
    validate_config(&config).map_err(MapperError::Config)?;
    Ok(config)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
