//! Run orchestrator: one complete scoring pass over the ingredient
//! vocabulary, staged under a unique run id.
//!
//! Preconditions (schema, unique run id, non-empty corpus) are checked before
//! anything is written. Scoring is pure and runs on the rayon pool inside
//! `spawn_blocking`; staged rows are written concurrently, and a failed row is
//! logged and counted without aborting the batch.

use futures_util::StreamExt;
use rayon::prelude::*;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::database::models::{NearTieRow, RunCounts, RunScope, RunStatus, StagedWinnerRow};
use crate::database::run_repo::{self, NewRun};
use crate::database::{corpus_repo, schema, staged_repo};
use crate::services::config::MapperConfig;
use crate::services::gate::promotion::{self, PromotionOutcome};
use crate::services::mapper::models::acceptance::{evaluate_matches, MatchOutcome};
use crate::services::mapper::models::types::{
    ingredient_key, IngredientQuery, MatchReason, MatchStatus, SignalBreakdown, VocabularyEntry,
};
use crate::services::mapper::state::corpus::CorpusSnapshot;
use crate::services::pipeline::fingerprint::{corpus_fingerprint, tokenizer_fingerprint};
use crate::types::errors::{MapperError, MapperResult};

/// Command-surface options of one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Score and report without writing anything.
    pub dry_run: bool,
    /// Gate and promote the run once staged.
    pub promote: bool,
    /// Persist raw signal values on the winner and on every near-tie row.
    pub include_breakdowns: bool,
    pub include_near_ties: bool,
    pub top_n: Option<usize>,
    pub min_frequency: Option<i64>,
    pub single_ingredient: Option<String>,
    pub run_id: Option<String>,
}

impl RunOptions {
    /// Any vocabulary filter makes the run partial.
    pub fn scope(&self) -> RunScope {
        if self.top_n.is_some() || self.min_frequency.is_some() || self.single_ingredient.is_some()
        {
            RunScope::Partial
        } else {
            RunScope::Full
        }
    }
}

/// Scored outcome for one ingredient.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientResult {
    pub query: IngredientQuery,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub scope: RunScope,
    pub dry_run: bool,
    pub tokenizer_fingerprint: String,
    pub corpus_fingerprint: String,
    pub counts: RunCounts,
    /// Final persisted status; `None` for a dry run.
    pub status: Option<RunStatus>,
    pub promotion: Option<PromotionOutcome>,
    /// Scored ingredients, only returned for a dry run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub preview: Vec<IngredientResult>,
}

/// `run-YYYYMMDDTHHMMSS-xxxxxxxx`
pub fn generate_run_id() -> String {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{stamp}-{}", &suffix[..8])
}

/// Fail when any table the pipeline needs is missing.
pub async fn verify_schema(pool: &SqlitePool) -> MapperResult<()> {
    let missing = schema::missing_tables(pool).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MapperError::Precondition(format!(
            "missing tables: {}",
            missing.join(", ")
        )))
    }
}

/// Apply the min-frequency, single-ingredient and top-N filters, in that order.
pub fn filter_vocabulary(entries: Vec<VocabularyEntry>, options: &RunOptions) -> Vec<VocabularyEntry> {
    let mut entries: Vec<VocabularyEntry> = match options.min_frequency {
        Some(min) => entries.into_iter().filter(|e| e.frequency >= min).collect(),
        None => entries,
    };

    if let Some(single) = &options.single_ingredient {
        let key = ingredient_key(single);
        entries.retain(|entry| ingredient_key(&entry.name) == key);
        if entries.is_empty() {
            entries.push(VocabularyEntry {
                name: single.trim().to_string(),
                frequency: 0,
            });
        }
    }

    if let Some(limit) = options.top_n {
        entries.truncate(limit);
    }
    entries
}

/// Score every entry against the snapshot. Order follows `entries`.
pub fn score_vocabulary(
    snapshot: &CorpusSnapshot,
    entries: &[VocabularyEntry],
    config: &MapperConfig,
) -> Vec<IngredientResult> {
    entries
        .par_iter()
        .map(|entry| {
            let query = snapshot.query(&entry.name, entry.frequency);
            let matches = snapshot.score_all(&query, config);
            let outcome = evaluate_matches(&matches, config);
            IngredientResult { query, outcome }
        })
        .collect()
}

fn tally(results: &[IngredientResult]) -> RunCounts {
    let mut counts = RunCounts {
        total_ingredients: results.len() as i64,
        ..RunCounts::default()
    };
    for result in results {
        match result.outcome.status {
            MatchStatus::Mapped => counts.mapped_count += 1,
            MatchStatus::NeedsReview => counts.review_count += 1,
            MatchStatus::NoMatch => counts.no_match_count += 1,
        }
    }
    counts
}

/// Rows written for one ingredient.
#[derive(Debug, Clone)]
struct StagedWrite {
    winner: StagedWinnerRow,
    near_ties: Option<Vec<NearTieRow>>,
}

fn build_write(
    run_id: &str,
    result: &IngredientResult,
    snapshot: &CorpusSnapshot,
    options: &RunOptions,
) -> MapperResult<StagedWrite> {
    let best = result.outcome.best.as_ref();
    let food = best.and_then(|b| snapshot.food(b.fdc_id));
    let signals_json = match best {
        Some(best) if options.include_breakdowns => Some(serde_json::to_string(&best.signals)?),
        _ => None,
    };

    let winner = StagedWinnerRow {
        run_id: run_id.to_string(),
        ingredient_key: result.query.key.clone(),
        ingredient_raw: result.query.raw.clone(),
        frequency: result.query.frequency,
        fdc_id: best.map(|b| b.fdc_id),
        description: food.map(|f| f.description.clone()),
        food_category: food.and_then(|f| f.category.clone()),
        score: best.map(|b| b.score).unwrap_or(0.0),
        status: result.outcome.status.as_str().to_string(),
        reason_code: best.map(|b| b.reason.code().to_string()),
        review_flag: result.outcome.review_flag.map(str::to_string),
        near_tie_count: result.outcome.near_tie_count as i64,
        signals_json,
    };

    let near_ties = if options.include_near_ties {
        Some(
            result
                .outcome
                .near_ties
                .iter()
                .enumerate()
                .map(|(rank, candidate)| {
                    let signals_json = if options.include_breakdowns {
                        Some(serde_json::to_string(&candidate.signals)?)
                    } else {
                        None
                    };
                    Ok(NearTieRow {
                        run_id: run_id.to_string(),
                        ingredient_key: result.query.key.clone(),
                        rank: rank as i64,
                        fdc_id: candidate.fdc_id,
                        score: candidate.score,
                        signals_json,
                    })
                })
                .collect::<MapperResult<Vec<_>>>()?,
        )
    } else {
        None
    };

    Ok(StagedWrite { winner, near_ties })
}

async fn persist_write(pool: &SqlitePool, write: &StagedWrite) -> Result<(), sqlx::Error> {
    staged_repo::upsert_winner(pool, &write.winner).await?;
    if let Some(rows) = &write.near_ties {
        staged_repo::replace_near_ties(pool, &write.winner.run_id, &write.winner.ingredient_key, rows)
            .await?;
    }
    Ok(())
}

/// Write all rows with bounded concurrency. Returns the number of failures.
async fn persist_all(pool: &SqlitePool, writes: Vec<StagedWrite>, concurrency: usize) -> i64 {
    let failed: Vec<bool> = futures_util::stream::iter(writes)
        .map(|write| async move {
            let result = persist_write(pool, &write).await;
            if let Err(e) = &result {
                log::error!(
                    "Failed to stage '{}' (candidate {:?}): {e}",
                    write.winner.ingredient_key,
                    write.winner.fdc_id
                );
            }
            result.is_err()
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    failed.into_iter().filter(|f| *f).count() as i64
}

/// Execute one orchestration pass.
pub async fn run_mapping(
    pool: &SqlitePool,
    config: &MapperConfig,
    options: &RunOptions,
) -> MapperResult<RunSummary> {
    verify_schema(pool).await?;

    let run_id = options.run_id.clone().unwrap_or_else(generate_run_id);
    if !options.dry_run && run_repo::run_exists(pool, &run_id).await? {
        return Err(MapperError::DuplicateRun(run_id));
    }

    let corpus = corpus_repo::load_reference_foods(pool).await?;
    if corpus.records.is_empty() {
        return Err(MapperError::Precondition(
            "reference corpus is empty".to_string(),
        ));
    }
    let vocabulary = corpus_repo::load_vocabulary(pool).await?;
    if corpus.skipped > 0 || vocabulary.skipped > 0 {
        log::warn!(
            "Skipped malformed rows: {} foods, {} ingredients",
            corpus.skipped,
            vocabulary.skipped
        );
    }

    let scope = options.scope();
    let entries = filter_vocabulary(vocabulary.entries, options);
    log::info!(
        "Run {run_id}: scoring {} ingredients against {} foods ({scope})",
        entries.len(),
        corpus.records.len()
    );

    let snapshot = Arc::new(CorpusSnapshot::build(corpus.records));
    let tokenizer_fp = tokenizer_fingerprint();
    let corpus_fp = corpus_fingerprint(snapshot.stats());

    let worker_snapshot = Arc::clone(&snapshot);
    let worker_config = config.clone();
    let results = tokio::task::spawn_blocking(move || {
        score_vocabulary(&worker_snapshot, &entries, &worker_config)
    })
    .await
    .map_err(|e| MapperError::Internal(format!("Scoring worker failed: {e}")))?;

    let mut counts = tally(&results);
    counts.skipped_foods = corpus.skipped as i64;
    counts.skipped_ingredients = vocabulary.skipped as i64;

    if options.dry_run {
        log::info!(
            "Dry run {run_id}: {} mapped, {} review, {} no match",
            counts.mapped_count,
            counts.review_count,
            counts.no_match_count
        );
        return Ok(RunSummary {
            run_id,
            scope,
            dry_run: true,
            tokenizer_fingerprint: tokenizer_fp,
            corpus_fingerprint: corpus_fp,
            counts,
            status: None,
            promotion: None,
            preview: results,
        });
    }

    let config_json = serde_json::to_string(config)?;
    run_repo::insert_run(
        pool,
        &NewRun {
            run_id: &run_id,
            scope,
            config_version: &config.version,
            config_json: &config_json,
            tokenizer_fingerprint: &tokenizer_fp,
            corpus_fingerprint: &corpus_fp,
            skipped_foods: counts.skipped_foods,
            skipped_ingredients: counts.skipped_ingredients,
        },
    )
    .await?;

    let writes = results
        .iter()
        .map(|result| build_write(&run_id, result, &snapshot, options))
        .collect::<MapperResult<Vec<_>>>()?;
    counts.write_failures = persist_all(pool, writes, config.write_concurrency).await;
    if counts.write_failures > 0 {
        log::warn!("Run {run_id}: {} staged writes failed", counts.write_failures);
    }
    run_repo::update_counts(pool, &run_id, &counts).await?;
    log::info!(
        "Run {run_id} staged: {} mapped, {} review, {} no match",
        counts.mapped_count,
        counts.review_count,
        counts.no_match_count
    );

    let promotion = if options.promote {
        Some(promotion::promote(pool, &run_id, config).await?)
    } else {
        None
    };

    let status = run_repo::get_run(pool, &run_id)
        .await?
        .map(|run| run.run_status().map_err(MapperError::Internal))
        .transpose()?;

    Ok(RunSummary {
        run_id,
        scope,
        dry_run: false,
        tokenizer_fingerprint: tokenizer_fp,
        corpus_fingerprint: corpus_fp,
        counts,
        status,
        promotion,
        preview: Vec::new(),
    })
}

/// One ranked candidate with its full breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateDebug {
    pub fdc_id: i64,
    pub description: String,
    pub category: Option<String>,
    pub inverted_name: String,
    pub score: f64,
    pub reason: MatchReason,
    pub signals: SignalBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientDebug {
    pub query: IngredientQuery,
    pub outcome: MatchOutcome,
    pub candidates: Vec<CandidateDebug>,
}

/// Top-k candidates of one ingredient against a snapshot.
pub fn explain_ingredient(
    snapshot: &CorpusSnapshot,
    raw: &str,
    config: &MapperConfig,
    top_k: usize,
) -> IngredientDebug {
    let query = snapshot.query(raw, 0);
    let matches = snapshot.score_all(&query, config);
    let outcome = evaluate_matches(&matches, config);
    let candidates = matches
        .iter()
        .take(top_k)
        .filter_map(|scored| {
            let food = snapshot.food(scored.fdc_id)?;
            Some(CandidateDebug {
                fdc_id: scored.fdc_id,
                description: food.description.clone(),
                category: food.category.clone(),
                inverted_name: food.inverted_name.clone(),
                score: scored.score,
                reason: scored.reason,
                signals: scored.signals,
            })
        })
        .collect();

    IngredientDebug {
        query,
        outcome,
        candidates,
    }
}

/// Load the corpus and explain one ingredient. Writes nothing.
pub async fn debug_ingredient(
    pool: &SqlitePool,
    config: &MapperConfig,
    raw: &str,
    top_k: usize,
) -> MapperResult<IngredientDebug> {
    verify_schema(pool).await?;
    let corpus = corpus_repo::load_reference_foods(pool).await?;
    let snapshot = CorpusSnapshot::build(corpus.records);
    Ok(explain_ingredient(&snapshot, raw, config, top_k))
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
