use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a mapping run.
///
/// staging → validated → promoted; staging | validated → failed;
/// failed → validated (re-validation after a configuration fix).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Staging,
    Validated,
    Promoted,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Staging => "staging",
            RunStatus::Validated => "validated",
            RunStatus::Promoted => "promoted",
            RunStatus::Failed => "failed",
        }
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Staging, RunStatus::Validated)
                | (RunStatus::Staging, RunStatus::Failed)
                | (RunStatus::Validated, RunStatus::Promoted)
                | (RunStatus::Validated, RunStatus::Failed)
                | (RunStatus::Failed, RunStatus::Validated)
                | (RunStatus::Failed, RunStatus::Failed)
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(RunStatus::Staging),
            "validated" => Ok(RunStatus::Validated),
            "promoted" => Ok(RunStatus::Promoted),
            "failed" => Ok(RunStatus::Failed),
            _ => Err(format!("Unknown run status: {s}")),
        }
    }
}

/// Vocabulary coverage of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunScope {
    /// Every valid vocabulary entry was scored.
    Full,
    /// Filtered, limited or single-ingredient run.
    Partial,
}

impl RunScope {
    pub fn as_str(self) -> &'static str {
        match self {
            RunScope::Full => "full",
            RunScope::Partial => "partial",
        }
    }
}

impl fmt::Display for RunScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(RunScope::Full),
            "partial" => Ok(RunScope::Partial),
            _ => Err(format!("Unknown run scope: {s}")),
        }
    }
}

/// Raw `reference_foods` row. Columns are nullable; malformed rows are
/// skipped (and counted) when the corpus is loaded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRow {
    pub fdc_id: i64,
    pub description: Option<String>,
    pub food_category: Option<String>,
    pub data_type: Option<String>,
}

/// Raw `ingredient_vocabulary` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VocabularyRow {
    pub name: Option<String>,
    pub frequency: Option<i64>,
}

/// `mapping_runs` row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RunRow {
    pub run_id: String,
    pub status: String,
    pub scope: String,
    pub config_version: String,
    pub config_json: String,
    pub tokenizer_fingerprint: String,
    pub corpus_fingerprint: String,
    pub total_ingredients: i64,
    pub mapped_count: i64,
    pub review_count: i64,
    pub no_match_count: i64,
    pub write_failures: i64,
    pub skipped_foods: i64,
    pub skipped_ingredients: i64,
    /// True once the orchestrator finished writing and recorded its counts.
    pub staging_complete: bool,
    pub status_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RunRow {
    pub fn run_status(&self) -> Result<RunStatus, String> {
        self.status.parse()
    }

    pub fn run_scope(&self) -> Result<RunScope, String> {
        self.scope.parse()
    }
}

/// Aggregate counts written once scoring and staging finish.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunCounts {
    pub total_ingredients: i64,
    pub mapped_count: i64,
    pub review_count: i64,
    pub no_match_count: i64,
    pub write_failures: i64,
    pub skipped_foods: i64,
    pub skipped_ingredients: i64,
}

/// `staged_winners` row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct StagedWinnerRow {
    pub run_id: String,
    pub ingredient_key: String,
    pub ingredient_raw: String,
    pub frequency: i64,
    pub fdc_id: Option<i64>,
    pub description: Option<String>,
    pub food_category: Option<String>,
    pub score: f64,
    pub status: String,
    pub reason_code: Option<String>,
    pub review_flag: Option<String>,
    pub near_tie_count: i64,
    pub signals_json: Option<String>,
}

/// `near_tie_candidates` row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct NearTieRow {
    pub run_id: String,
    pub ingredient_key: String,
    pub rank: i64,
    pub fdc_id: i64,
    pub score: f64,
    pub signals_json: Option<String>,
}

/// The `promotion_pointer` singleton.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq, Eq)]
pub struct PromotionPointerRow {
    pub run_id: String,
    pub previous_run_id: Option<String>,
    pub promoted_at: String,
}

#[cfg(test)]
#[path = "tests/models_tests.rs"]
mod tests;
