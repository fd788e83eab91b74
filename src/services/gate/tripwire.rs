//! Tripwire validation gate: a versioned battery of known hard cases
//! re-checked against a run's staged winners before promotion.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::database::models::{RunScope, StagedWinnerRow};
use crate::database::staged_repo;
use crate::services::config::MapperConfig;
use crate::services::mapper::analysis::tables::{DAIRY, FATS, LEGUMES, SPICES, SWEETS};
use crate::services::mapper::models::types::{ingredient_key, MatchStatus};

pub const TRIPWIRE_VERSION: &str = "tripwires-v1";

/// One required property of a case's staged winner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TripwireConstraint {
    CategoryIs(String),
    CategoryIsNot(String),
    /// Case-insensitive substring of the winner's description.
    DescriptionContains(String),
    DescriptionLacks(String),
    MinScore(f64),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TripwireCase {
    pub ingredient: String,
    pub constraints: Vec<TripwireConstraint>,
}

impl TripwireCase {
    fn new(ingredient: &str, constraints: Vec<TripwireConstraint>) -> Self {
        Self {
            ingredient: ingredient.to_string(),
            constraints,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TripwireFailure {
    pub ingredient: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TripwireReport {
    pub version: String,
    pub checked: usize,
    /// Cases absent from a partial run.
    pub skipped: Vec<String>,
    pub failures: Vec<TripwireFailure>,
}

impl TripwireReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line explanation recorded on a failed run.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|failure| format!("{}: {}", failure.ingredient, failure.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Built-in battery of adversarial lexical collisions.
pub fn default_battery() -> Vec<TripwireCase> {
    use TripwireConstraint::*;
    vec![
        TripwireCase::new(
            "butter",
            vec![CategoryIs(DAIRY.into()), DescriptionLacks("peanut".into())],
        ),
        TripwireCase::new(
            "oil",
            vec![CategoryIs(FATS.into()), DescriptionLacks("boiled".into())],
        ),
        TripwireCase::new(
            "olive oil",
            vec![
                CategoryIs(FATS.into()),
                DescriptionContains("oil".into()),
                MinScore(0.80),
            ],
        ),
        TripwireCase::new(
            "salt",
            vec![CategoryIs(SPICES.into()), DescriptionLacks("butter".into())],
        ),
        TripwireCase::new("eggs", vec![CategoryIs(DAIRY.into())]),
        TripwireCase::new("sugar", vec![CategoryIs(SWEETS.into())]),
        TripwireCase::new("corn", vec![DescriptionLacks("corner".into())]),
        TripwireCase::new(
            "peanut butter",
            vec![
                CategoryIs(LEGUMES.into()),
                DescriptionContains("peanut".into()),
            ],
        ),
        TripwireCase::new("garlic", vec![CategoryIsNot(FATS.into())]),
    ]
}

/// The configured battery, or the built-in one.
pub fn active_battery(config: &MapperConfig) -> Vec<TripwireCase> {
    config.tripwires.clone().unwrap_or_else(default_battery)
}

/// Violations of `constraint` by `winner` (empty when satisfied).
fn check_constraint(constraint: &TripwireConstraint, winner: &StagedWinnerRow) -> Option<String> {
    let linked = winner.fdc_id.is_some() && winner.status != MatchStatus::NoMatch.as_str();
    let category = winner.food_category.as_deref().unwrap_or("");
    let description = winner
        .description
        .as_deref()
        .unwrap_or("")
        .to_lowercase();

    match constraint {
        TripwireConstraint::CategoryIs(expected) => {
            if !linked {
                return Some(format!("expected category '{expected}' but no match"));
            }
            (!category.eq_ignore_ascii_case(expected))
                .then(|| format!("category '{category}' is not '{expected}'"))
        }
        TripwireConstraint::CategoryIsNot(forbidden) => (linked
            && category.eq_ignore_ascii_case(forbidden))
        .then(|| format!("category must not be '{forbidden}'")),
        TripwireConstraint::DescriptionContains(needle) => {
            if !linked {
                return Some(format!("expected description containing '{needle}' but no match"));
            }
            (!description.contains(&needle.to_lowercase()))
                .then(|| format!("description '{description}' lacks '{needle}'"))
        }
        TripwireConstraint::DescriptionLacks(needle) => (linked
            && description.contains(&needle.to_lowercase()))
        .then(|| format!("description '{description}' contains '{needle}'")),
        TripwireConstraint::MinScore(min) => (winner.score < *min)
            .then(|| format!("score {:.4} below {min}", winner.score)),
    }
}

/// Evaluate a battery against staged winners keyed by ingredient key.
pub fn evaluate_battery(
    cases: &[TripwireCase],
    winners: &HashMap<String, StagedWinnerRow>,
    scope: RunScope,
) -> TripwireReport {
    let mut report = TripwireReport {
        version: TRIPWIRE_VERSION.to_string(),
        ..TripwireReport::default()
    };

    for case in cases {
        let key = ingredient_key(&case.ingredient);
        let Some(winner) = winners.get(&key) else {
            match scope {
                RunScope::Partial => report.skipped.push(key),
                RunScope::Full => report.failures.push(TripwireFailure {
                    ingredient: key,
                    reason: "missing from run".to_string(),
                }),
            }
            continue;
        };

        report.checked += 1;
        for constraint in &case.constraints {
            if let Some(reason) = check_constraint(constraint, winner) {
                report.failures.push(TripwireFailure {
                    ingredient: key.clone(),
                    reason,
                });
            }
        }
    }
    report
}

/// Load the staged winners a battery needs and evaluate it.
pub async fn run_tripwires(
    pool: &SqlitePool,
    run_id: &str,
    scope: RunScope,
    cases: &[TripwireCase],
) -> Result<TripwireReport, sqlx::Error> {
    let mut winners = HashMap::new();
    for case in cases {
        let key = ingredient_key(&case.ingredient);
        if winners.contains_key(&key) {
            continue;
        }
        if let Some(winner) = staged_repo::get_winner(pool, run_id, &key).await? {
            winners.insert(key, winner);
        }
    }

    let report = evaluate_battery(cases, &winners, scope);
    if report.passed() {
        log::info!(
            "Tripwires passed for {run_id}: {} checked, {} skipped",
            report.checked,
            report.skipped.len()
        );
    } else {
        log::warn!(
            "Tripwires failed for {run_id}: {}",
            report.summary()
        );
    }
    Ok(report)
}

#[cfg(test)]
#[path = "tests/tripwire_tests.rs"]
mod tests;
