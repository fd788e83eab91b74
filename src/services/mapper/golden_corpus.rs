//! Golden corpus fixture for scorer and pipeline tests.
//!
//! A small reference corpus with adversarial neighbours (olive fruit next to
//! olive oil, boiled potatoes next to oils, peanut butter next to butter) and
//! the expected outcome for a set of ingredients.

use crate::services::config::MapperConfig;
use crate::services::mapper::analysis::tables::{
    BEEF, BEVERAGES, CEREAL, DAIRY, FATS, FISH, FRUITS, LEGUMES, POULTRY, SPICES, SWEETS,
    VEGETABLES,
};
use crate::services::mapper::models::acceptance::classify_score;
use crate::services::mapper::models::types::{FoodRecord, MatchStatus};
use crate::services::mapper::state::corpus::CorpusSnapshot;
use sqlx::SqlitePool;

pub const GOLDEN_FOODS: &[(i64, &str, Option<&str>)] = &[
    (1, "Oil, olive, salad or cooking", Some(FATS)),
    (2, "Oil, canola", Some(FATS)),
    (3, "Olives, ripe, canned (small-extra large)", Some(FRUITS)),
    (4, "Potatoes, boiled, cooked in skin, flesh, without salt", Some(VEGETABLES)),
    (5, "Butter, salted", Some(DAIRY)),
    (6, "Butter, without salt", Some(DAIRY)),
    (7, "Peanut butter, smooth style, without salt", Some(LEGUMES)),
    (8, "Salt, table", Some(SPICES)),
    (9, "Spices, pepper, black", Some(SPICES)),
    (10, "Chicken, broilers or fryers, breast, meat only, cooked, roasted", Some(POULTRY)),
    (11, "Wheat flour, white, all-purpose, enriched, bleached", Some(CEREAL)),
    (12, "Corn, sweet, yellow, raw", Some(VEGETABLES)),
    (13, "Egg, whole, raw, fresh", Some(DAIRY)),
    (14, "Garlic, raw", Some(VEGETABLES)),
    (15, "Spices, garlic powder", Some(SPICES)),
    (16, "Beef, ground, 80% lean meat / 20% fat, raw", Some(BEEF)),
    (17, "Alcoholic beverage, wine, table, red", Some(BEVERAGES)),
    (18, "Fish, salmon, Atlantic, farmed, cooked, dry heat", Some(FISH)),
    (19, "Sugars, granulated", Some(SWEETS)),
    (20, "Peanuts, all types, dry-roasted, without salt", Some(LEGUMES)),
    (21, "Snacks, KELLOGG'S, NUTRI-GRAIN cereal bars, fruit", Some("Snacks")),
    (22, "Lemon juice, raw", Some(FRUITS)),
    (23, "Cheese, cheddar", Some(DAIRY)),
    (24, "Tomatoes, red, ripe, raw", None),
    (25, "Cooking spray, original", Some(FATS)),
];

/// Single golden case: ingredient, expected best food and status.
pub struct GoldenCase {
    pub ingredient: &'static str,
    pub expected_best: i64,
    /// `None` when the score sits too close to a threshold to pin down.
    pub expected_status: Option<MatchStatus>,
}

pub const GOLDEN_CASES: &[GoldenCase] = &[
    GoldenCase { ingredient: "olive oil", expected_best: 1, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "oil", expected_best: 2, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "butter", expected_best: 5, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "salt", expected_best: 8, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "eggs", expected_best: 13, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "garlic", expected_best: 14, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "garlic powder", expected_best: 15, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "black pepper", expected_best: 9, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "chicken breast", expected_best: 10, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "ground beef", expected_best: 16, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "red wine", expected_best: 17, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "flour", expected_best: 11, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "sugar", expected_best: 19, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "lemon juice", expected_best: 22, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "cheddar cheese", expected_best: 23, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "peanut butter", expected_best: 7, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "corn", expected_best: 12, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "salmon", expected_best: 18, expected_status: Some(MatchStatus::Mapped) },
    GoldenCase { ingredient: "tomatoes", expected_best: 24, expected_status: Some(MatchStatus::NeedsReview) },
    GoldenCase { ingredient: "cooking spray", expected_best: 25, expected_status: None },
];

pub fn golden_records() -> Vec<FoodRecord> {
    GOLDEN_FOODS
        .iter()
        .map(|(fdc_id, description, category)| FoodRecord {
            fdc_id: *fdc_id,
            description: (*description).to_string(),
            category: category.map(str::to_string),
            data_type: "sr_legacy_food".to_string(),
        })
        .collect()
}

pub fn golden_snapshot() -> CorpusSnapshot {
    CorpusSnapshot::build(golden_records())
}

/// Execute a single golden case against the snapshot.
pub fn run_golden_case(case: &GoldenCase, snapshot: &CorpusSnapshot, config: &MapperConfig) {
    let query = snapshot.query(case.ingredient, 1);
    let ranked = snapshot.score_all(&query, config);
    let best = ranked.first().expect("golden corpus is not empty");
    assert_eq!(
        best.fdc_id, case.expected_best,
        "[{}] best candidate mismatch (score {:.4})",
        case.ingredient, best.score
    );
    if let Some(expected) = case.expected_status {
        assert_eq!(
            classify_score(best.score, &config.thresholds),
            expected,
            "[{}] status mismatch (score {:.4})",
            case.ingredient,
            best.score
        );
    }
}

/// Insert the golden foods and one vocabulary row per golden case, most
/// frequent first in case order.
pub async fn seed_golden(pool: &SqlitePool) {
    for record in golden_records() {
        crate::database::corpus_repo::insert_reference_food(pool, &record)
            .await
            .expect("insert golden food");
    }
    for (index, case) in GOLDEN_CASES.iter().enumerate() {
        crate::database::corpus_repo::insert_vocabulary_entry(
            pool,
            case.ingredient,
            1000 - (index as i64) * 10,
        )
        .await
        .expect("insert golden vocabulary");
    }
}
