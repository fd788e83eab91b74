use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::database::models::{FoodRow, VocabularyRow};
use crate::services::mapper::models::types::{ingredient_key, FoodRecord, VocabularyEntry};

/// Reference corpus as loaded, with the number of malformed rows skipped.
#[derive(Debug, Clone, Default)]
pub struct CorpusLoad {
    pub records: Vec<FoodRecord>,
    pub skipped: usize,
}

/// Ingredient vocabulary merged by key, with the number of malformed rows skipped.
#[derive(Debug, Clone, Default)]
pub struct VocabularyLoad {
    pub entries: Vec<VocabularyEntry>,
    pub skipped: usize,
}

/// Load every reference food. Rows without a description are skipped.
pub async fn load_reference_foods(pool: &SqlitePool) -> Result<CorpusLoad, sqlx::Error> {
    let rows = sqlx::query_as::<_, FoodRow>(
        "SELECT fdc_id, description, food_category, data_type FROM reference_foods ORDER BY fdc_id",
    )
    .fetch_all(pool)
    .await?;

    let mut load = CorpusLoad::default();
    for row in rows {
        let Some(description) = non_blank(row.description) else {
            log::warn!("Skipping reference food {}: missing description", row.fdc_id);
            load.skipped += 1;
            continue;
        };
        load.records.push(FoodRecord {
            fdc_id: row.fdc_id,
            description,
            category: non_blank(row.food_category),
            data_type: non_blank(row.data_type).unwrap_or_else(|| "unknown".to_string()),
        });
    }
    Ok(load)
}

/// Load the ingredient vocabulary. Rows with a blank name or a missing or
/// negative frequency are skipped; rows sharing a key are merged and their
/// frequencies summed. Ordered by frequency desc, then key asc.
pub async fn load_vocabulary(pool: &SqlitePool) -> Result<VocabularyLoad, sqlx::Error> {
    let rows = sqlx::query_as::<_, VocabularyRow>(
        "SELECT name, frequency FROM ingredient_vocabulary ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut skipped = 0usize;
    let mut merged: Vec<VocabularyEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let name = non_blank(row.name);
        let (name, frequency) = match (name, row.frequency) {
            (Some(name), Some(frequency)) if frequency >= 0 => (name, frequency),
            (name, frequency) => {
                log::warn!(
                    "Skipping vocabulary row: name={:?} frequency={:?}",
                    name,
                    frequency
                );
                skipped += 1;
                continue;
            }
        };

        let key = ingredient_key(&name);
        match positions.get(&key) {
            Some(index) => merged[*index].frequency += frequency,
            None => {
                positions.insert(key, merged.len());
                merged.push(VocabularyEntry { name, frequency });
            }
        }
    }

    merged.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| ingredient_key(&a.name).cmp(&ingredient_key(&b.name)))
    });

    Ok(VocabularyLoad {
        entries: merged,
        skipped,
    })
}

pub async fn insert_reference_food(pool: &SqlitePool, food: &FoodRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT OR REPLACE INTO reference_foods (fdc_id, description, food_category, data_type)
         VALUES (?, ?, ?, ?)",
    )
    .bind(food.fdc_id)
    .bind(&food.description)
    .bind(&food.category)
    .bind(&food.data_type)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_vocabulary_entry(
    pool: &SqlitePool,
    name: &str,
    frequency: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO ingredient_vocabulary (name, frequency) VALUES (?, ?)")
        .bind(name)
        .bind(frequency)
        .execute(pool)
        .await?;
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/corpus_repo_tests.rs"]
mod tests;
