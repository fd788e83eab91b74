#![allow(dead_code)]

use lexmap_lib::database::corpus_repo;
use lexmap_lib::database::schema::ensure_schema;
use lexmap_lib::services::mapper::FoodRecord;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Once;

static INIT: Once = Once::new();

pub struct TestContext {
    pub pool: Pool<Sqlite>,
}

pub async fn init_test_db() -> TestContext {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    ensure_schema(&pool).await.expect("Failed to apply schema");

    TestContext { pool }
}

pub const DAIRY: &str = "Dairy and Egg Products";
pub const FATS: &str = "Fats and Oils";

/// Reference foods with adversarial neighbours.
pub const FOODS: &[(i64, &str, Option<&str>)] = &[
    (1, "Oil, olive, salad or cooking", Some(FATS)),
    (2, "Oil, canola", Some(FATS)),
    (3, "Olives, ripe, canned (small-extra large)", Some("Fruits and Fruit Juices")),
    (4, "Potatoes, boiled, cooked in skin, flesh, without salt", Some("Vegetables and Vegetable Products")),
    (5, "Butter, salted", Some(DAIRY)),
    (6, "Butter, without salt", Some(DAIRY)),
    (7, "Peanut butter, smooth style, without salt", Some("Legumes and Legume Products")),
    (8, "Salt, table", Some("Spices and Herbs")),
    (9, "Spices, pepper, black", Some("Spices and Herbs")),
    (10, "Chicken, broilers or fryers, breast, meat only, cooked, roasted", Some("Poultry Products")),
    (11, "Wheat flour, white, all-purpose, enriched, bleached", Some("Cereal Grains and Pasta")),
    (12, "Corn, sweet, yellow, raw", Some("Vegetables and Vegetable Products")),
    (13, "Egg, whole, raw, fresh", Some(DAIRY)),
    (14, "Garlic, raw", Some("Vegetables and Vegetable Products")),
    (15, "Spices, garlic powder", Some("Spices and Herbs")),
    (16, "Beef, ground, 80% lean meat / 20% fat, raw", Some("Beef Products")),
    (17, "Alcoholic beverage, wine, table, red", Some("Beverages")),
    (18, "Fish, salmon, Atlantic, farmed, cooked, dry heat", Some("Finfish and Shellfish Products")),
    (19, "Sugars, granulated", Some("Sweets")),
    (20, "Peanuts, all types, dry-roasted, without salt", Some("Legumes and Legume Products")),
    (21, "Snacks, KELLOGG'S, NUTRI-GRAIN cereal bars, fruit", Some("Snacks")),
    (22, "Lemon juice, raw", Some("Fruits and Fruit Juices")),
    (23, "Cheese, cheddar", Some(DAIRY)),
    (24, "Tomatoes, red, ripe, raw", None),
    (25, "Cooking spray, original", Some(FATS)),
];

/// Vocabulary covering every case of the built-in tripwire battery.
pub const VOCABULARY: &[(&str, i64)] = &[
    ("salt", 900),
    ("butter", 800),
    ("sugar", 700),
    ("eggs", 650),
    ("olive oil", 600),
    ("garlic", 550),
    ("oil", 500),
    ("corn", 300),
    ("peanut butter", 200),
    ("garlic powder", 150),
    ("tomatoes", 120),
    ("zucchini", 40),
];

pub fn food_records() -> Vec<FoodRecord> {
    FOODS
        .iter()
        .map(|(fdc_id, description, category)| FoodRecord {
            fdc_id: *fdc_id,
            description: (*description).to_string(),
            category: category.map(str::to_string),
            data_type: "sr_legacy_food".to_string(),
        })
        .collect()
}

pub async fn seed(pool: &Pool<Sqlite>) {
    for record in food_records() {
        corpus_repo::insert_reference_food(pool, &record)
            .await
            .expect("insert food");
    }
    for (name, frequency) in VOCABULARY {
        corpus_repo::insert_vocabulary_entry(pool, name, *frequency)
            .await
            .expect("insert vocabulary");
    }
}
