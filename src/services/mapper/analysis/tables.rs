//! Frozen lookup tables used by the scorer.
//!
//! Every table carries a version label. A run records the labels in its
//! config snapshot, and the table contents feed the tokenizer fingerprint.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use super::tokenizer::token_variants;

pub const CATEGORY_TABLE_VERSION: &str = "categories-v1";
pub const SYNONYM_TABLE_VERSION: &str = "synonyms-v1";

pub const DAIRY: &str = "Dairy and Egg Products";
pub const FATS: &str = "Fats and Oils";
pub const POULTRY: &str = "Poultry Products";
pub const BEEF: &str = "Beef Products";
pub const PORK: &str = "Pork Products";
pub const LAMB: &str = "Lamb, Veal, and Game Products";
pub const FISH: &str = "Finfish and Shellfish Products";
pub const CEREAL: &str = "Cereal Grains and Pasta";
pub const BAKED: &str = "Baked Products";
pub const SWEETS: &str = "Sweets";
pub const SPICES: &str = "Spices and Herbs";
pub const VEGETABLES: &str = "Vegetables and Vegetable Products";
pub const FRUITS: &str = "Fruits and Fruit Juices";
pub const NUTS: &str = "Nut and Seed Products";
pub const LEGUMES: &str = "Legumes and Legume Products";
pub const BEVERAGES: &str = "Beverages";
pub const SAUCES: &str = "Soups, Sauces, and Gravies";

const CATEGORY_EXPECTATIONS: &[(&str, &[&str])] = &[
    // fats
    ("oil", &[FATS]),
    ("margarine", &[FATS]),
    ("shortening", &[FATS]),
    ("lard", &[FATS]),
    // dairy and eggs
    ("butter", &[DAIRY]),
    ("milk", &[DAIRY]),
    ("buttermilk", &[DAIRY]),
    ("cheese", &[DAIRY]),
    ("cream", &[DAIRY]),
    ("yogurt", &[DAIRY]),
    ("egg", &[DAIRY]),
    // meat and fish
    ("chicken", &[POULTRY]),
    ("turkey", &[POULTRY]),
    ("duck", &[POULTRY]),
    ("beef", &[BEEF]),
    ("pork", &[PORK]),
    ("bacon", &[PORK]),
    ("ham", &[PORK]),
    ("lamb", &[LAMB]),
    ("veal", &[LAMB]),
    ("salmon", &[FISH]),
    ("tuna", &[FISH]),
    ("cod", &[FISH]),
    ("shrimp", &[FISH]),
    ("crab", &[FISH]),
    ("fish", &[FISH]),
    // grains and baked goods
    ("flour", &[CEREAL]),
    ("rice", &[CEREAL]),
    ("oats", &[CEREAL]),
    ("pasta", &[CEREAL]),
    ("spaghetti", &[CEREAL]),
    ("noodles", &[CEREAL]),
    ("cornmeal", &[CEREAL]),
    ("barley", &[CEREAL]),
    ("quinoa", &[CEREAL]),
    ("bread", &[BAKED]),
    ("crackers", &[BAKED]),
    // sweets
    ("sugar", &[SWEETS]),
    ("honey", &[SWEETS]),
    ("syrup", &[SWEETS]),
    ("molasses", &[SWEETS]),
    ("chocolate", &[SWEETS]),
    // spices and herbs
    ("salt", &[SPICES]),
    ("pepper", &[SPICES, VEGETABLES]),
    ("cinnamon", &[SPICES]),
    ("cumin", &[SPICES]),
    ("oregano", &[SPICES]),
    ("basil", &[SPICES]),
    ("paprika", &[SPICES]),
    ("thyme", &[SPICES]),
    ("nutmeg", &[SPICES]),
    ("parsley", &[SPICES, VEGETABLES]),
    // vegetables
    ("onion", &[VEGETABLES]),
    ("garlic", &[VEGETABLES, SPICES]),
    ("tomato", &[VEGETABLES]),
    ("potato", &[VEGETABLES]),
    ("carrot", &[VEGETABLES]),
    ("celery", &[VEGETABLES]),
    ("spinach", &[VEGETABLES]),
    ("lettuce", &[VEGETABLES]),
    ("broccoli", &[VEGETABLES]),
    ("mushroom", &[VEGETABLES]),
    ("cabbage", &[VEGETABLES]),
    ("cucumber", &[VEGETABLES]),
    ("corn", &[VEGETABLES, CEREAL]),
    // fruits
    ("apple", &[FRUITS]),
    ("lemon", &[FRUITS]),
    ("lime", &[FRUITS]),
    ("orange", &[FRUITS]),
    ("banana", &[FRUITS]),
    ("olive", &[FRUITS]),
    ("raisins", &[FRUITS]),
    ("strawberry", &[FRUITS]),
    ("blueberry", &[FRUITS]),
    // nuts, seeds and legumes
    ("almonds", &[NUTS]),
    ("walnuts", &[NUTS]),
    ("pecans", &[NUTS]),
    ("cashews", &[NUTS]),
    ("sesame", &[NUTS]),
    ("coconut", &[NUTS]),
    ("beans", &[LEGUMES]),
    ("lentils", &[LEGUMES]),
    ("chickpeas", &[LEGUMES]),
    ("peanut", &[LEGUMES]),
    ("tofu", &[LEGUMES]),
    ("soy", &[LEGUMES]),
    // beverages
    ("wine", &[BEVERAGES]),
    ("beer", &[BEVERAGES]),
    ("vodka", &[BEVERAGES]),
    ("rum", &[BEVERAGES]),
    ("whiskey", &[BEVERAGES]),
    ("coffee", &[BEVERAGES]),
    ("tea", &[BEVERAGES]),
    ("water", &[BEVERAGES]),
    ("vinegar", &[BEVERAGES, SAUCES]),
];

/// Normalized ingredient phrase -> alternative required token sets.
/// A candidate confirms the synonym when its core + state tokens contain
/// every token of at least one set.
const SYNONYMS: &[(&str, &[&[&str]])] = &[
    ("olive oil", &[&["olive", "oil"]]),
    (
        "vegetable oil",
        &[&["oil", "vegetable"], &["oil", "canola"], &["oil", "soybean"]],
    ),
    ("butter", &[&["butter", "salted"], &["butter", "unsalted"]]),
    ("unsalted butter", &[&["butter", "unsalted"]]),
    ("salt", &[&["salt", "table"]]),
    ("pepper", &[&["pepper", "black"]]),
    ("black pepper", &[&["pepper", "black"]]),
    ("garlic", &[&["garlic", "raw"]]),
    ("garlic powder", &[&["garlic", "powder"]]),
    ("onion", &[&["onions", "raw"]]),
    ("onions", &[&["onions", "raw"]]),
    ("egg", &[&["egg", "whole"]]),
    ("eggs", &[&["egg", "whole"]]),
    ("sugar", &[&["sugars", "granulated"]]),
    ("brown sugar", &[&["sugars", "brown"]]),
    ("powdered sugar", &[&["sugars", "powdered"]]),
    ("flour", &[&["wheat", "flour", "all", "purpose"]]),
    ("all purpose flour", &[&["wheat", "flour", "all", "purpose"]]),
    ("milk", &[&["milk", "whole"]]),
    ("baking soda", &[&["leavening", "baking", "soda"]]),
    ("baking powder", &[&["leavening", "baking", "powder"]]),
    ("water", &[&["water", "tap"]]),
    ("lemon juice", &[&["lemon", "juice"]]),
    ("parmesan cheese", &[&["cheese", "parmesan"]]),
    ("cheddar cheese", &[&["cheese", "cheddar"]]),
    ("ground beef", &[&["beef", "ground"]]),
    ("chicken breast", &[&["chicken", "breast"]]),
    ("chicken breasts", &[&["chicken", "breast"]]),
    ("cinnamon", &[&["spices", "cinnamon"]]),
    ("vanilla", &[&["vanilla", "extract"]]),
    ("vanilla extract", &[&["vanilla", "extract"]]),
    ("soy sauce", &[&["soy", "sauce"]]),
    ("red wine", &[&["wine", "red"]]),
    ("white wine", &[&["wine", "white"]]),
];

static CATEGORY_INDEX: LazyLock<BTreeMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| CATEGORY_EXPECTATIONS.iter().copied().collect());

static SYNONYM_INDEX: LazyLock<BTreeMap<&'static str, &'static [&'static [&'static str]]>> =
    LazyLock::new(|| SYNONYMS.iter().copied().collect());

/// Expected categories for a token, looked up directly then through its
/// plural/singular variants.
pub fn expected_categories(token: &str) -> Option<&'static [&'static str]> {
    if let Some(categories) = CATEGORY_INDEX.get(token) {
        return Some(categories);
    }
    token_variants(token)
        .iter()
        .find_map(|variant| CATEGORY_INDEX.get(variant.as_str()).copied())
}

/// Required token sets for a normalized ingredient phrase.
pub fn synonym_requirements(phrase: &str) -> Option<&'static [&'static [&'static str]]> {
    SYNONYM_INDEX.get(phrase).copied()
}

/// Canonical text of both tables, in sorted order.
pub fn tables_signature() -> String {
    let mut out = format!("{CATEGORY_TABLE_VERSION}\n");
    for (token, categories) in CATEGORY_INDEX.iter() {
        out.push_str(&format!("{token}={}\n", categories.join("|")));
    }
    out.push_str(&format!("{SYNONYM_TABLE_VERSION}\n"));
    for (phrase, sets) in SYNONYM_INDEX.iter() {
        let rendered: Vec<String> = sets
            .iter()
            .map(|set| {
                let sorted: BTreeSet<&str> = set.iter().copied().collect();
                sorted.into_iter().collect::<Vec<_>>().join("+")
            })
            .collect();
        out.push_str(&format!("{phrase}={}\n", rendered.join("|")));
    }
    out
}

#[cfg(test)]
#[path = "../tests/analysis/tables_tests.rs"]
mod tests;
