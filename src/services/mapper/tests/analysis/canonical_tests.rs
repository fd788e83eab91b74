use super::*;

#[test]
fn test_plain_description_base_is_first_segment() {
    let name = resolve_canonical("Oil, olive, salad or cooking");
    assert_eq!(name.base_name, "oil");
    assert_eq!(name.specific_name, "oil");
    assert_eq!(name.base_slug, "oil");
    assert_eq!(name.domain, None);
    assert_eq!(
        name.working_segments,
        vec!["oil", "olive", "salad or cooking"]
    );
}

#[test]
fn test_state_tokens_stripped_from_segments() {
    let name = resolve_canonical("Corn, sweet, yellow, raw");
    assert_eq!(name.cleaned_segments, vec!["corn", "sweet", "yellow"]);
    assert_eq!(name.working_segments.last().map(String::as_str), Some("raw"));
}

#[test]
fn test_dry_heat_compound_survives_state_stripping() {
    let name = resolve_canonical("Fish, salmon, Atlantic, farmed, cooked, dry heat");
    assert!(name.cleaned_segments.contains(&"dry heat".to_string()));
    assert!(!name.cleaned_segments.contains(&"cooked".to_string()));
    assert_eq!(name.base_name, "fish");

    let peanuts = resolve_canonical("Peanuts, all types, dry-roasted, without salt");
    assert!(peanuts.cleaned_segments.contains(&"dry roasted".to_string()));
}

#[test]
fn test_descriptor_parenthetical_is_noise() {
    let name = resolve_canonical("Olives, ripe, canned (small-extra large)");
    assert_eq!(name.removed_fragments, vec!["small-extra large"]);
    assert!(name.alternate_names.is_empty());
    assert_eq!(name.base_name, "olives");
}

#[test]
fn test_name_parenthetical_becomes_alternate() {
    let name = resolve_canonical("Chickpeas (garbanzo beans, bengal gram), mature seeds, raw");
    assert_eq!(name.alternate_names, vec!["garbanzo beans bengal gram"]);
    assert_eq!(name.base_name, "chickpeas");
}

#[test]
fn test_unit_and_footnote_parentheticals_dropped() {
    let name = resolve_canonical("Milk, whole (3.25% milkfat), (Includes foods for USDA's Food Distribution Program)");
    assert!(name.alternate_names.is_empty());
    assert_eq!(name.removed_fragments.len(), 2);
    assert_eq!(name.base_name, "milk");
}

#[test]
fn test_nested_parentheticals() {
    let name = resolve_canonical("Cheese, cheddar (sharp (aged))");
    assert_eq!(name.base_name, "cheese");
    assert_eq!(name.removed_fragments.len(), 2);
    assert!(!name.working_segments.iter().any(|s| s.contains("aged")));
}

#[test]
fn test_brand_segment_removed() {
    let name = resolve_canonical("Snacks, KELLOGG'S, NUTRI-GRAIN cereal bars, fruit");
    assert_eq!(name.brands, vec!["KELLOGG'S"]);
    assert_eq!(
        name.working_segments,
        vec!["snacks", "nutri grain cereal bars", "fruit"]
    );
}

#[test]
fn test_brand_detection_requires_every_word_uppercase() {
    assert!(is_brand_segment("KELLOGG'S"));
    assert!(is_brand_segment("LAND O'LAKES"));
    assert!(!is_brand_segment("NUTRI-GRAIN cereal bars"));
    assert!(!is_brand_segment("Atlantic"));
    assert!(!is_brand_segment("80%"));
}

#[test]
fn test_alcohol_prefix_and_wine_subtype() {
    let name = resolve_canonical("Alcoholic beverage, wine, table, red");
    assert_eq!(name.domain, Some(Domain::Alcohol));
    assert_eq!(name.base_name, "wine");
    assert_eq!(name.specific_name, "red wine");
    assert_eq!(name.specific_slug, "red-wine");
}

#[test]
fn test_alcohol_subtype_priority_liqueur_over_spirit() {
    let name = resolve_canonical("Alcoholic beverages, liqueur, coffee, 53 proof");
    assert_eq!(name.base_name, "liqueur");
    assert_eq!(name.specific_name, "coffee liqueur");

    let spirit = resolve_canonical("Alcoholic beverage, distilled, vodka, 80 proof");
    assert_eq!(spirit.base_name, "spirits");
    assert_eq!(spirit.specific_name, "vodka");
}

#[test]
fn test_beverage_skips_generic_segments() {
    let name = resolve_canonical("Beverages, carbonated, cola, regular");
    assert_eq!(name.domain, Some(Domain::Beverage));
    assert_eq!(name.base_name, "cola");
}

#[test]
fn test_juice_suffix_extends_specific_name() {
    let name = resolve_canonical("Lemons, juice, raw");
    assert_eq!(name.base_name, "lemons");
    assert_eq!(name.specific_name, "lemons juice");

    let already = resolve_canonical("Lemon juice, raw");
    assert_eq!(already.specific_name, "lemon juice");
}

#[test]
fn test_all_state_description_falls_back_to_working_text() {
    let name = resolve_canonical("Raw, frozen");
    assert_eq!(name.base_name, "raw");
    assert!(name.cleaned_segments.is_empty());
}
