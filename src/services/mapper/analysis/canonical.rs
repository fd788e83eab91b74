//! Canonical name resolution for reference-food descriptions.
//!
//! Pipeline, strictly ordered:
//! 1. normalize punctuation and whitespace
//! 2. strip parentheticals (administrative noise is dropped, the rest become
//!    alternate names)
//! 3. strip boilerplate category prefixes, flagging the domain
//! 4. strip brand segments (all-uppercase words, detected on original casing)
//! 5. strip state tokens, keeping "dry-roasted" / "dry-heat" compounds
//!
//! The remaining segments yield a base name and a specific name.

use deunicode::deunicode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::tokenizer::{is_state_token, normalize_text, slugify, tokenize};

static RE_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("Invalid regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Boilerplate prefixes (compared against the lower-cased first segment).
const DOMAIN_PREFIXES: &[(&str, Domain)] = &[
    ("alcoholic beverages", Domain::Alcohol),
    ("alcoholic beverage", Domain::Alcohol),
    ("beverages", Domain::Beverage),
    ("babyfood", Domain::Babyfood),
    ("fast foods", Domain::Prepared),
    ("restaurant", Domain::Prepared),
];

const NOISE_MARKERS: &[&str] = &[
    "footnote", "includes", "include", "usda", "commodity", "formerly", "serving",
];

const UNIT_WORDS: &[&str] = &[
    "oz", "fl", "ml", "mg", "lb", "lbs", "cup", "cups", "tbsp", "tsp", "gram", "grams", "kcal",
];

/// Leading beverage segments that classify rather than name the drink.
const GENERIC_BEVERAGE_SEGMENTS: &[&str] = &[
    "carbonated",
    "drink",
    "drinks",
    "nonalcoholic",
    "ready to drink",
    "drink mix",
];

/// Alcohol subtypes in priority order; first match wins.
const ALCOHOL_SUBTYPES: &[(AlcoholKind, &[&str])] = &[
    (AlcoholKind::Liqueur, &["liqueur", "liqueurs", "creme"]),
    (AlcoholKind::Beer, &["beer", "ale", "lager", "stout"]),
    (
        AlcoholKind::Wine,
        &["wine", "champagne", "sherry", "vermouth", "sake"],
    ),
    (
        AlcoholKind::Spirit,
        &[
            "distilled", "vodka", "gin", "rum", "whiskey", "whisky", "tequila", "brandy", "bourbon",
        ],
    ),
];

const WINE_QUALIFIERS: &[&str] = &[
    "red", "white", "rose", "sparkling", "dessert", "cooking", "table",
];
const BEER_QUALIFIERS: &[&str] = &["light", "regular", "lager", "stout", "ale"];
const LIQUEUR_QUALIFIERS: &[&str] = &["coffee", "chocolate", "almond", "orange", "cream"];
const SPIRIT_NAMES: &[&str] = &[
    "vodka", "gin", "rum", "whiskey", "whisky", "tequila", "brandy", "bourbon",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Alcohol,
    Beverage,
    Babyfood,
    Prepared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlcoholKind {
    Liqueur,
    Beer,
    Wine,
    Spirit,
}

impl AlcoholKind {
    fn noun(self) -> &'static str {
        match self {
            AlcoholKind::Liqueur => "liqueur",
            AlcoholKind::Beer => "beer",
            AlcoholKind::Wine => "wine",
            AlcoholKind::Spirit => "spirits",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalName {
    pub base_name: String,
    pub specific_name: String,
    pub base_slug: String,
    pub specific_slug: String,
    pub domain: Option<Domain>,
    /// Parenthetical fragments kept as alternate names (normalized).
    pub alternate_names: Vec<String>,
    /// Every parenthetical fragment removed, noise included (original text).
    pub removed_fragments: Vec<String>,
    /// Brand segments removed (original casing).
    pub brands: Vec<String>,
    /// Normalized comma segments after prefix and brand stripping.
    pub working_segments: Vec<String>,
    /// Working segments with state tokens removed; empty segments dropped.
    pub cleaned_segments: Vec<String>,
}

/// Resolve a reference-food description into canonical names.
pub fn resolve_canonical(description: &str) -> CanonicalName {
    // (a) punctuation / whitespace
    let normalized = normalize_punctuation(description);

    // (b) parentheticals
    let (without_parens, removed_fragments, alternate_names) = strip_parentheticals(&normalized);

    let original_segments: Vec<String> = without_parens
        .split(',')
        .map(|segment| segment.trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect();

    // (c) boilerplate prefix
    let (domain, original_segments) = strip_domain_prefix(original_segments);

    // (d) brands: detection on original casing, removal from lower-cased text
    let mut brands = Vec::new();
    let mut working_segments = Vec::new();
    for segment in &original_segments {
        if is_brand_segment(segment) {
            brands.push(segment.clone());
            continue;
        }
        let lowered = normalize_text(segment);
        if !lowered.is_empty() {
            working_segments.push(lowered);
        }
    }

    // (e) state tokens
    let cleaned_segments: Vec<String> = working_segments
        .iter()
        .map(|segment| strip_state_words(segment))
        .filter(|segment| !segment.is_empty())
        .collect();

    let base_name = base_name_for(domain, &cleaned_segments, &working_segments, description);
    let specific_name = specific_name_for(domain, &base_name, &cleaned_segments);

    CanonicalName {
        base_slug: slugify(&base_name),
        specific_slug: slugify(&specific_name),
        base_name,
        specific_name,
        domain,
        alternate_names,
        removed_fragments,
        brands,
        working_segments,
        cleaned_segments,
    }
}

fn normalize_punctuation(text: &str) -> String {
    let latin = deunicode(text).replace(';', ",");
    RE_WHITESPACE.replace_all(latin.trim(), " ").to_string()
}

fn strip_parentheticals(text: &str) -> (String, Vec<String>, Vec<String>) {
    let mut current = text.to_string();
    let mut removed = Vec::new();
    let mut alternates = Vec::new();

    // Innermost first; repeat for nested parentheses.
    while RE_PARENTHETICAL.is_match(&current) {
        for capture in RE_PARENTHETICAL.captures_iter(&current) {
            let fragment = capture[1].trim().to_string();
            if fragment.is_empty() {
                continue;
            }
            if !is_administrative_fragment(&fragment) {
                let alternate = normalize_text(&fragment);
                if !alternates.contains(&alternate) {
                    alternates.push(alternate);
                }
            }
            removed.push(fragment);
        }
        current = RE_PARENTHETICAL.replace_all(&current, " ").to_string();
    }

    // A dangling "(" with no closing bracket: drop the tail.
    if let Some(index) = current.find('(') {
        let tail = current[index + 1..].trim().to_string();
        if !tail.is_empty() {
            removed.push(tail);
        }
        current.truncate(index);
    }

    let cleaned = RE_WHITESPACE
        .replace_all(current.trim(), " ")
        .replace(" ,", ",");
    (cleaned, removed, alternates)
}

/// Footnotes, unit annotations and pure descriptor lists are not names.
fn is_administrative_fragment(fragment: &str) -> bool {
    let normalized = normalize_text(fragment);
    if normalized.is_empty() {
        return true;
    }
    if normalized.starts_with(|ch: char| ch.is_ascii_digit()) || fragment.contains('%') {
        return true;
    }
    let words: Vec<&str> = normalized.split(' ').collect();
    if words
        .iter()
        .any(|word| NOISE_MARKERS.contains(word) || UNIT_WORDS.contains(word))
    {
        return true;
    }
    let tokens = tokenize(&normalized);
    tokens.is_empty() || tokens.iter().all(|token| is_state_token(token))
}

fn strip_domain_prefix(segments: Vec<String>) -> (Option<Domain>, Vec<String>) {
    let lowered = segments
        .first()
        .map(|first| normalize_text(first))
        .unwrap_or_default();
    match DOMAIN_PREFIXES.iter().find(|(prefix, _)| lowered == *prefix) {
        Some((_, domain)) => (Some(*domain), segments.into_iter().skip(1).collect()),
        None => (None, segments),
    }
}

/// A comma segment whose every word is entirely uppercase letters.
pub fn is_brand_segment(segment: &str) -> bool {
    let mut letters = 0usize;
    for word in segment.split_whitespace() {
        let alphabetic: Vec<char> = word.chars().filter(|ch| ch.is_alphabetic()).collect();
        if alphabetic.iter().any(|ch| !ch.is_uppercase()) {
            return false;
        }
        letters += alphabetic.len();
    }
    letters >= 2
}

/// Remove state words from a normalized segment. "dry"/"dried" directly
/// followed by "roasted" or "heat" names a cooking method and is kept
/// together with its partner.
pub(crate) fn strip_state_words(segment: &str) -> String {
    let words: Vec<&str> = segment.split(' ').filter(|w| !w.is_empty()).collect();
    let mut kept: Vec<&str> = Vec::with_capacity(words.len());
    let mut index = 0;
    while index < words.len() {
        let word = words[index];
        let next = words.get(index + 1).copied();
        if matches!(word, "dry" | "dried") && matches!(next, Some("roasted") | Some("heat")) {
            kept.push(word);
            kept.push(next.unwrap_or_default());
            index += 2;
            continue;
        }
        if !is_state_token(word) {
            kept.push(word);
        }
        index += 1;
    }
    kept.join(" ")
}

fn detect_alcohol_kind(segments: &[String]) -> Option<AlcoholKind> {
    let words: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.split(' '))
        .collect();
    ALCOHOL_SUBTYPES
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| words.contains(marker)))
        .map(|(kind, _)| *kind)
}

fn base_name_for(
    domain: Option<Domain>,
    cleaned: &[String],
    working: &[String],
    description: &str,
) -> String {
    let fallback = || {
        working
            .first()
            .cloned()
            .unwrap_or_else(|| normalize_text(description))
    };

    match domain {
        Some(Domain::Alcohol) => match detect_alcohol_kind(cleaned) {
            Some(kind) => kind.noun().to_string(),
            None => cleaned.first().cloned().unwrap_or_else(fallback),
        },
        Some(Domain::Beverage) => cleaned
            .iter()
            .find(|segment| !GENERIC_BEVERAGE_SEGMENTS.contains(&segment.as_str()))
            .or_else(|| cleaned.first())
            .cloned()
            .unwrap_or_else(fallback),
        _ => cleaned.first().cloned().unwrap_or_else(fallback),
    }
}

fn specific_name_for(domain: Option<Domain>, base_name: &str, cleaned: &[String]) -> String {
    if domain == Some(Domain::Alcohol) {
        if let Some(kind) = detect_alcohol_kind(cleaned) {
            return alcohol_specific_name(kind, cleaned);
        }
    }

    let has_juice_suffix = cleaned
        .iter()
        .skip(1)
        .any(|segment| segment.split(' ').next() == Some("juice"));
    if has_juice_suffix && !base_name.split(' ').any(|word| word == "juice") {
        return format!("{base_name} juice");
    }

    base_name.to_string()
}

fn alcohol_specific_name(kind: AlcoholKind, cleaned: &[String]) -> String {
    let words: Vec<&str> = cleaned
        .iter()
        .flat_map(|segment| segment.split(' '))
        .collect();
    let qualifiers = match kind {
        AlcoholKind::Wine => WINE_QUALIFIERS,
        AlcoholKind::Beer => BEER_QUALIFIERS,
        AlcoholKind::Liqueur => LIQUEUR_QUALIFIERS,
        AlcoholKind::Spirit => {
            return SPIRIT_NAMES
                .iter()
                .find(|name| words.contains(name))
                .map(|name| (*name).to_string())
                .unwrap_or_else(|| kind.noun().to_string());
        }
    };
    match qualifiers.iter().find(|q| words.contains(q)) {
        Some(qualifier) if *qualifier != kind.noun() => format!("{qualifier} {}", kind.noun()),
        _ => kind.noun().to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/analysis/canonical_tests.rs"]
mod tests;
