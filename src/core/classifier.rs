use crate::models::{PriceLevel, UserPreferences};

/// Cuisine rules, evaluated in order; the first rule with a matching keyword wins
const CUISINE_RULES: &[(&[&str], &str)] = &[
    (&["italian", "pasta", "pizza"], "Italian"),
    (&["japanese", "sushi"], "Japanese"),
    (&["chinese"], "Chinese"),
    (&["mexican", "taco"], "Mexican"),
    (&["indian", "curry", "spicy"], "Indian"),
    (&["thai"], "Thai"),
    (&["vegetarian", "vegan"], "Vegetarian"),
];

/// Dietary rules; every keyword of a rule must be present. Rules are independent.
const DIETARY_RULES: &[(&[&str], &str)] = &[
    (&["vegetarian"], "Vegetarian"),
    (&["vegan"], "Vegan"),
    (&["gluten", "free"], "Gluten-Free"),
    (&["halal"], "Halal"),
    (&["kosher"], "Kosher"),
    (&["dairy", "free"], "Dairy-Free"),
    (&["nut", "free"], "Nut-Free"),
];

/// Price rules, evaluated in order; at most one applies
const PRICE_RULES: &[(&[&str], PriceLevel)] = &[
    (&["cheap", "inexpensive", "budget"], PriceLevel::Inexpensive),
    (&["moderate", "mid-range"], PriceLevel::Moderate),
    (&["expensive", "high-end"], PriceLevel::Expensive),
    (&["luxury", "fine dining"], PriceLevel::VeryExpensive),
];

const NEARBY_KEYWORDS: &[&str] = &["near me", "nearby", "close by"];

/// Allergen keyword to canonical allergy label
const ALLERGY_KEYWORDS: &[(&str, &str)] = &[
    ("peanut", "Peanuts"),
    ("nut", "Tree Nuts"),
    ("dairy", "Milk"),
    ("egg", "Eggs"),
    ("fish", "Fish"),
    ("shellfish", "Shellfish"),
    ("wheat", "Wheat"),
    ("gluten", "Wheat"),
    ("soy", "Soy"),
];

/// Extract search preferences from a free-text (or transcribed voice) query
///
/// Matching is case-insensitive substring matching. The function is total:
/// a query that matches nothing yields the default preferences, which only
/// carry `use_current_location = true`.
pub fn classify_query(query: &str) -> UserPreferences {
    let text = query.to_lowercase();
    let mut preferences = UserPreferences::default();

    preferences.cuisine_type = detect_cuisine(&text).map(str::to_string);

    for label in detect_dietary_restrictions(&text) {
        preferences.add_dietary_restriction(label);
    }

    preferences.price_range = detect_price_range(&text);

    if wants_nearby(&text) {
        preferences.use_current_location = true;
    }

    for label in detect_allergies(&text) {
        preferences.add_allergy(label);
    }

    preferences
}

/// First matching cuisine label for an already-lowercased query
pub fn detect_cuisine(text: &str) -> Option<&'static str> {
    CUISINE_RULES
        .iter()
        .find(|(keywords, _)| contains_any(text, keywords))
        .map(|(_, label)| *label)
}

/// Every dietary label whose keywords all occur in the lowercased query
pub fn detect_dietary_restrictions(text: &str) -> Vec<&'static str> {
    DIETARY_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().all(|k| text.contains(k)))
        .map(|(_, label)| *label)
        .collect()
}

pub fn detect_price_range(text: &str) -> Option<PriceLevel> {
    PRICE_RULES
        .iter()
        .find(|(keywords, _)| contains_any(text, keywords))
        .map(|(_, level)| *level)
}

pub fn wants_nearby(text: &str) -> bool {
    contains_any(text, NEARBY_KEYWORDS)
}

/// Allergy labels, deduplicated, in keyword-table order
///
/// A keyword counts when it appears as `no {k}`, `{k} allergy` or `{k}-free`.
pub fn detect_allergies(text: &str) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = Vec::new();

    for &(keyword, label) in ALLERGY_KEYWORDS {
        let mentioned = text.contains(&format!("no {}", keyword))
            || text.contains(&format!("{} allergy", keyword))
            || text.contains(&format!("{}-free", keyword));

        if mentioned && !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels
}

#[inline]
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
