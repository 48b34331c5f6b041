//! Keyword and pattern heuristics for expense messages
//!
//! The no-network path: pull an amount, a category and a cleaned-up
//! description out of free text with a fixed set of regexes and keywords.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Category;

use super::{ExtractedExpense, ExtractionSource, DEFAULT_DESCRIPTION};

/// Amount patterns in precedence order, matched against lower-cased text
static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"₹(\d+(?:\.\d{2})?)").unwrap(),
        Regex::new(r"(\d+(?:\.\d{2})?)\s*₹").unwrap(),
        Regex::new(r"paid\s*(\d+(?:\.\d{2})?)").unwrap(),
        Regex::new(r"spent\s*(\d+(?:\.\d{2})?)").unwrap(),
        Regex::new(r"(\d+(?:\.\d{2})?)").unwrap(),
    ]
});

/// Currency amounts in either order ("₹15", "15 ₹")
static CURRENCY_AMOUNTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"₹\d+(?:\.\d{2})?").unwrap(),
        Regex::new(r"\d+(?:\.\d{2})?\s*₹").unwrap(),
    ]
});

/// Boilerplate spending phrases removed from descriptions
static BOILERPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:i spent|i paid|paid for|bought)\b").unwrap());

/// Category keywords, first matching row wins
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Food, &["lunch", "dinner", "breakfast", "snack", "meal"]),
    (
        Category::Groceries,
        &["grocery", "groceries", "supermarket", "vegetable", "fruit", "milk", "bread"],
    ),
    (
        Category::Transportation,
        &["bus", "train", "taxi", "uber", "ola", "fuel", "transport"],
    ),
    (
        Category::Entertainment,
        &["movie", "game", "concert", "netflix", "theater"],
    ),
    (
        Category::Shopping,
        &["buy", "purchase", "shopping", "clothes", "amazon"],
    ),
    (
        Category::Bills,
        &["bill", "electricity", "water", "internet", "phone"],
    ),
    (
        Category::Healthcare,
        &["doctor", "hospital", "medicine", "pharmacy"],
    ),
    (Category::Education, &["book", "course", "tuition", "school"]),
    (Category::Travel, &["flight", "hotel", "vacation", "trip"]),
    (Category::Dining, &["restaurant", "cafe", "coffee", "eat out"]),
];

/// First amount found under the pattern precedence, or 0 when there is none
pub fn parse_amount(text: &str) -> f64 {
    let lower = text.to_lowercase();
    AMOUNT_PATTERNS
        .iter()
        .find_map(|re| {
            re.captures(&lower)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .unwrap_or(0.0)
}

/// Category of the first keyword row with a substring hit
///
/// Plain substring matching: "bus" also hits "business".
pub fn detect_category(text: &str) -> Category {
    let lower = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

/// Strip currency amounts and boilerplate phrases, then collapse whitespace
pub fn clean_description(text: &str) -> String {
    let mut cleaned = text.to_string();
    for re in CURRENCY_AMOUNTS.iter() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    cleaned = BOILERPLATE.replace_all(&cleaned, "").into_owned();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        collapsed
    }
}

/// Extract an expense using only the local heuristics
pub fn local_extract(text: &str, today: NaiveDate) -> ExtractedExpense {
    ExtractedExpense {
        amount: parse_amount(text),
        description: clean_description(text),
        category: detect_category(text),
        date: today,
        source: ExtractionSource::Local,
    }
}
