//! Domain models for SpendChat

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Expense category
///
/// This is the closed set offered to the remote model. The local keyword
/// table only ever produces a subset of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Education,
    Travel,
    Groceries,
    Dining,
    Utilities,
    Rent,
    Subscriptions,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Shopping => "shopping",
            Self::Bills => "bills",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Travel => "travel",
            Self::Groceries => "groceries",
            Self::Dining => "dining",
            Self::Utilities => "utilities",
            Self::Rent => "rent",
            Self::Subscriptions => "subscriptions",
            Self::Other => "other",
        }
    }

    /// All categories, in the order they are listed to the remote model
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transportation,
            Self::Entertainment,
            Self::Shopping,
            Self::Bills,
            Self::Healthcare,
            Self::Education,
            Self::Travel,
            Self::Groceries,
            Self::Dining,
            Self::Utilities,
            Self::Rent,
            Self::Subscriptions,
            Self::Other,
        ]
    }

    /// Parse a category name, mapping anything unrecognised to `Other`
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Display name with the first letter capitalised ("food" -> "Food")
    pub fn title(&self) -> String {
        title_case(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting an expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    /// Defaults to today's local date when not set
    pub date: Option<NaiveDate>,
}

/// Summed spending for one category within a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Capitalise the first letter of each whitespace-separated word
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
