//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in prose or code fences, so these
//! helpers pull out the first flat `{...}` object and coerce its fields.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Category;

use super::types::RemoteExpense;

/// First flat JSON object. Nested objects are not supported.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]+\}").unwrap());

/// Description used when the model leaves it out or sends a blank one
const DEFAULT_DESCRIPTION: &str = "Expense";

/// Shorten a raw model reply for error messages
fn truncate(raw: &str) -> String {
    const LIMIT: usize = 200;
    if raw.chars().count() > LIMIT {
        format!("{}...", raw.chars().take(LIMIT).collect::<String>())
    } else {
        raw.to_string()
    }
}

/// Find the first `{...}` object in a model reply
pub fn extract_first_json_object(response: &str) -> Result<&str> {
    JSON_OBJECT
        .find(response)
        .map(|m| m.as_str())
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "No JSON found in AI response | Raw: {}",
                truncate(response.trim())
            ))
        })
}

/// Coerce `amount` from a JSON number or a numeric string
fn coerce_amount(value: Option<&Value>) -> Result<f64> {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_start_matches('₹').trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::InvalidData("AI response has no usable amount".into()))?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "AI response has invalid amount: {}",
            amount
        )));
    }

    Ok(amount)
}

fn string_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse an expense from a model reply
///
/// `amount` is required. Everything else falls back: blank description to
/// "Expense", unknown category to `other`, missing or malformed date to `today`.
pub fn parse_remote_expense(response: &str, today: NaiveDate) -> Result<RemoteExpense> {
    let json_str = extract_first_json_object(response)?;
    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::InvalidData("AI response is not a JSON object".into()))?;

    let amount = coerce_amount(object.get("amount"))?;

    let description = string_field(object, "description")
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string();

    let category = string_field(object, "category")
        .map(Category::from_name_lossy)
        .unwrap_or_default();

    let date = string_field(object, "date")
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .unwrap_or(today);

    Ok(RemoteExpense {
        amount,
        description,
        category,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_extract_first_json_object_with_prose() {
        let response = "Sure! Here it is:\n```json\n{\"amount\": 15}\n```\nAnything else?";
        assert_eq!(
            extract_first_json_object(response).unwrap(),
            "{\"amount\": 15}"
        );
    }

    #[test]
    fn test_extract_first_json_object_takes_first() {
        let response = r#"{"amount": 1} {"amount": 2}"#;
        assert_eq!(extract_first_json_object(response).unwrap(), r#"{"amount": 1}"#);
    }

    #[test]
    fn test_extract_first_json_object_missing() {
        assert!(extract_first_json_object("I could not find an expense").is_err());
        assert!(extract_first_json_object("{}").is_err());
    }

    #[test]
    fn test_parse_remote_expense_full() {
        let response = r#"{"amount": 15.5, "description": "lunch", "category": "food", "date": "2024-03-09"}"#;
        let expense = parse_remote_expense(response, today()).unwrap();

        assert_eq!(expense.amount, 15.5);
        assert_eq!(expense.description, "lunch");
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_parse_remote_expense_string_amount_and_mixed_case_category() {
        let response = r#"{"amount":"12.5","category":"Food"}"#;
        let expense = parse_remote_expense(response, today()).unwrap();

        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.description, "Expense");
        assert_eq!(expense.date, today());
    }

    #[test]
    fn test_parse_remote_expense_unknown_category_is_other() {
        let response = r#"{"amount": 3, "description": "treats", "category": "pets"}"#;
        let expense = parse_remote_expense(response, today()).unwrap();
        assert_eq!(expense.category, Category::Other);
    }

    #[test]
    fn test_parse_remote_expense_bad_date_uses_today() {
        let response = r#"{"amount": 3, "date": "yesterday"}"#;
        let expense = parse_remote_expense(response, today()).unwrap();
        assert_eq!(expense.date, today());
    }

    #[test]
    fn test_parse_remote_expense_blank_description() {
        let response = r#"{"amount": 3, "description": "   "}"#;
        let expense = parse_remote_expense(response, today()).unwrap();
        assert_eq!(expense.description, "Expense");
    }

    #[test]
    fn test_parse_remote_expense_requires_amount() {
        assert!(parse_remote_expense(r#"{"description": "lunch"}"#, today()).is_err());
        assert!(parse_remote_expense(r#"{"amount": "lots"}"#, today()).is_err());
        assert!(parse_remote_expense(r#"{"amount": null}"#, today()).is_err());
    }

    #[test]
    fn test_parse_remote_expense_rejects_negative_amount() {
        assert!(parse_remote_expense(r#"{"amount": -5}"#, today()).is_err());
    }

    #[test]
    fn test_parse_remote_expense_invalid_json() {
        let err = parse_remote_expense("{amount: 5}", today()).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let long = "₹".repeat(300);
        let truncated = truncate(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
