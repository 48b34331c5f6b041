//! Integration tests for spendchat-core
//!
//! These tests exercise the full message → extract → store → report workflow.

use chrono::{Duration, NaiveDate};
use spendchat_core::{
    AIClient, Category, ChatDispatcher, ChatIntent, Database, ExpenseExtractor, ExtractionSource,
    MockBackend,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

// =============================================================================
// Chat Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_record_then_summarize() {
    let db = Database::in_memory().expect("Failed to create test database");
    let dispatcher = ChatDispatcher::new(db.clone(), None);

    let messages = [
        "I spent ₹15 on lunch",
        "Paid ₹50 for groceries at the supermarket",
        "I paid ₹120 for a movie",
        "Bought groceries for 85",
    ];
    for message in messages {
        let reply = dispatcher
            .handle_at(message, today())
            .await
            .expect("Failed to record expense");
        assert!(reply.expense_id.is_some(), "No expense stored for {}", message);
    }

    assert_eq!(db.expense_count().unwrap(), 4);

    let reply = dispatcher
        .handle_at("Give me a spending summary", today())
        .await
        .unwrap();

    assert!(reply.message.contains("(last 30 days)"));
    assert!(reply.message.contains("Total: ₹270.00"));
    assert!(reply.message.contains("• Groceries: ₹135.00 (50.0%)"));
    assert!(reply.message.contains("• Entertainment: ₹120.00"));
    assert!(reply.message.contains("• Food: ₹15.00"));
}

#[tokio::test]
async fn test_record_reply_includes_running_insight() {
    let db = Database::in_memory().unwrap();
    let dispatcher = ChatDispatcher::new(db, None);

    dispatcher
        .handle_at("I spent ₹40 on dinner", today())
        .await
        .unwrap();
    let reply = dispatcher
        .handle_at("I paid ₹10 for a bus ticket", today())
        .await
        .unwrap();

    assert_eq!(
        reply.message,
        "✅ Added ₹10.00 for for a bus ticket (transportation) on 2024-06-15"
    );
    assert_eq!(
        reply.insights.as_deref(),
        Some("Total: ₹50.00 | Top category: food (₹40.00)")
    );
}

#[tokio::test]
async fn test_weekly_window_excludes_older_expenses() {
    let db = Database::in_memory().unwrap();
    let dispatcher = ChatDispatcher::new(db.clone(), None);

    dispatcher
        .handle_at("I spent ₹15 on lunch", today() - Duration::days(10))
        .await
        .unwrap();

    let weekly = dispatcher
        .handle_at("show this week", today())
        .await
        .unwrap();
    assert!(weekly.message.starts_with("No expenses found"));

    let monthly = dispatcher
        .handle_at("show this month", today())
        .await
        .unwrap();
    assert!(monthly.message.contains("Total: ₹15.00"));
}

#[tokio::test]
async fn test_mock_backend_end_to_end() {
    let db = Database::in_memory().unwrap();
    let dispatcher = ChatDispatcher::new(db.clone(), Some(AIClient::mock()));

    let reply = dispatcher
        .handle_at("I paid ₹15 for Uber today", today())
        .await
        .unwrap();

    let stored = db.get_expense(reply.expense_id.unwrap()).unwrap().unwrap();
    assert_eq!(stored.amount, 15.0);
    assert_eq!(stored.category, Category::Transportation);
    assert_eq!(
        reply.insights.as_deref(),
        Some("Mock insight: reviewed 1 recent expenses.")
    );
}

#[tokio::test]
async fn test_failing_backend_degrades_to_local() {
    let client = AIClient::Mock(MockBackend::failing());
    let extractor = ExpenseExtractor::new(Some(client.clone()));

    let extracted = extractor.extract_at("I spent ₹15 on lunch", today()).await;
    assert_eq!(extracted.source, ExtractionSource::Local);
    assert_eq!(extracted.amount, 15.0);

    let db = Database::in_memory().unwrap();
    let dispatcher = ChatDispatcher::new(db, Some(client));
    let reply = dispatcher
        .handle_at("I spent ₹15 on lunch", today())
        .await
        .unwrap();
    assert_eq!(
        reply.insights.as_deref(),
        Some("Total: ₹15.00 | Top category: food (₹15.00)")
    );
}

// =============================================================================
// Store Consistency Tests
// =============================================================================

#[tokio::test]
async fn test_aggregate_matches_listing_after_chat() {
    let db = Database::in_memory().unwrap();
    let dispatcher = ChatDispatcher::new(db.clone(), None);

    for message in [
        "spent 12.75 on breakfast",
        "paid ₹300 electricity bill",
        "bought clothes for 999.99",
        "cost of taxi 45",
    ] {
        dispatcher.handle_at(message, today()).await.unwrap();
    }

    let start = spendchat_core::db::window_start(today(), 30);
    let listed: f64 = db
        .list_expenses_since(start, None)
        .unwrap()
        .iter()
        .map(|e| e.amount)
        .sum();
    let aggregated: f64 = db
        .spending_by_category_since(start)
        .unwrap()
        .iter()
        .map(|t| t.total)
        .sum();

    assert!((listed - aggregated).abs() < 1e-9);
}

#[test]
fn test_intent_table() {
    let cases = [
        ("I spent ₹25 on dinner", ChatIntent::RecordExpense),
        ("Show my weekly spending", ChatIntent::Summarize { days: 7 }),
        ("How much did I spend on food?", ChatIntent::Summarize { days: 30 }),
        ("hey", ChatIntent::Greet),
        ("Add ₹15 for coffee", ChatIntent::Help),
    ];

    for (message, expected) in cases {
        assert_eq!(ChatIntent::classify(message), expected, "message: {}", message);
    }
}
