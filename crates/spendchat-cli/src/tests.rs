//! CLI command tests

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use spendchat_core::{Category, ChatReply, Database, Expense, NewExpense};

use crate::cli::{Cli, Commands, PromptsAction};
use crate::commands::{self, truncate};

fn setup_test_db() -> (tempfile::TempDir, PathBuf, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finance.db");
    let db = Database::new(path.to_str().unwrap()).unwrap();
    (dir, path, db)
}

fn add(db: &Database, amount: f64, category: Category) -> i64 {
    db.add_expense(&NewExpense {
        amount,
        description: format!("{} item", category),
        category,
        date: None,
    })
    .unwrap()
}

// ========== Argument Parsing ==========

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["spendchat", "init"]).unwrap();
    assert_eq!(cli.db, PathBuf::from("finance.db"));
    assert!(!cli.verbose);
    assert!(matches!(cli.command, Commands::Init));
}

#[test]
fn test_parse_serve_defaults() {
    let cli = Cli::try_parse_from(["spendchat", "serve"]).unwrap();
    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 0);
            assert_eq!(static_dir, PathBuf::from("ui"));
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli =
        Cli::try_parse_from(["spendchat", "summary", "--days", "7", "--db", "x.db", "-v"]).unwrap();
    assert_eq!(cli.db, PathBuf::from("x.db"));
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Summary { days: 7 }));
}

#[test]
fn test_parse_chat_joins_words() {
    let cli = Cli::try_parse_from(["spendchat", "chat", "I", "spent", "₹15", "on", "lunch"])
        .unwrap();
    match cli.command {
        Commands::Chat { message, json } => {
            assert_eq!(message.join(" "), "I spent ₹15 on lunch");
            assert!(!json);
        }
        _ => panic!("expected chat"),
    }
}

#[test]
fn test_parse_chat_requires_message() {
    assert!(Cli::try_parse_from(["spendchat", "chat"]).is_err());
}

#[test]
fn test_parse_expenses_with_category() {
    let cli = Cli::try_parse_from(["spendchat", "expenses", "-d", "14", "-c", "food"]).unwrap();
    match cli.command {
        Commands::Expenses { days, category } => {
            assert_eq!(days, 14);
            assert_eq!(category.as_deref(), Some("food"));
        }
        _ => panic!("expected expenses"),
    }
}

#[test]
fn test_parse_prompts_actions() {
    let cli = Cli::try_parse_from(["spendchat", "prompts"]).unwrap();
    assert!(matches!(cli.command, Commands::Prompts { action: None }));

    let cli = Cli::try_parse_from(["spendchat", "prompts", "show", "extract_expense"]).unwrap();
    match cli.command {
        Commands::Prompts {
            action: Some(PromptsAction::Show { prompt_id }),
        } => assert_eq!(prompt_id, "extract_expense"),
        _ => panic!("expected prompts show"),
    }
}

// ========== Commands ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Idempotent
    commands::cmd_init(&path).unwrap();
}

#[test]
fn test_cmd_expenses_and_summary() {
    let (_dir, path, db) = setup_test_db();
    add(&db, 15.0, Category::Food);
    add(&db, 40.0, Category::Travel);

    assert!(commands::cmd_expenses(&path, 30, None).is_ok());
    assert!(commands::cmd_expenses(&path, 30, Some("Food")).is_ok());
    assert!(commands::cmd_summary(&path, 30).is_ok());
}

#[test]
fn test_cmd_expenses_empty() {
    let (_dir, path, _db) = setup_test_db();
    assert!(commands::cmd_expenses(&path, 30, None).is_ok());
    assert!(commands::cmd_summary(&path, 7).is_ok());
}

#[test]
fn test_cmd_expenses_rejects_unknown_category() {
    let (_dir, path, _db) = setup_test_db();
    let err = commands::cmd_expenses(&path, 30, Some("pets")).unwrap_err();
    assert!(err.to_string().contains("Unknown category"));
}

#[test]
fn test_cmd_reset_with_yes() {
    let (_dir, path, db) = setup_test_db();
    add(&db, 15.0, Category::Food);
    add(&db, 25.0, Category::Bills);

    commands::cmd_reset(&path, true).unwrap();
    assert_eq!(db.expense_count().unwrap(), 0);
}

#[test]
fn test_cmd_reset_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");

    assert!(commands::cmd_reset(&path, true).is_err());
    assert!(!path.exists());
}

#[test]
fn test_cmd_prompts() {
    assert!(commands::cmd_prompts_list().is_ok());
    assert!(commands::cmd_prompts_show("spending_insight").is_ok());
    // Unknown ids print the known list rather than failing
    assert!(commands::cmd_prompts_show("nope").is_ok());
    assert!(commands::cmd_prompts_path().is_ok());
}

// ========== Rendering ==========

#[test]
fn test_render_reply_with_insight() {
    let reply = ChatReply {
        success: true,
        message: "✅ Added ₹15.00 for on lunch (food) on 2024-06-15".to_string(),
        expense_id: Some(3),
        insights: Some("Total: ₹15.00 | Top category: food (₹15.00)".to_string()),
    };

    assert_eq!(
        commands::render_reply(&reply),
        "✅ Added ₹15.00 for on lunch (food) on 2024-06-15\n\n\
         Total: ₹15.00 | Top category: food (₹15.00)\n\n(expense #3)"
    );
}

#[test]
fn test_render_reply_plain() {
    let reply = ChatReply {
        success: true,
        message: "hello".to_string(),
        expense_id: None,
        insights: None,
    };
    assert_eq!(commands::render_reply(&reply), "hello");
}

#[test]
fn test_format_expense_row() {
    let expense = Expense {
        id: 7,
        amount: 1234.5,
        description: "a very long description of a grocery run that keeps going".to_string(),
        category: Category::Groceries,
        date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        created_at: Utc::now(),
    };

    let row = commands::format_expense_row(&expense);
    assert!(row.contains("2024-06-15"));
    assert!(row.contains("₹1234.50"));
    assert!(row.contains("groceries"));
    assert!(row.ends_with("..."));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is too long", 10), "this is...");
    // Multi-byte characters are counted, not bytes
    assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
}
