// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use dispendio::application::LedgerService;
use dispendio::domain::{Category, Cents, ExpenseDraft};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database and a
/// 5000.00 wallet
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    test_service_with_wallet(500_000).await
}

/// Helper to create a test service with a specific starting wallet
pub async fn test_service_with_wallet(wallet: Cents) -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), wallet).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to build an expense draft with a fixed date
pub fn draft(title: &str, amount_cents: Cents, category: Category) -> ExpenseDraft {
    ExpenseDraft::new(title, amount_cents, category, parse_date("2024-01-01"))
}

/// Seed the ledger with a small mixed set of expenses
pub async fn seed_expenses(service: &mut LedgerService) -> Result<()> {
    service
        .add_expense(draft("Lunch", 20000, Category::Food))
        .await?;
    service
        .add_expense(draft("Movie night", 5000, Category::Entertainment))
        .await?;
    service
        .add_expense(draft("Train ticket", 15000, Category::Travel))
        .await?;
    service
        .add_expense(draft("Groceries", 30000, Category::Food))
        .await?;
    Ok(())
}
