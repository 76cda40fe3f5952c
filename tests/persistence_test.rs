mod common;

use anyhow::Result;
use common::{draft, seed_expenses, test_service_with_wallet};
use dispendio::application::LedgerService;
use dispendio::domain::{Category, ExpenseUpdate, DEFAULT_WALLET_CENTS};
use tempfile::TempDir;

#[tokio::test]
async fn test_snapshot_round_trip() -> Result<()> {
    let (mut service, temp) = test_service_with_wallet(500_000).await?;
    service.add_income(50000).await?;
    seed_expenses(&mut service).await?;
    let expected = service.state().clone();
    drop(service);

    let db_path = temp.path().join("test.db");
    let reloaded = LedgerService::connect(db_path.to_str().unwrap()).await?;

    assert_eq!(reloaded.state(), &expected);

    Ok(())
}

#[tokio::test]
async fn test_reconnect_preserves_insertion_order() -> Result<()> {
    let (mut service, temp) = test_service_with_wallet(500_000).await?;
    seed_expenses(&mut service).await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reloaded = LedgerService::connect(db_path.to_str().unwrap()).await?;

    let titles: Vec<_> = reloaded
        .expenses()
        .iter()
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Lunch", "Movie night", "Train ticket", "Groceries"]
    );

    Ok(())
}

#[tokio::test]
async fn test_edits_and_deletes_are_persisted() -> Result<()> {
    let (mut service, temp) = test_service_with_wallet(500_000).await?;
    let lunch = service
        .add_expense(draft("Lunch", 20000, Category::Food))
        .await?;
    let movie = service
        .add_expense(draft("Movie", 5000, Category::Entertainment))
        .await?;

    service
        .edit_expense(lunch.id, ExpenseUpdate::default().with_title("Team lunch"))
        .await?;
    service.delete_expense(movie.id).await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reloaded = LedgerService::connect(db_path.to_str().unwrap()).await?;

    assert_eq!(reloaded.expenses().len(), 1);
    assert_eq!(reloaded.expenses()[0].title, "Team lunch");
    assert_eq!(reloaded.wallet_balance(), 480000);

    Ok(())
}

#[tokio::test]
async fn test_uninitialized_database_yields_default_ledger() -> Result<()> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("fresh.db");
    // Create an empty database file without a snapshot.
    std::fs::File::create(&db_path)?;

    let service = LedgerService::connect(db_path.to_str().unwrap()).await?;

    assert_eq!(service.wallet_balance(), DEFAULT_WALLET_CENTS);
    assert!(service.expenses().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_connect_with_custom_default_wallet() -> Result<()> {
    let temp = TempDir::new()?;
    let db_path = temp.path().join("fresh.db");
    std::fs::File::create(&db_path)?;

    let service =
        LedgerService::connect_with_default(db_path.to_str().unwrap(), 123_456).await?;

    assert_eq!(service.wallet_balance(), 123_456);

    Ok(())
}

#[tokio::test]
async fn test_init_persists_starting_wallet() -> Result<()> {
    let (service, temp) = test_service_with_wallet(250_000).await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reloaded = LedgerService::connect(db_path.to_str().unwrap()).await?;

    assert_eq!(reloaded.wallet_balance(), 250_000);
    assert_eq!(reloaded.state().initial_balance, 250_000);

    Ok(())
}

#[tokio::test]
async fn test_reloaded_snapshot_passes_integrity_check() -> Result<()> {
    let (mut service, temp) = test_service_with_wallet(500_000).await?;
    service.add_income(100000).await?;
    seed_expenses(&mut service).await?;
    drop(service);

    let db_path = temp.path().join("test.db");
    let reloaded = LedgerService::connect(db_path.to_str().unwrap()).await?;

    let report = reloaded.check_integrity();
    assert!(report.is_consistent(), "issues: {:?}", report.issues);
    assert_eq!(report.expense_count, 4);

    Ok(())
}
