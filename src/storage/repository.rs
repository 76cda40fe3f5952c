use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Category, Expense, LedgerState};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and loading ledger snapshots.
///
/// The ledger is small, so the whole snapshot is rewritten on every save
/// inside a single transaction. The `position` column preserves the
/// collection's insertion order across round-trips.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Load the persisted ledger snapshot.
    /// Returns `None` when nothing has been saved yet.
    pub async fn load_state(&self) -> Result<Option<LedgerState>> {
        let ledger_row = sqlx::query(
            r#"
            SELECT initial_balance, income_total, wallet_balance
            FROM ledger
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch ledger snapshot")?;

        let Some(ledger_row) = ledger_row else {
            return Ok(None);
        };

        let expense_rows = sqlx::query(
            r#"
            SELECT id, title, amount_cents, category, date, recorded_at
            FROM expenses
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch expenses")?;

        let expenses = expense_rows
            .iter()
            .map(Self::row_to_expense)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(LedgerState {
            initial_balance: ledger_row.get("initial_balance"),
            income_total: ledger_row.get("income_total"),
            wallet_balance: ledger_row.get("wallet_balance"),
            expenses,
        }))
    }

    /// Write the full ledger snapshot, replacing any previous one.
    pub async fn save_state(&self, state: &LedgerState) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin snapshot transaction")?;

        sqlx::query(
            r#"
            INSERT INTO ledger (id, initial_balance, income_total, wallet_balance, updated_at)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                initial_balance = excluded.initial_balance,
                income_total = excluded.income_total,
                wallet_balance = excluded.wallet_balance,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(state.initial_balance)
        .bind(state.income_total)
        .bind(state.wallet_balance)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .context("Failed to save ledger row")?;

        sqlx::query("DELETE FROM expenses")
            .execute(&mut *tx)
            .await
            .context("Failed to clear expenses")?;

        for (position, expense) in state.expenses.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO expenses (id, position, title, amount_cents, category, date, recorded_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(expense.id.to_string())
            .bind(position as i64)
            .bind(&expense.title)
            .bind(expense.amount_cents)
            .bind(expense.category.as_str())
            .bind(expense.date.format("%Y-%m-%d").to_string())
            .bind(expense.recorded_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save expense")?;
        }

        tx.commit()
            .await
            .context("Failed to commit snapshot transaction")?;

        Ok(())
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let id_str: String = row.get("id");
        let category_str: String = row.get("category");
        let date_str: String = row.get("date");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Expense {
            id: Uuid::parse_str(&id_str).context("Invalid expense ID")?,
            title: row.get("title"),
            amount_cents: row.get("amount_cents"),
            category: Category::from_str(&category_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", category_str))?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .context("Invalid expense date")?,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
