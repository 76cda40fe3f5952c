use crate::domain::{
    Cents, Expense, ExpenseDraft, ExpenseId, ExpenseUpdate, IntegrityReport, LedgerState,
    DEFAULT_WALLET_CENTS,
};
use crate::storage::Repository;

use super::reporting::{build_totals_report, build_transactions_page, TotalsReport, TransactionsPage};
use super::AppError;

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// The ledger state lives in memory; the repository is a snapshot
/// collaborator. A snapshot is written after every successful mutation, but
/// a failed save never rolls back the in-memory state - it is logged and
/// the operation still counts as applied.
pub struct LedgerService {
    repo: Repository,
    state: LedgerState,
}

impl LedgerService {
    /// Initialize a new database at the given path, starting from a fresh
    /// ledger with the given wallet balance.
    pub async fn init(database_path: &str, initial_wallet: Cents) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        let state = LedgerState::with_wallet(initial_wallet);
        repo.save_state(&state).await?;
        Ok(Self { repo, state })
    }

    /// Connect to an existing database and load the persisted snapshot.
    /// An absent snapshot yields the default ledger.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        Self::connect_with_default(database_path, DEFAULT_WALLET_CENTS).await
    }

    /// Connect, falling back to a fresh ledger with the given wallet
    /// balance when no snapshot has been persisted yet.
    pub async fn connect_with_default(
        database_path: &str,
        default_wallet: Cents,
    ) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        // Migrations are idempotent; running them here means an existing but
        // never-initialized database still yields the default ledger.
        repo.migrate().await?;
        let state = match repo.load_state().await? {
            Some(state) => state,
            None => LedgerState::with_wallet(default_wallet),
        };
        Ok(Self { repo, state })
    }

    // ========================
    // Mutations
    // ========================

    /// Add income to the wallet. Returns the updated balance.
    pub async fn add_income(&mut self, amount_cents: Cents) -> Result<Cents, AppError> {
        let balance = self.state.add_income(amount_cents)?;
        self.persist().await;
        Ok(balance)
    }

    /// Record a new expense. Returns the created record.
    pub async fn add_expense(&mut self, draft: ExpenseDraft) -> Result<Expense, AppError> {
        let expense = self.state.add_expense(draft)?;
        self.persist().await;
        Ok(expense)
    }

    /// Edit an existing expense. Returns the updated record.
    pub async fn edit_expense(
        &mut self,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, AppError> {
        let expense = self.state.edit_expense(id, update)?;
        self.persist().await;
        Ok(expense)
    }

    /// Delete an expense, refunding its amount. Returns the removed record.
    pub async fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, AppError> {
        let expense = self.state.delete_expense(id)?;
        self.persist().await;
        Ok(expense)
    }

    /// Persist the current snapshot. Best-effort: failures are logged and
    /// do not roll back the in-memory state.
    async fn persist(&self) {
        if let Err(err) = self.repo.save_state(&self.state).await {
            tracing::warn!("failed to persist ledger snapshot: {:#}", err);
        }
    }

    // ========================
    // Derived views
    // ========================

    pub fn wallet_balance(&self) -> Cents {
        self.state.wallet_balance
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.state.expenses
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn expense(&self, id: ExpenseId) -> Result<&Expense, AppError> {
        self.state
            .expense(id)
            .ok_or(AppError::ExpenseNotFound(id))
    }

    /// Total and per-category aggregates over the current expenses.
    pub fn totals_report(&self, include_empty: bool) -> TotalsReport {
        build_totals_report(&self.state.expenses, include_empty)
    }

    /// A 1-based page of transactions in insertion order.
    pub fn transactions_page(&self, page: usize, page_size: usize) -> TransactionsPage {
        build_transactions_page(&self.state.expenses, page, page_size)
    }

    /// Verify the ledger invariants over the in-memory state.
    pub fn check_integrity(&self) -> IntegrityReport {
        self.state.verify_integrity()
    }
}
