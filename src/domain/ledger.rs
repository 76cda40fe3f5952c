use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Category, Cents, Expense, ExpenseDraft, ExpenseId, ExpenseUpdate};

/// The ledger aggregate: a single wallet balance and the ordered expense
/// collection. Every mutation either completes atomically or leaves the
/// state untouched, preserving the balance invariant:
///
///   wallet_balance == initial_balance + income_total - sum(expense amounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub initial_balance: Cents,
    pub income_total: Cents,
    pub wallet_balance: Cents,
    pub expenses: Vec<Expense>,
}

/// Per-category aggregate over the current expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub total_cents: Cents,
    pub count: usize,
}

/// A window into the expense collection, in insertion order. Display
/// ordering (e.g. newest-first) is the caller's concern.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [Expense],
    /// The 1-based page actually returned, after clamping
    pub page: usize,
    pub page_count: usize,
    pub total_count: usize,
}

impl LedgerState {
    /// Fresh ledger with the given starting wallet balance and no expenses.
    pub fn with_wallet(initial_balance: Cents) -> Self {
        Self {
            initial_balance,
            income_total: 0,
            wallet_balance: initial_balance,
            expenses: Vec::new(),
        }
    }

    /// Record an income, increasing the wallet balance.
    /// Returns the updated balance.
    pub fn add_income(&mut self, amount_cents: Cents) -> Result<Cents, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount {
                amount: amount_cents,
            });
        }
        self.income_total += amount_cents;
        self.wallet_balance += amount_cents;
        Ok(self.wallet_balance)
    }

    /// Record a new expense, decreasing the wallet balance.
    /// Rejected whole if the draft is invalid or the balance is insufficient.
    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<Expense, LedgerError> {
        validate_title(&draft.title)?;
        validate_amount(draft.amount_cents)?;

        if draft.amount_cents > self.wallet_balance {
            return Err(LedgerError::InsufficientBalance {
                balance: self.wallet_balance,
                required: draft.amount_cents,
            });
        }

        let expense = draft.into_expense();
        self.wallet_balance -= expense.amount_cents;
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    /// Merge updated fields into an existing expense, adjusting the wallet
    /// balance by the amount delta. Fields left `None` keep prior values.
    pub fn edit_expense(
        &mut self,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, LedgerError> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(amount) = update.amount_cents {
            validate_amount(amount)?;
        }

        // Validate before touching anything so a rejection leaves the
        // record and balance exactly as they were.
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;

        let old_amount = self.expenses[index].amount_cents;
        let new_amount = update.amount_cents.unwrap_or(old_amount);
        let balance_diff = old_amount - new_amount;

        if balance_diff < 0 && -balance_diff > self.wallet_balance {
            return Err(LedgerError::InsufficientBalance {
                balance: self.wallet_balance,
                required: -balance_diff,
            });
        }

        let expense = &mut self.expenses[index];
        if let Some(title) = update.title {
            expense.title = title;
        }
        if let Some(category) = update.category {
            expense.category = category;
        }
        if let Some(date) = update.date {
            expense.date = date;
        }
        expense.amount_cents = new_amount;
        self.wallet_balance += balance_diff;

        Ok(self.expenses[index].clone())
    }

    /// Remove an expense, refunding its amount to the wallet.
    /// Returns the removed record.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;

        let removed = self.expenses.remove(index);
        self.wallet_balance += removed.amount_cents;
        Ok(removed)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Verify the ledger invariants hold for the current state.
    pub fn verify_integrity(&self) -> IntegrityReport {
        let mut issues = Vec::new();

        let expected = self.initial_balance + self.income_total - total_expenses(&self.expenses);
        if self.wallet_balance != expected {
            issues.push(format!(
                "wallet balance {} does not match expected {} (initial + income - expenses)",
                self.wallet_balance, expected
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for expense in &self.expenses {
            if !seen.insert(expense.id) {
                issues.push(format!("duplicate expense id {}", expense.id));
            }
            if expense.amount_cents <= 0 {
                issues.push(format!(
                    "expense {} has non-positive amount {}",
                    expense.id, expense.amount_cents
                ));
            }
            if expense.title.trim().is_empty() {
                issues.push(format!("expense {} has an empty title", expense.id));
            }
        }

        IntegrityReport {
            expense_count: self.expenses.len(),
            total_expenses_cents: total_expenses(&self.expenses),
            wallet_balance: self.wallet_balance,
            issues,
        }
    }
}

/// Result of an integrity check over a ledger snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub expense_count: usize,
    pub total_expenses_cents: Cents,
    pub wallet_balance: Cents,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Sum of all current expense amounts.
pub fn total_expenses(expenses: &[Expense]) -> Cents {
    expenses.iter().map(|e| e.amount_cents).sum()
}

/// Aggregate current expenses by category.
/// Categories with no expenses are absent from the map.
pub fn totals_by_category(expenses: &[Expense]) -> HashMap<Category, CategoryTotal> {
    let mut totals: HashMap<Category, CategoryTotal> = HashMap::new();

    for expense in expenses {
        let entry = totals.entry(expense.category).or_default();
        entry.total_cents += expense.amount_cents;
        entry.count += 1;
    }

    totals
}

/// Slice a 1-based page out of the expense collection, preserving insertion
/// order. The page number is clamped into `[1, page_count]`, so an empty
/// collection yields an empty page 1. A zero page size yields an empty page.
pub fn paginate(expenses: &[Expense], page: usize, page_size: usize) -> Page<'_> {
    let total_count = expenses.len();

    if page_size == 0 {
        return Page {
            items: &[],
            page: 1,
            page_count: 1,
            total_count,
        };
    }

    let page_count = total_count.div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_count);
    let items = if start < total_count {
        &expenses[start..end]
    } else {
        &[]
    };

    Page {
        items,
        page,
        page_count,
        total_count,
    }
}

fn validate_title(title: &str) -> Result<(), LedgerError> {
    if title.trim().is_empty() {
        return Err(LedgerError::EmptyTitle);
    }
    Ok(())
}

fn validate_amount(amount_cents: Cents) -> Result<(), LedgerError> {
    if amount_cents <= 0 {
        return Err(LedgerError::InvalidAmount {
            amount: amount_cents,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Non-positive income or expense amount
    InvalidAmount { amount: Cents },
    /// Expense title is empty or whitespace
    EmptyTitle,
    /// The operation would drive the wallet balance negative
    InsufficientBalance { balance: Cents, required: Cents },
    /// Edit/delete referenced an unknown expense id
    ExpenseNotFound(ExpenseId),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::InvalidAmount { amount } => {
                write!(f, "Amount must be positive, got {} cents", amount)
            }
            LedgerError::EmptyTitle => write!(f, "Expense title must not be empty"),
            LedgerError::InsufficientBalance { balance, required } => {
                write!(
                    f,
                    "Insufficient wallet balance: {} cents available, {} cents required",
                    balance, required
                )
            }
            LedgerError::ExpenseNotFound(id) => write!(f, "Expense not found: {}", id),
        }
    }
}

impl std::error::Error for LedgerError {}
