use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, Cents};

pub type ExpenseId = Uuid;

/// A single recorded expense. Expenses keep their position in the ledger:
/// edits happen in place and deletes remove in place, so the collection
/// always reflects insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    /// Display label, never empty
    pub title: String,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub category: Category,
    /// Calendar date the expense occurred (not necessarily creation time)
    pub date: NaiveDate,
    /// When we recorded this expense in the system
    pub recorded_at: DateTime<Utc>,
}

/// User-supplied fields for a new expense. The ledger assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount_cents: Cents,
    pub category: Category,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn new(
        title: impl Into<String>,
        amount_cents: Cents,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            amount_cents,
            category,
            date,
        }
    }

    /// Materialize the draft into a full expense with a fresh id.
    pub(crate) fn into_expense(self) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: self.title,
            amount_cents: self.amount_cents,
            category: self.category,
            date: self.date,
            recorded_at: Utc::now(),
        }
    }
}

/// Partial update for an existing expense. `None` fields keep their
/// prior values.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub amount_cents: Option<Cents>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount_cents.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_amount(mut self, amount_cents: Cents) -> Self {
        self.amount_cents = Some(amount_cents);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
