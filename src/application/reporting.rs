use serde::{Deserialize, Serialize};

use crate::domain::{
    paginate, total_expenses, totals_by_category, Category, Cents, Expense,
};

/// Aggregate view over the current expenses: the grand total plus one
/// summary per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsReport {
    pub total_cents: Cents,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total_cents: Cents,
    pub count: usize,
    /// Share of the grand total, 0.0 when there are no expenses
    pub percentage: f64,
}

/// A paginated window of transactions, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsPage {
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub expenses: Vec<Expense>,
}

/// Build the totals report. When `include_empty` is set, every category in
/// the enumerated set appears even with zero expenses; otherwise empty
/// categories are omitted.
pub fn build_totals_report(expenses: &[Expense], include_empty: bool) -> TotalsReport {
    let total_cents = total_expenses(expenses);
    let by_category = totals_by_category(expenses);

    let categories = Category::ALL
        .iter()
        .filter_map(|category| {
            let totals = by_category.get(category).copied();
            if totals.is_none() && !include_empty {
                return None;
            }
            let totals = totals.unwrap_or_default();
            let percentage = if total_cents > 0 {
                totals.total_cents as f64 / total_cents as f64 * 100.0
            } else {
                0.0
            };
            Some(CategorySummary {
                category: *category,
                total_cents: totals.total_cents,
                count: totals.count,
                percentage,
            })
        })
        .collect();

    TotalsReport {
        total_cents,
        categories,
    }
}

/// Build a transactions page view.
pub fn build_transactions_page(
    expenses: &[Expense],
    page: usize,
    page_size: usize,
) -> TransactionsPage {
    let window = paginate(expenses, page, page_size);
    TransactionsPage {
        page: window.page,
        page_count: window.page_count,
        page_size,
        total_count: window.total_count,
        expenses: window.items.to_vec(),
    }
}
