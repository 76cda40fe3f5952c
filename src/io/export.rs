use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::LedgerState;

/// Full ledger snapshot for export/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub ledger: LedgerState,
}

/// Exporter for converting ledger data to various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export expenses to CSV format, in insertion order.
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "title",
            "amount_cents",
            "category",
            "date",
            "recorded_at",
        ])?;

        let expenses = self.service.expenses();
        for expense in expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.title.clone(),
                expense.amount_cents.to_string(),
                expense.category.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.recorded_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }

    /// Export the full ledger snapshot as JSON.
    pub fn export_snapshot_json<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            ledger: self.service.state().clone(),
        };
        serde_json::to_writer_pretty(writer, &snapshot)?;
        Ok(())
    }
}
