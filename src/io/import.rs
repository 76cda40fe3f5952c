use anyhow::Result;
use chrono::NaiveDate;
use std::io::Read;

use crate::application::LedgerService;
use crate::domain::{parse_cents, Category, ExpenseDraft};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Importer for loading expenses into the ledger.
///
/// Rows are replayed through the regular add-expense operation, so every
/// imported expense is validated against the wallet balance; rows that
/// would drive the balance negative are reported, not applied.
pub struct Importer<'a> {
    service: &'a mut LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a mut LedgerService) -> Self {
        Self { service }
    }

    /// Import expenses from CSV with columns: title, amount, category, date.
    pub async fn import_expenses_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut errors = Vec::new();

        // Dry runs replay rows against a scratch copy of the ledger, so the
        // preview enforces the same balance rules as a real import.
        let mut preview = options.dry_run.then(|| self.service.state().clone());

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let title = record.get(0).unwrap_or("").to_string();
            let amount_str = record.get(1).unwrap_or("");
            let category_str = record.get(2).unwrap_or("");
            let date_str = record.get(3).unwrap_or("");

            let amount_cents = match parse_cents(amount_str) {
                Ok(a) => a,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("amount".to_string()),
                        error: format!("Invalid amount: {}", e),
                    });
                    continue;
                }
            };

            let category = match Category::from_str(category_str) {
                Some(c) => c,
                None => {
                    errors.push(ImportError {
                        line,
                        field: Some("category".to_string()),
                        error: format!("Unrecognized category: {}", category_str),
                    });
                    continue;
                }
            };

            let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                Ok(d) => d,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("date".to_string()),
                        error: format!("Invalid date: {}", e),
                    });
                    continue;
                }
            };

            let draft = ExpenseDraft::new(title, amount_cents, category, date);
            let outcome = match preview.as_mut() {
                Some(state) => state.add_expense(draft).map(|_| ()).map_err(|e| e.to_string()),
                None => self
                    .service
                    .add_expense(draft)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            };

            match outcome {
                Ok(()) => imported += 1,
                Err(error) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error,
                    });
                }
            }
        }

        Ok(ImportResult { imported, errors })
    }
}
