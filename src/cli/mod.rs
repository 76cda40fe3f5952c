use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::LedgerService;
use crate::domain::{
    format_cents, parse_cents, Category, ExpenseDraft, ExpenseUpdate, DEFAULT_WALLET_CENTS,
};
use crate::io::{Exporter, ImportOptions, Importer};

/// Dispendio - Expense Tracker
#[derive(Parser)]
#[command(name = "dispendio")]
#[command(about = "A local-first expense tracker with a balance-checked wallet")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "dispendio.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init {
        /// Starting wallet balance (e.g., "5000.00", defaults to 5000.00)
        #[arg(short, long)]
        wallet: Option<String>,
    },

    /// Add income to the wallet
    Income {
        /// Amount to add (e.g., "1000.00" or "1000")
        amount: String,
    },

    /// Record a new expense
    Add {
        /// Expense title
        title: String,

        /// Expense amount (e.g., "200.00" or "200")
        #[arg(short, long)]
        amount: String,

        /// Category: food, entertainment, travel
        #[arg(short, long)]
        category: Category,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an existing expense
    Edit {
        /// Expense ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New amount (e.g., "50.00")
        #[arg(short, long)]
        amount: Option<String>,

        /// New category: food, entertainment, travel
        #[arg(short, long)]
        category: Option<Category>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense (refunds its amount to the wallet)
    Delete {
        /// Expense ID
        id: String,
    },

    /// Show detailed expense information
    Show {
        /// Expense ID
        id: String,
    },

    /// Show the wallet balance
    Balance,

    /// List transactions, paginated
    Transactions {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Transactions per page
        #[arg(long, default_value = "10")]
        page_size: usize,
    },

    /// Show total and per-category expense aggregates
    Totals {
        /// Include categories with no expenses
        #[arg(long)]
        all_categories: bool,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import expenses from CSV (columns: title, amount, category, date)
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if self.verbose {
            eprintln!("Using database: {}", self.database);
        }

        match self.command {
            Commands::Init { wallet } => {
                let initial = match wallet {
                    Some(amount) => parse_cents(&amount)
                        .context("Invalid wallet amount. Use '5000.00' or '5000'")?,
                    None => DEFAULT_WALLET_CENTS,
                };
                let service = LedgerService::init(&self.database, initial).await?;
                println!(
                    "Database initialized: {} (wallet balance {})",
                    self.database,
                    format_cents(service.wallet_balance())
                );
            }

            Commands::Income { amount } => {
                let mut service = LedgerService::connect(&self.database).await?;
                let amount_cents = parse_cents(&amount)
                    .context("Invalid amount format. Use '1000.00' or '1000'")?;

                let balance = service.add_income(amount_cents).await?;
                println!(
                    "Added income: {} (balance {})",
                    format_cents(amount_cents),
                    format_cents(balance)
                );
            }

            Commands::Add {
                title,
                amount,
                category,
                date,
            } => {
                let mut service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '200.00' or '200'")?;
                let date = parse_date_or_today(date.as_deref())?;

                let expense = service
                    .add_expense(ExpenseDraft::new(title, amount_cents, category, date))
                    .await?;

                println!(
                    "Added expense: {} {} [{}] ({})",
                    format_cents(expense.amount_cents),
                    expense.title,
                    expense.category,
                    expense.id
                );
                println!("Wallet balance: {}", format_cents(service.wallet_balance()));
            }

            Commands::Edit {
                id,
                title,
                amount,
                category,
                date,
            } => {
                let mut service = LedgerService::connect(&self.database).await?;
                let expense_id = parse_expense_id(&id)?;

                let mut update = ExpenseUpdate::default();
                if let Some(title) = title {
                    update.title = Some(title);
                }
                if let Some(amount) = amount {
                    update.amount_cents =
                        Some(parse_cents(&amount).context("Invalid amount format")?);
                }
                if let Some(category) = category {
                    update.category = Some(category);
                }
                if let Some(date) = date {
                    update.date = Some(parse_date(&date)?);
                }

                if update.is_empty() {
                    println!("Nothing to update.");
                    return Ok(());
                }

                let expense = service.edit_expense(expense_id, update).await?;
                println!(
                    "Updated expense: {} {} [{}]",
                    format_cents(expense.amount_cents),
                    expense.title,
                    expense.category
                );
                println!("Wallet balance: {}", format_cents(service.wallet_balance()));
            }

            Commands::Delete { id } => {
                let mut service = LedgerService::connect(&self.database).await?;
                let expense_id = parse_expense_id(&id)?;

                let removed = service.delete_expense(expense_id).await?;
                println!(
                    "Deleted expense: {} {} (refunded to wallet)",
                    format_cents(removed.amount_cents),
                    removed.title
                );
                println!("Wallet balance: {}", format_cents(service.wallet_balance()));
            }

            Commands::Show { id } => {
                let service = LedgerService::connect(&self.database).await?;
                let expense_id = parse_expense_id(&id)?;
                let expense = service.expense(expense_id)?;

                println!("Expense: {}", expense.title);
                println!("  ID:       {}", expense.id);
                println!("  Amount:   {}", format_cents(expense.amount_cents));
                println!("  Category: {}", expense.category);
                println!("  Date:     {}", expense.date.format("%Y-%m-%d"));
                println!(
                    "  Recorded: {}",
                    expense.recorded_at.format("%Y-%m-%d %H:%M:%S")
                );
            }

            Commands::Balance => {
                let service = LedgerService::connect(&self.database).await?;
                println!("Wallet balance: {}", format_cents(service.wallet_balance()));
            }

            Commands::Transactions { page, page_size } => {
                let service = LedgerService::connect(&self.database).await?;
                run_transactions_command(&service, page, page_size);
            }

            Commands::Totals {
                all_categories,
                format,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_totals_command(&service, all_categories, &format)?;
            }

            Commands::Check => {
                let service = LedgerService::connect(&self.database).await?;
                run_check_command(&service);
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref())?;
            }

            Commands::Import { input, dry_run } => {
                let mut service = LedgerService::connect(&self.database).await?;
                run_import_command(&mut service, input.as_deref(), dry_run).await?;
            }
        }

        Ok(())
    }
}

fn run_transactions_command(service: &LedgerService, page: usize, page_size: usize) {
    let view = service.transactions_page(page, page_size);

    if view.total_count == 0 {
        println!("No transactions recorded.");
        return;
    }

    println!(
        "Transactions (page {} of {}, {} total)",
        view.page, view.page_count, view.total_count
    );
    println!(
        "{:<36} {:<12} {:<15} {:<24} {:>12}",
        "ID", "DATE", "CATEGORY", "TITLE", "AMOUNT"
    );
    println!("{}", "-".repeat(102));
    for expense in &view.expenses {
        println!(
            "{:<36} {:<12} {:<15} {:<24} {:>12}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.category.to_string(),
            expense.title,
            format_cents(expense.amount_cents)
        );
    }
}

fn run_totals_command(service: &LedgerService, all_categories: bool, format: &str) -> Result<()> {
    let report = service.totals_report(all_categories);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "table" => {
            println!(
                "{:<15} {:>12} {:>8} {:>8}",
                "CATEGORY", "TOTAL", "COUNT", "SHARE"
            );
            println!("{}", "-".repeat(46));
            for summary in &report.categories {
                println!(
                    "{:<15} {:>12} {:>8} {:>7.1}%",
                    summary.category.to_string(),
                    format_cents(summary.total_cents),
                    summary.count,
                    summary.percentage
                );
            }
            println!("{}", "-".repeat(46));
            println!(
                "{:<15} {:>12}",
                "TOTAL",
                format_cents(report.total_cents)
            );
        }
        other => anyhow::bail!("Unknown format '{}'. Valid formats: table, json", other),
    }

    Ok(())
}

fn run_check_command(service: &LedgerService) {
    let report = service.check_integrity();

    println!("Ledger integrity check");
    println!("  Expenses:       {}", report.expense_count);
    println!(
        "  Total spent:    {}",
        format_cents(report.total_expenses_cents)
    );
    println!("  Wallet balance: {}", format_cents(report.wallet_balance));

    if report.is_consistent() {
        println!("  Status:         OK");
    } else {
        println!("  Status:         {} issue(s) found", report.issues.len());
        for issue in &report.issues {
            println!("    - {}", issue);
        }
    }
}

fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(service);
    let writer: Box<dyn std::io::Write> = match output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    match export_type {
        "expenses" => {
            let count = exporter.export_expenses_csv(writer)?;
            if let Some(path) = output {
                eprintln!("Exported {} expense(s) to {}", count, path);
            }
        }
        "full" => {
            exporter.export_snapshot_json(writer)?;
            if let Some(path) = output {
                eprintln!("Exported full snapshot to {}", path);
            }
        }
        other => anyhow::bail!("Unknown export type '{}'. Valid types: expenses, full", other),
    }

    Ok(())
}

async fn run_import_command(
    service: &mut LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let reader: Box<dyn std::io::Read> = match input {
        Some(path) => Box::new(
            std::fs::File::open(path)
                .with_context(|| format!("Failed to open input file '{}'", path))?,
        ),
        None => Box::new(std::io::stdin()),
    };

    let mut importer = Importer::new(service);
    let result = importer
        .import_expenses_csv(reader, ImportOptions { dry_run })
        .await?;

    if dry_run {
        println!("Dry run: {} row(s) would be imported", result.imported);
    } else {
        println!("Imported {} expense(s)", result.imported);
    }

    if !result.errors.is_empty() {
        println!("{} row(s) failed:", result.errors.len());
        for error in &result.errors {
            match &error.field {
                Some(field) => println!("  line {} ({}): {}", error.line, field, error.error),
                None => println!("  line {}: {}", error.line, error.error),
            }
        }
    }

    Ok(())
}

fn parse_expense_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).context("Invalid expense ID format (expected UUID)")
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_date_or_today(date_str: Option<&str>) -> Result<NaiveDate> {
    match date_str {
        Some(s) => parse_date(s),
        None => Ok(Utc::now().date_naive()),
    }
}
