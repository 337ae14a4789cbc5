use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analytics::{filter_by_range, summarize, DateRange};
use crate::cli::{Commands, RangeArgs};
use crate::models::{category_label, Expense, NewExpense};
use crate::store::{ExpenseStore, HttpStore};
use crate::ui::util::{format_amount, truncate};
use crate::view_model::{ExpenseViewModel, ViewState};

pub(crate) fn as_cli(command: Commands, store: HttpStore, currency_symbol: &str) -> Result<()> {
    match command {
        Commands::List { range } => {
            let state = fetch_view(store, range)?;
            print_expenses(&state, currency_symbol);
            Ok(())
        }
        Commands::Summary { range } => {
            let state = fetch_view(store, range)?;
            print_summary(&state, currency_symbol);
            Ok(())
        }
        Commands::Add {
            date,
            amount,
            description,
        } => {
            let draft = NewExpense::parse(&description.join(" "), &amount, &date)?;
            let created = store.create(&draft).context("Failed to add expense")?;
            info!(id = created.id, "Expense created");
            println!(
                "Added #{}: {} {} {}",
                created.id,
                created.date,
                format_amount(created.amount, currency_symbol),
                created.description
            );
            Ok(())
        }
        Commands::Update {
            id,
            date,
            amount,
            description,
        } => {
            let draft = NewExpense::parse(&description.join(" "), &amount, &date)?;
            let updated = store
                .update(id, &draft)
                .with_context(|| format!("Failed to update expense {id}"))?;
            info!(id, "Expense updated");
            println!(
                "Updated #{}: {} {} {}",
                updated.id,
                updated.date,
                format_amount(updated.amount, currency_symbol),
                updated.description
            );
            Ok(())
        }
        Commands::Delete { id } => {
            store
                .delete(id)
                .with_context(|| format!("Failed to delete expense {id}"))?;
            info!(id, "Expense deleted");
            println!("Deleted #{id}");
            Ok(())
        }
        Commands::Total { from, to } => cli_total(&store, from, to, currency_symbol),
        Commands::Status => {
            let status = store
                .health()
                .with_context(|| format!("Expense service at {} is unreachable", store.base_url()))?;
            println!("Expense service at {}: {status}", store.base_url());
            Ok(())
        }
    }
}

fn range_of(args: RangeArgs) -> DateRange {
    DateRange::new(args.from, args.to)
}

fn fetch_view(store: HttpStore, range: RangeArgs) -> Result<ViewState> {
    let mut view_model = ExpenseViewModel::new(Box::new(store));
    view_model
        .apply_filter(range_of(range))
        .context("Failed to fetch expenses")?;
    Ok(view_model.state().clone())
}

fn print_expenses(state: &ViewState, symbol: &str) {
    println!("Expenses, {}", state.describe_range());
    if state.is_empty() {
        println!("No expenses in this range");
        return;
    }

    println!("{:<6} {:<12} {:>14}  {:<12} Description", "ID", "Date", "Amount", "Category");
    println!("{}", "─".repeat(72));
    for expense in &state.expenses {
        print_expense_row(expense, symbol);
    }
    println!("{}", "─".repeat(72));
    println!(
        "{:<19} {:>14}  {} expenses",
        "Total",
        format_amount(state.summary.total, symbol),
        state.summary.count
    );
}

fn print_expense_row(expense: &Expense, symbol: &str) {
    println!(
        "{:<6} {:<12} {:>14}  {:<12} {}",
        expense.id,
        expense.date,
        format_amount(expense.amount, symbol),
        truncate(&category_label(&expense.category()), 12),
        truncate(&expense.description, 40),
    );
}

fn print_summary(state: &ViewState, symbol: &str) {
    let summary = &state.summary;
    let or_dash = |amount: Option<rust_decimal::Decimal>| {
        amount.map_or_else(|| "—".to_string(), |a| format_amount(a, symbol))
    };

    println!("fintrack: {}", state.describe_range());
    println!("{}", "─".repeat(40));
    println!("  Total:      {}", format_amount(summary.total, symbol));
    println!("  Expenses:   {}", summary.count);
    println!("  Average:    {}", or_dash(summary.average));
    println!("  Highest:    {}", or_dash(summary.max));

    if state.categories.is_empty() {
        println!();
        println!("No expenses in this range");
        return;
    }

    println!();
    println!("Spending by Category:");
    for entry in state.categories.iter() {
        let share = state
            .categories
            .share(&entry.category)
            .map(|pct| format!("{pct:>5}%"))
            .unwrap_or_default();
        let label = if entry.category.is_empty() {
            "(none)".to_string()
        } else {
            category_label(&entry.category)
        };
        println!(
            "  {label:<24} {:>14} {share}",
            format_amount(entry.subtotal, symbol)
        );
    }
}

/// Compare the service's own total with the sum of the records it lists.
fn cli_total(
    store: &HttpStore,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
    symbol: &str,
) -> Result<()> {
    if from > to {
        anyhow::bail!("--from {from} is after --to {to}");
    }
    let range = DateRange::new(Some(from), Some(to));
    let remote = store
        .remote_total(from, to)
        .context("Failed to fetch total")?;
    let records = store.list(&range).context("Failed to fetch expenses")?;
    let local = summarize(&filter_by_range(&records, &range)).total;

    println!("Total {from} to {to}: {}", format_amount(remote, symbol));
    if remote != local {
        warn!(%remote, %local, "Service total disagrees with listed expenses");
        println!(
            "Warning: listed expenses add up to {}",
            format_amount(local, symbol)
        );
    }
    Ok(())
}
