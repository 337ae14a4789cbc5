use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;

use super::app::{App, FormTarget, InputMode, PendingAction, Screen};
use crate::analytics::DateRange;
use crate::models::parse_date;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit fintrack", cmd_quit, r);
    register_command!("quit", "Quit fintrack", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 2024-01-15 250 food lunch)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add expense (e.g. :a 2024-01-15 250 food lunch)",
        cmd_add,
        r
    );
    register_command!("edit", "Edit selected expense (or :edit <id>)", cmd_edit, r);
    register_command!(
        "delete",
        "Delete selected expense (or :delete <id>)",
        cmd_delete,
        r
    );
    register_command!(
        "filter",
        "Filter by dates, '-' for open (e.g. :filter 2024-01-01 -)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter by dates", cmd_filter, r);
    register_command!("month", "Show a month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Show a month (e.g. :m 2024-01)", cmd_month, r);
    register_command!(
        "clear-filter",
        "Back to the current month",
        cmd_clear_filter,
        r
    );
    register_command!("refresh", "Refetch from the expense service", cmd_refresh, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parse a `:filter` argument pair. `-` (or nothing) leaves a bound open.
pub(crate) fn parse_filter_args(args: &str) -> Result<DateRange, String> {
    let mut bounds = args.split_whitespace();
    let mut next_bound = || -> Result<Option<NaiveDate>, String> {
        match bounds.next() {
            None | Some("-") => Ok(None),
            Some(raw) => parse_date(raw).map(Some).map_err(|e| e.to_string()),
        }
    };
    let start = next_bound()?;
    let end = next_bound()?;
    if bounds.next().is_some() {
        return Err("Usage: :filter <start|-> <end|->".into());
    }
    Ok(DateRange::new(start, end))
}

/// Parse `YYYY-MM` into the range covering that month.
pub(crate) fn parse_month_arg(args: &str) -> Result<DateRange, String> {
    NaiveDate::parse_from_str(&format!("{}-01", args.trim()), "%Y-%m-%d")
        .map(DateRange::month_of)
        .map_err(|_| "Invalid month format. Use YYYY-MM (e.g. 2024-01)".to_string())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App) -> anyhow::Result<()> {
    app.form_target = FormTarget::Add;
    if args.is_empty() {
        app.start_form(FormTarget::Add);
    } else if !app.submit_form(args) {
        // Keep what was typed so it can be corrected
        app.command_input = args.to_string();
        app.input_mode = InputMode::Editing;
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App) -> anyhow::Result<()> {
    let id = match target_id(args, app) {
        Ok(id) => id,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    if app.view_model.find(id).is_none() {
        app.set_status(format!("Expense #{id} is not in the current view"));
        return Ok(());
    }
    app.start_form(FormTarget::Update(id));
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.confirm_delete_selected();
        return Ok(());
    }
    let id = match target_id(args, app) {
        Ok(id) => id,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    let description = app
        .view_model
        .find(id)
        .map(|e| e.description.clone())
        .unwrap_or_else(|| format!("expense #{id}"));
    app.confirm_message = format!("Delete '{description}'?");
    app.pending_action = Some(PendingAction::DeleteExpense { id, description });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App) -> anyhow::Result<()> {
    match parse_filter_args(args) {
        Ok(range) => app.apply_range(range),
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_month(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.apply_range(DateRange::current_month());
        return Ok(());
    }
    match parse_month_arg(args) {
        Ok(range) => app.apply_range(range),
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_clear_filter(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.apply_range(DateRange::current_month());
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.refresh();
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.shift_month(1);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.shift_month(-1);
    Ok(())
}

/// Explicit id argument, else the selected row.
fn target_id(args: &str, app: &App) -> Result<i64, String> {
    if args.is_empty() {
        return app
            .selected_expense()
            .map(|e| e.id)
            .ok_or_else(|| "No expense selected".to_string());
    }
    args.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("Invalid expense id: {args}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", "add"), 3);
        assert_eq!(levenshtein("month", "month"), 0);
        assert_eq!(levenshtein("mnth", "month"), 1);
    }

    #[test]
    fn test_find_closest_suggests_full_name() {
        assert_eq!(find_closest("refesh"), "refresh");
        assert_eq!(find_closest("delet"), "delete");
        assert_eq!(find_closest("clear-filtr"), "clear-filter");
    }

    #[test]
    fn test_parse_filter_closed() {
        let range = parse_filter_args("2024-01-01 2024-01-31").unwrap();
        assert_eq!(
            range,
            DateRange::new(Some(date("2024-01-01")), Some(date("2024-01-31")))
        );
    }

    #[test]
    fn test_parse_filter_open_bounds() {
        assert_eq!(
            parse_filter_args("2024-01-06 -").unwrap(),
            DateRange::new(Some(date("2024-01-06")), None)
        );
        assert_eq!(
            parse_filter_args("- 2024-01-31").unwrap(),
            DateRange::new(None, Some(date("2024-01-31")))
        );
        assert_eq!(parse_filter_args("").unwrap(), DateRange::current_month());
    }

    #[test]
    fn test_parse_filter_rejects_bad_input() {
        assert!(parse_filter_args("2024-13-01 -").is_err());
        assert!(parse_filter_args("2024-01-01 2024-01-31 extra").is_err());
    }

    #[test]
    fn test_parse_month_arg() {
        assert_eq!(
            parse_month_arg("2024-02").unwrap(),
            DateRange::new(Some(date("2024-02-01")), Some(date("2024-02-29")))
        );
        assert!(parse_month_arg("2024-13").is_err());
        assert!(parse_month_arg("feb").is_err());
    }

    #[test]
    fn test_every_command_has_description() {
        assert!(COMMANDS.values().all(|c| !c.description.is_empty()));
        for name in [
            "add",
            "edit",
            "delete",
            "filter",
            "month",
            "clear-filter",
            "refresh",
            "dashboard",
            "expenses",
            "help",
            "quit",
        ] {
            assert!(COMMANDS.contains_key(name), "missing :{name}");
        }
    }
}
