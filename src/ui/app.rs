use rust_decimal::Decimal;

use crate::models::{Expense, NewExpense};
use crate::ui::util::clamp_cursor;
use crate::view_model::{ExpenseViewModel, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// What the expense form submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormTarget {
    Add,
    Update(i64),
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, description: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency_symbol: String,

    pub(crate) view_model: ExpenseViewModel,

    // Expenses table
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Expense form ("date amount description" in the command bar)
    pub(crate) form_target: FormTarget,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(view_model: ExpenseViewModel, currency_symbol: &str) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency_symbol: currency_symbol.to_string(),

            view_model,

            expense_index: 0,
            expense_scroll: 0,

            form_target: FormTarget::Add,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn state(&self) -> &ViewState {
        self.view_model.state()
    }

    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.view_model.state().expenses
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.expenses().get(self.expense_index)
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        crate::ui::util::format_amount(amount, &self.currency_symbol)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Keep the cursor on a real row after the list changed underneath it.
    pub(crate) fn clamp_selection(&mut self) {
        let len = self.expenses().len();
        clamp_cursor(&mut self.expense_index, &mut self.expense_scroll, len);
    }

    /// Refetch the active range. Failures go to the status line; the last
    /// good view stays on screen.
    pub(crate) fn refresh(&mut self) {
        match self.view_model.refresh() {
            Ok(()) => {
                self.clamp_selection();
                let state = self.state();
                let msg = if state.is_empty() {
                    format!("No expenses in range: {}", state.describe_range())
                } else {
                    format!("{} expenses ({})", state.expenses.len(), state.describe_range())
                };
                self.set_status(msg);
            }
            Err(e) => self.set_status(format!("Refresh failed: {e}")),
        }
    }

    /// Open the expense form in the command bar.
    pub(crate) fn start_form(&mut self, target: FormTarget) {
        self.command_input = match target {
            FormTarget::Add => format!("{} ", self.view_model.today()),
            FormTarget::Update(id) => match self.view_model.find(id) {
                Some(expense) => form_line(&NewExpense::from_expense(expense)),
                None => String::new(),
            },
        };
        self.form_target = target;
        self.input_mode = InputMode::Editing;
    }

    /// Ask for confirmation before deleting the selected expense.
    pub(crate) fn confirm_delete_selected(&mut self) {
        let Some(expense) = self.selected_expense() else {
            self.set_status("No expense selected");
            return;
        };
        let id = expense.id;
        let description = expense.description.clone();
        self.confirm_message = format!("Delete '{description}'?");
        self.pending_action = Some(PendingAction::DeleteExpense { id, description });
        self.input_mode = InputMode::Confirm;
    }

    /// Validate the form line and send it to the store. Returns `false` when
    /// validation failed and the form should stay open for correction.
    pub(crate) fn submit_form(&mut self, line: &str) -> bool {
        let (date, amount, description) = split_form_line(line);
        let draft = match NewExpense::parse(description, amount, date) {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status(format!("Invalid expense: {e}"));
                return false;
            }
        };
        let result = match self.form_target {
            FormTarget::Add => self
                .view_model
                .add(&draft)
                .map(|e| format!("Added #{}: {}", e.id, e.description)),
            FormTarget::Update(id) => self
                .view_model
                .update(id, &draft)
                .map(|e| format!("Updated #{}: {}", e.id, e.description)),
        };
        match result {
            Ok(msg) => self.report_applied(msg),
            Err(e) => self.set_status(format!("Request failed: {e}")),
        }
        true
    }

    /// Status for a mutation the store accepted. If the refetch after it
    /// failed, say so without suggesting the change itself was lost.
    fn report_applied(&mut self, msg: String) {
        self.clamp_selection();
        let msg = match self.view_model.last_error() {
            Some(err) => format!("{msg}, but refresh failed: {err}"),
            None => msg,
        };
        self.set_status(msg);
    }

    pub(crate) fn run_pending_action(&mut self) {
        let Some(action) = self.pending_action.take() else {
            return;
        };
        match action {
            PendingAction::DeleteExpense { id, description } => match self.view_model.delete(id) {
                Ok(()) => self.report_applied(format!("Deleted: {description}")),
                Err(e) => self.set_status(format!("Delete failed: {e}")),
            },
        }
    }

    /// Switch the date filter. On failure the previous range stays active.
    pub(crate) fn apply_range(&mut self, range: crate::analytics::DateRange) {
        match self.view_model.apply_filter(range) {
            Ok(()) => {
                self.expense_index = 0;
                self.expense_scroll = 0;
                let state = self.state();
                let msg = if state.is_empty() {
                    format!("No expenses in range: {}", state.describe_range())
                } else {
                    format!("Showing {}", state.describe_range())
                };
                self.set_status(msg);
            }
            Err(e) => self.set_status(format!("Filter failed: {e}")),
        }
    }

    /// Step the filter window by whole months.
    pub(crate) fn shift_month(&mut self, delta: i32) {
        let range = self
            .view_model
            .range()
            .shift_months(delta, self.view_model.today());
        self.apply_range(range);
    }
}

/// Render a draft as the editable `date amount description` line.
pub(crate) fn form_line(draft: &NewExpense) -> String {
    format!("{} {:.2} {}", draft.date, draft.amount, draft.description)
}

/// Split a `date amount description...` line into its three fields.
/// Missing trailing fields come back empty so validation can name them.
pub(crate) fn split_form_line(line: &str) -> (&str, &str, &str) {
    let line = line.trim();
    let (date, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();
    let (amount, description) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    (date, amount, description.trim())
}
