mod expense;

pub use expense::{
    amount_from_json, category_label, parse_date, to_cents, Expense, NewExpense, DATE_FORMAT,
};

#[cfg(test)]
pub use expense::{category_of, parse_amount, ValidationError};
