use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "amount")]
    pub amount: Decimal,
    pub description: String,
}

impl Expense {
    /// First whitespace-delimited word of the description, lower-cased.
    /// Descriptions with no word at all land in the empty category.
    pub fn category(&self) -> String {
        category_of(&self.description)
    }
}

pub fn category_of(description: &str) -> String {
    description
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Display label for a category: first letter upper-cased.
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Round a currency amount to cents.
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description is required")]
    EmptyDescription,
    #[error("Amount is required")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}

/// An expense as submitted to the store, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExpense {
    pub description: String,
    #[serde(with = "amount")]
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn new(description: &str, amount: Decimal, date: NaiveDate) -> Result<Self, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let amount = to_cents(amount);
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(Self {
            description: description.to_string(),
            amount,
            date,
        })
    }

    /// Validate raw user input. Accepts a leading currency sign and thousand
    /// separators in the amount, e.g. `"₹1,250.50"`.
    pub fn parse(description: &str, amount: &str, date: &str) -> Result<Self, ValidationError> {
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let amount = parse_amount(amount)?;
        let date = parse_date(date)?;
        Self::new(description, amount, date)
    }

    /// Draft pre-filled from an existing record, for editing.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount,
            date: expense.date,
        }
    }
}

pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    let cleaned: String = raw
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Read a JSON number as an exact decimal rounded to cents. Going through
/// the number's shortest text form keeps `20.1` as `20.1` rather than the
/// nearest binary double.
pub fn amount_from_json(number: &serde_json::Number) -> Result<Decimal, String> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(to_cents)
        .map_err(|e| format!("invalid amount {text}: {e}"))
}

mod amount {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        let float = value
            .to_f64()
            .ok_or_else(|| S::Error::custom(format!("amount out of range: {value}")))?;
        s.serialize_f64(float)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let number = serde_json::Number::deserialize(d)?;
        super::amount_from_json(&number).map_err(D::Error::custom)
    }
}
