//! Pure derivations over an expense snapshot: date filtering, summary
//! statistics, the category breakdown and the daily timeline.

use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Expense;

/// Inclusive date interval. Both bounds absent means "the current month".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DateRange {
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
}

impl DateRange {
    pub(crate) fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub(crate) fn current_month() -> Self {
        Self::default()
    }

    /// First to last day of the month containing `date`.
    pub(crate) fn month_of(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self::new(Some(first), Some(last))
    }

    pub(crate) fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Resolve the "current month" default against `today`.
    pub(crate) fn resolve(&self, today: NaiveDate) -> Self {
        if self.is_unbounded() {
            Self::month_of(today)
        } else {
            *self
        }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Move a month-shaped window by `delta` months. Any other range is
    /// first snapped to the month of its start (or end).
    pub(crate) fn shift_months(&self, delta: i32, today: NaiveDate) -> Self {
        let resolved = self.resolve(today);
        let anchor = resolved.start.or(resolved.end).unwrap_or(today);
        let anchor = anchor.with_day(1).unwrap_or(anchor);
        let moved = if delta >= 0 {
            anchor.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            anchor.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        Self::month_of(moved.unwrap_or(anchor))
    }

    pub(crate) fn describe(&self, today: NaiveDate) -> String {
        match (self.start, self.end) {
            (None, None) => format!("This month ({})", today.format("%Y-%m")),
            (Some(start), Some(_)) if *self == Self::month_of(start) => {
                start.format("%B %Y").to_string()
            }
            (Some(start), Some(end)) => format!("{start} to {end}"),
            (Some(start), None) => format!("From {start}"),
            (None, Some(end)) => format!("Until {end}"),
        }
    }
}

/// Keep records inside `range`, evaluating the current-month default with the
/// local clock.
pub(crate) fn filter_by_range(records: &[Expense], range: &DateRange) -> Vec<Expense> {
    filter_by_range_on(records, range, Local::now().date_naive())
}

/// Keep records inside `range`, evaluating the current-month default against
/// `today`. The result is sorted newest first.
pub(crate) fn filter_by_range_on(
    records: &[Expense],
    range: &DateRange,
    today: NaiveDate,
) -> Vec<Expense> {
    let mut kept: Vec<Expense> = if range.is_unbounded() {
        records
            .iter()
            .filter(|e| e.date.year() == today.year() && e.date.month() == today.month())
            .cloned()
            .collect()
    } else {
        records
            .iter()
            .filter(|e| range.contains(e.date))
            .cloned()
            .collect()
    };
    sort_newest_first(&mut kept);
    kept
}

/// Date descending; equal dates keep their input order.
pub(crate) fn sort_newest_first(records: &mut [Expense]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Summary {
    pub(crate) total: Decimal,
    pub(crate) count: usize,
    /// `None` for an empty set.
    pub(crate) average: Option<Decimal>,
    /// `None` for an empty set.
    pub(crate) max: Option<Decimal>,
}

pub(crate) fn summarize(records: &[Expense]) -> Summary {
    let total: Decimal = records.iter().map(|e| e.amount).sum();
    let count = records.len();
    let average = if count > 0 {
        Some(total / Decimal::from(count))
    } else {
        None
    };
    let max = records.iter().map(|e| e.amount).max();
    Summary {
        total,
        count,
        average,
        max,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) subtotal: Decimal,
}

/// Subtotals per category, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct CategoryBreakdown {
    entries: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    pub(crate) fn get(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.subtotal)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &CategoryTotal> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.category.as_str()).collect()
    }

    pub(crate) fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.subtotal).sum()
    }

    /// Percentage of the breakdown total, one decimal place.
    pub(crate) fn share(&self, category: &str) -> Option<Decimal> {
        self.share_of(self.get(category)?)
    }

    /// `amount` as a percentage of the breakdown total, one decimal place.
    pub(crate) fn share_of(&self, amount: Decimal) -> Option<Decimal> {
        let total = self.total();
        if total.is_zero() {
            return None;
        }
        Some(
            (amount * Decimal::ONE_HUNDRED / total)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    fn add(&mut self, category: String, amount: Decimal) {
        match self.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => entry.subtotal += amount,
            None => self.entries.push(CategoryTotal {
                category,
                subtotal: amount,
            }),
        }
    }
}

pub(crate) fn categorize(records: &[Expense]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();
    for expense in records {
        breakdown.add(expense.category(), expense.amount);
    }
    breakdown
}

/// Per-day totals, oldest day first.
pub(crate) fn timeline(records: &[Expense]) -> Vec<(NaiveDate, Decimal)> {
    let mut days: Vec<(NaiveDate, Decimal)> = Vec::new();
    let mut sorted: Vec<&Expense> = records.iter().collect();
    sorted.sort_by_key(|e| e.date);
    for expense in sorted {
        if let Some((day, total)) = days.last_mut() {
            if *day == expense.date {
                *total += expense.amount;
                continue;
            }
        }
        days.push((expense.date, expense.amount));
    }
    days
}
