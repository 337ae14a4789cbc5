//! Owns the store, the active date range and the derived view.
//!
//! Every mutation is followed by a full refetch, so the view only ever
//! reflects what the expense service reports. A failed call leaves the last
//! good `ViewState` in place. A mutation the store accepted still succeeds
//! when the refetch after it fails; only `last_error` records that.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::analytics::{
    categorize, filter_by_range_on, summarize, timeline, CategoryBreakdown, DateRange, Summary,
};
use crate::models::{Expense, NewExpense};
use crate::store::{ExpenseStore, StoreError};

/// Immutable derivation of one store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ViewState {
    pub(crate) range: DateRange,
    pub(crate) today: NaiveDate,
    /// Newest first.
    pub(crate) expenses: Vec<Expense>,
    pub(crate) summary: Summary,
    pub(crate) categories: CategoryBreakdown,
    pub(crate) timeline: Vec<(NaiveDate, Decimal)>,
    /// Records the store returned before client-side filtering.
    pub(crate) fetched: usize,
}

impl ViewState {
    pub(crate) fn derive(records: &[Expense], range: DateRange, today: NaiveDate) -> Self {
        let expenses = filter_by_range_on(records, &range, today);
        Self {
            range,
            today,
            summary: summarize(&expenses),
            categories: categorize(&expenses),
            timeline: timeline(&expenses),
            fetched: records.len(),
            expenses,
        }
    }

    pub(crate) fn empty(range: DateRange, today: NaiveDate) -> Self {
        Self::derive(&[], range, today)
    }

    /// Zero records matched. Informational, not an error.
    pub(crate) fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub(crate) fn describe_range(&self) -> String {
        self.range.describe(self.today)
    }
}

/// Issued when a fetch starts; only the newest ticket may publish a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    generation: u64,
    range: DateRange,
}

pub(crate) struct ExpenseViewModel {
    store: Box<dyn ExpenseStore>,
    range: DateRange,
    state: ViewState,
    generation: u64,
    last_error: Option<String>,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl ExpenseViewModel {
    pub(crate) fn new(store: Box<dyn ExpenseStore>) -> Self {
        Self::with_clock(store, local_today)
    }

    pub(crate) fn with_clock(store: Box<dyn ExpenseStore>, clock: fn() -> NaiveDate) -> Self {
        let range = DateRange::current_month();
        Self {
            store,
            range,
            state: ViewState::empty(range, clock()),
            generation: 0,
            last_error: None,
            clock,
        }
    }

    pub(crate) fn state(&self) -> &ViewState {
        &self.state
    }

    pub(crate) fn range(&self) -> DateRange {
        self.range
    }

    pub(crate) fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Start a fetch for the active range. Any earlier ticket becomes stale.
    pub(crate) fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            range: self.range,
        }
    }

    /// Publish a fetch result. Returns `Ok(false)` when the ticket was
    /// superseded and the result was dropped.
    pub(crate) fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Expense>, StoreError>,
    ) -> Result<bool, StoreError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping superseded fetch result"
            );
            return Ok(false);
        }
        match result {
            Ok(records) => {
                self.state = ViewState::derive(&records, ticket.range, self.today());
                self.last_error = None;
                info!(
                    fetched = self.state.fetched,
                    shown = self.state.expenses.len(),
                    categories = ?self.state.categories.categories(),
                    "View refreshed"
                );
                Ok(true)
            }
            Err(e) => Err(self.record_error(e)),
        }
    }

    /// Refetch the active range and rederive the view.
    pub(crate) fn refresh(&mut self) -> Result<(), StoreError> {
        let ticket = self.begin_fetch();
        let result = self.store.list(&ticket.range);
        self.complete_fetch(ticket, result)?;
        Ok(())
    }

    /// Switch to `range`. If the fetch fails the previous range stays active.
    pub(crate) fn apply_filter(&mut self, range: DateRange) -> Result<(), StoreError> {
        let previous = self.range;
        self.range = range;
        if let Err(e) = self.refresh() {
            self.range = previous;
            return Err(e);
        }
        Ok(())
    }

    pub(crate) fn add(&mut self, expense: &NewExpense) -> Result<Expense, StoreError> {
        let created = self.store.create(expense).map_err(|e| self.record_error(e))?;
        info!(id = created.id, "Expense created");
        self.refetch_after_mutation();
        Ok(created)
    }

    pub(crate) fn update(&mut self, id: i64, expense: &NewExpense) -> Result<Expense, StoreError> {
        let updated = self
            .store
            .update(id, expense)
            .map_err(|e| self.record_error(e))?;
        info!(id, "Expense updated");
        self.refetch_after_mutation();
        Ok(updated)
    }

    pub(crate) fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id).map_err(|e| self.record_error(e))?;
        info!(id, "Expense deleted");
        self.refetch_after_mutation();
        Ok(())
    }

    /// Look up a displayed expense by id.
    pub(crate) fn find(&self, id: i64) -> Option<&Expense> {
        self.state.expenses.iter().find(|e| e.id == id)
    }

    /// The store already applied the change, so a failed refetch is not the
    /// caller's error. It stays in `last_error` and the previous view remains.
    fn refetch_after_mutation(&mut self) {
        if let Err(e) = self.refresh() {
            debug!(error = %e, "View is stale after an applied mutation");
        }
    }

    fn record_error(&mut self, err: StoreError) -> StoreError {
        warn!(error = %err, "Expense store call failed; keeping previous view");
        self.last_error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
#[path = "view_model_tests.rs"]
mod tests;
