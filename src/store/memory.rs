//! In-memory `ExpenseStore` for tests. Mirrors the service: ids are assigned
//! on create, a fully bounded range is filtered server-side, anything else
//! returns every record. `fail_next` makes the following calls error out;
//! `fail_next_list` does the same for `list` calls only.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{ExpenseStore, StoreError};
use crate::analytics::DateRange;
use crate::models::{Expense, NewExpense};

#[derive(Default)]
pub(crate) struct MemoryStore {
    records: RefCell<Vec<Expense>>,
    next_id: Cell<i64>,
    failures: Cell<usize>,
    list_failures: Cell<usize>,
    calls: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub(crate) fn with_records(records: Vec<Expense>) -> Self {
        let next_id = records.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            records: RefCell::new(records),
            next_id: Cell::new(next_id),
            ..Self::default()
        }
    }

    /// Make the next `n` calls fail with `Unavailable`.
    pub(crate) fn fail_next(&self, n: usize) {
        self.failures.set(n);
    }

    /// Make the next `n` `list` calls time out, leaving mutations working.
    pub(crate) fn fail_next_list(&self, n: usize) {
        self.list_failures.set(n);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn records(&self) -> Vec<Expense> {
        self.records.borrow().clone()
    }

    fn enter(&self, call: String) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(call);
        let failures = self.failures.get();
        if failures > 0 {
            self.failures.set(failures - 1);
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

impl ExpenseStore for MemoryStore {
    fn list(&self, range: &DateRange) -> Result<Vec<Expense>, StoreError> {
        self.enter("list".into())?;
        let list_failures = self.list_failures.get();
        if list_failures > 0 {
            self.list_failures.set(list_failures - 1);
            return Err(StoreError::Unavailable("timeout".into()));
        }
        let records = self.records.borrow();
        Ok(match (range.start, range.end) {
            (Some(_), Some(_)) => records
                .iter()
                .filter(|e| range.contains(e.date))
                .cloned()
                .collect(),
            _ => records.clone(),
        })
    }

    fn create(&self, expense: &NewExpense) -> Result<Expense, StoreError> {
        self.enter("create".into())?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let stored = Expense {
            id,
            date: expense.date,
            amount: expense.amount,
            description: expense.description.clone(),
        };
        self.records.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: i64, expense: &NewExpense) -> Result<Expense, StoreError> {
        self.enter(format!("update {id}"))?;
        let mut records = self.records.borrow_mut();
        let existing = records
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))?;
        existing.date = expense.date;
        existing.amount = expense.amount;
        existing.description = expense.description.clone();
        Ok(existing.clone())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.enter(format!("delete {id}"))?;
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|e| e.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

/// Lets a test keep a handle on the store after boxing it into a view model.
impl ExpenseStore for Rc<MemoryStore> {
    fn list(&self, range: &DateRange) -> Result<Vec<Expense>, StoreError> {
        self.as_ref().list(range)
    }

    fn create(&self, expense: &NewExpense) -> Result<Expense, StoreError> {
        self.as_ref().create(expense)
    }

    fn update(&self, id: i64, expense: &NewExpense) -> Result<Expense, StoreError> {
        self.as_ref().update(id, expense)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.as_ref().delete(id)
    }
}
