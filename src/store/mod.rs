//! Persistence boundary. The expense service owns the data; everything here
//! only forwards requests and reports what the service said.

mod http;
#[cfg(test)]
pub(crate) mod memory;
#[cfg(test)]
mod mock_service;

pub(crate) use http::HttpStore;

use thiserror::Error;

use crate::analytics::DateRange;
use crate::models::{Expense, NewExpense};

#[derive(Error, Debug)]
pub(crate) enum StoreError {
    #[error("Expense service unavailable: {0}")]
    Unavailable(String),

    #[error("Expense service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Expense {0} not found")]
    NotFound(i64),

    #[error("Malformed response from expense service: {0}")]
    Malformed(String),
}

/// CRUD over the remote expense collection.
pub(crate) trait ExpenseStore {
    fn list(&self, range: &DateRange) -> Result<Vec<Expense>, StoreError>;

    fn create(&self, expense: &NewExpense) -> Result<Expense, StoreError>;

    fn update(&self, id: i64, expense: &NewExpense) -> Result<Expense, StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;
}
