use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ExpenseStore, StoreError};
use crate::analytics::DateRange;
use crate::config::Config;
use crate::models::{amount_from_json, Expense, NewExpense, DATE_FORMAT};

const EXPENSES_PATH: &str = "/api/expenses";
const HEALTH_PATH: &str = "/actuator/health";

/// Expense service client over HTTP/JSON.
pub(crate) struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpStore {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(base_url, client))
    }

    pub(crate) fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub(crate) fn from_config(config: &Config) -> Result<Self, StoreError> {
        Self::new(&config.api_url, config.timeout())
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    fn expenses_url(&self) -> String {
        format!("{}{EXPENSES_PATH}", self.base_url)
    }

    fn expense_url(&self, id: i64) -> String {
        format!("{}{EXPENSES_PATH}/{id}", self.base_url)
    }

    /// Server-side total for a closed range.
    pub(crate) fn remote_total(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Decimal, StoreError> {
        let url = format!("{}/total", self.expenses_url());
        let query = [
            ("startDate", start.format(DATE_FORMAT).to_string()),
            ("endDate", end.format(DATE_FORMAT).to_string()),
        ];
        debug!(%url, ?query, "GET total");
        let resp = self.client.get(&url).query(&query).send().map_err(transport_error)?;
        let number: serde_json::Number = check_status(resp, None)?.json().map_err(transport_error)?;
        amount_from_json(&number).map_err(StoreError::Malformed)
    }

    /// Status string reported by the service health endpoint, e.g. `"UP"`.
    pub(crate) fn health(&self) -> Result<String, StoreError> {
        let url = format!("{}{HEALTH_PATH}", self.base_url);
        debug!(%url, "GET health");
        let resp = self.client.get(&url).send().map_err(transport_error)?;
        let health: HealthResponse = check_status(resp, None)?.json().map_err(transport_error)?;
        Ok(health.status)
    }
}

/// The service only filters when both bounds are given, so a half-open
/// range fetches everything and is narrowed client-side.
pub(crate) fn list_query(range: &DateRange) -> Vec<(&'static str, String)> {
    match (range.start, range.end) {
        (Some(start), Some(end)) => vec![
            ("startDate", start.format(DATE_FORMAT).to_string()),
            ("endDate", end.format(DATE_FORMAT).to_string()),
        ],
        _ => Vec::new(),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_decode() {
        warn!(error = %err, "Undecodable response from expense service");
        StoreError::Malformed(err.to_string())
    } else {
        warn!(error = %err, "Expense service request failed");
        StoreError::Unavailable(err.to_string())
    }
}

/// Pass successful responses through; turn anything else into a
/// `StoreError`, using `NotFound` for a 404 on a known id.
fn check_status(resp: Response, id: Option<i64>) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(StoreError::NotFound(id));
    }
    let body = resp.text().unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.trim().to_string()
    };
    warn!(status = status.as_u16(), %message, "Expense service returned an error");
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl ExpenseStore for HttpStore {
    fn list(&self, range: &DateRange) -> Result<Vec<Expense>, StoreError> {
        let url = self.expenses_url();
        let query = list_query(range);
        debug!(%url, ?query, "GET expenses");
        let resp = self.client.get(&url).query(&query).send().map_err(transport_error)?;
        let expenses: Vec<Expense> = check_status(resp, None)?.json().map_err(transport_error)?;
        debug!(count = expenses.len(), "Fetched expenses");
        Ok(expenses)
    }

    fn create(&self, expense: &NewExpense) -> Result<Expense, StoreError> {
        let url = self.expenses_url();
        debug!(%url, ?expense, "POST expense");
        let resp = self.client.post(&url).json(expense).send().map_err(transport_error)?;
        check_status(resp, None)?.json().map_err(transport_error)
    }

    fn update(&self, id: i64, expense: &NewExpense) -> Result<Expense, StoreError> {
        let url = self.expense_url(id);
        debug!(%url, ?expense, "PUT expense");
        let resp = self.client.put(&url).json(expense).send().map_err(transport_error)?;
        check_status(resp, Some(id))?.json().map_err(transport_error)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let url = self.expense_url(id);
        debug!(%url, "DELETE expense");
        let resp = self.client.delete(&url).send().map_err(transport_error)?;
        let body = check_status(resp, Some(id))?.text().map_err(transport_error)?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let parsed: DeleteResponse =
            serde_json::from_str(&body).map_err(|e| StoreError::Malformed(e.to_string()))?;
        if parsed.deleted {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }
}
