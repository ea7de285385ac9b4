//! Defines the endpoint for reading the paginated expense statement.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    expense::{
        core::{Expense, parse_iso_date},
        query::{StatementFilter, count_expenses, get_statement_page},
    },
    pagination::PaginationConfig,
    user_key::UserKey,
};

/// The state needed to read the statement.
#[derive(Debug, Clone)]
pub struct StatementState {
    /// The config that controls how statement pages are sliced.
    pub pagination_config: PaginationConfig,
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatementState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the statement page.
#[derive(Debug, Default, Deserialize)]
pub struct StatementParams {
    /// The key of the user whose statement to read.
    pub user: Option<String>,
    /// The earliest date to include (ISO calendar date), inclusive.
    pub from: Option<String>,
    /// The latest date to include (ISO calendar date), inclusive.
    pub to: Option<String>,
    /// The 1-based page number.
    pub page: Option<i64>,
    /// The number of entries per page.
    pub page_size: Option<i64>,
}

/// The response body for one statement page.
#[derive(Debug, Serialize)]
pub struct StatementResponse {
    /// The page slice, newest first.
    pub items: Vec<Expense>,
    /// The total matching entries across all pages.
    pub total: u64,
    /// The page number the slice was taken at.
    pub page: u64,
    /// The page size the slice was taken with.
    pub page_size: u64,
}

/// A route handler that returns one page of the user's expense statement.
///
/// Out-of-range `page`/`page_size` values fall back to the configured
/// defaults instead of erroring.
pub async fn get_statement_endpoint(
    State(state): State<StatementState>,
    Query(params): Query<StatementParams>,
) -> Response {
    let filter = match statement_filter(&params) {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    let page = state.pagination_config.resolve_page(params.page);
    let page_size = state.pagination_config.resolve_page_size(params.page_size);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let total = match count_expenses(&filter, &connection) {
        Ok(total) => total,
        Err(error) => return error.into_response(),
    };

    let items = match get_statement_page(&filter, page, page_size, &connection) {
        Ok(items) => items,
        Err(error) => return error.into_response(),
    };

    Json(StatementResponse {
        items,
        total,
        page,
        page_size,
    })
    .into_response()
}

/// Build the ledger filter from the raw query parameters.
///
/// Empty date strings are treated as absent, matching an HTML form that
/// submits blank inputs.
pub(crate) fn statement_filter(params: &StatementParams) -> Result<StatementFilter, Error> {
    let user = UserKey::new(params.user.as_deref().unwrap_or_default())?;

    let from = match params.from.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_iso_date(raw)?),
        None => None,
    };

    let to = match params.to.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_iso_date(raw)?),
        None => None,
    };

    Ok(StatementFilter { user, from, to })
}
