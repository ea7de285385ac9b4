//! Defines the endpoint for downloading a statement document.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    expense::{StatementFilter, get_expenses_for_export, parse_iso_date},
    export::{ExportFormat, render_document},
    user_key::UserKey,
};

/// The state needed to export a statement.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for the ledger.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for a statement export.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    /// The key of the user whose statement to export.
    pub user: Option<String>,
    /// The earliest date to include (ISO calendar date), inclusive.
    pub from: Option<String>,
    /// The latest date to include (ISO calendar date), inclusive.
    pub to: Option<String>,
    /// One of "xlsx", "excel", "pdf", or "csv".
    pub format: Option<String>,
}

/// A route handler that renders the user's filtered ledger as a
/// downloadable document.
///
/// The read is a snapshot: concurrent writes may land after the query and
/// before the download completes, which is acceptable for a statement.
pub async fn export_expenses_endpoint(
    State(state): State<ExportState>,
    Query(params): Query<ExportParams>,
) -> Response {
    let filter = match export_filter(&params) {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };
    let format = ExportFormat::from_query(params.format.as_deref());

    // The lock is released before rendering; serialization needs no store
    // access.
    let expenses = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_expenses_for_export(&filter, &connection) {
            Ok(expenses) => expenses,
            Err(error) => return error.into_response(),
        }
    };

    let document = match render_document(&expenses, &filter, format) {
        Ok(document) => document,
        Err(error) => return error.into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, document.content_type.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

fn export_filter(params: &ExportParams) -> Result<StatementFilter, Error> {
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
