//! Pocketledger is a personal-finance tracking service.
//!
//! This library provides a JSON REST API for recording expenses, managing
//! per-category budgets and wallet funds, and exporting statements as a
//! spreadsheet, PDF, or CSV document.
//!
//! The one piece of real coordination lives in the expense recorder: an
//! expense insert and the matching budget-aggregate increment commit as a
//! single database transaction, so the per-category `spent` totals always
//! equal the sum of the ledger entries recorded through it.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod budget;
mod db;
mod endpoints;
mod expense;
mod export;
mod logging;
mod money;
mod pagination;
mod profile;
mod routing;
mod user_key;
mod wallet;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use user_key::UserKey;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as a user key.
    #[error("user key cannot be empty")]
    EmptyUserKey,

    /// A non-finite or otherwise unusable number was given as a monetary
    /// amount. Expense amounts must additionally be positive.
    #[error("{0} is not a valid amount")]
    InvalidAmount(f64),

    /// An empty string was used as a spending category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// An empty string was used as an expense description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A date string could not be parsed as an ISO calendar date.
    #[error("could not parse {0:?} as a calendar date")]
    InvalidDate(String),

    /// A budget limit was negative, non-finite, or zero where a positive
    /// limit is required.
    #[error("{0} is not a valid budget limit")]
    InvalidBudgetLimit(f64),

    /// A budget already exists for the (user, category) pair.
    ///
    /// Reported with a distinct conflict status so the client can branch,
    /// e.g. offer to edit the existing budget instead.
    #[error("a budget for the category {0:?} already exists")]
    DuplicateBudget(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The expense recorder's transaction failed and was rolled back.
    ///
    /// No partial state persists, so the caller may safely retry.
    #[error("the ledger write failed and was rolled back, it is safe to retry")]
    WriteFailed,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A statement export document could not be rendered.
    #[error("could not render the export document: {0}")]
    ExportRenderError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::EmptyUserKey
            | Error::InvalidAmount(_)
            | Error::EmptyCategory
            | Error::EmptyDescription
            | Error::InvalidDate(_)
            | Error::InvalidBudgetLimit(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::DuplicateBudget(_) => (StatusCode::CONFLICT, self.to_string()),
            Error::WriteFailed => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong, check the server logs for more details".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
