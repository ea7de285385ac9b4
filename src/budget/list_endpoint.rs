//! Defines the endpoint for listing a user's budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, budget::core::list_budgets, user_key::UserKey};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The database connection for the budget aggregates.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing budgets.
#[derive(Debug, Default, Deserialize)]
pub struct ListBudgetsParams {
    /// The key of the user whose budgets to list.
    pub user: Option<String>,
}

/// A route handler that lists the user's budgets ordered by category.
pub async fn list_budgets_endpoint(
    State(state): State<ListBudgetsState>,
    Query(params): Query<ListBudgetsParams>,
) -> Response {
    let user = match UserKey::new(params.user.as_deref().unwrap_or_default()) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match list_budgets(&user, &connection) {
        Ok(budgets) => Json(budgets).into_response(),
        Err(error) => error.into_response(),
    }
}
